//! Shared fixtures for the cross-crate tests in `tests/`.

pub mod test_models;
