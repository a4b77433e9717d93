//! Numerical stepping for the fmugym framework.
//!
//! # Modules
//!
//! - [`ode`]: integrates a [`ModelAdapter`] across one [`TimeWindow`] with
//!   an adaptive solver, supplying it with an exactly assembled Jacobian
//!
//! [`ModelAdapter`]: fmugym_core::ModelAdapter
//! [`TimeWindow`]: fmugym_core::TimeWindow

pub mod ode;
