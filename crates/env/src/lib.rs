//! An episodic control environment around a continuous-time model.
//!
//! [`EpisodeController`] wraps a [`ModelAdapter`] with the reset/step
//! lifecycle expected by control-learning loops:
//!
//! - [`reset`](EpisodeController::reset) re-initializes the model, settles its
//!   discrete state, and integrates the first window.
//! - [`step`](EpisodeController::step) validates an [`Action`], pushes it and
//!   any time-varying [`ModelParameter`]s into the model, integrates one
//!   window, and records the merged observation.
//! - [`update_measurements`](EpisodeController::update_measurements) attaches
//!   external [`Measurements`] to the recorded rows, growing the history
//!   schema by whole column groups.
//!
//! Configuration is assembled with [`EpisodeConfig::builder`] or loaded from a
//! file as [`Settings`].
//!
//! [`ModelAdapter`]: fmugym_core::ModelAdapter

mod action;
mod config;
mod controller;
mod error;
pub mod logging;
mod measurements;
mod params;

pub use action::Action;
pub use config::{
    ConfigError, EpisodeConfig, EpisodeConfigBuilder, OutputSpec, RewardFn, SelectionSpec, Settings,
    VizMode,
};
pub use controller::{EpisodeController, Info, StepResult};
pub use error::Error;
pub use measurements::Measurements;
pub use params::ModelParameter;
