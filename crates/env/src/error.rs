use std::error::Error as StdError;

use fmugym_core::{SchemaConflict, viz::VizError};
use fmugym_solvers::ode::SimulationFailure;
use thiserror::Error;

use crate::ConfigError;

/// Errors returned by [`EpisodeController`](crate::EpisodeController).
///
/// A failed call never invalidates the controller; it can be retried with
/// corrected arguments or reset.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error(
        "action should have {expected} values, one per model input, but has {actual}"
    )]
    InvalidActionLength { expected: usize, actual: usize },

    #[error("schema conflict: {0}")]
    SchemaConflict(#[from] SchemaConflict),

    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationFailure),

    #[error("model call failed: {0}")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("visualization failed: {0}")]
    Visualizer(#[source] VizError),

    #[error("the environment must be reset first")]
    NotReset,
}

impl Error {
    pub(crate) fn model<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Model(Box::new(err))
    }
}
