use std::error::Error as StdError;

use ode_solvers::dop_shared::IntegrationError;
use thiserror::Error;

/// Errors that can occur while integrating a model across a window.
///
/// Solver failures are passed through unmodified; no retry is attempted.
#[derive(Debug, Error)]
pub enum SimulationFailure {
    #[error(transparent)]
    Integration(#[from] IntegrationError),

    #[error("model call failed: {0}")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("model returned {actual} values where {expected} were expected")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("integration produced a non-finite state at t = {time}")]
    NonFinite { time: f64 },

    #[error("output references are unresolved; call `prepare` after model setup")]
    Unprepared,
}

impl SimulationFailure {
    pub(crate) fn model<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Model(Box::new(err))
    }
}
