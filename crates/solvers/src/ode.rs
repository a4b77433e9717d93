//! Integration of a stateful model across one control window.
//!
//! [`OdeStepper`] advances a [`ModelAdapter`] from the start to the end of a
//! [`TimeWindow`] and reads the model outputs at the new state:
//!
//! ```text
//! x0   = model.continuous_states
//! J    = jacobian(model, t_start, x0)
//! x1   = solve(f, J, [t_start, t_end], x0)
//! obs  = model.get_real(outputs) after writing x1 back
//! ```
//!
//! The derivative callable `f(t, x)` is [`derivative`]; the Jacobian callable
//! `J(t, x)` is [`jacobian`].
//!
//! # Example
//!
//! ```ignore
//! use fmugym_core::TimeWindow;
//! use fmugym_solvers::ode::{Method, OdeStepper};
//!
//! let mut stepper = OdeStepper::new(Method::default(), vec!["y".into()]);
//! stepper.prepare(&model)?;
//! let obs = stepper.simulate(&mut model, &TimeWindow::first(0.0, 0.1))?;
//! ```

mod error;
mod jacobian;
mod method;
mod system;

pub use error::SimulationFailure;
pub use jacobian::{Jacobian, jacobian};
pub use method::{DEFAULT_ABS_TOL, DEFAULT_REL_TOL, Method, UnknownMethod};
pub use system::derivative;

use fmugym_core::{ModelAdapter, Row, TimeWindow, ValueRef};
use tracing::debug;

/// Drives one integration per control step and reports model outputs.
#[derive(Debug, Clone)]
pub struct OdeStepper {
    method: Method,
    output_names: Vec<String>,
    output_refs: Option<Vec<ValueRef>>,
}

impl OdeStepper {
    /// Creates a stepper that reports `output_names` after each integration.
    #[must_use]
    pub fn new(method: Method, output_names: Vec<String>) -> Self {
        Self {
            method,
            output_names,
            output_refs: None,
        }
    }

    /// Returns the integration method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the output names, in observation order.
    #[must_use]
    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    /// Resolves the output value references once, after model setup.
    ///
    /// # Errors
    ///
    /// Returns the model's error if an output name is unknown.
    pub fn prepare<M: ModelAdapter>(&mut self, model: &M) -> Result<(), M::Error> {
        let refs = self
            .output_names
            .iter()
            .map(|name| model.get_variable_valueref(name))
            .collect::<Result<Vec<_>, _>>()?;
        self.output_refs = Some(refs);
        Ok(())
    }

    /// Integrates `model` across `window` and returns the outputs at its end.
    ///
    /// The model's final state is written back and its clock set to the
    /// window end before the outputs are read.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationFailure`] if the solver fails, a model call fails,
    /// the final state is not finite, or [`prepare`](Self::prepare) was never
    /// called.
    pub fn simulate<M: ModelAdapter>(
        &self,
        model: &mut M,
        window: &TimeWindow,
    ) -> Result<Row, SimulationFailure> {
        let refs = self
            .output_refs
            .as_deref()
            .ok_or(SimulationFailure::Unprepared)?;
        let (t0, t1) = (window.start(), window.end());
        debug!(t0, t1, "simulation started");

        let x0 = model
            .continuous_states()
            .map_err(SimulationFailure::model)?;

        let x1 = if x0.is_empty() {
            x0
        } else {
            let jac = jacobian(model, t0, &x0)?;
            let step = self.initial_step(&jac, t1 - t0);
            system::integrate(model, self.method, (t0, t1), x0, step)?
        };

        model.set_time(t1).map_err(SimulationFailure::model)?;
        model
            .set_continuous_states(&x1)
            .map_err(SimulationFailure::model)?;

        let values = model.get_real(refs).map_err(SimulationFailure::model)?;
        let actual = values.len();
        Row::from_parts(self.output_names.clone(), values).ok_or(
            SimulationFailure::DimensionMismatch {
                expected: self.output_names.len(),
                actual,
            },
        )
    }

    /// Returns the step handed to the solver for a window of length `span`.
    ///
    /// Adaptive methods start from the Jacobian hint. For [`Method::Rk4`] the
    /// span is divided into equal sub-steps no longer than the hint; the step
    /// is nudged up by a few ulps so rounding never adds an extra sub-step.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn initial_step(&self, jac: &Jacobian, span: f64) -> f64 {
        let hint = jac.step_hint(span);
        match self.method {
            Method::Rk4 => {
                let substeps = (span / hint).ceil().max(1.0) as u64;
                span / substeps as f64 * (1.0 + 4.0 * f64::EPSILON)
            }
            Method::Dopri5 { .. } | Method::Dop853 { .. } => hint,
        }
    }
}
