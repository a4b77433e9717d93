use std::cell::RefCell;

use fmugym_core::ModelAdapter;
use ode_solvers::{DVector, Dop853, Dopri5, Rk4, System, dop_shared::OutputType};
use tracing::debug;

use super::{Method, SimulationFailure};

/// Maximum number of adaptive steps allowed within one window.
const MAX_STEPS: u32 = 100_000;

/// Number of steps between stiffness checks.
const STIFFNESS_CHECKS: u32 = 1000;

/// Evaluates the state derivative of `model` at time `t` and state `x`.
///
/// There is no side-effect-free derivative query: the model clock and state
/// are overwritten before the derivative is read.
///
/// # Errors
///
/// Returns the model's error if any of the calls fail.
pub fn derivative<M: ModelAdapter>(model: &mut M, t: f64, x: &[f64]) -> Result<Vec<f64>, M::Error> {
    model.set_time(t)?;
    model.set_continuous_states(x)?;
    model.get_derivatives()
}

/// Integrates `model` from `t0` to `t1` starting at `x0`.
///
/// `step` is the initial step for the adaptive methods and the fixed step
/// for [`Method::Rk4`]. Adaptive methods record every accepted step, so the
/// last recorded state is the state at `t1`. Returns that state.
pub(super) fn integrate<M: ModelAdapter>(
    model: &mut M,
    method: Method,
    (t0, t1): (f64, f64),
    x0: Vec<f64>,
    step: f64,
) -> Result<Vec<f64>, SimulationFailure> {
    let dim = x0.len();
    let span = t1 - t0;
    let model = RefCell::new(model);
    let failure = RefCell::new(None);
    let system = ModelSystem {
        model: &model,
        failure: &failure,
        dim,
    };
    let y0 = DVector::from_vec(x0);

    let result = match method {
        Method::Rk4 => {
            let mut stepper = Rk4::new(system, t0, y0, t1, step);
            stepper
                .integrate()
                .map(|stats| (stats.num_eval, stepper.y_out().last().cloned()))
        }
        Method::Dopri5 { abs_tol, rel_tol } => {
            let mut stepper = Dopri5::from_param(
                system,
                t0,
                t1,
                span,
                y0,
                rel_tol,
                abs_tol,
                0.9,
                0.04,
                0.2,
                10.0,
                span,
                step,
                MAX_STEPS,
                STIFFNESS_CHECKS,
                OutputType::Sparse,
            );
            stepper
                .integrate()
                .map(|stats| (stats.num_eval, stepper.y_out().last().cloned()))
        }
        Method::Dop853 { abs_tol, rel_tol } => {
            let mut stepper = Dop853::from_param(
                system,
                t0,
                t1,
                span,
                y0,
                rel_tol,
                abs_tol,
                0.9,
                0.0,
                0.333,
                6.0,
                span,
                step,
                MAX_STEPS,
                STIFFNESS_CHECKS,
                OutputType::Sparse,
            );
            stepper
                .integrate()
                .map(|stats| (stats.num_eval, stepper.y_out().last().cloned()))
        }
    };

    if let Some(failure) = failure.into_inner() {
        return Err(failure);
    }

    let (evaluations, y_end) = result?;
    debug!(evaluations, t0, t1, "integration finished");

    let y_end = y_end.ok_or(SimulationFailure::DimensionMismatch {
        expected: dim,
        actual: 0,
    })?;
    if y_end.iter().any(|v| !v.is_finite()) {
        return Err(SimulationFailure::NonFinite { time: t1 });
    }

    Ok(y_end.iter().copied().collect())
}

/// Adapts a model into an `ode_solvers` system.
///
/// A failed model call is stored in `failure`, the derivative is filled with
/// NaN, and the solver is asked to stop at its next output point.
struct ModelSystem<'a, 'm, M: ModelAdapter> {
    model: &'a RefCell<&'m mut M>,
    failure: &'a RefCell<Option<SimulationFailure>>,
    dim: usize,
}

impl<M: ModelAdapter> System<f64, DVector<f64>> for ModelSystem<'_, '_, M> {
    fn system(&self, t: f64, y: &DVector<f64>, dy: &mut DVector<f64>) {
        if self.failure.borrow().is_some() {
            *dy = DVector::from_element(self.dim, f64::NAN);
            return;
        }

        let mut model = self.model.borrow_mut();
        let failure = match derivative(&mut **model, t, y.as_slice()) {
            Ok(derivative) if derivative.len() == self.dim => {
                *dy = DVector::from_vec(derivative);
                return;
            }
            Ok(derivative) => SimulationFailure::DimensionMismatch {
                expected: self.dim,
                actual: derivative.len(),
            },
            Err(err) => SimulationFailure::model(err),
        };

        *self.failure.borrow_mut() = Some(failure);
        *dy = DVector::from_element(self.dim, f64::NAN);
    }

    fn solout(&mut self, _t: f64, _y: &DVector<f64>, _dy: &DVector<f64>) -> bool {
        self.failure.borrow().is_some()
    }
}
