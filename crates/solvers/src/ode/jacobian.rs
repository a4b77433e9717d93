use fmugym_core::{ModelAdapter, ValueRef};
use nalgebra::{DMatrix, DVector};

use super::SimulationFailure;

/// A square Jacobian matrix `∂ẋ/∂x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Jacobian {
    matrix: DMatrix<f64>,
}

impl Jacobian {
    /// Creates a Jacobian from its columns.
    ///
    /// Returns `None` unless there are `n` columns of length `n`.
    #[must_use]
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Option<Self> {
        let dim = columns.len();
        if columns.iter().any(|c| c.len() != dim) {
            return None;
        }
        if dim == 0 {
            return Some(Self {
                matrix: DMatrix::zeros(0, 0),
            });
        }

        let columns: Vec<DVector<f64>> = columns.into_iter().map(DVector::from_vec).collect();
        Some(Self {
            matrix: DMatrix::from_columns(&columns),
        })
    }

    /// Returns the number of rows (and columns).
    #[must_use]
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Returns the entry at `row`, `col`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.matrix.get((row, col)).copied()
    }

    #[must_use]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Returns the maximum absolute row sum, `‖J‖∞`.
    ///
    /// This bounds the spectral radius of `J`.
    #[must_use]
    pub fn norm_inf(&self) -> f64 {
        self.matrix
            .row_iter()
            .map(|row| row.abs().sum())
            .fold(0.0, f64::max)
    }

    /// Returns a step size for an explicit method over a span of `span`.
    ///
    /// The step is `min(span, 1 / ‖J‖∞)`, or the whole span when the
    /// Jacobian is zero or not finite.
    #[must_use]
    pub fn step_hint(&self, span: f64) -> f64 {
        let norm = self.norm_inf();
        if norm.is_finite() && norm > 0.0 {
            span.min(norm.recip())
        } else {
            span
        }
    }
}

/// Assembles the Jacobian of `model` at time `t` and state `x`.
///
/// Sets the model clock and state, then probes the directional derivative
/// with each standard basis vector. The directional derivative is linear in
/// its direction, so column `j` of the result is exactly `J · e_j`.
///
/// # Errors
///
/// Returns [`SimulationFailure::Model`] if a model call fails, or
/// [`SimulationFailure::DimensionMismatch`] if a probed column does not have
/// one entry per derivative.
pub fn jacobian<M: ModelAdapter>(
    model: &mut M,
    t: f64,
    x: &[f64],
) -> Result<Jacobian, SimulationFailure> {
    model.set_time(t).map_err(SimulationFailure::model)?;
    model
        .set_continuous_states(x)
        .map_err(SimulationFailure::model)?;

    let state_refs: Vec<ValueRef> = model.get_states_list().into_iter().map(|(_, r)| r).collect();
    let derivative_refs: Vec<ValueRef> = model
        .get_derivatives_list()
        .into_iter()
        .map(|(_, r)| r)
        .collect();

    let dim = derivative_refs.len();
    let mut direction = vec![0.0; dim];
    let mut columns = Vec::with_capacity(dim);

    for j in 0..dim {
        direction[j] = 1.0;
        let column = model
            .get_directional_derivative(&state_refs, &derivative_refs, &direction)
            .map_err(SimulationFailure::model)?;
        direction[j] = 0.0;

        if column.len() != dim {
            return Err(SimulationFailure::DimensionMismatch {
                expected: dim,
                actual: column.len(),
            });
        }
        columns.push(column);
    }

    Jacobian::from_columns(columns).ok_or(SimulationFailure::DimensionMismatch {
        expected: dim,
        actual: 0,
    })
}
