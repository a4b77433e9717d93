/// Control input values for one step, in model input order.
///
/// A bare scalar is accepted and treated as a single-element sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Scalar(f64),
    Values(Vec<f64>),
}

impl Action {
    /// Returns the values as a sequence.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        match self {
            Self::Scalar(value) => vec![value],
            Self::Values(values) => values,
        }
    }

    /// Returns `true` if the action was given as a bare scalar.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }
}

impl From<f64> for Action {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for Action {
    fn from(values: Vec<f64>) -> Self {
        Self::Values(values)
    }
}

impl From<&[f64]> for Action {
    fn from(values: &[f64]) -> Self {
        Self::Values(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Action {
    fn from(values: [f64; N]) -> Self {
        Self::Values(values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_becomes_single_value() {
        let action = Action::from(0.5);

        assert!(action.is_scalar());
        assert_eq!(action.into_values(), [0.5]);
    }

    #[test]
    fn arrays_and_slices_become_sequences() {
        assert_eq!(Action::from([1.0, 2.0]), Action::Values(vec![1.0, 2.0]));
        assert_eq!(Action::from(&[3.0][..]).into_values(), [3.0]);
    }
}
