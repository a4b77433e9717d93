use std::fmt;

/// A named model parameter evaluated at the start of each step.
///
/// Constants are lifted into constant functions when the parameter is
/// created, so every parameter is evaluated the same way.
pub struct ModelParameter(Box<dyn Fn(f64) -> f64>);

impl ModelParameter {
    /// Creates a parameter that always evaluates to `value`.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self(Box::new(move |_| value))
    }

    /// Creates a parameter from a function of simulation time.
    pub fn from_fn(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Self(Box::new(f))
    }

    /// Evaluates the parameter at time `t`.
    #[must_use]
    pub fn eval(&self, t: f64) -> f64 {
        (self.0)(t)
    }
}

impl From<f64> for ModelParameter {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl fmt::Debug for ModelParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ModelParameter(..)")
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn constant_ignores_time() {
        let param = ModelParameter::from(3.0);

        assert_relative_eq!(param.eval(0.0), 3.0);
        assert_relative_eq!(param.eval(100.0), 3.0);
    }

    #[test]
    fn function_sees_time() {
        let param = ModelParameter::from_fn(|t| 2.0 * t + 1.0);

        assert_relative_eq!(param.eval(0.5), 2.0);
    }
}
