use std::str::FromStr;

use thiserror::Error;

/// Default absolute tolerance for the adaptive methods.
pub const DEFAULT_ABS_TOL: f64 = 1e-6;

/// Default relative tolerance for the adaptive methods.
pub const DEFAULT_REL_TOL: f64 = 1e-3;

/// Supported numerical integration methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    /// Classic fixed-step 4th-order Runge–Kutta method.
    ///
    /// Each window is split into equal sub-steps sized from the Jacobian so
    /// that the step stays inside the explicit stability region.
    Rk4,

    /// Adaptive Dormand–Prince 5(4) Runge–Kutta method.
    ///
    /// An explicit embedded method that estimates local truncation error from
    /// its 5th and 4th order solutions and keeps it within `abs_tol` and
    /// `rel_tol`. A good general-purpose choice for non-stiff models.
    Dopri5 { abs_tol: f64, rel_tol: f64 },

    /// Adaptive Dormand–Prince 8(5,3) Runge–Kutta method.
    ///
    /// Higher order than [`Method::Dopri5`], typically cheaper overall when
    /// tight tolerances are required.
    Dop853 { abs_tol: f64, rel_tol: f64 },
}

impl Default for Method {
    fn default() -> Self {
        Self::Dopri5 {
            abs_tol: DEFAULT_ABS_TOL,
            rel_tol: DEFAULT_REL_TOL,
        }
    }
}

/// Error returned when a solver method name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown solver method {0:?}; expected one of RK4, RK45, Dopri5, DOP853")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    /// Parses a method name, case-insensitively.
    ///
    /// `RK45` is accepted as an alias for `Dopri5`. Adaptive methods parsed
    /// from a name use the default tolerances.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rk4" => Ok(Self::Rk4),
            "rk45" | "dopri5" => Ok(Self::Dopri5 {
                abs_tol: DEFAULT_ABS_TOL,
                rel_tol: DEFAULT_REL_TOL,
            }),
            "dop853" => Ok(Self::Dop853 {
                abs_tol: DEFAULT_ABS_TOL,
                rel_tol: DEFAULT_REL_TOL,
            }),
            _ => Err(UnknownMethod(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!("RK4".parse::<Method>(), Ok(Method::Rk4));
        assert_eq!("rk45".parse::<Method>(), Ok(Method::default()));
        assert!(matches!("DOP853".parse::<Method>(), Ok(Method::Dop853 { .. })));
    }

    #[test]
    fn rejects_unsupported_names() {
        let err = "LSODA".parse::<Method>().unwrap_err();
        assert_eq!(err, UnknownMethod("LSODA".into()));
    }
}
