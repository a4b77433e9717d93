//! Fake models implementing [`ModelAdapter`] for integration tests.

use std::collections::BTreeMap;

use fmugym_core::{EventInfo, ModelAdapter, ValueRef};
use thiserror::Error;

/// Errors returned by the test models.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestModelError {
    #[error("unknown variable {0:?}")]
    UnknownVariable(String),

    #[error("unknown value reference {0}")]
    UnknownRef(u32),

    #[error("expected {expected} values, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("derivative requested outside continuous-time mode")]
    NotContinuous,

    #[error("derivative evaluation failed at t = {0}")]
    Derivative(f64),
}

const INPUT_REF_BASE: u32 = 1000;
const DERIVATIVE_REF_BASE: u32 = 2000;

fn indexed(prefix: &str, name: &str) -> Option<usize> {
    name.strip_prefix(prefix)?.parse().ok()
}

fn check_len(expected: usize, actual: usize) -> Result<(), TestModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(TestModelError::Length { expected, actual })
    }
}

fn mat_vec(m: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    m.iter()
        .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
        .collect()
}

/// A linear model `ẋ = A·x + B·u`.
///
/// States are named `x0, x1, ..` and inputs `u0, u1, ..`; both can be read as
/// outputs. Any other name passed to `set` is stored as a parameter.
#[derive(Debug, Clone)]
pub struct LinearModel {
    a: Vec<Vec<f64>>,
    b: Vec<Vec<f64>>,
    x_init: Vec<f64>,
    x: Vec<f64>,
    u: Vec<f64>,
    t: f64,
    params: BTreeMap<String, f64>,
    param_log: Vec<Vec<(String, f64)>>,
    directional_calls: usize,
}

impl LinearModel {
    /// Creates a model with `A` (`n×n`), `B` (`n×m`), and initial state `x_init`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions do not agree.
    #[must_use]
    pub fn new(a: Vec<Vec<f64>>, b: Vec<Vec<f64>>, x_init: Vec<f64>) -> Self {
        let n = x_init.len();
        assert!(a.len() == n && a.iter().all(|row| row.len() == n), "A must be n×n");
        assert_eq!(b.len(), n, "B must have n rows");
        let m = b.first().map_or(0, Vec::len);
        assert!(b.iter().all(|row| row.len() == m), "B rows must agree");

        Self {
            a,
            b,
            x: x_init.clone(),
            x_init,
            u: vec![0.0; m],
            t: 0.0,
            params: BTreeMap::new(),
            param_log: Vec::new(),
            directional_calls: 0,
        }
    }

    /// Creates a scalar model `ẋ = a·x + u0`.
    #[must_use]
    pub fn scalar(a: f64, x_init: f64) -> Self {
        Self::new(vec![vec![a]], vec![vec![1.0]], vec![x_init])
    }

    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[must_use]
    pub fn u(&self) -> &[f64] {
        &self.u
    }

    #[must_use]
    pub fn time(&self) -> f64 {
        self.t
    }

    #[must_use]
    pub fn params(&self) -> &BTreeMap<String, f64> {
        &self.params
    }

    /// Returns every batched parameter assignment, oldest first.
    #[must_use]
    pub fn param_log(&self) -> &[Vec<(String, f64)>] {
        &self.param_log
    }

    /// Returns the number of directional-derivative probes.
    #[must_use]
    pub fn directional_calls(&self) -> usize {
        self.directional_calls
    }
}

impl ModelAdapter for LinearModel {
    type Error = TestModelError;

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.x.clone_from(&self.x_init);
        self.u.iter_mut().for_each(|u| *u = 0.0);
        self.t = 0.0;
        self.params.clear();
        Ok(())
    }

    fn setup_experiment(&mut self, start_time: f64) -> Result<(), Self::Error> {
        self.t = start_time;
        Ok(())
    }

    fn enter_initialization_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_initialization_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn get_event_info(&self) -> Result<EventInfo, Self::Error> {
        Ok(EventInfo::default())
    }

    fn enter_event_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn event_update(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_continuous_time_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn get_variable_valueref(&self, name: &str) -> Result<ValueRef, Self::Error> {
        let unknown = || TestModelError::UnknownVariable(name.to_owned());
        if let Some(i) = indexed("x", name).filter(|&i| i < self.x.len()) {
            return u32::try_from(i).map(ValueRef).map_err(|_| unknown());
        }
        if let Some(j) = indexed("u", name).filter(|&j| j < self.u.len()) {
            return u32::try_from(j)
                .map(|j| ValueRef(INPUT_REF_BASE + j))
                .map_err(|_| unknown());
        }
        Err(unknown())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn get_states_list(&self) -> Vec<(String, ValueRef)> {
        (0..self.x.len())
            .map(|i| (format!("x{i}"), ValueRef(i as u32)))
            .collect()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn get_derivatives_list(&self) -> Vec<(String, ValueRef)> {
        (0..self.x.len())
            .map(|i| (format!("der(x{i})"), ValueRef(DERIVATIVE_REF_BASE + i as u32)))
            .collect()
    }

    fn get_directional_derivative(
        &mut self,
        state_refs: &[ValueRef],
        derivative_refs: &[ValueRef],
        direction: &[f64],
    ) -> Result<Vec<f64>, Self::Error> {
        check_len(self.x.len(), state_refs.len())?;
        check_len(self.x.len(), derivative_refs.len())?;
        check_len(self.x.len(), direction.len())?;
        self.directional_calls += 1;
        Ok(mat_vec(&self.a, direction))
    }

    fn get_derivatives(&mut self) -> Result<Vec<f64>, Self::Error> {
        let ax = mat_vec(&self.a, &self.x);
        let bu = mat_vec(&self.b, &self.u);
        Ok(ax.iter().zip(&bu).map(|(a, b)| a + b).collect())
    }

    fn continuous_states(&self) -> Result<Vec<f64>, Self::Error> {
        Ok(self.x.clone())
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<(), Self::Error> {
        check_len(self.x.len(), states.len())?;
        self.x.copy_from_slice(states);
        Ok(())
    }

    fn set_time(&mut self, time: f64) -> Result<(), Self::Error> {
        self.t = time;
        Ok(())
    }

    fn set(&mut self, names: &[String], values: &[f64]) -> Result<(), Self::Error> {
        check_len(names.len(), values.len())?;
        let mut params = Vec::new();
        for (name, &value) in names.iter().zip(values) {
            match indexed("u", name).filter(|&j| j < self.u.len()) {
                Some(j) => self.u[j] = value,
                None => {
                    self.params.insert(name.clone(), value);
                    params.push((name.clone(), value));
                }
            }
        }
        if !params.is_empty() {
            self.param_log.push(params);
        }
        Ok(())
    }

    fn get_real(&mut self, refs: &[ValueRef]) -> Result<Vec<f64>, Self::Error> {
        refs.iter()
            .map(|&ValueRef(r)| {
                let value = if r < INPUT_REF_BASE {
                    self.x.get(r as usize)
                } else {
                    self.u.get((r - INPUT_REF_BASE) as usize)
                };
                value.copied().ok_or(TestModelError::UnknownRef(r))
            })
            .collect()
    }
}

/// A ramp `ẋ = rate + u` whose rate is only switched on by event iteration.
///
/// After a reset the model needs `required_iterations` event updates before its
/// discrete state is settled, and refuses derivative requests until it has
/// entered continuous-time mode.
#[derive(Debug, Clone)]
pub struct EventfulModel {
    required_iterations: u32,
    target_rate: f64,
    iterations: u32,
    rate: f64,
    continuous: bool,
    x: f64,
    u: f64,
    t: f64,
}

impl EventfulModel {
    #[must_use]
    pub fn new(required_iterations: u32, target_rate: f64) -> Self {
        Self {
            required_iterations,
            target_rate,
            iterations: 0,
            rate: 0.0,
            continuous: false,
            x: 0.0,
            u: 0.0,
            t: 0.0,
        }
    }

    /// Returns the event updates performed since the last reset.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl ModelAdapter for EventfulModel {
    type Error = TestModelError;

    fn reset(&mut self) -> Result<(), Self::Error> {
        *self = Self::new(self.required_iterations, self.target_rate);
        Ok(())
    }

    fn setup_experiment(&mut self, start_time: f64) -> Result<(), Self::Error> {
        self.t = start_time;
        Ok(())
    }

    fn enter_initialization_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_initialization_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn get_event_info(&self) -> Result<EventInfo, Self::Error> {
        Ok(EventInfo {
            new_discrete_states_needed: self.iterations < self.required_iterations,
        })
    }

    fn enter_event_mode(&mut self) -> Result<(), Self::Error> {
        self.continuous = false;
        Ok(())
    }

    fn event_update(&mut self) -> Result<(), Self::Error> {
        self.iterations += 1;
        if self.iterations >= self.required_iterations {
            self.rate = self.target_rate;
        }
        Ok(())
    }

    fn enter_continuous_time_mode(&mut self) -> Result<(), Self::Error> {
        self.continuous = true;
        Ok(())
    }

    fn get_variable_valueref(&self, name: &str) -> Result<ValueRef, Self::Error> {
        match name {
            "x" => Ok(ValueRef(0)),
            "u" => Ok(ValueRef(1)),
            "rate" => Ok(ValueRef(2)),
            _ => Err(TestModelError::UnknownVariable(name.to_owned())),
        }
    }

    fn get_states_list(&self) -> Vec<(String, ValueRef)> {
        vec![("x".into(), ValueRef(0))]
    }

    fn get_derivatives_list(&self) -> Vec<(String, ValueRef)> {
        vec![("der(x)".into(), ValueRef(DERIVATIVE_REF_BASE))]
    }

    fn get_directional_derivative(
        &mut self,
        _state_refs: &[ValueRef],
        _derivative_refs: &[ValueRef],
        direction: &[f64],
    ) -> Result<Vec<f64>, Self::Error> {
        Ok(vec![0.0; direction.len()])
    }

    fn get_derivatives(&mut self) -> Result<Vec<f64>, Self::Error> {
        if !self.continuous {
            return Err(TestModelError::NotContinuous);
        }
        Ok(vec![self.rate + self.u])
    }

    fn continuous_states(&self) -> Result<Vec<f64>, Self::Error> {
        Ok(vec![self.x])
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<(), Self::Error> {
        check_len(1, states.len())?;
        self.x = states[0];
        Ok(())
    }

    fn set_time(&mut self, time: f64) -> Result<(), Self::Error> {
        self.t = time;
        Ok(())
    }

    fn set(&mut self, names: &[String], values: &[f64]) -> Result<(), Self::Error> {
        for (name, &value) in names.iter().zip(values) {
            match name.as_str() {
                "u" => self.u = value,
                _ => return Err(TestModelError::UnknownVariable(name.clone())),
            }
        }
        Ok(())
    }

    fn get_real(&mut self, refs: &[ValueRef]) -> Result<Vec<f64>, Self::Error> {
        refs.iter()
            .map(|&ValueRef(r)| match r {
                0 => Ok(self.x),
                1 => Ok(self.u),
                2 => Ok(self.rate),
                other => Err(TestModelError::UnknownRef(other)),
            })
            .collect()
    }
}

/// A decay `ẋ = -x` whose derivative fails once the clock passes `fail_after`.
#[derive(Debug, Clone)]
pub struct FailingModel {
    fail_after: f64,
    x: f64,
    t: f64,
}

impl FailingModel {
    #[must_use]
    pub fn new(fail_after: f64) -> Self {
        Self {
            fail_after,
            x: 1.0,
            t: 0.0,
        }
    }
}

impl ModelAdapter for FailingModel {
    type Error = TestModelError;

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.x = 1.0;
        self.t = 0.0;
        Ok(())
    }

    fn setup_experiment(&mut self, start_time: f64) -> Result<(), Self::Error> {
        self.t = start_time;
        Ok(())
    }

    fn enter_initialization_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_initialization_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn get_event_info(&self) -> Result<EventInfo, Self::Error> {
        Ok(EventInfo::default())
    }

    fn enter_event_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn event_update(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_continuous_time_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn get_variable_valueref(&self, name: &str) -> Result<ValueRef, Self::Error> {
        match name {
            "x" => Ok(ValueRef(0)),
            "u" => Ok(ValueRef(1)),
            _ => Err(TestModelError::UnknownVariable(name.to_owned())),
        }
    }

    fn get_states_list(&self) -> Vec<(String, ValueRef)> {
        vec![("x".into(), ValueRef(0))]
    }

    fn get_derivatives_list(&self) -> Vec<(String, ValueRef)> {
        vec![("der(x)".into(), ValueRef(DERIVATIVE_REF_BASE))]
    }

    fn get_directional_derivative(
        &mut self,
        _state_refs: &[ValueRef],
        _derivative_refs: &[ValueRef],
        direction: &[f64],
    ) -> Result<Vec<f64>, Self::Error> {
        Ok(direction.iter().map(|d| -d).collect())
    }

    fn get_derivatives(&mut self) -> Result<Vec<f64>, Self::Error> {
        if self.t > self.fail_after {
            return Err(TestModelError::Derivative(self.t));
        }
        Ok(vec![-self.x])
    }

    fn continuous_states(&self) -> Result<Vec<f64>, Self::Error> {
        Ok(vec![self.x])
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<(), Self::Error> {
        check_len(1, states.len())?;
        self.x = states[0];
        Ok(())
    }

    fn set_time(&mut self, time: f64) -> Result<(), Self::Error> {
        self.t = time;
        Ok(())
    }

    fn set(&mut self, names: &[String], _values: &[f64]) -> Result<(), Self::Error> {
        match names.iter().find(|name| name.as_str() != "u") {
            Some(name) => Err(TestModelError::UnknownVariable(name.clone())),
            None => Ok(()),
        }
    }

    fn get_real(&mut self, refs: &[ValueRef]) -> Result<Vec<f64>, Self::Error> {
        refs.iter()
            .map(|&ValueRef(r)| match r {
                0 => Ok(self.x),
                1 => Ok(0.0),
                other => Err(TestModelError::UnknownRef(other)),
            })
            .collect()
    }
}
