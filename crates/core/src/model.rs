/// A value reference identifying one variable inside a model.
///
/// Value references are resolved once from variable names with
/// [`ModelAdapter::get_variable_valueref`] and used for batched reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueRef(pub u32);

/// Event information reported by a model after an event update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventInfo {
    /// Whether another event iteration is required before the discrete
    /// state is stable.
    pub new_discrete_states_needed: bool,
}

/// A stateful continuous-time simulation model.
///
/// The model owns its continuous state vector `x(t)` along with its clock and
/// inputs. There is no pure derivative query: evaluating the derivative
/// requires setting the clock and the state first, which mutates the model.
///
/// The operations mirror the model-exchange lifecycle of an FMI component:
///
/// 1. [`reset`], [`setup_experiment`], then bracket initialization with
///    [`enter_initialization_mode`] and [`exit_initialization_mode`].
/// 2. Iterate [`enter_event_mode`] and [`event_update`] until
///    [`get_event_info`] reports a stable discrete state.
/// 3. [`enter_continuous_time_mode`] and integrate.
///
/// [`reset`]: ModelAdapter::reset
/// [`setup_experiment`]: ModelAdapter::setup_experiment
/// [`enter_initialization_mode`]: ModelAdapter::enter_initialization_mode
/// [`exit_initialization_mode`]: ModelAdapter::exit_initialization_mode
/// [`enter_event_mode`]: ModelAdapter::enter_event_mode
/// [`event_update`]: ModelAdapter::event_update
/// [`get_event_info`]: ModelAdapter::get_event_info
/// [`enter_continuous_time_mode`]: ModelAdapter::enter_continuous_time_mode
pub trait ModelAdapter {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Restores the model to its initial condition.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the model cannot be reset.
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Declares the start time of the experiment.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the model rejects the experiment setup.
    fn setup_experiment(&mut self, start_time: f64) -> Result<(), Self::Error>;

    /// Enters initialization mode.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the mode transition fails.
    fn enter_initialization_mode(&mut self) -> Result<(), Self::Error>;

    /// Leaves initialization mode.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the mode transition fails.
    fn exit_initialization_mode(&mut self) -> Result<(), Self::Error>;

    /// Reports whether more discrete iterations are needed.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the event info is unavailable.
    fn get_event_info(&self) -> Result<EventInfo, Self::Error>;

    /// Enters event mode.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the mode transition fails.
    fn enter_event_mode(&mut self) -> Result<(), Self::Error>;

    /// Performs one discrete event update.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the update fails.
    fn event_update(&mut self) -> Result<(), Self::Error>;

    /// Enters continuous-time mode.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the mode transition fails.
    fn enter_continuous_time_mode(&mut self) -> Result<(), Self::Error>;

    /// Resolves a variable name to its value reference.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the model has no variable with that name.
    fn get_variable_valueref(&self, name: &str) -> Result<ValueRef, Self::Error>;

    /// Returns the continuous states in state-vector order.
    fn get_states_list(&self) -> Vec<(String, ValueRef)>;

    /// Returns the state derivatives in state-vector order.
    fn get_derivatives_list(&self) -> Vec<(String, ValueRef)>;

    /// Evaluates the directional derivative `J · direction`.
    ///
    /// `state_refs` and `derivative_refs` are the references returned by
    /// [`get_states_list`](ModelAdapter::get_states_list) and
    /// [`get_derivatives_list`](ModelAdapter::get_derivatives_list). The
    /// result is linear in `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the model cannot evaluate the derivative.
    fn get_directional_derivative(
        &mut self,
        state_refs: &[ValueRef],
        derivative_refs: &[ValueRef],
        direction: &[f64],
    ) -> Result<Vec<f64>, Self::Error>;

    /// Returns the state derivative at the current clock and state.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be computed.
    fn get_derivatives(&mut self) -> Result<Vec<f64>, Self::Error>;

    /// Returns the current continuous state vector.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state cannot be read.
    fn continuous_states(&self) -> Result<Vec<f64>, Self::Error>;

    /// Overwrites the continuous state vector.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state has the wrong length or is rejected.
    fn set_continuous_states(&mut self, states: &[f64]) -> Result<(), Self::Error>;

    /// Sets the model clock.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the time is rejected.
    fn set_time(&mut self, time: f64) -> Result<(), Self::Error>;

    /// Assigns named inputs or parameters in one batch.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if a name is unknown or a value is rejected.
    fn set(&mut self, names: &[String], values: &[f64]) -> Result<(), Self::Error>;

    /// Reads real-valued variables in one batch.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if any reference is invalid.
    fn get_real(&mut self, refs: &[ValueRef]) -> Result<Vec<f64>, Self::Error>;
}
