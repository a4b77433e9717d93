use std::{
    collections::{BTreeMap, HashSet},
    error::Error as StdError,
    path::Path,
};

use fmugym_core::{HistoryRecorder, ModelAdapter, PlotGroup, Row, SchemaConflict, TimeWindow};
use fmugym_solvers::ode::OdeStepper;
use tracing::{debug, error, info, warn};

use crate::{
    Action, EpisodeConfig, Error, Measurements, VizMode, logging,
    measurements::plan_registration,
};

/// Extra diagnostics returned with each step. Currently always empty.
pub type Info = BTreeMap<String, f64>;

/// The outcome of one [`EpisodeController::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// The recorded row: model outputs followed by the current measurements.
    pub observation: Row,

    /// The reward of `observation`, or `None` if the episode was already over.
    pub reward: Option<f64>,

    /// Whether the episode has ended.
    pub done: bool,

    pub info: Info,
}

/// Drives a [`ModelAdapter`] through fixed-size control steps.
///
/// The controller exclusively owns its model; `&mut self` on every
/// state-changing call rules out overlapping steps.
pub struct EpisodeController<M: ModelAdapter> {
    config: EpisodeConfig,
    model: M,
    stepper: OdeStepper,
    window: Option<TimeWindow>,
    state: Row,
    measurements: Row,
}

impl<M: ModelAdapter> EpisodeController<M> {
    /// Creates a controller around an already loaded model.
    ///
    /// The model outputs become the first column groups of the history. If a
    /// log level is configured, a log subscriber is installed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaConflict`] if the configured outputs repeat a
    /// column or already clash with the columns of the supplied history.
    pub fn new(mut config: EpisodeConfig, model: M) -> Result<Self, Error> {
        if let Some(level) = config.log_level {
            logging::init(level);
        }

        let output_names: Vec<String> = config
            .model_outputs
            .iter()
            .flat_map(|group| group.names().iter().cloned())
            .collect();
        let mut seen = HashSet::new();
        let repeated = output_names
            .iter()
            .find(|name| !seen.insert(name.as_str()))
            .cloned();
        if let Some(name) = repeated {
            return Err(SchemaConflict::DuplicateColumn(name).into());
        }

        for group in config.model_outputs.clone() {
            config.history.register(group)?;
        }

        let stepper = OdeStepper::new(config.solver_method, output_names);

        Ok(Self {
            config,
            model,
            stepper,
            window: None,
            state: Row::new(),
            measurements: Row::new(),
        })
    }

    /// Loads the configured model file with `loader` and wraps the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Model`] if `loader` fails, and otherwise the errors of
    /// [`EpisodeController::new`].
    pub fn load<F, E>(config: EpisodeConfig, loader: F) -> Result<Self, Error>
    where
        F: FnOnce(&Path) -> Result<M, E>,
        E: StdError + Send + Sync + 'static,
    {
        if let Some(level) = config.log_level {
            logging::init(level);
        }

        let path = config.model_path.clone();
        let name = path.file_stem().map_or_else(
            || path.display().to_string(),
            |stem| stem.to_string_lossy().into_owned(),
        );
        info!(model = %name, path = %path.display(), "loading model");

        let model = loader(&path).map_err(Error::model)?;
        Self::new(config, model)
    }

    /// Starts a new episode and returns the first observation.
    ///
    /// The model is re-initialized and its discrete state settled, the window
    /// moves back to `[time_start, time_start + time_step_size]`, the history
    /// and measurements are cleared, and the first window is integrated and
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Model`] if a model call fails during initialization,
    /// and [`Error::Simulation`] if the first integration fails.
    pub fn reset(&mut self) -> Result<Row, Error> {
        debug!("resetting the model");
        self.initialize_model().map_err(Error::model)?;

        let window = TimeWindow::first(self.config.time_start, self.config.time_step_size);
        self.window = Some(window);
        self.config.history.reset();

        let state = self.stepper.simulate(&mut self.model, &window)?;
        self.measurements = Row::new();
        self.config.history.append(state.clone())?;
        self.state = state.clone();

        Ok(state)
    }

    /// Applies `action` for one window and records the result.
    ///
    /// After the episode has ended this logs a warning and returns the last
    /// model observation with no reward, leaving the window and the history
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReset`] before the first [`reset`](Self::reset),
    /// [`Error::InvalidActionLength`] if the action does not have one value
    /// per model input, [`Error::Model`] if the inputs cannot be set, and
    /// [`Error::Simulation`] if the integration fails. A failed step leaves
    /// the window unchanged. In [`VizMode::Step`] a failed visualizer update
    /// is logged and the step still succeeds.
    pub fn step(&mut self, action: impl Into<Action>) -> Result<StepResult, Error> {
        let Some(window) = self.window else {
            return Err(Error::NotReset);
        };
        debug!("experiment next step was called");

        if self.is_done() {
            warn!(
                "step() called after the episode returned done = true; \
                 call reset() before stepping again"
            );
            return Ok(StepResult {
                observation: self.state.clone(),
                reward: None,
                done: true,
                info: Info::new(),
            });
        }

        let action = action.into();
        if action.is_scalar() {
            warn!("model input values (action) should be passed as a sequence");
        }
        let values = action.into_values();

        let expected = self.config.model_input_names.len();
        if values.len() != expected {
            let err = Error::InvalidActionLength {
                expected,
                actual: values.len(),
            };
            error!(%err, "rejected action");
            return Err(err);
        }

        debug!(inputs = ?self.config.model_input_names, ?values, "model input");
        self.model
            .set(&self.config.model_input_names, &values)
            .map_err(Error::model)?;

        if !self.config.params.is_empty() {
            let t = window.start();
            let values: Vec<f64> = self.config.params.iter().map(|p| p.eval(t)).collect();
            self.model
                .set(&self.config.param_names, &values)
                .map_err(Error::model)?;
        }

        let state = self.stepper.simulate(&mut self.model, &window)?;
        let observation = state.join(&self.measurements);
        self.config.history.append(observation.clone())?;
        debug!(outputs = ?state, "model output");
        self.state = state;

        let done = self.is_done();
        if done {
            debug!("experiment step done, experiment done");
        } else {
            debug!("experiment step done, experiment continues");
            if let Some(window) = self.window.as_mut() {
                window.advance();
            }
        }

        let reward = (self.config.reward_fun)(&observation);

        if self.config.viz_mode == Some(VizMode::Step) {
            let plots = self.plot_groups();
            if let Some(visualizer) = self.config.visualizer.as_mut() {
                if let Err(err) = visualizer.update(&plots) {
                    warn!(%err, "visualizer update failed");
                }
            }
        }

        Ok(StepResult {
            observation,
            reward: Some(reward),
            done: self.is_done(),
            info: Info::new(),
        })
    }

    /// Returns `true` once the current window ends past the episode end.
    ///
    /// A window ending exactly at the episode end is not done yet. Unbounded
    /// episodes, and controllers that were never reset, are never done.
    #[must_use]
    pub fn is_done(&self) -> bool {
        match (self.window, self.config.time_end) {
            (Some(window), Some(time_end)) => {
                let done = window.end().abs() > time_end;
                debug!(t = window.end(), done, "checked episode end");
                done
            }
            _ => false,
        }
    }

    /// Replaces the measurements merged into subsequently recorded rows.
    ///
    /// Wholly new column groups are added to the history schema; groups whose
    /// columns are all known measurement columns are accepted as they are.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReset`] before the first [`reset`](Self::reset).
    /// Returns [`Error::SchemaConflict`] if a group partially overlaps the
    /// known columns, names a model output, repeats a column of another group
    /// in the same update, or if a row carries a column outside its group.
    /// Nothing is changed in that case.
    pub fn update_measurements(&mut self, measurements: impl Into<Measurements>) -> Result<(), Error> {
        if self.window.is_none() {
            return Err(Error::NotReset);
        }
        let frames = measurements.into().into_frames();

        let new_groups = plan_registration(
            &self.config.history.cols(),
            self.stepper.output_names(),
            &frames,
        )?;
        for group in new_groups {
            debug!(columns = ?group.names(), "registering measurement columns");
            self.config.history.register(group)?;
        }

        self.measurements = frames
            .into_iter()
            .fold(Row::new(), |merged, (_, row)| merged.join(&row));
        Ok(())
    }

    /// Finishes visualization for the episode.
    ///
    /// In both [`VizMode::Episode`] and [`VizMode::Step`] the recorded history
    /// is rendered. Without a viz mode or a visualizer this does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Visualizer`] if the backend fails to render.
    pub fn close(&mut self) -> Result<(), Error> {
        if self.config.viz_mode.is_none() {
            return Ok(());
        }

        let plots = self.plot_groups();
        match self.config.visualizer.as_mut() {
            Some(visualizer) => visualizer.render(&plots).map_err(Error::Visualizer),
            None => {
                debug!("no visualizer configured; nothing to render");
                Ok(())
            }
        }
    }

    /// Returns one plot group per history column group with a selected column.
    ///
    /// Point times are `row_index * time_step_size`.
    #[must_use]
    pub fn plot_groups(&self) -> Vec<PlotGroup> {
        PlotGroup::collect(
            &*self.config.history,
            &self.config.viz_filter,
            self.config.time_step_size,
        )
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    /// Returns the recorded history.
    #[must_use]
    pub fn history(&self) -> &dyn HistoryRecorder {
        &*self.config.history
    }

    /// Returns the current window, or `None` before the first reset.
    #[must_use]
    pub fn window(&self) -> Option<TimeWindow> {
        self.window
    }

    /// Returns the most recent model observation, without measurements.
    #[must_use]
    pub fn state(&self) -> &Row {
        &self.state
    }

    /// Returns the current measurements.
    #[must_use]
    pub fn measurements(&self) -> &Row {
        &self.measurements
    }

    /// Returns the model.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns the model mutably, for adapter calls the controller does not make.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Resets the model and settles its discrete state.
    fn initialize_model(&mut self) -> Result<(), M::Error> {
        let model = &mut self.model;
        model.reset()?;
        model.setup_experiment(self.config.time_start)?;
        model.enter_initialization_mode()?;
        model.exit_initialization_mode()?;

        let mut iterations = 0_usize;
        loop {
            model.enter_event_mode()?;
            model.event_update()?;
            iterations += 1;
            if !model.get_event_info()?.new_discrete_states_needed {
                break;
            }
        }
        debug!(iterations, "discrete states settled");

        model.enter_continuous_time_mode()?;
        self.stepper.prepare(&self.model)
    }
}
