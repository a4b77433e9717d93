mod settings;

pub use settings::{OutputSpec, SelectionSpec, Settings};

use std::{fmt, path::Path, path::PathBuf, str::FromStr};

use fmugym_core::{
    ColumnGroup, FullHistory, HistoryRecorder, Row, SeriesSelection, Visualizer,
    viz::ColumnFilter,
};
use fmugym_solvers::ode::Method;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::ModelParameter;

/// Scores a recorded row.
pub type RewardFn = Box<dyn Fn(&Row) -> f64>;

/// When the environment hands its history to the visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VizMode {
    /// Render once, when the environment is closed.
    Episode,

    /// Update after every step and render when closed.
    Step,
}

impl FromStr for VizMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "episode" => Ok(Self::Episode),
            "step" => Ok(Self::Step),
            other => Err(ConfigError::UnknownVizMode(other.to_owned())),
        }
    }
}

/// Errors that can occur when validating an [`EpisodeConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("model_input_names must name at least one model input")]
    MissingInputNames,

    #[error("model_output_names must name at least one model output")]
    MissingOutputNames,

    #[error("time_step_size must be finite and positive, got {0}")]
    InvalidTimeStep(String),

    #[error("time_start must be finite, got {0}")]
    InvalidTimeStart(String),

    #[error("unknown viz_mode {0:?}; expected one of \"episode\", \"step\", \"none\"")]
    UnknownVizMode(String),

    #[error("selected_viz_series is not a valid pattern: {0}")]
    InvalidSelection(String),

    #[error("unknown solver_method {0:?}")]
    UnknownSolverMethod(String),

    #[error("unknown log_level {0:?}")]
    UnknownLogLevel(String),
}

/// Validated, immutable configuration of an episode controller.
///
/// Build one with [`EpisodeConfig::builder`].
pub struct EpisodeConfig {
    pub(crate) time_start: f64,
    pub(crate) time_step_size: f64,
    pub(crate) time_end: Option<f64>,
    pub(crate) reward_fun: RewardFn,
    pub(crate) log_level: Option<LevelFilter>,
    pub(crate) solver_method: Method,
    pub(crate) param_names: Vec<String>,
    pub(crate) params: Vec<ModelParameter>,
    pub(crate) model_input_names: Vec<String>,
    pub(crate) model_outputs: Vec<ColumnGroup>,
    pub(crate) model_path: PathBuf,
    pub(crate) viz_mode: Option<VizMode>,
    pub(crate) viz_filter: ColumnFilter,
    pub(crate) history: Box<dyn HistoryRecorder>,
    pub(crate) visualizer: Option<Box<dyn Visualizer>>,
}

impl EpisodeConfig {
    /// Returns a builder with default settings.
    #[must_use]
    pub fn builder() -> EpisodeConfigBuilder {
        EpisodeConfigBuilder::default()
    }

    /// Returns the simulation time at which each episode starts.
    #[must_use]
    pub fn time_start(&self) -> f64 {
        self.time_start
    }

    /// Returns the length of one control step, in seconds.
    #[must_use]
    pub fn time_step_size(&self) -> f64 {
        self.time_step_size
    }

    /// Returns the episode end time, or `None` for unbounded episodes.
    #[must_use]
    pub fn time_end(&self) -> Option<f64> {
        self.time_end
    }

    /// Returns the integration method.
    #[must_use]
    pub fn solver_method(&self) -> Method {
        self.solver_method
    }

    /// Returns the model input names, in action order.
    #[must_use]
    pub fn model_input_names(&self) -> &[String] {
        &self.model_input_names
    }

    /// Returns the model outputs as column groups.
    #[must_use]
    pub fn model_outputs(&self) -> &[ColumnGroup] {
        &self.model_outputs
    }

    /// Returns the model file path.
    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Returns the visualization mode, or `None` if visualization is off.
    #[must_use]
    pub fn viz_mode(&self) -> Option<VizMode> {
        self.viz_mode
    }

    /// Returns the configured log level, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<LevelFilter> {
        self.log_level
    }
}

impl fmt::Debug for EpisodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpisodeConfig")
            .field("time_start", &self.time_start)
            .field("time_step_size", &self.time_step_size)
            .field("time_end", &self.time_end)
            .field("solver_method", &self.solver_method)
            .field("model_params", &self.param_names)
            .field("model_input_names", &self.model_input_names)
            .field("model_outputs", &self.model_outputs)
            .field("model_path", &self.model_path)
            .field("viz_mode", &self.viz_mode)
            .finish_non_exhaustive()
    }
}

/// Builder for [`EpisodeConfig`].
///
/// Defaults: `time_step_size = 1e-4`, `time_start = 0`, a reward of `1.0`
/// per step, [`Method::default`], unbounded episodes, model path
/// `grid.network.fmu`, [`VizMode::Episode`], every column visualized, and a
/// [`FullHistory`].
pub struct EpisodeConfigBuilder {
    time_start: f64,
    time_step_size: f64,
    max_episode_steps: Option<u64>,
    reward_fun: RewardFn,
    log_level: Option<LevelFilter>,
    solver_method: Method,
    model_params: Vec<(String, ModelParameter)>,
    model_input_names: Vec<String>,
    model_outputs: Vec<ColumnGroup>,
    model_path: PathBuf,
    viz_mode: Option<VizMode>,
    selected_viz_series: SeriesSelection,
    history: Box<dyn HistoryRecorder>,
    visualizer: Option<Box<dyn Visualizer>>,
}

impl Default for EpisodeConfigBuilder {
    fn default() -> Self {
        Self {
            time_start: 0.0,
            time_step_size: 1e-4,
            max_episode_steps: None,
            reward_fun: Box::new(|_: &Row| 1.0),
            log_level: None,
            solver_method: Method::default(),
            model_params: Vec::new(),
            model_input_names: Vec::new(),
            model_outputs: Vec::new(),
            model_path: PathBuf::from("grid.network.fmu"),
            viz_mode: Some(VizMode::Episode),
            selected_viz_series: SeriesSelection::All,
            history: Box::new(FullHistory::new()),
            visualizer: None,
        }
    }
}

impl EpisodeConfigBuilder {
    /// Sets the step size of the simulation, in seconds.
    #[must_use]
    pub fn time_step_size(mut self, seconds: f64) -> Self {
        self.time_step_size = seconds;
        self
    }

    /// Sets the time offset at which episodes start, in seconds.
    #[must_use]
    pub fn time_start(mut self, seconds: f64) -> Self {
        self.time_start = seconds;
        self
    }

    /// Sets the maximum number of steps per episode.
    ///
    /// The episode ends once the window end passes
    /// `time_start + steps * time_step_size`.
    #[must_use]
    pub fn max_episode_steps(mut self, steps: u64) -> Self {
        self.max_episode_steps = Some(steps);
        self
    }

    /// Sets the function that scores each recorded row.
    #[must_use]
    pub fn reward_fun(mut self, f: impl Fn(&Row) -> f64 + 'static) -> Self {
        self.reward_fun = Box::new(f);
        self
    }

    /// Sets the maximum log level and installs a log subscriber for it.
    #[must_use]
    pub fn log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Sets the integration method.
    #[must_use]
    pub fn solver_method(mut self, method: Method) -> Self {
        self.solver_method = method;
        self
    }

    /// Adds a model parameter, either a constant or a [`ModelParameter`] function.
    ///
    /// Parameters are evaluated at the start of each step and pushed to the
    /// model in the order they were added.
    #[must_use]
    pub fn model_param(mut self, name: impl Into<String>, param: impl Into<ModelParameter>) -> Self {
        self.model_params.push((name.into(), param.into()));
        self
    }

    /// Adds a model parameter that varies with simulation time.
    #[must_use]
    pub fn model_param_fn(self, name: impl Into<String>, f: impl Fn(f64) -> f64 + 'static) -> Self {
        self.model_param(name, ModelParameter::from_fn(f))
    }

    /// Sets the model input names, in action order.
    #[must_use]
    pub fn model_input_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model_input_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the model outputs.
    ///
    /// Each entry is a single output name or a list of names plotted together.
    #[must_use]
    pub fn model_outputs<I, G>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<ColumnGroup>,
    {
        self.model_outputs = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the model file path.
    #[must_use]
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Sets the visualization mode; `None` disables visualization.
    #[must_use]
    pub fn viz_mode(mut self, mode: Option<VizMode>) -> Self {
        self.viz_mode = mode;
        self
    }

    /// Selects which history columns are visualized.
    #[must_use]
    pub fn selected_viz_series(mut self, selection: SeriesSelection) -> Self {
        self.selected_viz_series = selection;
        self
    }

    /// Sets the history recorder.
    #[must_use]
    pub fn history(mut self, history: impl HistoryRecorder + 'static) -> Self {
        self.history = Box::new(history);
        self
    }

    /// Sets the visualizer backend.
    #[must_use]
    pub fn visualizer(mut self, visualizer: impl Visualizer + 'static) -> Self {
        self.visualizer = Some(Box::new(visualizer));
        self
    }

    /// Validates the settings and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if inputs or outputs are missing, the time
    /// settings are not finite (or the step is not positive), or the series
    /// selection is not a valid pattern.
    pub fn build(self) -> Result<EpisodeConfig, ConfigError> {
        if self.model_input_names.is_empty() {
            return Err(ConfigError::MissingInputNames);
        }
        if self.model_outputs.iter().all(|g| g.names().is_empty()) {
            return Err(ConfigError::MissingOutputNames);
        }
        if !self.time_step_size.is_finite() || self.time_step_size <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(self.time_step_size.to_string()));
        }
        if !self.time_start.is_finite() {
            return Err(ConfigError::InvalidTimeStart(self.time_start.to_string()));
        }

        let viz_filter = self
            .selected_viz_series
            .compile()
            .map_err(|err| ConfigError::InvalidSelection(err.to_string()))?;

        #[allow(clippy::cast_precision_loss)]
        let time_end = self
            .max_episode_steps
            .map(|steps| self.time_start + steps as f64 * self.time_step_size);

        let (param_names, params) = self.model_params.into_iter().unzip();

        Ok(EpisodeConfig {
            time_start: self.time_start,
            time_step_size: self.time_step_size,
            time_end,
            reward_fun: self.reward_fun,
            log_level: self.log_level,
            solver_method: self.solver_method,
            param_names,
            params,
            model_input_names: self.model_input_names,
            model_outputs: self.model_outputs,
            model_path: self.model_path,
            viz_mode: self.viz_mode,
            viz_filter,
            history: self.history,
            visualizer: self.visualizer,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn minimal() -> EpisodeConfigBuilder {
        EpisodeConfig::builder()
            .model_input_names(["u"])
            .model_outputs(["y"])
    }

    #[test]
    fn defaults_follow_documented_values() {
        let config = minimal().build().unwrap();

        assert_relative_eq!(config.time_step_size(), 1e-4);
        assert_relative_eq!(config.time_start(), 0.0);
        assert_eq!(config.time_end(), None);
        assert_eq!(config.viz_mode(), Some(VizMode::Episode));
        assert_eq!(config.model_path(), Path::new("grid.network.fmu"));
        assert_relative_eq!((config.reward_fun)(&Row::new()), 1.0);
    }

    #[test]
    fn time_end_from_max_steps() {
        let config = minimal()
            .time_start(1.0)
            .time_step_size(0.1)
            .max_episode_steps(5)
            .build()
            .unwrap();

        assert_relative_eq!(config.time_end().unwrap(), 1.5);
    }

    #[test]
    fn inputs_are_required() {
        let err = EpisodeConfig::builder()
            .model_outputs(["y"])
            .build()
            .unwrap_err();

        assert_eq!(err, ConfigError::MissingInputNames);
    }

    #[test]
    fn outputs_are_required() {
        let err = EpisodeConfig::builder()
            .model_input_names(["u"])
            .build()
            .unwrap_err();

        assert_eq!(err, ConfigError::MissingOutputNames);
    }

    #[test]
    fn step_size_must_be_positive() {
        let err = minimal().time_step_size(0.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeStep(_)));
    }

    #[test]
    fn invalid_selection_is_rejected() {
        let err = minimal()
            .selected_viz_series(SeriesSelection::Regex("[".into()))
            .build()
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidSelection(_)));
    }

    #[test]
    fn viz_mode_parses_known_names() {
        assert_eq!("step".parse::<VizMode>(), Ok(VizMode::Step));
        assert_eq!(
            "live".parse::<VizMode>(),
            Err(ConfigError::UnknownVizMode("live".into()))
        );
    }

    #[test]
    fn params_keep_insertion_order() {
        let config = minimal()
            .model_param("b", 2.0)
            .model_param_fn("a", |t| t)
            .build()
            .unwrap();

        assert_eq!(config.param_names, ["b", "a"]);
        assert_relative_eq!(config.params[1].eval(4.0), 4.0);
    }
}
