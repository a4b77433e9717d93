use std::{collections::BTreeMap, path::PathBuf};

use fmugym_core::{ColumnGroup, SeriesSelection};
use fmugym_solvers::ode::Method;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use super::{ConfigError, EpisodeConfigBuilder, VizMode};

/// The plain-data part of an episode configuration, as read from a file.
///
/// Every field is optional and falls back to the builder default. Callables
/// (the reward function, time-varying parameters) and the history and
/// visualizer backends are added to the builder returned by
/// [`Settings::into_builder`].
///
/// ```toml
/// time_step_size = 0.001
/// max_episode_steps = 500
/// solver_method = "dopri5"
/// model_input_names = ["i1p1", "i1p2"]
/// model_output_names = ["lc1.capacitor1.v", ["rl1.inductor1.i", "rl1.inductor2.i"]]
/// selected_viz_series = ["lc1.*"]
///
/// [model_params]
/// "rl1.resistor1.R" = 20.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub time_step_size: Option<f64>,
    pub time_start: Option<f64>,
    pub max_episode_steps: Option<u64>,
    pub log_level: Option<String>,
    pub solver_method: Option<String>,

    /// Constant parameters, pushed to the model in name order.
    pub model_params: BTreeMap<String, f64>,
    pub model_input_names: Vec<String>,
    pub model_output_names: Vec<OutputSpec>,
    pub model_path: Option<PathBuf>,

    /// `"episode"`, `"step"`, or `"none"`.
    pub viz_mode: Option<String>,

    /// A regular expression, or a list of shell globs.
    pub selected_viz_series: Option<SelectionSpec>,
}

/// A model output: one name, or names plotted together.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OutputSpec {
    Single(String),
    Nested(Vec<String>),
}

/// A visualization column selection as written in a file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SelectionSpec {
    Regex(String),
    Globs(Vec<String>),
}

impl From<OutputSpec> for ColumnGroup {
    fn from(spec: OutputSpec) -> Self {
        match spec {
            OutputSpec::Single(name) => ColumnGroup::Single(name),
            OutputSpec::Nested(names) => ColumnGroup::Nested(names),
        }
    }
}

impl From<SelectionSpec> for SeriesSelection {
    fn from(spec: SelectionSpec) -> Self {
        match spec {
            SelectionSpec::Regex(pattern) => SeriesSelection::Regex(pattern),
            SelectionSpec::Globs(globs) => SeriesSelection::Globs(globs),
        }
    }
}

impl Settings {
    /// Converts the settings into a builder.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the log level, solver method, or viz mode
    /// names are not recognized. Everything else is validated by
    /// [`EpisodeConfigBuilder::build`].
    pub fn into_builder(self) -> Result<EpisodeConfigBuilder, ConfigError> {
        let mut builder = EpisodeConfigBuilder::default()
            .model_input_names(self.model_input_names)
            .model_outputs(self.model_output_names);

        if let Some(dt) = self.time_step_size {
            builder = builder.time_step_size(dt);
        }
        if let Some(t0) = self.time_start {
            builder = builder.time_start(t0);
        }
        if let Some(steps) = self.max_episode_steps {
            builder = builder.max_episode_steps(steps);
        }
        if let Some(level) = self.log_level {
            let level = level
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::UnknownLogLevel(level))?;
            builder = builder.log_level(level);
        }
        if let Some(method) = self.solver_method {
            let method = method
                .parse::<Method>()
                .map_err(|err| ConfigError::UnknownSolverMethod(err.0))?;
            builder = builder.solver_method(method);
        }
        for (name, value) in self.model_params {
            builder = builder.model_param(name, value);
        }
        if let Some(path) = self.model_path {
            builder = builder.model_path(path);
        }
        if let Some(mode) = self.viz_mode {
            let mode = match mode.as_str() {
                "none" => None,
                other => Some(other.parse::<VizMode>()?),
            };
            builder = builder.viz_mode(mode);
        }
        if let Some(selection) = self.selected_viz_series {
            builder = builder.selected_viz_series(selection.into());
        }

        Ok(builder)
    }
}
