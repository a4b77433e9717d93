use approx::assert_relative_eq;
use fmugym_core::ColumnGroup;
use fmugym_env::{ConfigError, EpisodeController, Error, Settings, VizMode};
use fmugym_solvers::ode::Method;
use integration_tests::test_models::LinearModel;

const TOML: &str = r#"
time_step_size = 0.1
max_episode_steps = 3
log_level = "warn"
solver_method = "RK4"
model_input_names = ["u0"]
model_output_names = [["x0", "u0"]]
model_path = "models/decay.fmu"
viz_mode = "none"

[model_params]
gain = 1.5
"#;

#[test]
fn toml_settings_drive_an_episode() {
    let settings: Settings = toml::from_str(TOML).unwrap();
    let config = settings.into_builder().unwrap().build().unwrap();

    assert_eq!(config.solver_method(), Method::Rk4);
    assert_eq!(config.viz_mode(), None);
    assert_eq!(
        config.model_outputs(),
        [ColumnGroup::Nested(vec!["x0".into(), "u0".into()])]
    );

    let mut env = EpisodeController::load(config, |path| {
        assert!(path.ends_with("decay.fmu"));
        Ok::<_, std::convert::Infallible>(LinearModel::scalar(-1.0, 1.0))
    })
    .unwrap();

    env.reset().unwrap();
    let mut done = false;
    let mut steps = 0;
    while !done {
        done = env.step(0.0).unwrap().done;
        steps += 1;
    }

    assert_eq!(steps, 3);
    assert_eq!(env.model().params().get("gain"), Some(&1.5));
    assert_relative_eq!(
        env.state().get("x0").unwrap(),
        (-0.4_f64).exp(),
        max_relative = 1e-4
    );
}

#[test]
fn json_settings_accept_regex_selection() {
    let json = r#"{
        "model_input_names": ["u0"],
        "model_output_names": ["x0", "u0"],
        "selected_viz_series": "x\\d+",
        "viz_mode": "episode"
    }"#;

    let settings: Settings = serde_json::from_str(json).unwrap();
    let config = settings.into_builder().unwrap().build().unwrap();
    assert_eq!(config.viz_mode(), Some(VizMode::Episode));

    let mut env = EpisodeController::new(config, LinearModel::scalar(-1.0, 1.0)).unwrap();
    env.reset().unwrap();

    let plots = env.plot_groups();
    assert_eq!(plots.len(), 1);
    assert_eq!(plots[0].series[0].name, "x0");
}

#[test]
fn missing_outputs_fail_at_build() {
    let settings: Settings = toml::from_str(r#"model_input_names = ["u0"]"#).unwrap();

    let err = settings.into_builder().unwrap().build().unwrap_err();

    assert_eq!(err, ConfigError::MissingOutputNames);
    let err: Error = err.into();
    assert!(err.to_string().contains("model_output_names"));
}

#[test]
fn implicit_solver_names_are_rejected() {
    for name in ["LSODA", "BDF", "Radau"] {
        let settings = Settings {
            solver_method: Some(name.into()),
            ..Settings::default()
        };
        assert_eq!(
            settings.into_builder().err(),
            Some(ConfigError::UnknownSolverMethod(name.into()))
        );
    }
}
