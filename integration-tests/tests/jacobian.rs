use approx::{assert_relative_eq, assert_abs_diff_eq};
use fmugym_core::{ModelAdapter, TimeWindow};
use fmugym_solvers::ode::{Method, OdeStepper, jacobian};
use integration_tests::test_models::LinearModel;

/// A deterministic, non-symmetric `n×n` matrix with mixed signs.
#[allow(clippy::cast_precision_loss)]
fn matrix(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| ((i * 7 + j * 3) % 11) as f64 / 4.0 - 1.25)
                .collect()
        })
        .collect()
}

fn identity_inputs(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

#[test]
fn assembled_jacobian_equals_system_matrix() {
    for n in 1..=6 {
        let a = matrix(n);
        let mut model = LinearModel::new(a.clone(), identity_inputs(n), vec![1.0; n]);

        let jac = jacobian(&mut model, 0.3, &vec![0.5; n]).unwrap();

        assert_eq!(jac.dim(), n);
        assert_eq!(model.directional_calls(), n);
        for (i, row) in a.iter().enumerate() {
            for (j, &expected) in row.iter().enumerate() {
                assert_relative_eq!(jac.get(i, j).unwrap(), expected);
            }
        }
    }
}

#[test]
fn jacobian_sets_clock_and_state() {
    let mut model = LinearModel::new(matrix(2), identity_inputs(2), vec![0.0; 2]);

    jacobian(&mut model, 4.0, &[1.0, 2.0]).unwrap();

    assert_relative_eq!(model.time(), 4.0);
    assert_eq!(model.x(), [1.0, 2.0]);
}

fn simulate(model: &mut LinearModel, method: Method, outputs: &[&str], span: f64) {
    let mut stepper = OdeStepper::new(method, outputs.iter().map(|s| (*s).to_owned()).collect());
    stepper.prepare(model).unwrap();
    stepper.simulate(model, &TimeWindow::first(0.0, span)).unwrap();
}

#[test]
fn rotation_stays_on_the_unit_circle() {
    let a = vec![vec![0.0, 1.0], vec![-1.0, 0.0]];
    let mut model = LinearModel::new(a, identity_inputs(2), vec![1.0, 0.0]);

    simulate(
        &mut model,
        Method::Dopri5 {
            abs_tol: 1e-10,
            rel_tol: 1e-10,
        },
        &["x0", "x1"],
        1.0,
    );

    assert_abs_diff_eq!(model.x()[0], 1.0_f64.cos(), epsilon = 1e-8);
    assert_abs_diff_eq!(model.x()[1], -(1.0_f64.sin()), epsilon = 1e-8);
    assert_relative_eq!(model.time(), 1.0);
}

#[test]
fn stiff_decay_stays_stable_with_every_method() {
    let exact = (-5.0_f64).exp();
    for method in ["RK4", "RK45", "DOP853"] {
        let mut model = LinearModel::scalar(-50.0, 1.0);
        simulate(&mut model, method.parse().unwrap(), &["x0"], 0.1);

        let x = model.x()[0];
        assert!(x > 0.0 && x < 0.01, "{method} gave {x}");
        if method != "RK4" {
            assert_relative_eq!(x, exact, max_relative = 1e-2);
        }
    }
}

#[test]
fn outputs_are_read_after_write_back() {
    let mut model = LinearModel::scalar(-1.0, 2.0);
    model.set(&["u0".to_owned()], &[2.0]).unwrap();

    let mut stepper = OdeStepper::new(Method::default(), vec!["x0".into(), "u0".into()]);
    stepper.prepare(&model).unwrap();
    let row = stepper
        .simulate(&mut model, &TimeWindow::first(0.0, 0.5))
        .unwrap();

    // x0 = 2 is the equilibrium for u0 = 2.
    assert_relative_eq!(row.get("x0").unwrap(), 2.0, max_relative = 1e-9);
    assert_relative_eq!(row.get("u0").unwrap(), 2.0);
    assert_eq!(row.names(), ["x0", "u0"]);
}
