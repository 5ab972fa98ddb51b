use approx::assert_abs_diff_eq;
use flighttrack::annotation::{load_annotations_json, load_cvat_xml};
use flighttrack::derivation::{integral_round_trip, HEADER};
use flighttrack::error::Error;
use flighttrack::math::central_difference;
use flighttrack::{
    reconstruct, Annotation, FlightWindow, KinematicsEvaluator, MotionCoefficients, MotionModel,
    DerivationReport, PositionEvaluator, TrajectoryConfig,
};
use nalgebra as na;
use ndarray::Array1;

fn throw_coefficients(f0: u32, f1: u32, fps: f64) -> MotionCoefficients<f64> {
    let window = FlightWindow::new(f0, f1, fps, 1e-9).unwrap();

    MotionModel::new(9.81).derive(
        window,
        na::Point3::new(0.0, 7.0, 2.0),
        na::Point3::new(6.0, 6.0, 0.0),
    )
}

fn cases() -> Vec<MotionCoefficients<f64>> {
    vec![
        throw_coefficients(10, 40, 30.0),
        throw_coefficients(0, 7, 60.0),
        throw_coefficients(25, 26, 25.0),
        throw_coefficients(3, 300, 120.0),
    ]
}

#[test]
fn concrete_scenario() {
    let k = throw_coefficients(10, 40, 30.0);
    let w = k.window();

    assert_abs_diff_eq!(w.t0(), 0.3333, epsilon = 1e-4);
    assert_abs_diff_eq!(w.t1(), 1.3333, epsilon = 1e-4);
    assert_abs_diff_eq!(w.duration(), 1.0, epsilon = 1e-9);

    assert_abs_diff_eq!(k.m_x(), 6.0, epsilon = 1e-9);
    assert_abs_diff_eq!(k.q_x(), -2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(k.m_y(), -1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(k.q_y(), 7.3333, epsilon = 1e-4);
    assert_abs_diff_eq!(k.a(), -4.905, epsilon = 1e-12);
    assert_abs_diff_eq!(k.b(), 6.175, epsilon = 0.01);
    assert_abs_diff_eq!(k.c(), k.integration_constant(), epsilon = 1e-9);

    let z = PositionEvaluator::new(&k).position_at(0.8333).z;
    assert_abs_diff_eq!(z, 2.226, epsilon = 0.01);
}

#[test]
fn boundary_continuity() {
    for k in cases() {
        let eval = PositionEvaluator::new(&k);
        let w = k.window();
        let h = 1e-12;

        for (t, p) in [(w.t0(), k.start()), (w.t1(), k.end())] {
            assert!((eval.position_at(t - h) - p).norm() < 1e-9);
            assert!((eval.position_at(t + h) - p).norm() < 1e-9);
        }
    }
}

#[test]
fn derivative_consistency() {
    for k in cases() {
        let pos = PositionEvaluator::new(&k);
        let kin = KinematicsEvaluator::new(&k);
        let w = k.window();
        let h = w.duration() * 1e-4;

        for i in 1..10 {
            let t = w.t0() + w.duration() * i as f64 / 10.0;

            let vz = central_difference(|t| pos.position_at(t).z, t, h);
            let vx = central_difference(|t| pos.position_at(t).x, t, h);

            assert_abs_diff_eq!(vz, kin.velocity_at(t).z, epsilon = 1e-4);
            assert_abs_diff_eq!(vx, kin.velocity_at(t).x, epsilon = 1e-4);
        }
    }
}

#[test]
fn zero_outside_window() {
    for k in cases() {
        let kin = KinematicsEvaluator::new(&k);
        let w = k.window();

        for t in [w.t0() - 1.0, w.t0() - 1e-6, w.t1(), w.t1() + 1e-6, w.t1() + 3.0] {
            assert_eq!(kin.velocity_at(t), na::Vector3::zeros());
            assert_eq!(kin.acceleration_at(t), na::Vector3::zeros());
            assert_eq!(kin.speed_at(t), 0.0);
        }
    }
}

#[test]
fn velocity_drops_at_window_end_but_position_is_continuous() {
    let k = throw_coefficients(10, 40, 30.0);
    let pos = PositionEvaluator::new(&k);
    let kin = KinematicsEvaluator::new(&k);
    let t1 = k.window().t1();

    assert!(kin.speed_at(t1 - 1e-9) > 1.0);
    assert_eq!(kin.speed_at(t1), 0.0);
    assert_eq!(pos.position_at(t1), k.end());
}

#[test]
fn integral_round_trip_reproduces_position() {
    for k in cases() {
        let w = k.window();
        let times = Array1::linspace(w.t0(), w.t1(), 257);

        assert!(integral_round_trip(&k, times.view()) < 1e-9);
    }
}

#[test]
fn pipeline_end_to_end() {
    let mut annotations: Vec<Annotation<f64>> = (0..12)
        .map(|f| Annotation::new(f, 100.0 + f as f64, 400.0))
        .collect();
    annotations.extend((12..40).map(|f| {
        let s = (f - 12) as f64;
        Annotation::new(f, 100.0 + f as f64, 400.0 - 30.0 * s + 1.2 * s * s)
    }));
    annotations.push(Annotation::missing(41));

    let cfg = TrajectoryConfig::default();
    let rec = reconstruct(
        &annotations,
        60,
        30.0,
        na::Point3::new(0.0, 7.0, 2.0),
        na::Point3::new(6.0, 6.0, 0.0),
        &cfg,
    )
    .unwrap();

    assert_eq!(rec.window.f0(), 13);
    assert_eq!(rec.window.f1(), 39);
    assert_eq!(rec.series.len(), 60);
    assert_eq!(rec.series.get(0).unwrap().position(), na::Point3::new(0.0, 7.0, 2.0));
    assert_eq!(rec.series.get(59).unwrap().position(), na::Point3::new(6.0, 6.0, 0.0));
    assert_eq!(rec.series.get(13).unwrap().az, -9.81);
    assert_eq!(rec.series.get(39).unwrap().speed, 0.0);
    assert!(rec.series.get(60).is_none());
    assert!(rec.derivation.contains("f0 = 13  f1 = 39"));
}

#[test]
fn pipeline_without_valid_points_fails() {
    let annotations = vec![Annotation::<f64>::missing(0), Annotation::missing(1)];

    let res = reconstruct(
        &annotations,
        10,
        30.0,
        na::Point3::origin(),
        na::Point3::new(1.0, 1.0, 1.0),
        &TrajectoryConfig::default(),
    );

    assert!(matches!(res, Err(Error::NoValidAnnotations)));
}

#[test]
fn single_precision_model() {
    let window = FlightWindow::new(10, 40, 30.0f32, 1e-6).unwrap();
    let k = MotionModel::new(9.81f32).derive(
        window,
        na::Point3::new(0.0, 7.0, 2.0),
        na::Point3::new(6.0, 6.0, 0.0),
    );

    let mid = PositionEvaluator::new(&k).position_at(window.midpoint());
    assert_abs_diff_eq!(mid.z, 2.226, epsilon = 0.01);
}

fn throw_annotations() -> Vec<Annotation<f64>> {
    let mut annotations: Vec<Annotation<f64>> = (0..5)
        .map(|f| Annotation::new(f, 200.0, 500.0))
        .collect();
    annotations.extend((5..20).map(|f| {
        let s = (f - 5) as f64;
        Annotation::new(f, 200.0 + 4.0 * s, 500.0 - 25.0 * s + 1.5 * s * s)
    }));
    annotations
}

#[test]
fn reconstruction_outputs_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let labels = dir.path().join("labels.json");
    std::fs::write(&labels, serde_json::to_string(&throw_annotations()).unwrap()).unwrap();

    let annotations = load_annotations_json::<f64, _>(&labels).unwrap();
    let cfg = TrajectoryConfig::default();
    let rec = reconstruct(
        &annotations,
        24,
        30.0,
        na::Point3::new(0.0, 7.0, 2.0),
        na::Point3::new(6.0, 6.0, 0.0),
        &cfg,
    )
    .unwrap();

    assert_eq!((rec.window.f0(), rec.window.f1()), (6, 19));
    assert_eq!(rec.derivation, DerivationReport::new(&rec.coefficients, 6).render());
    assert!(rec.derivation.starts_with(HEADER));

    let summary = DerivationReport::new(&rec.coefficients, 3).summary();
    assert!(summary.starts_with("DERIVATION SUMMARY"));
    assert!(summary.contains("az(t) = -9.810 m/s^2"));

    let copy = rec.clone();
    assert_eq!(copy.coefficients, rec.coefficients);
    assert_eq!(copy.series, rec.series);
    assert!(format!("{:?}", copy).contains("Reconstruction"));

    assert_eq!(rec.series.get(7).unwrap().label(), Some((208.0, 456.0)));
    assert!(rec.series.get(22).unwrap().label().is_none());
    assert!(rec.series.overlay_lines(7).unwrap().last().unwrap().starts_with("ball"));

    let out = dir.path().join("out");
    let files = rec.write_outputs(&out).unwrap();

    let csv = std::fs::read_to_string(&files.csv).unwrap();
    assert_eq!(csv.lines().count(), 25);
    assert_eq!(csv.lines().next(), Some(flighttrack::series::CSV_HEADER));

    let rows: Vec<flighttrack::FrameKinematics<f64>> =
        serde_json::from_str(&std::fs::read_to_string(&files.json).unwrap()).unwrap();
    assert_eq!(rows.len(), 24);
    assert_eq!(rows[7].label(), Some((208.0, 456.0)));

    let text = std::fs::read_to_string(&files.derivation).unwrap();
    assert_eq!(text, format!("{}\n", rec.derivation));
}

#[test]
fn cvat_export_drives_the_pipeline() {
    let boxes: String = throw_annotations()
        .iter()
        .map(|a| {
            let (x, y) = a.point().unwrap();
            format!(
                r#"<box frame="{}" outside="0" xtl="{}" ytl="{}" xbr="{}" ybr="{}"/>"#,
                a.frame,
                x - 10.0,
                y - 10.0,
                x + 10.0,
                y + 10.0
            )
        })
        .collect();
    let xml = format!(
        r#"<?xml version="1.0"?><annotations><track id="0" label="ball">{}</track></annotations>"#,
        boxes
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("annotations.xml");
    std::fs::write(&path, xml).unwrap();

    let annotations = load_cvat_xml::<f64, _>(&path).unwrap();
    assert_eq!(annotations.len(), 20);

    let rec = reconstruct(
        &annotations,
        24,
        30.0,
        na::Point3::new(0.0, 7.0, 2.0),
        na::Point3::new(6.0, 6.0, 0.0),
        &TrajectoryConfig::default(),
    )
    .unwrap();
    assert_eq!((rec.window.f0(), rec.window.f1()), (6, 19));
}

#[test]
fn label_on_last_representable_frame_is_an_error() {
    let annotations = vec![Annotation::new(u32::MAX, 1.0f64, 2.0)];

    let res = reconstruct(
        &annotations,
        10,
        30.0,
        na::Point3::origin(),
        na::Point3::new(1.0, 1.0, 1.0),
        &TrajectoryConfig::default(),
    );

    assert!(matches!(res, Err(Error::InvalidWindow { .. })));
}
