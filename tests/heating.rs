use approx::assert_abs_diff_eq;
use fuzzy_control::heating::{heating_controller, PowerLevel, HEATING_POWER, HUMIDITY, TEMP_OUTSIDE, TEMP_ROOM};
use fuzzy_control::{InferenceEngine, Inputs};

fn heating_power(temp_room: f64, temp_outside: f64, humidity: f64) -> f64 {
    let system = heating_controller().unwrap();
    let inputs = Inputs::new()
        .with(TEMP_ROOM, temp_room)
        .with(TEMP_OUTSIDE, temp_outside)
        .with(HUMIDITY, humidity);

    InferenceEngine::mamdani()
        .compute(&system, &inputs)
        .unwrap()
        .get(HEATING_POWER)
        .unwrap()
}

#[test]
fn test_freezing_day_cold_room() {
    // cold room and very cold outside fire weakly, low humidity fires at 0.5
    let power = heating_power(17., -10., 30.);

    assert!(power >= 70., "got {power}");
    assert_eq!(PowerLevel::from_power(power), PowerLevel::High);
}

#[test]
fn test_mild_day_humid_room() {
    let system = heating_controller().unwrap();
    let inputs = Inputs::new()
        .with(TEMP_ROOM, 22.)
        .with(TEMP_OUTSIDE, 10.)
        .with(HUMIDITY, 80.);
    let explanation = InferenceEngine::mamdani().explain(&system, &inputs).unwrap();

    // comfortable room and cold outside: min(0.75, 0.5) -> medium power
    assert_abs_diff_eq!(explanation.strengths[4], 0.5);
    // humid and comfortable: min(1 / 3, 0.75) -> low power
    assert_abs_diff_eq!(explanation.strengths[8], 1. / 3.);
    for (i, strength) in explanation.strengths.iter().enumerate() {
        if i != 4 && i != 8 {
            assert_eq!(*strength, 0., "rule {i}");
        }
    }

    let power = explanation.outputs.get(HEATING_POWER).unwrap();

    assert_abs_diff_eq!(power, 37.80311063980206, epsilon = 1e-9);
    assert_eq!(PowerLevel::from_power(power), PowerLevel::Low);
}

#[test]
fn test_warm_room() {
    // Only "warm room" fires, driving the output low
    let power = heating_power(25., 5., 60.);

    assert!(power <= 30., "got {power}");
    assert_eq!(PowerLevel::from_power(power), PowerLevel::Low);
}

#[test]
fn test_transitional_day_cool_room() {
    // Only "comfortable room and cold outside" fires, on the symmetric medium term
    let power = heating_power(19., 0., 45.);

    assert_abs_diff_eq!(power, 50., epsilon = 1e-9);
    assert_eq!(PowerLevel::from_power(power), PowerLevel::Medium);
}

#[test]
fn test_explain_freezing_day() {
    let system = heating_controller().unwrap();
    let inputs = Inputs::new()
        .with(TEMP_ROOM, 17.)
        .with(TEMP_OUTSIDE, -10.)
        .with(HUMIDITY, 30.);
    let explanation = InferenceEngine::mamdani().explain(&system, &inputs).unwrap();

    assert_eq!(explanation.strengths.len(), 9);
    assert_abs_diff_eq!(explanation.strengths[0], 0.125);
    assert_abs_diff_eq!(explanation.strengths[3], 0.2);
    assert_abs_diff_eq!(explanation.strengths[7], 0.5);
    assert_eq!(explanation.outputs.max_activation(), 0.5);

    let curve = &explanation.curves[HEATING_POWER];

    // Only "high power" contributes, clipped at 0.5
    assert_eq!(curve.membership[40], 0.);
    assert_eq!(curve.membership[70], 0.25);
    assert_eq!(curve.membership[100], 0.5);
}

#[test]
fn test_sweeps_stay_in_range() {
    let system = heating_controller().unwrap();
    let engine = InferenceEngine::mamdani();
    let sweeps = [
        (TEMP_ROOM, Inputs::new().with(TEMP_OUTSIDE, 0.).with(HUMIDITY, 50.), 21),
        (TEMP_OUTSIDE, Inputs::new().with(TEMP_ROOM, 20.).with(HUMIDITY, 50.), 36),
        (HUMIDITY, Inputs::new().with(TEMP_ROOM, 20.).with(TEMP_OUTSIDE, 0.), 81),
    ];

    for (variable, fixed, len) in sweeps {
        let curve = engine.sweep(&system, variable, &fixed, HEATING_POWER).unwrap();

        assert_eq!(curve.len(), len);
        assert!(curve.iter().all(|(_, power)| (0. ..=100.).contains(power)));
    }
}

#[test]
fn test_shared_across_threads() {
    let system = heating_controller().unwrap();
    let engine = InferenceEngine::mamdani();
    let readings = [(17., -10., 30.), (22., 10., 80.), (25., 5., 60.), (19., 0., 45.)];
    let expected: Vec<f64> = readings
        .iter()
        .map(|(r, o, h)| heating_power(*r, *o, *h))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    readings
                        .iter()
                        .map(|(r, o, h)| {
                            let inputs = Inputs::new().with(TEMP_ROOM, *r).with(TEMP_OUTSIDE, *o).with(HUMIDITY, *h);

                            engine.compute(&system, &inputs).unwrap().get(HEATING_POWER).unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
