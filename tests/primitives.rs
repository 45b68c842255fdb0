use aero_response::chute::RandomDelay;
use aero_response::primitives::environment::{FlightConditions, ground_stop, true_altitude};
use aero_response::primitives::time::Stopwatch;
use aero_response::primitives::vector;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn version_matches_manifest() {
    assert_eq!(aero_response::version(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn stopwatch_only_counts_while_running() {
    let mut watch = Stopwatch::new();
    watch.advance(1.0);
    assert_eq!(watch.elapsed(), 0.0);

    watch.start();
    watch.advance(0.25);
    watch.advance(-1.0);
    assert_eq!(watch.elapsed(), 0.25);

    watch.restart();
    assert!(watch.is_running());
    assert_eq!(watch.elapsed(), 0.0);

    watch.reset();
    assert!(!watch.is_running());

    let resumed = Stopwatch::resumed(3.5);
    assert!(resumed.is_running());
    assert_eq!(resumed.elapsed(), 3.5);
}

#[test]
fn random_delay_fires_once_then_resets() {
    let mut delay = RandomDelay::fixed(0.3);
    assert!(!delay.elapsed());
    delay.advance(0.2);
    assert!(!delay.elapsed());
    delay.advance(0.2);
    assert!(delay.elapsed());
    // Reset after firing: the watch restarts lazily on the next read.
    assert!(!delay.elapsed());
}

#[test]
fn sampled_delays_stay_below_one_second() {
    let mut rng = StdRng::seed_from_u64(11);
    let thresholds: Vec<f64> = (0..32)
        .map(|_| RandomDelay::sample(&mut rng).threshold())
        .collect();
    assert!(thresholds.iter().all(|t| (0.0..1.0).contains(t)));
    assert!(thresholds.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn ground_stop_needs_contact_and_low_speed() {
    assert!(ground_stop(true, 0.2, 0.5));
    assert!(!ground_stop(true, 0.5, 0.5));
    assert!(!ground_stop(false, 0.0, 0.5));
}

#[test]
fn true_altitude_uses_sea_surface_over_water() {
    assert_eq!(true_altitude(1200.0, Some(200.0), true), 1000.0);
    assert_eq!(true_altitude(1200.0, Some(-300.0), true), 1200.0);
    assert_eq!(true_altitude(1200.0, Some(-300.0), false), 1500.0);
    assert_eq!(true_altitude(1200.0, None, false), 1200.0);
}

#[test]
fn frame_velocity_is_added_before_normalizing() {
    let conditions = FlightConditions {
        velocity: [3.0, 0.0, 0.0],
        frame_velocity: [0.0, 4.0, 0.0],
        ..FlightConditions::default()
    };
    assert_eq!(conditions.surface_velocity(), [3.0, 4.0, 0.0]);
    assert_eq!(conditions.speed_squared(), 25.0);
    let direction = conditions.velocity_direction();
    assert!((vector::norm(&direction) - 1.0).abs() < 1e-12);
    assert!(conditions.in_vacuum());
}
