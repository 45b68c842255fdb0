use aero_response::chute::{
    ChuteRecord, ChuteSettings, DeploymentState, Parachute, RandomDelay, SpareCount,
};
use aero_response::primitives::environment::FlightConditions;

fn air() -> FlightConditions {
    FlightConditions {
        static_pressure_atm: 0.9,
        density_kg_m3: 1.1,
        true_altitude_m: 400.0,
        velocity: [0.0, 0.0, -30.0],
        ..FlightConditions::default()
    }
}

#[test]
fn every_state_round_trips_through_its_tag() {
    for (state, tag) in DeploymentState::TAGS {
        assert_eq!(state.tag(), tag);
        assert_eq!(DeploymentState::from_tag(tag), Some(state));
        assert_eq!(tag.parse::<DeploymentState>(), Ok(state));
    }
    assert!("HALF_OPEN".parse::<DeploymentState>().is_err());
    assert_eq!(DeploymentState::None.to_string(), "NONE");
    assert_eq!(DeploymentState::Deployed.to_string(), "DEPLOYED");
}

#[test]
fn deployed_parachute_survives_save_and_load() {
    let mut parachute = Parachute::new(ChuteSettings::default(), RandomDelay::fixed(0.0))
        .with_spares(SpareCount::new(3));
    parachute.activate();
    for _ in 0..60 {
        parachute.tick(&air(), 0.05);
    }
    assert_eq!(parachute.state(), DeploymentState::Deployed);

    let record = parachute.to_record();
    let json = serde_json::to_string(&record).expect("serialize record");
    assert!(json.contains("\"depState\":\"DEPLOYED\""));
    assert!(json.contains("\"chuteCount\":3"));

    let restored: ChuteRecord = serde_json::from_str(&json).expect("parse record");
    assert_eq!(restored, record);

    let loaded = Parachute::from_record(
        ChuteSettings::default(),
        &restored,
        RandomDelay::fixed(0.0),
    );
    assert_eq!(loaded.state(), DeploymentState::Deployed);
    assert!(loaded.is_staged());
    assert!(!loaded.is_armed());
    assert_eq!(loaded.spares().get(), 3);
    assert!(record.time > 0.0);
    assert!((loaded.drag_time() - record.time).abs() < 1e-12);
}

#[test]
fn loaded_timer_keeps_running() {
    let record = ChuteRecord {
        time: 2.0,
        staged: true,
        initiated: true,
        dep_state: DeploymentState::Deployed,
        ..ChuteRecord::default()
    };
    let mut parachute =
        Parachute::from_record(ChuteSettings::default(), &record, RandomDelay::fixed(0.0));
    parachute.tick(&air(), 0.5);
    assert!((parachute.drag_time() - 2.5).abs() < 1e-12);
}

#[test]
fn unset_state_resolves_to_stowed() {
    let yaml = "depState: ''\ninitiated: true\nchuteCount: 1\n";
    let record: ChuteRecord = serde_yaml::from_str(yaml).expect("parse yaml record");
    assert_eq!(record.dep_state, DeploymentState::None);

    let parachute =
        Parachute::from_record(ChuteSettings::default(), &record, RandomDelay::fixed(0.0));
    assert_eq!(parachute.state(), DeploymentState::Stowed);
    assert_eq!(parachute.spares().get(), 1);
    assert_eq!(parachute.to_record().dep_state, DeploymentState::Stowed);
}

#[test]
fn first_load_initialises_spares_and_disarms() {
    let record = ChuteRecord {
        armed: true,
        initiated: false,
        chute_count: SpareCount::new(0),
        ..ChuteRecord::default()
    };
    let parachute =
        Parachute::from_record(ChuteSettings::default(), &record, RandomDelay::fixed(0.0));
    assert!(!parachute.is_armed());
    assert_eq!(parachute.spares().get(), SpareCount::MAX_SPARES);
    assert!(parachute.to_record().initiated);
}

#[test]
fn persisted_geometry_overrides_settings() {
    let json = r#"{"preDeployedDiameter": 2.0, "deployedDiameter": 12.0, "deployAltitude": 1500.0, "caseMass": 0.2, "chuteCount": -1}"#;
    let record: ChuteRecord = serde_json::from_str(json).expect("parse partial record");
    let parachute =
        Parachute::from_record(ChuteSettings::default(), &record, RandomDelay::fixed(0.0));

    let settings = parachute.settings();
    assert_eq!(settings.geometry.pre_deployed_diameter, 2.0);
    assert_eq!(settings.geometry.deployed_diameter, 12.0);
    assert_eq!(settings.deploy_altitude, 1500.0);
    assert_eq!(settings.case_mass, 0.2);
    assert_eq!(settings.min_air_pressure_to_open, 0.01);
    assert_eq!(parachute.state(), DeploymentState::Stowed);
}
