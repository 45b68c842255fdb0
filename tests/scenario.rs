use aero_response::chute::{ChuteEvent, DeploymentState, RepackRefusal, SpareCount};
use aero_response::config::{ConfigError, ScenarioConfig};
use aero_response::primitives::vector;
use aero_response::ramdrag::{PartId, drag_per_area};
use aero_response::scenario::{self, Replay, ReplayReport, ScenarioError, write_telemetry};

use DeploymentState::{Cut, Deployed, Predeployed, Stowed};

const CATALOG: &str = "data/scenarios/descents.yaml";

fn catalog() -> Vec<ScenarioConfig> {
    scenario::load_scenarios(CATALOG).expect("scenario catalog")
}

fn run(name: &str) -> (ScenarioConfig, ReplayReport) {
    let scenarios = catalog();
    let config = scenario::select(&scenarios, Some(name))
        .expect("scenario present")
        .clone();
    let report = Replay::new(&config).run().expect("replay");
    (config, report)
}

fn first_entry(report: &ReplayReport, chute: usize, state: DeploymentState) -> f64 {
    report
        .events
        .iter()
        .find(|e| {
            e.chute == chute && matches!(e.event, ChuteEvent::StateChanged { to, .. } if to == state)
        })
        .map(|e| e.time_s)
        .unwrap_or_else(|| panic!("chute {chute} never reached {state}"))
}

#[test]
fn select_is_case_insensitive() {
    let scenarios = catalog();
    let picked = scenario::select(&scenarios, Some("mk16_descent")).expect("select");
    assert_eq!(picked.name, "MK16_DESCENT");
    let first = scenario::select(&scenarios, None).expect("default");
    assert_eq!(first.name, scenarios[0].name);
    assert!(matches!(
        scenario::select(&scenarios, Some("nope")),
        Err(ScenarioError::NotFound(_))
    ));
    assert!(matches!(
        scenario::select(&[], None),
        Err(ScenarioError::EmptyCatalog)
    ));
}

#[test]
fn descent_runs_full_lifecycle_for_both_chutes() {
    let (_, report) = run("MK16_DESCENT");
    let expected = vec![
        (Stowed, Predeployed),
        (Predeployed, Deployed),
        (Deployed, Cut),
        (Cut, Stowed),
    ];
    assert_eq!(report.transitions(0), expected);
    assert_eq!(report.transitions(1), expected);
    assert_eq!(report.final_states, vec![Stowed, Stowed]);

    // The drogue opens fully well above the main.
    let drogue = first_entry(&report, 0, Deployed);
    let main = first_entry(&report, 1, Deployed);
    assert!(drogue < main, "drogue at {drogue}, main at {main}");
    assert!(first_entry(&report, 1, Cut) >= 120.0);

    let repacks: Vec<_> = report
        .events
        .iter()
        .filter_map(|e| match e.event {
            ChuteEvent::Repacked { spares_left } => Some((e.chute, spares_left)),
            _ => None,
        })
        .collect();
    assert_eq!(
        repacks,
        vec![(0, SpareCount::new(4)), (1, SpareCount::new(1))]
    );
    assert!(report.events.iter().all(|e| !matches!(e.event, ChuteEvent::DeployFailed { .. })));
}

#[test]
fn descent_loads_the_intake_while_moving() {
    let (config, report) = run("MK16_DESCENT");
    assert_eq!(report.ticks.len() as f64, (config.duration_s() / config.time_step_s).floor() + 1.0);

    let early = report
        .ticks
        .iter()
        .find(|t| t.time_s >= 5.0)
        .expect("tick after 5 s");
    assert!((early.ram.mean_throttle - 0.6).abs() < 1e-12);
    assert_eq!(early.ram.loaded_intakes, 1);

    let cruise = report
        .ticks
        .iter()
        .find(|t| t.time_s >= 30.0)
        .expect("tick after 30 s");
    assert_eq!(cruise.ram.mean_throttle, 0.0);
    assert!((cruise.ram.ram_drag - drag_per_area(cruise.conditions.mach)).abs() < 1e-12);
    assert!(cruise.ram.total_force > 0.0);

    let parked = report.ticks.last().expect("last tick");
    assert_eq!(parked.ram.loaded_intakes, 0);
    assert!(report.peak_intake_force() > 0.0);
    assert!(report.peak_chute_force() > 0.0);
}

#[test]
fn replay_is_deterministic_for_a_seed() {
    let (_, first) = run("MK16_DESCENT");
    let (_, second) = run("MK16_DESCENT");
    assert_eq!(first.events, second.events);
    assert_eq!(first.ticks, second.ticks);
}

#[test]
fn manual_cut_blocks_repack_in_flight() {
    let (_, report) = run("CUT_AND_REPACK");
    assert_eq!(
        report.transitions(0),
        vec![(Stowed, Predeployed), (Predeployed, Deployed), (Deployed, Cut)]
    );
    assert_eq!(report.final_states, vec![Cut]);
    assert_eq!(report.repack_refusals.len(), 1);
    assert_eq!(report.repack_refusals[0].2, RepackRefusal::InFlight);

    let cut = first_entry(&report, 0, Cut);
    assert!((cut - 15.0).abs() < 0.2);
    let after_cut = report.ticks.iter().filter(|t| t.time_s > cut + 0.01);
    for tick in after_cut {
        assert_eq!(tick.chutes[0].force, [0.0, 0.0, 0.0]);
        assert_eq!(tick.chutes[0].state, Cut);
    }
}

#[test]
fn telemetry_has_one_row_per_chute_per_tick() {
    let (_, report) = run("MK16_DESCENT");
    let mut buffer: Vec<u8> = Vec::new();
    write_telemetry(&report, &mut buffer).expect("write telemetry");

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(&headers[0], "time_s");
    assert_eq!(&headers[2], "state");
    assert_eq!(headers.len(), 11);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), report.ticks.len() * 2);
    assert_eq!(&rows[0][1], "drogue");
    assert_eq!(&rows[1][1], "main");
    assert!(rows.iter().any(|r| &r[2] == "DEPLOYED"));
}

#[test]
fn summary_lists_transitions_and_final_states() {
    let (_, report) = run("CUT_AND_REPACK");
    let summary = report.summary("2026-01-01T00:00:00+00:00".to_string());
    assert_eq!(summary.scenario, "CUT_AND_REPACK");
    assert_eq!(summary.transitions.len(), 3);
    assert_eq!(summary.transitions[2].to, "CUT");
    assert_eq!(summary.final_states, vec![("main".to_string(), "CUT".to_string())]);

    let json = serde_json::to_value(&summary).expect("summary json");
    assert_eq!(json["ticks"], report.ticks.len());
    assert!(json["failures"].as_array().is_some_and(|f| f.is_empty()));
}

#[test]
fn intake_forces_reach_the_intake_part() {
    let (_, report) = run("MK16_DESCENT");
    for tick in &report.ticks {
        assert_eq!(tick.intake_forces.len(), tick.ram.loaded_intakes);
        assert!(tick.intake_forces.iter().all(|(part, _)| *part == PartId(0)));
        let received: f64 = tick
            .intake_forces
            .iter()
            .map(|(_, force)| vector::norm(force))
            .sum();
        assert!((received - tick.ram.total_force).abs() < 1e-9);
    }
    assert!(report.peak_intake_force() > 0.0);
}

#[test]
fn chute_names_with_separators_stay_in_one_field() {
    let scenarios = catalog();
    let mut config = scenario::select(&scenarios, Some("CUT_AND_REPACK"))
        .expect("scenario present")
        .clone();
    config.chutes[0].name = "main, left \"quoted\"".to_string();
    let report = Replay::new(&config).run().expect("replay");

    let mut buffer: Vec<u8> = Vec::new();
    write_telemetry(&report, &mut buffer).expect("write telemetry");
    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), report.ticks.len());
    for row in &rows {
        assert_eq!(row.len(), 11);
        assert_eq!(&row[1], "main, left \"quoted\"");
    }
}

#[test]
fn too_fine_time_step_is_refused() {
    let scenarios = catalog();
    let mut config = scenario::select(&scenarios, Some("CUT_AND_REPACK"))
        .expect("scenario present")
        .clone();
    config.time_step_s = 1e-300;
    assert!(matches!(
        Replay::new(&config).run(),
        Err(ScenarioError::Config(ConfigError::Invalid { .. }))
    ));

    config.time_step_s = f64::NAN;
    assert!(matches!(
        Replay::new(&config).run(),
        Err(ScenarioError::Config(ConfigError::Invalid { .. }))
    ));
}
