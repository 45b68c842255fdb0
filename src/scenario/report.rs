//! Conversion of replay reports into exported artifacts.

use std::io::Write;

use aero_chute::ChuteEvent;
use aero_core::vector;
use aero_export::summary::{Failure, RunSummary, Transition};
use aero_export::telemetry::{self, Record};

use super::replay::ReplayReport;

/// CSV rows for every parachute on every tick. A vessel without parachutes still gets one
/// row per tick carrying the intake columns.
pub fn telemetry_records(report: &ReplayReport) -> Vec<Record<'_>> {
    let mut rows = Vec::new();
    for tick in &report.ticks {
        let intake = |chute: &'static str| Record {
            time_s: tick.time_s,
            chute,
            state: "",
            canopy_area_m2: 0.0,
            chute_force_n: 0.0,
            drag_time_s: 0.0,
            mach: tick.ram.mach,
            mean_throttle: tick.ram.mean_throttle,
            ram_drag: tick.ram.ram_drag,
            loaded_intakes: tick.ram.loaded_intakes,
            intake_force_n: tick.ram.total_force,
        };
        if tick.chutes.is_empty() {
            rows.push(intake("-"));
            continue;
        }
        for sample in &tick.chutes {
            rows.push(Record {
                chute: report
                    .chute_names
                    .get(sample.chute)
                    .map(String::as_str)
                    .unwrap_or("?"),
                state: sample.state.tag(),
                canopy_area_m2: sample.area_m2,
                chute_force_n: vector::norm(&sample.force),
                drag_time_s: sample.drag_time_s,
                ..intake("")
            });
        }
    }
    rows
}

/// Write the header and every telemetry row.
pub fn write_telemetry(report: &ReplayReport, writer: &mut dyn Write) -> std::io::Result<()> {
    let mut csv = telemetry::csv_writer(writer);
    telemetry::write_header(&mut csv)?;
    for record in telemetry_records(report) {
        record.write_to(&mut csv)?;
    }
    csv.flush()
}

impl ReplayReport {
    /// Build the JSON summary; `generated_utc` is supplied by the caller.
    pub fn summary(&self, generated_utc: String) -> RunSummary {
        let name = |index: usize| {
            self.chute_names
                .get(index)
                .cloned()
                .unwrap_or_else(|| index.to_string())
        };

        let mut transitions = Vec::new();
        let mut failures = Vec::new();
        for event in &self.events {
            match event.event {
                ChuteEvent::StateChanged { from, to } => transitions.push(Transition {
                    time_s: event.time_s,
                    chute: name(event.chute),
                    from: from.to_string(),
                    to: to.to_string(),
                }),
                ChuteEvent::DeployFailed { reason } => failures.push(Failure {
                    time_s: event.time_s,
                    chute: name(event.chute),
                    reason: reason.to_string(),
                }),
                _ => {}
            }
        }

        RunSummary {
            scenario: self.scenario.clone(),
            generated_utc,
            ticks: self.ticks.len(),
            duration_s: self.ticks.last().map(|t| t.time_s).unwrap_or_default()
                - self.ticks.first().map(|t| t.time_s).unwrap_or_default(),
            peak_chute_force_n: self.peak_chute_force(),
            peak_intake_force_n: self.peak_intake_force(),
            transitions,
            failures,
            final_states: self
                .final_states
                .iter()
                .enumerate()
                .map(|(index, state)| (name(index), state.to_string()))
                .collect(),
        }
    }
}
