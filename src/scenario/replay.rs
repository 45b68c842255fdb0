//! Fixed-step replay of a scripted scenario.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use aero_chute::{ChuteEvent, DeploymentState, Parachute, RepackRefusal};
use aero_config::{CommandConfig, CommandKind, FlightKeyframe, ScenarioConfig};
use aero_core::environment::{FlightConditions, ground_stop};
use aero_core::units::lerp;
use aero_core::vector::{self, Vector3};
use aero_ramdrag::{PartId, RamDragApplicator, RamDragSample};

use super::{ScenarioError, build_parachute};
use super::vessel::ScriptedVessel;

/// One parachute's output for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChuteSample {
    pub chute: usize,
    pub state: DeploymentState,
    pub area_m2: f64,
    pub force: Vector3,
    pub drag_time_s: f64,
}

/// Everything produced during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSample {
    pub time_s: f64,
    pub conditions: FlightConditions,
    pub ram: RamDragSample,
    /// Intake forces as the vessel received them, per part.
    pub intake_forces: Vec<(PartId, Vector3)>,
    pub chutes: Vec<ChuteSample>,
}

/// A parachute event stamped with the tick it happened on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent {
    pub time_s: f64,
    pub chute: usize,
    pub event: ChuteEvent,
}

/// Result of a full replay.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub scenario: String,
    pub chute_names: Vec<String>,
    pub ticks: Vec<TickSample>,
    pub events: Vec<TimedEvent>,
    pub repack_refusals: Vec<(f64, usize, RepackRefusal)>,
    pub final_states: Vec<DeploymentState>,
}

impl ReplayReport {
    /// Largest chute force magnitude seen over the run.
    pub fn peak_chute_force(&self) -> f64 {
        self.ticks
            .iter()
            .flat_map(|tick| tick.chutes.iter())
            .map(|sample| vector::norm(&sample.force))
            .fold(0.0, f64::max)
    }

    /// Largest total intake force the vessel received on any tick.
    pub fn peak_intake_force(&self) -> f64 {
        self.ticks
            .iter()
            .map(|tick| {
                tick.intake_forces
                    .iter()
                    .map(|(_, force)| vector::norm(force))
                    .sum::<f64>()
            })
            .fold(0.0, f64::max)
    }

    /// State changes of one parachute in order.
    pub fn transitions(&self, chute: usize) -> Vec<(DeploymentState, DeploymentState)> {
        self.events
            .iter()
            .filter(|e| e.chute == chute)
            .filter_map(|e| match e.event {
                ChuteEvent::StateChanged { from, to } => Some((from, to)),
                _ => None,
            })
            .collect()
    }
}

/// Scenario driver owning the parachutes and the vessel-level ram drag engine.
pub struct Replay {
    config: ScenarioConfig,
    vessel: ScriptedVessel,
    ram_drag: RamDragApplicator,
    chutes: Vec<Parachute>,
    commands: Vec<CommandConfig>,
    next_command: usize,
    throttle: Option<f64>,
}

impl Replay {
    pub fn new(config: &ScenarioConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let chutes = config
            .chutes
            .iter()
            .map(|chute| build_parachute(chute, &mut rng))
            .collect();

        let vessel = ScriptedVessel::new(&config.parts);
        let mut ram_drag = RamDragApplicator::new();
        let (used, unused) = vessel.aero_surfaces();
        ram_drag.update_aero_data(&used, &unused, &vessel);

        let mut commands = config.commands.clone();
        commands.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));

        Self {
            config: config.clone(),
            vessel,
            ram_drag,
            chutes,
            commands,
            next_command: 0,
            throttle: None,
        }
    }

    pub fn chutes(&self) -> &[Parachute] {
        &self.chutes
    }

    pub fn ram_drag(&self) -> &RamDragApplicator {
        &self.ram_drag
    }

    /// Run from the first to the last keyframe.
    ///
    /// The scenario is validated first, so a time step too fine for the scripted span is
    /// rejected instead of run.
    pub fn run(mut self) -> Result<ReplayReport, ScenarioError> {
        self.config.validate()?;
        let steps = self.config.step_count()?;
        let dt = self.config.time_step_s;
        let start = self.config.start_s();
        info!(scenario = %self.config.name, steps, dt, "starting replay");

        let mut report = ReplayReport {
            scenario: self.config.name.clone(),
            chute_names: self.config.chutes.iter().map(|c| c.name.clone()).collect(),
            ticks: Vec::new(),
            events: Vec::new(),
            repack_refusals: Vec::new(),
            final_states: Vec::new(),
        };

        for step in 0..=steps {
            let time_s = start + step as f64 * dt;
            let step_dt = if step == 0 { 0.0 } else { dt };
            let tick = self.step(time_s, step_dt, &mut report);
            report.ticks.push(tick);
        }

        report.final_states = self.chutes.iter().map(Parachute::state).collect();
        Ok(report)
    }

    fn step(&mut self, time_s: f64, dt: f64, report: &mut ReplayReport) -> TickSample {
        let (conditions, throttle) = self.conditions_at(time_s);
        if let Some(throttle) = throttle {
            if self.throttle != Some(throttle) {
                self.vessel.set_throttle(throttle);
                self.throttle = Some(throttle);
            }
        }

        if self.vessel.detach_due(time_s) {
            let (used, unused) = self.vessel.aero_surfaces();
            self.ram_drag.update_aero_data(&used, &unused, &self.vessel);
            debug!(time_s, "vessel composition changed");
        }

        self.issue_commands(time_s, &conditions, report);

        self.vessel.set_velocity_norm(conditions.velocity_direction());
        let ram = self.ram_drag.apply_intake_ram_drag(
            &mut self.vessel,
            conditions.mach,
            conditions.velocity_direction(),
            conditions.dynamic_pressure,
        );
        let intake_forces = self.vessel.take_applied();

        let mut chutes = Vec::with_capacity(self.chutes.len());
        for (index, chute) in self.chutes.iter_mut().enumerate() {
            let local = chute_conditions(&conditions, chute, &self.config, time_s);
            let force = chute.tick(&local, dt).unwrap_or(vector::ZERO);
            chutes.push(ChuteSample {
                chute: index,
                state: chute.state(),
                area_m2: chute.current_area(),
                force,
                drag_time_s: chute.drag_time(),
            });
            report
                .events
                .extend(chute.take_events().into_iter().map(|event| TimedEvent {
                    time_s,
                    chute: index,
                    event,
                }));
        }

        TickSample {
            time_s,
            conditions,
            ram,
            intake_forces,
            chutes,
        }
    }

    fn issue_commands(
        &mut self,
        time_s: f64,
        conditions: &FlightConditions,
        report: &mut ReplayReport,
    ) {
        while let Some(command) = self.commands.get(self.next_command) {
            if command.time_s > time_s {
                break;
            }
            let command = command.clone();
            self.next_command += 1;
            info!(time_s, command = ?command.command, "issuing command");

            for (index, chute) in self.chutes.iter_mut().enumerate() {
                let local = chute_conditions(conditions, chute, &self.config, time_s);
                match command.command {
                    CommandKind::Activate => {
                        chute.activate();
                    }
                    CommandKind::Deactivate => {
                        chute.deactivate();
                    }
                    CommandKind::Disarm => {
                        chute.disarm();
                    }
                    CommandKind::Cut => {
                        chute.cut();
                    }
                    CommandKind::Repack => {
                        if let Err(refusal) = chute.repack(&local, &command.authorized) {
                            info!(chute = index, %refusal, "repack refused");
                            report.repack_refusals.push((time_s, index, refusal));
                        }
                    }
                }
                report
                    .events
                    .extend(chute.take_events().into_iter().map(|event| TimedEvent {
                        time_s,
                        chute: index,
                        event,
                    }));
            }
        }
    }

    /// Interpolated flight state and the throttle in effect at `time_s`.
    fn conditions_at(&self, time_s: f64) -> (FlightConditions, Option<f64>) {
        let frames = &self.config.keyframes;
        let throttle = frames
            .iter()
            .take_while(|k| k.time_s <= time_s)
            .filter_map(|k| k.throttle)
            .last();

        let Some(last) = frames.last() else {
            return (FlightConditions::default(), throttle);
        };
        let upper = frames.iter().position(|k| k.time_s > time_s);
        let conditions = match upper {
            Some(0) => keyframe_conditions(&frames[0], &frames[0], 0.0),
            Some(i) => {
                let (a, b) = (&frames[i - 1], &frames[i]);
                let span = b.time_s - a.time_s;
                let t = if span > 0.0 {
                    (time_s - a.time_s) / span
                } else {
                    1.0
                };
                keyframe_conditions(a, b, t)
            }
            None => keyframe_conditions(last, last, 0.0),
        };
        (conditions, throttle)
    }
}

/// Conditions as seen by one parachute; ground stop depends on its auto-cut speed.
fn chute_conditions(
    conditions: &FlightConditions,
    chute: &Parachute,
    config: &ScenarioConfig,
    time_s: f64,
) -> FlightConditions {
    let landed = config
        .keyframes
        .iter()
        .take_while(|k| k.time_s <= time_s)
        .last()
        .is_some_and(|k| k.landed);
    let v = conditions.surface_velocity();
    let horizontal_speed = (v[0] * v[0] + v[1] * v[1]).sqrt();
    FlightConditions {
        ground_stop: ground_stop(landed, horizontal_speed, chute.settings().auto_cut_speed),
        ..*conditions
    }
}

/// Interpolate between two keyframes. Flags are taken from `a`.
fn keyframe_conditions(a: &FlightKeyframe, b: &FlightKeyframe, t: f64) -> FlightConditions {
    let velocity = [
        lerp(a.velocity_m_s[0], b.velocity_m_s[0], t),
        lerp(a.velocity_m_s[1], b.velocity_m_s[1], t),
        lerp(a.velocity_m_s[2], b.velocity_m_s[2], t),
    ];
    let density = lerp(a.density_kg_m3, b.density_kg_m3, t);
    FlightConditions {
        mach: lerp(a.mach, b.mach, t),
        dynamic_pressure: 0.5 * density * vector::norm_squared(&velocity),
        static_pressure_atm: lerp(a.static_pressure_atm, b.static_pressure_atm, t),
        density_kg_m3: density,
        true_altitude_m: lerp(a.true_altitude_m, b.true_altitude_m, t),
        ground_stop: false,
        shielded: a.shielded,
        velocity,
        frame_velocity: vector::ZERO,
    }
}
