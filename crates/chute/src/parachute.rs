//! Deployment state machine.

use aero_core::environment::FlightConditions;
use aero_core::time::Stopwatch;
use aero_core::vector::Vector3;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::canopy::{CanopyGeometry, canopy_area};
use crate::delay::RandomDelay;
use crate::events::{ChuteEvent, FailureReason};
use crate::force::drag_force;
use crate::record::ChuteRecord;
use crate::spares::SpareCount;
use crate::state::DeploymentState;

/// Tunable parameters of a parachute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChuteSettings {
    /// Minimum static pressure (atm) at which the canopy may predeploy.
    pub min_air_pressure_to_open: f64,
    /// Altitude above terrain (m) at or below which the canopy fully deploys.
    pub deploy_altitude: f64,
    /// Inverse of the predeployment duration.
    pub semi_deployment_speed: f64,
    /// Inverse of the full deployment duration.
    pub deployment_speed: f64,
    /// Horizontal speed (m/s) below which a landed vessel counts as stopped.
    pub auto_cut_speed: f64,
    pub geometry: CanopyGeometry,
    /// Mass of the empty case (t). Zero means "take it from the part".
    pub case_mass: f64,
}

impl Default for ChuteSettings {
    fn default() -> Self {
        Self {
            min_air_pressure_to_open: 0.01,
            deploy_altitude: 700.0,
            semi_deployment_speed: 0.5,
            deployment_speed: 0.16667,
            auto_cut_speed: 0.5,
            geometry: CanopyGeometry::default(),
            case_mass: 0.0,
        }
    }
}

impl ChuteSettings {
    /// Seconds spent predeployed before full deployment may begin.
    pub fn predeployment_duration(&self) -> f64 {
        1.0 / self.semi_deployment_speed
    }

    /// Seconds for the canopy to grow from predeployed to fully deployed diameter.
    pub fn deployment_duration(&self) -> f64 {
        1.0 / self.deployment_speed
    }
}

/// Confirms that whoever asked for a repack is allowed to do it (crew on EVA, etc.).
pub trait RepackAuthority {
    fn authorize_repack(&self) -> bool;
}

impl RepackAuthority for bool {
    fn authorize_repack(&self) -> bool {
        *self
    }
}

/// Reasons a repack request is turned down. The parachute is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RepackRefusal {
    #[error("parachute has not been cut")]
    NotCut,
    #[error("vessel must be stopped on the ground or in vacuum")]
    InFlight,
    #[error("no spare canopies left")]
    NoSpares,
    #[error("repack not authorized")]
    Unauthorized,
}

/// A single parachute and its deployment sequence.
#[derive(Debug, Clone)]
pub struct Parachute {
    settings: ChuteSettings,
    state: DeploymentState,
    armed: bool,
    staged: bool,
    initiated: bool,
    spares: SpareCount,
    drag_timer: Stopwatch,
    /// Last drag timer reading, kept for persistence.
    time: f64,
    random_delay: RandomDelay,
    area: f64,
    events: Vec<ChuteEvent>,
}

impl Parachute {
    /// A freshly built, stowed parachute with a full set of spares.
    pub fn new(settings: ChuteSettings, random_delay: RandomDelay) -> Self {
        Self {
            settings,
            state: DeploymentState::Stowed,
            armed: false,
            staged: false,
            initiated: true,
            spares: SpareCount::default(),
            drag_timer: Stopwatch::new(),
            time: 0.0,
            random_delay,
            area: 0.0,
            events: Vec::new(),
        }
    }

    /// Override the starting spare count.
    pub fn with_spares(mut self, spares: SpareCount) -> Self {
        self.spares = spares;
        self
    }

    /// Restore a parachute from a persisted record.
    ///
    /// `settings` supplies the non-persisted parameters; persisted diameters, pressure,
    /// altitude and case mass override it.
    pub fn from_record(
        settings: ChuteSettings,
        record: &ChuteRecord,
        random_delay: RandomDelay,
    ) -> Self {
        let mut settings = settings;
        settings.min_air_pressure_to_open = record.min_air_pressure_to_open;
        settings.deploy_altitude = record.deploy_altitude;
        settings.geometry = CanopyGeometry {
            pre_deployed_diameter: record.pre_deployed_diameter,
            deployed_diameter: record.deployed_diameter,
        };
        settings.case_mass = record.case_mass;

        let mut chute = Self::new(settings, random_delay);
        chute.state = resolve_state(record.dep_state);
        chute.armed = record.armed;
        chute.staged = record.staged;
        chute.initiated = record.initiated;
        chute.spares = SpareCount::new(record.chute_count.get());

        if !chute.initiated {
            chute.initiated = true;
            chute.armed = false;
            chute.spares = SpareCount::default();
        }
        if record.time != 0.0 {
            chute.time = record.time;
            chute.drag_timer = Stopwatch::resumed(record.time);
        }
        chute
    }

    /// Snapshot for persistence.
    pub fn to_record(&self) -> ChuteRecord {
        ChuteRecord {
            min_air_pressure_to_open: self.settings.min_air_pressure_to_open,
            deploy_altitude: self.settings.deploy_altitude,
            pre_deployed_diameter: self.settings.geometry.pre_deployed_diameter,
            deployed_diameter: self.settings.geometry.deployed_diameter,
            case_mass: self.settings.case_mass,
            time: self.time,
            armed: self.armed,
            staged: self.staged,
            initiated: self.initiated,
            chute_count: self.spares,
            dep_state: self.state,
        }
    }

    pub fn settings(&self) -> &ChuteSettings {
        &self.settings
    }

    pub fn state(&self) -> DeploymentState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_staged(&self) -> bool {
        self.staged
    }

    pub fn spares(&self) -> SpareCount {
        self.spares
    }

    /// Canopy is out (predeployed or deployed).
    pub fn is_deployed(&self) -> bool {
        self.state.is_active()
    }

    /// Area used for the most recent drag force; zero while packed.
    pub fn current_area(&self) -> f64 {
        self.area
    }

    /// Seconds on the drag timer.
    pub fn drag_time(&self) -> f64 {
        self.drag_timer.elapsed()
    }

    /// Drain events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<ChuteEvent> {
        std::mem::take(&mut self.events)
    }

    /// Static pressure is high enough to open.
    pub fn deployment_clause(&self, conditions: &FlightConditions) -> bool {
        conditions.static_pressure_atm >= self.settings.min_air_pressure_to_open
    }

    /// Whether the canopy may open, or stay open, under these conditions.
    pub fn can_deploy(&self, conditions: &FlightConditions) -> bool {
        if conditions.ground_stop || conditions.in_vacuum() || self.state == DeploymentState::Cut {
            return false;
        }
        // An open canopy is not retracted by a momentary pressure dip.
        self.deployment_clause(conditions) || self.is_deployed()
    }

    /// Checks everything but authorization.
    pub fn can_repack(&self, conditions: &FlightConditions) -> Result<(), RepackRefusal> {
        if self.state != DeploymentState::Cut {
            return Err(RepackRefusal::NotCut);
        }
        if !(conditions.ground_stop || conditions.in_vacuum()) {
            return Err(RepackRefusal::InFlight);
        }
        if !self.spares.is_available() {
            return Err(RepackRefusal::NoSpares);
        }
        Ok(())
    }

    /// Stage the parachute and arm it. Ignored while already staged or after a cut.
    pub fn activate(&mut self) -> bool {
        if self.staged || self.state == DeploymentState::Cut {
            return false;
        }
        self.staged = true;
        self.armed = true;
        info!(state = %self.state, "parachute activated");
        self.events.push(ChuteEvent::Activated);
        true
    }

    pub fn deactivate(&mut self) -> bool {
        if !self.staged {
            return false;
        }
        self.staged = false;
        info!(state = %self.state, "parachute deactivated");
        self.events.push(ChuteEvent::Deactivated);
        true
    }

    /// Drop out of the armed hold before the canopy commits to opening.
    pub fn disarm(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.armed = false;
        self.events.push(ChuteEvent::Disarmed);
        self.deactivate();
        true
    }

    /// Stowed -> Predeployed.
    pub fn pre_deploy(&mut self) -> bool {
        if self.state != DeploymentState::Stowed {
            return false;
        }
        self.set_state(DeploymentState::Predeployed);
        self.drag_timer.restart();
        true
    }

    /// Predeployed -> Deployed. Area growth restarts from the predeployed diameter.
    pub fn deploy(&mut self) -> bool {
        if self.state != DeploymentState::Predeployed {
            return false;
        }
        self.set_state(DeploymentState::Deployed);
        self.drag_timer.restart();
        true
    }

    /// Release an open canopy. Only acts while predeployed or deployed.
    pub fn cut(&mut self) -> bool {
        if !self.is_deployed() {
            return false;
        }
        self.set_state(DeploymentState::Cut);
        self.drag_timer.reset();
        self.time = 0.0;
        self.area = 0.0;
        self.staging_reset();
        true
    }

    /// Cut -> Stowed, consuming a spare unless the supply is unlimited.
    pub fn repack<A: RepackAuthority + ?Sized>(
        &mut self,
        conditions: &FlightConditions,
        authority: &A,
    ) -> Result<(), RepackRefusal> {
        self.can_repack(conditions)?;
        if !authority.authorize_repack() {
            return Err(RepackRefusal::Unauthorized);
        }

        self.spares.consume();
        self.set_state(DeploymentState::Stowed);
        self.random_delay.reset();
        self.drag_timer.reset();
        self.time = 0.0;
        self.area = 0.0;
        info!(spares = %self.spares, "parachute repacked");
        self.events.push(ChuteEvent::Repacked {
            spares_left: self.spares,
        });
        Ok(())
    }

    /// Advance one physics step and return the drag force to apply, if any.
    pub fn tick(&mut self, conditions: &FlightConditions, dt_s: f64) -> Option<Vector3> {
        self.drag_timer.advance(dt_s);
        self.random_delay.advance(dt_s);

        if !self.staged {
            return None;
        }

        if self.armed {
            if self.can_deploy(conditions) {
                self.armed = false;
                debug!("armed hold released");
                self.events.push(ChuteEvent::Released);
            }
            return None;
        }

        if !self.can_deploy(conditions) {
            if self.is_deployed() {
                self.cut();
            } else {
                self.fail(conditions);
            }
            return None;
        }

        match self.state {
            DeploymentState::Stowed => {
                if self.deployment_clause(conditions) && self.random_delay.elapsed() {
                    self.pre_deploy();
                }
                None
            }
            DeploymentState::Predeployed => {
                let duration = self.settings.predeployment_duration();
                let force = self.drag_force(
                    conditions,
                    0.0,
                    self.settings.geometry.pre_deployed_diameter,
                    duration,
                );
                if conditions.true_altitude_m <= self.settings.deploy_altitude
                    && self.drag_timer.elapsed() >= duration
                {
                    self.deploy();
                }
                Some(force)
            }
            DeploymentState::Deployed => Some(self.drag_force(
                conditions,
                self.settings.geometry.pre_deployed_diameter,
                self.settings.geometry.deployed_diameter,
                self.settings.deployment_duration(),
            )),
            DeploymentState::Cut | DeploymentState::None => None,
        }
    }

    /// Empty case mass plus canopy mass. Latches the case mass from the part on first use.
    pub fn total_mass(&mut self, part_mass: f64) -> f64 {
        if self.settings.case_mass == 0.0 {
            self.settings.case_mass = part_mass;
        }
        self.settings.case_mass + self.settings.geometry.chute_mass()
    }

    pub fn module_cost(&self) -> f64 {
        self.settings.geometry.module_cost()
    }

    /// Push the user-tunable settings onto symmetry counterparts.
    pub fn copy_settings_to(&self, counterparts: &mut [Parachute]) {
        for other in counterparts {
            other.settings.min_air_pressure_to_open = self.settings.min_air_pressure_to_open;
            other.settings.deploy_altitude = self.settings.deploy_altitude;
        }
    }

    /// Human-readable summary of the parachute's parameters.
    pub fn describe(&self) -> String {
        let s = &self.settings;
        format!(
            "Case mass: {}\n\
             Spare chutes: {}\n\
             Autocut speed: {}m/s\n\
             Parachute material: Nylon\n\
             Drag coefficient: 1.0\n\
             Predeployed diameter: {}m\n\
             Deployed diameter: {}m\n\
             Minimum deployment pressure: {}atm\n\
             Deployment altitude: {}m\n\
             Predeployment speed: {}s\n\
             Deployment speed: {}s\n",
            s.case_mass,
            SpareCount::MAX_SPARES,
            s.auto_cut_speed,
            s.geometry.pre_deployed_diameter,
            s.geometry.deployed_diameter,
            s.min_air_pressure_to_open,
            s.deploy_altitude,
            s.predeployment_duration(),
            s.deployment_duration(),
        )
    }

    fn drag_force(
        &mut self,
        conditions: &FlightConditions,
        start_diameter: f64,
        end_diameter: f64,
        duration: f64,
    ) -> Vector3 {
        if !self.drag_timer.is_running() {
            self.drag_timer.start();
        }
        let elapsed = self.drag_timer.elapsed();
        self.time = elapsed;
        self.area = canopy_area(elapsed, duration, start_diameter, end_diameter);
        drag_force(conditions, self.area)
    }

    fn fail(&mut self, conditions: &FlightConditions) {
        let reason = FailureReason::diagnose(conditions);
        warn!(%reason, "parachute deployment failed");
        self.events.push(ChuteEvent::DeployFailed { reason });
        self.staging_reset();
    }

    fn staging_reset(&mut self) {
        self.deactivate();
        self.armed = false;
    }

    fn set_state(&mut self, to: DeploymentState) {
        let from = self.state;
        self.state = to;
        info!(%from, %to, "parachute state changed");
        self.events.push(ChuteEvent::StateChanged { from, to });
    }
}

/// Unresolved records settle into the default tag.
fn resolve_state(state: DeploymentState) -> DeploymentState {
    if state != DeploymentState::None {
        return state;
    }
    warn!(
        default = DeploymentState::DEFAULT_TAG,
        "persisted deployment state unset; using default"
    );
    DeploymentState::from_tag(DeploymentState::DEFAULT_TAG).unwrap_or(DeploymentState::Stowed)
}
