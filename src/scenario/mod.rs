//! Scripted replays: scenario selection and conversion from configuration.
//!
//! A replay does not integrate motion. It interpolates the scripted flight state, issues
//! the scripted commands and records the forces both subsystems produce.

pub mod replay;
pub mod report;
mod vessel;

use std::path::Path;

use rand::Rng;
use thiserror::Error;

use aero_chute::{CanopyGeometry, ChuteSettings, Parachute, RandomDelay, SpareCount};
use aero_config::{ChuteConfig, ConfigError, ScenarioConfig};

pub use replay::{ChuteSample, Replay, ReplayReport, TickSample, TimedEvent};
pub use report::{telemetry_records, write_telemetry};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to load scenario: {0}")]
    Config(#[from] ConfigError),
    #[error("scenario '{0}' not found in catalog")]
    NotFound(String),
    #[error("scenario catalog is empty")]
    EmptyCatalog,
    #[error("failed to write telemetry: {0}")]
    Io(#[from] std::io::Error),
}

/// Load every scenario found at `path`.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioConfig>, ScenarioError> {
    Ok(aero_config::load_scenarios(path)?)
}

/// Pick a scenario by case-insensitive name, or the first one when no name is given.
pub fn select<'a>(
    scenarios: &'a [ScenarioConfig],
    requested: Option<&str>,
) -> Result<&'a ScenarioConfig, ScenarioError> {
    if scenarios.is_empty() {
        return Err(ScenarioError::EmptyCatalog);
    }
    match requested {
        Some(name) => {
            let upper = name.to_uppercase();
            scenarios
                .iter()
                .find(|s| s.name.to_uppercase() == upper)
                .ok_or_else(|| ScenarioError::NotFound(name.to_string()))
        }
        None => Ok(&scenarios[0]),
    }
}

/// Runtime settings for a configured parachute.
pub fn chute_settings(config: &ChuteConfig) -> ChuteSettings {
    ChuteSettings {
        min_air_pressure_to_open: config.min_air_pressure_to_open,
        deploy_altitude: config.deploy_altitude,
        semi_deployment_speed: config.semi_deployment_speed,
        deployment_speed: config.deployment_speed,
        auto_cut_speed: config.auto_cut_speed,
        geometry: CanopyGeometry {
            pre_deployed_diameter: config.pre_deployed_diameter,
            deployed_diameter: config.deployed_diameter,
        },
        case_mass: config.case_mass,
    }
}

/// Build a stowed parachute from configuration, drawing its deployment delay from `rng`
/// unless the configuration pins one.
pub fn build_parachute<R: Rng + ?Sized>(config: &ChuteConfig, rng: &mut R) -> Parachute {
    let delay = match config.random_delay_s {
        Some(seconds) => RandomDelay::fixed(seconds),
        None => RandomDelay::sample(rng),
    };
    let chute = Parachute::new(chute_settings(config), delay);
    match config.spares {
        Some(count) => chute.with_spares(SpareCount::new(count)),
        None => chute,
    }
}
