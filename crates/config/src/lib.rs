//! Configuration models and loaders for parachute and intake scenarios.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parachute part configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChuteConfig {
    pub name: String,
    /// Minimum static pressure (atm) required to predeploy.
    #[serde(default = "default_min_pressure")]
    pub min_air_pressure_to_open: f64,
    /// Altitude above terrain (m) at which the canopy fully deploys.
    #[serde(default = "default_deploy_altitude")]
    pub deploy_altitude: f64,
    #[serde(default = "default_semi_deployment_speed")]
    pub semi_deployment_speed: f64,
    #[serde(default = "default_deployment_speed")]
    pub deployment_speed: f64,
    #[serde(default = "default_auto_cut_speed")]
    pub auto_cut_speed: f64,
    #[serde(default = "default_pre_deployed_diameter")]
    pub pre_deployed_diameter: f64,
    #[serde(default = "default_deployed_diameter")]
    pub deployed_diameter: f64,
    #[serde(default)]
    pub case_mass: f64,
    /// Spare canopies; -1 for unlimited. Defaults to the stock five.
    #[serde(default)]
    pub spares: Option<i32>,
    /// Fixed deployment delay (s) instead of a random one.
    #[serde(default)]
    pub random_delay_s: Option<f64>,
}

/// Intake module on a part.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IntakeConfig {
    pub area_m2: f64,
    #[serde(default)]
    pub aoa_threshold: f64,
    #[serde(default = "default_intake_transform")]
    pub transform: String,
    /// Outward facing of the intake mouth in the flight frame.
    #[serde(default = "default_forward")]
    pub forward: [f64; 3],
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Engine module on a part.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EngineConfig {
    pub propellants: Vec<String>,
    #[serde(default)]
    pub throttle: f64,
}

/// A vessel part carrying intake and/or engine modules.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PartConfig {
    pub name: String,
    /// Exposed to the airstream (false when covered by another part).
    #[serde(default = "default_true")]
    pub exposed: bool,
    #[serde(default)]
    pub intake: Option<IntakeConfig>,
    #[serde(default)]
    pub engines: Vec<EngineConfig>,
    /// Time at which the part leaves the vessel (decoupled or destroyed).
    #[serde(default)]
    pub detach_s: Option<f64>,
}

/// Flight state at a point in time; samples between keyframes are interpolated.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FlightKeyframe {
    pub time_s: f64,
    pub mach: f64,
    pub true_altitude_m: f64,
    pub static_pressure_atm: f64,
    pub density_kg_m3: f64,
    /// Vessel velocity; z is vertical.
    pub velocity_m_s: [f64; 3],
    #[serde(default)]
    pub landed: bool,
    #[serde(default)]
    pub shielded: bool,
    /// Throttle applied to every engine from this keyframe on.
    #[serde(default)]
    pub throttle: Option<f64>,
}

/// Command issued to every parachute at a given time.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Activate,
    Deactivate,
    Disarm,
    Cut,
    Repack,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommandConfig {
    pub time_s: f64,
    pub command: CommandKind,
    /// Whether the crew issuing a repack is allowed to.
    #[serde(default = "default_true")]
    pub authorized: bool,
}

/// Full replay scenario.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub name: String,
    #[serde(default = "default_time_step")]
    pub time_step_s: f64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub chutes: Vec<ChuteConfig>,
    #[serde(default)]
    pub parts: Vec<PartConfig>,
    pub keyframes: Vec<FlightKeyframe>,
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
}

/// Upper bound on the fixed steps a single replay may take.
pub const MAX_REPLAY_STEPS: usize = 1_000_000;

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid scenario `{scenario}`: {reason}")]
    Invalid { scenario: String, reason: String },
}

impl ChuteConfig {
    fn validate(&self) -> Result<(), String> {
        if self.pre_deployed_diameter <= 0.0 || self.deployed_diameter <= 0.0 {
            return Err(format!("chute `{}` needs positive diameters", self.name));
        }
        if self.semi_deployment_speed <= 0.0 || self.deployment_speed <= 0.0 {
            return Err(format!(
                "chute `{}` needs positive deployment speeds",
                self.name
            ));
        }
        if self.min_air_pressure_to_open < 0.0 {
            return Err(format!("chute `{}` has a negative minimum pressure", self.name));
        }
        Ok(())
    }
}

impl ScenarioConfig {
    /// Reject configurations the replay cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check().map_err(|reason| ConfigError::Invalid {
            scenario: self.name.clone(),
            reason,
        })
    }

    fn check(&self) -> Result<(), String> {
        if self.keyframes.is_empty() {
            return Err("at least one keyframe is required".to_string());
        }
        if self
            .keyframes
            .windows(2)
            .any(|pair| pair[1].time_s < pair[0].time_s)
        {
            return Err("keyframes must be sorted by time".to_string());
        }
        self.count_steps()?;
        for chute in &self.chutes {
            chute.validate()?;
        }
        for part in &self.parts {
            if let Some(intake) = &part.intake {
                if intake.area_m2 < 0.0 {
                    return Err(format!("intake on `{}` has negative area", part.name));
                }
            }
        }
        Ok(())
    }

    /// Time of the first keyframe.
    pub fn start_s(&self) -> f64 {
        self.keyframes.first().map(|k| k.time_s).unwrap_or_default()
    }

    /// Time of the last keyframe.
    pub fn duration_s(&self) -> f64 {
        self.keyframes.last().map(|k| k.time_s).unwrap_or_default()
    }

    /// Number of fixed steps after the first keyframe, bounded by [`MAX_REPLAY_STEPS`].
    pub fn step_count(&self) -> Result<usize, ConfigError> {
        self.count_steps().map_err(|reason| ConfigError::Invalid {
            scenario: self.name.clone(),
            reason,
        })
    }

    fn count_steps(&self) -> Result<usize, String> {
        let dt = self.time_step_s;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(format!("time step must be positive and finite, got {dt}"));
        }
        let steps = ((self.duration_s() - self.start_s()) / dt).floor().max(0.0);
        if !steps.is_finite() || steps > MAX_REPLAY_STEPS as f64 {
            return Err(format!(
                "time step {dt} s needs more than {MAX_REPLAY_STEPS} steps"
            ));
        }
        Ok(steps as usize)
    }
}

/// Load scenarios from a YAML list, a single TOML file or a directory of TOML files.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioConfig>, ConfigError> {
    let scenarios: Vec<ScenarioConfig> = load_records(path)?;
    for scenario in &scenarios {
        scenario.validate()?;
    }
    Ok(scenarios)
}

/// Load parachute configurations from a YAML file or TOML sources.
pub fn load_chute_configs<P: AsRef<Path>>(path: P) -> Result<Vec<ChuteConfig>, ConfigError> {
    load_records(path)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

fn default_min_pressure() -> f64 {
    0.01
}

fn default_deploy_altitude() -> f64 {
    700.0
}

fn default_semi_deployment_speed() -> f64 {
    0.5
}

fn default_deployment_speed() -> f64 {
    0.16667
}

fn default_auto_cut_speed() -> f64 {
    0.5
}

fn default_pre_deployed_diameter() -> f64 {
    1.0
}

fn default_deployed_diameter() -> f64 {
    25.0
}

fn default_intake_transform() -> String {
    "Intake".to_string()
}

fn default_forward() -> [f64; 3] {
    [1.0, 0.0, 0.0]
}

fn default_true() -> bool {
    true
}

fn default_time_step() -> f64 {
    0.02
}
