//! Persisted parachute state.

use serde::{Deserialize, Serialize};

use crate::spares::SpareCount;
use crate::state::DeploymentState;

/// Key/value record written at save and read at load.
///
/// Field names match the persisted keys so existing saves keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChuteRecord {
    pub min_air_pressure_to_open: f64,
    pub deploy_altitude: f64,
    pub pre_deployed_diameter: f64,
    pub deployed_diameter: f64,
    pub case_mass: f64,
    /// Elapsed drag timer in seconds.
    pub time: f64,
    pub armed: bool,
    pub staged: bool,
    pub initiated: bool,
    pub chute_count: SpareCount,
    pub dep_state: DeploymentState,
}

impl Default for ChuteRecord {
    fn default() -> Self {
        Self {
            min_air_pressure_to_open: 0.01,
            deploy_altitude: 700.0,
            pre_deployed_diameter: 1.0,
            deployed_diameter: 25.0,
            case_mass: 0.0,
            time: 0.0,
            armed: false,
            staged: false,
            initiated: false,
            chute_count: SpareCount::default(),
            dep_state: DeploymentState::Stowed,
        }
    }
}
