//! Deployment states and their persisted tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a parachute is in its deployment sequence.
///
/// `None` only exists between loading a record and resolving it; a running parachute is
/// never in that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeploymentState {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "STOWED")]
    Stowed,
    #[serde(rename = "PREDEPLOYED")]
    Predeployed,
    #[serde(rename = "DEPLOYED")]
    Deployed,
    #[serde(rename = "CUT")]
    Cut,
}

impl DeploymentState {
    /// Bidirectional tag table. Every variant appears exactly once.
    pub const TAGS: [(DeploymentState, &'static str); 5] = [
        (DeploymentState::None, ""),
        (DeploymentState::Stowed, "STOWED"),
        (DeploymentState::Predeployed, "PREDEPLOYED"),
        (DeploymentState::Deployed, "DEPLOYED"),
        (DeploymentState::Cut, "CUT"),
    ];

    /// State a freshly built or unresolved parachute settles into.
    pub const DEFAULT_TAG: &'static str = "STOWED";

    pub const fn tag(self) -> &'static str {
        match self {
            DeploymentState::None => "",
            DeploymentState::Stowed => "STOWED",
            DeploymentState::Predeployed => "PREDEPLOYED",
            DeploymentState::Deployed => "DEPLOYED",
            DeploymentState::Cut => "CUT",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::TAGS
            .iter()
            .find(|(_, name)| *name == tag)
            .map(|(state, _)| *state)
    }

    /// Canopy is out and producing drag.
    pub fn is_active(self) -> bool {
        matches!(self, DeploymentState::Predeployed | DeploymentState::Deployed)
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentState::None => f.write_str("NONE"),
            other => f.write_str(other.tag()),
        }
    }
}

/// Error for tags outside the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown deployment state tag `{0}`")]
pub struct UnknownStateTag(pub String);

impl FromStr for DeploymentState {
    type Err = UnknownStateTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| UnknownStateTag(s.to_string()))
    }
}
