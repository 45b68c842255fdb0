//! Observable parachute events for presentation layers.

use std::fmt;

use aero_core::environment::FlightConditions;

use crate::spares::SpareCount;
use crate::state::DeploymentState;

/// Why a staged parachute failed to deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Shielded,
    Grounded,
    Vacuum,
    TooHigh,
}

impl FailureReason {
    /// First matching reason wins: shielded, grounded, vacuum, then too high.
    pub fn diagnose(conditions: &FlightConditions) -> Self {
        if conditions.shielded {
            FailureReason::Shielded
        } else if conditions.ground_stop {
            FailureReason::Grounded
        } else if conditions.in_vacuum() {
            FailureReason::Vacuum
        } else {
            FailureReason::TooHigh
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FailureReason::Shielded => "parachute is shielded from airstream",
            FailureReason::Grounded => "stopped on the ground",
            FailureReason::Vacuum => "in space",
            FailureReason::TooHigh => "too high",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChuteEvent {
    Activated,
    Deactivated,
    Disarmed,
    /// Armed hold released; deployment logic runs from the next tick.
    Released,
    StateChanged {
        from: DeploymentState,
        to: DeploymentState,
    },
    DeployFailed {
        reason: FailureReason,
    },
    Repacked {
        spares_left: SpareCount,
    },
}
