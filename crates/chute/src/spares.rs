//! Spare canopy bookkeeping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of spare canopies left for repacking; `-1` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpareCount(i32);

impl SpareCount {
    pub const UNLIMITED: SpareCount = SpareCount(-1);
    /// Spares a parachute starts with on its first initialisation.
    pub const MAX_SPARES: i32 = 5;

    /// Any negative count is treated as unlimited.
    pub fn new(count: i32) -> Self {
        if count < 0 { Self::UNLIMITED } else { SpareCount(count) }
    }

    pub fn is_unlimited(self) -> bool {
        self.0 < 0
    }

    pub fn is_available(self) -> bool {
        self.is_unlimited() || self.0 > 0
    }

    /// Use up one spare. Returns false (and leaves the count alone) when none are left.
    pub fn consume(&mut self) -> bool {
        if self.is_unlimited() {
            return true;
        }
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        true
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl Default for SpareCount {
    fn default() -> Self {
        SpareCount(Self::MAX_SPARES)
    }
}

impl fmt::Display for SpareCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unlimited() {
            f.write_str("unlimited")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
