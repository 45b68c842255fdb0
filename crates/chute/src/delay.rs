//! Randomised deployment delay.

use aero_core::time::Stopwatch;
use rand::Rng;

/// Per-instance delay before a stowed canopy may predeploy.
///
/// Symmetric parachutes on one vessel each draw their own threshold, so they do not all
/// open on the same tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomDelay {
    threshold_s: f64,
    watch: Stopwatch,
}

impl RandomDelay {
    /// Draw a threshold in `[0, 1)` seconds.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::fixed(rng.random::<f64>())
    }

    pub fn fixed(threshold_s: f64) -> Self {
        Self {
            threshold_s: threshold_s.max(0.0),
            watch: Stopwatch::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold_s
    }

    pub fn advance(&mut self, dt_s: f64) {
        self.watch.advance(dt_s);
    }

    /// Starts the watch on first call; reports true once the threshold is reached, then resets.
    pub fn elapsed(&mut self) -> bool {
        if !self.watch.is_running() {
            self.watch.start();
        }
        if self.watch.elapsed() >= self.threshold_s {
            self.watch.reset();
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.watch.reset();
    }
}
