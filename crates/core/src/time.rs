//! Simulation-time stopwatches.
//!
//! Watches never read a wall clock. The owner advances every running watch by the
//! physics step once per tick, which keeps timer-driven behaviour deterministic.

/// Elapsed-time counter driven by explicit simulation steps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stopwatch {
    elapsed_s: f64,
    running: bool,
}

impl Stopwatch {
    /// A stopped watch at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A running watch resumed from a previously recorded elapsed time.
    pub fn resumed(elapsed_s: f64) -> Self {
        Self {
            elapsed_s: elapsed_s.max(0.0),
            running: true,
        }
    }

    /// Start counting from the current elapsed value. No-op if already running.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop and zero the watch.
    pub fn reset(&mut self) {
        self.elapsed_s = 0.0;
        self.running = false;
    }

    /// Zero the watch and keep it running.
    pub fn restart(&mut self) {
        self.elapsed_s = 0.0;
        self.running = true;
    }

    /// Advance by one simulation step. Stopped watches and negative steps are ignored.
    pub fn advance(&mut self, dt_s: f64) {
        if self.running && dt_s > 0.0 {
            self.elapsed_s += dt_s;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Elapsed simulation seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed_s
    }
}
