//! Progress ticker for a running simulation
//!
//! Purely cosmetic: results are recomputed by the evaluator whenever they
//! are shown, the ticker only decides when they become visible.

use serde::Serialize;

const STEP: u8 = 2;
const DONE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Ready,
    Running,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Ready => write!(f, "Ready"),
            Phase::Running => write!(f, "Running"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestRun {
    pub progress: u8,
    pub running: bool,
    pub complete: bool,
}

impl TestRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one step; returns true when this tick completed the run
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.progress = self.progress.saturating_add(STEP).min(DONE);
        if self.progress >= DONE {
            self.running = false;
            self.complete = true;
            return true;
        }
        false
    }

    /// Start or pause; a finished run restarts from zero
    pub fn toggle(&mut self) {
        if self.complete {
            self.progress = 0;
            self.complete = false;
            self.running = true;
        } else {
            self.running = !self.running;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase(&self) -> Phase {
        if self.complete {
            Phase::Complete
        } else if self.running {
            Phase::Running
        } else {
            Phase::Ready
        }
    }
}
