//! Per-step timings and the end-of-run summary.
//!
//! [`StepMetrics`] captures wall-clock timing for a single step, broken
//! down by phase. [`RunSummary`] is returned once the run terminates.

use std::fmt;
use std::time::Duration;

use indexmap::IndexMap;

/// Phase name: the scheme builds the next state.
pub const PHASE_SCHEME: &str = "scheme";
/// Phase name: finite/positive-density validation of the new state.
pub const PHASE_CHECK: &str = "check";
/// Phase name: the new state replaces the committed one.
pub const PHASE_COMMIT: &str = "commit";
/// Phase name: snapshot hand-off and progress reporting.
pub const PHASE_OUTPUT: &str = "output";

/// Timing metrics collected during a single step.
///
/// All durations are in microseconds. Phases appear in execution order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Per-phase execution times, keyed by phase name.
    pub phases: IndexMap<&'static str, u64>,
}

impl StepMetrics {
    /// Record a phase duration.
    pub fn record(&mut self, phase: &'static str, elapsed: Duration) {
        self.phases.insert(phase, elapsed.as_micros() as u64);
    }

    /// Time spent in `phase`, if it ran.
    pub fn phase_us(&self, phase: &str) -> Option<u64> {
        self.phases.get(phase).copied()
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Steps executed.
    pub steps: u64,
    /// Simulation time at the end of the run.
    pub final_time: f64,
    /// Snapshot files written.
    pub snapshots_written: u64,
    /// Snapshots skipped after an I/O failure.
    pub snapshots_skipped: u64,
    /// Wall-clock duration of the run.
    pub wall_time: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} steps to t = {:.6} in {:.2?} ({} snapshots written, {} skipped)",
            self.steps,
            self.final_time,
            self.wall_time,
            self.snapshots_written,
            self.snapshots_skipped
        )
    }
}
