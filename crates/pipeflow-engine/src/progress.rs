//! Console progress and ETA.

use std::time::{Duration, Instant};

use pipeflow_core::{GridState, StepId};
use tracing::info;

/// One progress observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressReport {
    /// Steps completed.
    pub step: u64,
    /// Steps in the run.
    pub total_steps: u64,
    /// Simulation time.
    pub time: f64,
    /// Completion, 0 to 100.
    pub percent: f64,
    /// Projected wall-clock time to finish, from throughput so far.
    pub eta: Duration,
}

/// Emits a progress line every `every` steps.
#[derive(Clone, Debug)]
pub struct Progress {
    every: u64,
    total_steps: u64,
    started: Instant,
}

impl Progress {
    /// Reporter for a run of `total_steps`, starting the clock now.
    ///
    /// `every == 0` disables reporting.
    pub fn new(every: u64, total_steps: u64) -> Self {
        Self {
            every,
            total_steps,
            started: Instant::now(),
        }
    }

    /// Restart the wall clock, e.g. when the run actually begins.
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    /// Report after `step` if it falls on the cadence.
    pub fn observe(&self, step: StepId, time: f64, state: &GridState) -> Option<ProgressReport> {
        if self.every == 0 || step.0 == 0 || step.0 % self.every != 0 {
            return None;
        }
        let report = self.report(step.0, time, self.started.elapsed());
        info!(
            t = format_args!("{:.6}", report.time),
            step = report.step,
            total = report.total_steps,
            percent = format_args!("{:.2}", report.percent),
            eta = format_args!("{:.1?}", report.eta),
            rho0 = state.density()[0],
            vel0 = state.velocity()[0],
            pres0 = state.pressure()[0],
            "progress"
        );
        Some(report)
    }

    /// Compute a report for `step` given the wall time spent so far.
    pub fn report(&self, step: u64, time: f64, elapsed: Duration) -> ProgressReport {
        let total = self.total_steps.max(1);
        let remaining = self.total_steps.saturating_sub(step);
        let eta = if step == 0 {
            Duration::ZERO
        } else {
            elapsed.mul_f64(remaining as f64 / step as f64)
        };
        ProgressReport {
            step,
            total_steps: self.total_steps,
            time,
            percent: 100.0 * step.min(total) as f64 / total as f64,
            eta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eta_scales_with_remaining_work() {
        let p = Progress::new(1000, 4000);
        let r = p.report(1000, 0.01, Duration::from_secs(2));
        assert_eq!(r.percent, 25.0);
        assert_eq!(r.eta, Duration::from_secs(6));
    }

    #[test]
    fn finished_run_has_zero_eta() {
        let p = Progress::new(10, 100);
        let r = p.report(100, 1.0, Duration::from_secs(5));
        assert_eq!(r.percent, 100.0);
        assert_eq!(r.eta, Duration::ZERO);
    }

    #[test]
    fn observe_follows_cadence() {
        let p = Progress::new(3, 10);
        let state = GridState::uniform(4, 1.0, 1.0);
        let hits: Vec<u64> = (0..=10)
            .filter(|&s| p.observe(StepId(s), 0.0, &state).is_some())
            .collect();
        assert_eq!(hits, vec![3, 6, 9]);
    }

    #[test]
    fn zero_cadence_disables_reports() {
        let p = Progress::new(0, 10);
        let state = GridState::uniform(4, 1.0, 1.0);
        assert!(p.observe(StepId(5), 0.0, &state).is_none());
    }
}
