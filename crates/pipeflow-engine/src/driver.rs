//! The run driver: owns the committed state and the outer time loop.
//!
//! [`Driver`] moves through `Initialized → Stepping → Terminated`. Each
//! [`step()`](Driver::step) asks the scheme for a new state, validates it,
//! commits it wholesale, advances the clock, and then hands off to the
//! snapshot and progress collaborators. A failed step commits nothing;
//! the previous state stays observable through [`state()`](Driver::state).

use std::path::PathBuf;
use std::time::Instant;

use pipeflow_core::{Forcing, GasProperties, GridState, StepError, StepId};
use pipeflow_forcing::FourierForcing;
use pipeflow_scheme::{Scheme, StepContext, TaylorScheme};
use pipeflow_space::Line1D;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, RunConfig};
use crate::egress::{SnapshotSink, SnapshotStats};
use crate::metrics::{
    RunSummary, StepMetrics, PHASE_CHECK, PHASE_COMMIT, PHASE_OUTPUT, PHASE_SCHEME,
};
use crate::progress::Progress;
use crate::snapshot::{SnapshotCadence, SnapshotJob};

// Compile-time assertion: Driver can be moved to a worker thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Driver>();
    }
};

/// Lifecycle of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Built; no step has run.
    Initialized,
    /// At least one step committed, more to go.
    Stepping,
    /// The final step committed. Further steps fail.
    Terminated,
}

/// Snapshot output settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotSettings {
    /// Output directory.
    pub dir: PathBuf,
    /// Simulated seconds between snapshots.
    pub interval: f64,
    /// Maximum rows per file.
    pub samples: usize,
    /// Write on a background thread.
    pub background: bool,
}

struct SnapshotOutput {
    cadence: SnapshotCadence,
    samples: usize,
    sink: SnapshotSink,
}

// ── DriverBuilder ──────────────────────────────────────────────────

/// Builder for [`Driver`].
///
/// Required: the grid, the initial state, `dt` and the step count.
/// Defaults: default gas, the canonical Fourier piston, a parallel
/// [`TaylorScheme`], no snapshots, no progress lines.
pub struct DriverBuilder {
    space: Line1D,
    initial: GridState,
    gas: GasProperties,
    forcing: Option<Box<dyn Forcing>>,
    scheme: Option<Box<dyn Scheme>>,
    dt: Option<f64>,
    total_steps: Option<u64>,
    snapshots: Option<SnapshotSettings>,
    print_every: u64,
}

impl DriverBuilder {
    /// Set the gas constants.
    pub fn gas(mut self, gas: GasProperties) -> Self {
        self.gas = gas;
        self
    }

    /// Set the piston forcing.
    pub fn forcing(mut self, forcing: Box<dyn Forcing>) -> Self {
        self.forcing = Some(forcing);
        self
    }

    /// Set the integration scheme.
    pub fn scheme(mut self, scheme: Box<dyn Scheme>) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Set the timestep in seconds. Must be finite and > 0.
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }

    /// Set the number of steps to run.
    pub fn total_steps(mut self, steps: u64) -> Self {
        self.total_steps = Some(steps);
        self
    }

    /// Enable snapshot output.
    pub fn snapshots(mut self, settings: SnapshotSettings) -> Self {
        self.snapshots = Some(settings);
        self
    }

    /// Emit a progress line every `steps` steps; 0 disables.
    pub fn print_every(mut self, steps: u64) -> Self {
        self.print_every = steps;
        self
    }

    /// Build the driver.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `dt` or `total_steps` is not set
    /// - `dt` is not finite and > 0
    /// - the initial state length differs from the grid
    /// - snapshot settings have a non-positive interval or zero samples
    pub fn build(self) -> Result<Driver, String> {
        let dt = self.dt.ok_or_else(|| "dt is required".to_string())?;
        let total_steps = self
            .total_steps
            .ok_or_else(|| "total_steps is required".to_string())?;
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(format!("dt must be finite and > 0, got {dt}"));
        }
        if self.initial.len() != self.space.len() {
            return Err(format!(
                "initial state has {} cells, grid has {}",
                self.initial.len(),
                self.space.len()
            ));
        }
        let snapshots = match self.snapshots {
            Some(s) => {
                if !(s.interval > 0.0) || !s.interval.is_finite() {
                    return Err(format!(
                        "snapshot interval must be finite and > 0, got {}",
                        s.interval
                    ));
                }
                if s.samples == 0 {
                    return Err("snapshot samples must be at least 1".to_string());
                }
                let sink = if s.background {
                    SnapshotSink::background(s.dir)
                } else {
                    SnapshotSink::inline(s.dir)
                };
                Some(SnapshotOutput {
                    cadence: SnapshotCadence::new(s.interval, dt),
                    samples: s.samples,
                    sink,
                })
            }
            None => None,
        };

        let forcing = self
            .forcing
            .unwrap_or_else(|| Box::new(FourierForcing::reference()));
        let scheme = self
            .scheme
            .unwrap_or_else(|| Box::new(TaylorScheme::default()));
        if let Some(limit) = scheme.max_dt(&self.space, &self.gas) {
            if dt > limit {
                warn!(dt, limit, scheme = scheme.name(), "dt exceeds the scheme's stability limit");
            }
        }

        let lifecycle = if total_steps == 0 {
            DriverState::Terminated
        } else {
            DriverState::Initialized
        };

        Ok(Driver {
            space: self.space,
            gas: self.gas,
            forcing,
            scheme,
            state: self.initial,
            step_id: StepId::default(),
            dt,
            total_steps,
            lifecycle,
            snapshots,
            progress: Progress::new(self.print_every, total_steps),
            last_metrics: StepMetrics::default(),
        })
    }
}

// ── Driver ─────────────────────────────────────────────────────────

/// Owns one simulation run.
///
/// # Example
///
/// ```
/// use pipeflow_engine::{Driver, RunConfig};
///
/// let mut cfg = RunConfig::default();
/// cfg.grid.cells = 64;
/// cfg.time.total_time = 1e-3;
/// cfg.output.snapshots = false;
/// cfg.output.print_every = 0;
///
/// let mut driver = Driver::from_config(&cfg).unwrap();
/// let summary = driver.run().unwrap();
/// assert_eq!(summary.steps, 100);
/// assert_eq!(driver.state().velocity()[0], 0.0);
/// ```
pub struct Driver {
    space: Line1D,
    gas: GasProperties,
    forcing: Box<dyn Forcing>,
    scheme: Box<dyn Scheme>,
    state: GridState,
    step_id: StepId,
    dt: f64,
    total_steps: u64,
    lifecycle: DriverState,
    snapshots: Option<SnapshotOutput>,
    progress: Progress,
    last_metrics: StepMetrics,
}

impl Driver {
    /// Start building a driver for `initial` on `space`.
    pub fn builder(space: Line1D, initial: GridState) -> DriverBuilder {
        DriverBuilder {
            space,
            initial,
            gas: GasProperties::default(),
            forcing: None,
            scheme: None,
            dt: None,
            total_steps: None,
            snapshots: None,
            print_every: 0,
        }
    }

    /// Validate `config` and build the run it describes.
    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(?config, "building driver");

        let space = config.space()?;
        let out = &config.output;
        let mut builder = Self::builder(space, config.initial_state())
            .gas(config.gas.properties())
            .forcing(config.forcing.build()?)
            .scheme(Box::new(TaylorScheme::with_parallel(config.parallel)))
            .dt(config.time.dt)
            .total_steps(config.total_steps())
            .print_every(out.print_every);
        if out.snapshots {
            builder = builder.snapshots(SnapshotSettings {
                dir: out.dir.clone(),
                interval: out.snapshot_interval,
                samples: out.samples,
                background: out.background,
            });
        }
        builder
            .build()
            .map_err(|reason| ConfigError::InvalidDriver { reason })
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> DriverState {
        self.lifecycle
    }

    /// The committed grid state.
    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// Steps committed so far.
    pub fn step_id(&self) -> StepId {
        self.step_id
    }

    /// Current simulation time, `step_id · dt`.
    pub fn time(&self) -> f64 {
        self.step_id.time(self.dt)
    }

    /// Timestep in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Steps in the full run.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// The grid.
    pub fn space(&self) -> &Line1D {
        &self.space
    }

    /// Metrics from the most recent successful step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Execute one step.
    ///
    /// On success the new state is committed and the clock advanced. On
    /// failure nothing is committed.
    pub fn step(&mut self) -> Result<&StepMetrics, StepError> {
        if self.lifecycle == DriverState::Terminated {
            return Err(StepError::Terminated);
        }
        let start = Instant::now();
        let mut metrics = StepMetrics::default();

        let phase = Instant::now();
        let ctx = StepContext::new(
            &self.state,
            &self.space,
            &self.gas,
            self.forcing.as_ref(),
            self.step_id,
            self.dt,
        );
        let next = self.scheme.step(&ctx).map_err(|reason| StepError::SchemeFailed {
            name: self.scheme.name().to_string(),
            reason,
        })?;
        metrics.record(PHASE_SCHEME, phase.elapsed());

        let phase = Instant::now();
        next.check_physical()
            .map_err(|reason| StepError::SchemeFailed {
                name: self.scheme.name().to_string(),
                reason,
            })?;
        metrics.record(PHASE_CHECK, phase.elapsed());

        let phase = Instant::now();
        self.state = next;
        self.step_id = self.step_id.next();
        self.lifecycle = if self.step_id.0 >= self.total_steps {
            DriverState::Terminated
        } else {
            DriverState::Stepping
        };
        metrics.record(PHASE_COMMIT, phase.elapsed());

        let phase = Instant::now();
        self.emit_outputs();
        metrics.record(PHASE_OUTPUT, phase.elapsed());

        metrics.total_us = start.elapsed().as_micros() as u64;
        self.last_metrics = metrics;
        Ok(&self.last_metrics)
    }

    fn emit_outputs(&mut self) {
        let t = self.time();
        if let Some(out) = &mut self.snapshots {
            if out.cadence.poll(self.step_id) {
                let indices = self.space.sample_indices(out.samples);
                match SnapshotJob::capture(t, &self.state, indices) {
                    Ok(job) => out.sink.submit(job),
                    Err(e) => warn!(time = t, error = %e, "snapshot skipped"),
                }
            }
        }
        self.progress.observe(self.step_id, t, &self.state);
    }

    /// Step until the run terminates, then flush snapshot output.
    ///
    /// Returns the first fatal step error, if any; snapshots queued before
    /// the failure are still flushed.
    pub fn run(&mut self) -> Result<RunSummary, StepError> {
        info!(
            cells = self.space.len(),
            dx = self.space.dx(),
            dt = self.dt,
            steps = self.total_steps,
            forcing = self.forcing.name(),
            scheme = self.scheme.name(),
            "run started"
        );
        let started = Instant::now();
        self.progress.restart();
        let steps_before = self.step_id.0;

        let mut outcome = Ok(());
        while self.lifecycle != DriverState::Terminated {
            if let Err(e) = self.step() {
                outcome = Err(e);
                break;
            }
        }
        let stats = self.finish_snapshots();
        outcome?;

        let summary = RunSummary {
            steps: self.step_id.0 - steps_before,
            final_time: self.time(),
            snapshots_written: stats.written,
            snapshots_skipped: stats.skipped,
            wall_time: started.elapsed(),
        };
        info!(%summary, "run finished");
        Ok(summary)
    }

    fn finish_snapshots(&mut self) -> SnapshotStats {
        match self.snapshots.take() {
            Some(out) => out.sink.finish(),
            None => SnapshotStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeflow_core::{SchemeError, DENSITY};
    use pipeflow_forcing::ConstantForcing;
    use pipeflow_test_utils::{reference_state, ConstScheme, FailingScheme};

    fn small_space() -> Line1D {
        Line1D::new(32, 5e-3).unwrap()
    }

    fn driver_with(scheme: Box<dyn Scheme>, steps: u64) -> Driver {
        let space = small_space();
        let initial = reference_state(&space, &GasProperties::default());
        Driver::builder(space, initial)
            .forcing(Box::new(ConstantForcing::zero()))
            .scheme(scheme)
            .dt(1e-5)
            .total_steps(steps)
            .build()
            .unwrap()
    }

    #[test]
    fn lifecycle_runs_to_termination() {
        let mut d = driver_with(Box::new(ConstScheme::identity()), 3);
        assert_eq!(d.lifecycle(), DriverState::Initialized);
        d.step().unwrap();
        assert_eq!(d.lifecycle(), DriverState::Stepping);
        d.step().unwrap();
        d.step().unwrap();
        assert_eq!(d.lifecycle(), DriverState::Terminated);
        assert_eq!(d.step_id(), StepId(3));
        assert!(matches!(d.step(), Err(StepError::Terminated)));
    }

    #[test]
    fn time_is_step_times_dt() {
        let mut d = driver_with(Box::new(ConstScheme::identity()), 10);
        for _ in 0..7 {
            d.step().unwrap();
        }
        assert_eq!(d.time(), 7.0 * 1e-5);
    }

    #[test]
    fn metrics_record_every_phase() {
        let mut d = driver_with(Box::new(ConstScheme::identity()), 2);
        let m = d.step().unwrap().clone();
        let names: Vec<_> = m.phases.keys().copied().collect();
        assert_eq!(names, vec!["scheme", "check", "commit", "output"]);
        assert_eq!(d.last_metrics(), &m);
    }

    #[test]
    fn scheme_failure_commits_nothing() {
        let err = SchemeError::NonFinite {
            field: DENSITY,
            index: 4,
        };
        let mut d = driver_with(Box::new(FailingScheme::new(2, err.clone())), 10);
        d.step().unwrap();
        d.step().unwrap();
        let before = d.state().clone();
        let result = d.step();
        match result {
            Err(StepError::SchemeFailed { name, reason }) => {
                assert_eq!(name, "FailingScheme");
                assert_eq!(reason, err);
            }
            other => panic!("expected SchemeFailed, got {other:?}"),
        }
        assert_eq!(d.step_id(), StepId(2));
        assert_eq!(d.state(), &before);
        assert_eq!(d.lifecycle(), DriverState::Stepping);
    }

    #[test]
    fn non_positive_density_is_rejected_by_driver() {
        let space = small_space();
        let mut rho = vec![1.0; 32];
        rho[7] = -0.5;
        let bad = GridState::new(rho, vec![0.0; 32], vec![1.0; 32]).unwrap();
        let mut d = driver_with(Box::new(ConstScheme::returning(bad)), 5);
        let err = d.step().unwrap_err();
        assert_eq!(
            err,
            StepError::SchemeFailed {
                name: "ConstScheme".to_string(),
                reason: SchemeError::NonPositiveDensity {
                    index: 7,
                    value: -0.5
                },
            }
        );
        assert_eq!(d.step_id(), StepId(0));
        assert_eq!(d.state().len(), space.len());
    }

    #[test]
    fn run_stops_at_first_failure() {
        let err = SchemeError::AllocationFailed {
            field: DENSITY,
            len: 32,
        };
        let mut d = driver_with(Box::new(FailingScheme::new(4, err)), 10);
        let e = d.run().unwrap_err();
        assert!(e.is_allocation_failure());
        assert_eq!(d.step_id(), StepId(4));
    }

    #[test]
    fn zero_step_run_is_already_terminated() {
        let mut d = driver_with(Box::new(ConstScheme::identity()), 0);
        assert_eq!(d.lifecycle(), DriverState::Terminated);
        let summary = d.run().unwrap();
        assert_eq!(summary.steps, 0);
    }

    #[test]
    fn builder_requires_dt_and_steps() {
        let space = small_space();
        let initial = reference_state(&space, &GasProperties::default());
        let result = Driver::builder(space, initial.clone()).total_steps(1).build();
        assert!(result.err().unwrap().contains("dt"));
        let result = Driver::builder(space, initial).dt(1e-5).build();
        assert!(result.err().unwrap().contains("total_steps"));
    }

    #[test]
    fn builder_rejects_mismatched_initial_state() {
        let result = Driver::builder(small_space(), GridState::uniform(8, 1.0, 1.0))
            .dt(1e-5)
            .total_steps(1)
            .build();
        assert!(result.err().unwrap().contains("initial state"));
    }

    #[test]
    fn builder_rejects_bad_snapshot_settings() {
        let space = small_space();
        let initial = reference_state(&space, &GasProperties::default());
        let result = Driver::builder(space, initial)
            .dt(1e-5)
            .total_steps(1)
            .snapshots(SnapshotSettings {
                dir: PathBuf::from("unused"),
                interval: 0.0,
                samples: 10,
                background: false,
            })
            .build();
        assert!(result.err().unwrap().contains("interval"));
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let mut cfg = RunConfig::default();
        cfg.time.dt = -1.0;
        assert!(matches!(
            Driver::from_config(&cfg),
            Err(ConfigError::InvalidTimeStep { .. })
        ));
    }
}
