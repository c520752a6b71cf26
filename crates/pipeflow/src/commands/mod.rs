//! Subcommands and the configuration flags they share.

pub mod coefficients;
pub mod run;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use pipeflow::engine::{ForcingKind, RunConfig};
use tracing::debug;

/// Piston waveform selectable from the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ForcingArg {
    /// Truncated Fourier series of the cycle
    Fourier,
    /// The stepwise cycle itself
    Piecewise,
    /// Constant acceleration (`[forcing] value`)
    Constant,
}

impl From<ForcingArg> for ForcingKind {
    fn from(arg: ForcingArg) -> Self {
        match arg {
            ForcingArg::Fourier => ForcingKind::Fourier,
            ForcingArg::Piecewise => ForcingKind::Piecewise,
            ForcingArg::Constant => ForcingKind::Constant,
        }
    }
}

/// Config file plus the flags that override it.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// TOML configuration file; defaults give the reference setup
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Snapshot output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Simulated time to run [s]
    #[arg(short = 't', long)]
    pub total_time: Option<f64>,

    /// Time step [s]
    #[arg(long)]
    pub dt: Option<f64>,

    /// Piston waveform
    #[arg(long, value_enum)]
    pub forcing: Option<ForcingArg>,

    /// Fourier harmonics
    #[arg(long)]
    pub harmonics: Option<usize>,

    /// Update interior cells on one thread
    #[arg(long)]
    pub sequential: bool,

    /// Do not write CSV snapshots
    #[arg(long)]
    pub no_snapshots: bool,
}

impl ConfigArgs {
    /// Load the config file (if any) and apply the overrides.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RunConfig::default(),
        };
        self.apply(&mut config);
        debug!(?config, "resolved configuration");
        Ok(config)
    }

    fn apply(&self, config: &mut RunConfig) {
        if let Some(dir) = &self.output {
            config.output.dir = dir.clone();
        }
        if let Some(t) = self.total_time {
            config.time.total_time = t;
        }
        if let Some(dt) = self.dt {
            config.time.dt = dt;
        }
        if let Some(kind) = self.forcing {
            config.forcing.kind = kind.into();
        }
        if let Some(h) = self.harmonics {
            config.forcing.harmonics = h;
        }
        if self.sequential {
            config.parallel = false;
        }
        if self.no_snapshots {
            config.output.snapshots = false;
        }
    }
}
