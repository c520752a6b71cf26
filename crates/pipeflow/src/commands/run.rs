//! Run the simulation.

use anyhow::{Context, Result};
use clap::Args;
use pipeflow::engine::Driver;
use tracing::{info, warn};

use super::ConfigArgs;

/// Arguments for `pipeflow run`.
#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Steps between progress lines (0 disables)
    #[arg(long)]
    pub print_every: Option<u64>,
}

/// Execute the run command.
pub fn execute(args: RunArgs) -> Result<()> {
    let mut config = args.config.resolve()?;
    if let Some(every) = args.print_every {
        config.output.print_every = every;
    }

    let mut driver = Driver::from_config(&config).context("invalid configuration")?;
    if config.output.snapshots {
        info!(
            dir = %config.output.dir.display(),
            interval = config.output.snapshot_interval,
            "writing snapshots"
        );
    }

    let summary = driver
        .run()
        .with_context(|| format!("simulation failed at t={:.6}", driver.time()))?;

    info!(
        steps = summary.steps,
        wall_s = summary.wall_time.as_secs_f64(),
        "rho0={:.6e} vel0={:.6e} pres0={:.6e}",
        driver.state().density()[0],
        driver.state().velocity()[0],
        driver.state().pressure()[0],
    );
    if summary.snapshots_skipped > 0 {
        warn!(
            skipped = summary.snapshots_skipped,
            written = summary.snapshots_written,
            "some snapshots could not be written"
        );
    }
    Ok(())
}
