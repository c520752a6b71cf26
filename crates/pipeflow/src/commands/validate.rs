//! Validate a configuration and print the resolved setup.

use anyhow::{Context, Result};
use clap::Args;
use pipeflow::engine::{ForcingKind, RunConfig};
use pipeflow::scheme::{Scheme, TaylorScheme};
use tracing::{info, warn};

use super::ConfigArgs;

/// Arguments for `pipeflow validate`.
#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Also print the resolved configuration as TOML
    #[arg(long)]
    pub print_toml: bool,
}

/// Execute the validate command.
pub fn execute(args: ValidateArgs) -> Result<()> {
    let config = args.config.resolve()?;
    config.validate().context("invalid configuration")?;
    info!("configuration is valid");

    describe(&config)?;
    if args.print_toml {
        let text = config
            .to_toml_string()
            .context("serializing configuration")?;
        println!("\n{text}");
    }
    Ok(())
}

fn describe(config: &RunConfig) -> Result<()> {
    let space = config.space()?;
    let gas = config.gas.properties();
    let initial = config.initial_state();
    let forcing = config.forcing.build()?;

    println!("grid:     {} cells, dx = {:e} m, length = {} m", space.len(), space.dx(), space.length());
    println!(
        "gas:      K = {:.3} m²/s², rho0 = {:.6} kg/m³, p0 = {} Pa",
        gas.k(),
        initial.density()[0],
        config.initial.pressure
    );
    println!(
        "time:     dt = {:e} s, total = {} s, {} steps",
        config.time.dt,
        config.time.total_time,
        config.total_steps()
    );
    match config.forcing.kind {
        ForcingKind::Fourier => println!(
            "forcing:  {} ({} harmonics, period {} s)",
            forcing.name(),
            config.forcing.harmonics,
            config.forcing.period
        ),
        ForcingKind::Piecewise => println!(
            "forcing:  {} ({} segments, period {} s)",
            forcing.name(),
            config.forcing.segments.len(),
            config.forcing.period
        ),
        ForcingKind::Constant => {
            println!("forcing:  {} (a = {})", forcing.name(), config.forcing.value)
        }
    }
    println!(
        "loop:     {}",
        if config.parallel { "parallel" } else { "sequential" }
    );

    let out = &config.output;
    if out.snapshots {
        let expected = (config.time.total_time / out.snapshot_interval).floor() as u64;
        println!(
            "output:   ~{expected} snapshots every {} s into {} ({} rows max, {})",
            out.snapshot_interval,
            out.dir.display(),
            out.samples,
            if out.background { "background" } else { "inline" }
        );
    } else {
        println!("output:   snapshots disabled");
    }

    let scheme = TaylorScheme::with_parallel(config.parallel);
    if let Some(limit) = scheme.max_dt(&space, &gas) {
        println!("limit:    dt <= {limit:e} s (acoustic)");
        if config.time.dt > limit {
            warn!(dt = config.time.dt, limit, "dt exceeds the acoustic stability limit");
        }
    }
    Ok(())
}
