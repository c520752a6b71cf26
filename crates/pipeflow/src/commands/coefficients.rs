//! Print or export the Fourier coefficients of the configured piston cycle.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use pipeflow::engine::snapshot::format_sci;
use pipeflow::forcing::{FourierForcing, PiecewiseProfile};
use pipeflow::types::Forcing;
use tracing::info;

use super::ConfigArgs;

/// Arguments for `pipeflow coefficients`.
#[derive(Args)]
pub struct CoefficientsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Write `n,a_n,b_n` rows to this CSV file instead of stdout
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Also print this many reconstructed samples over one period
    #[arg(long)]
    pub show_series: Option<usize>,
}

/// Execute the coefficients command.
pub fn execute(args: CoefficientsArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let profile = config
        .forcing
        .profile()
        .context("invalid forcing profile")?;
    let series = FourierForcing::from_profile(&profile, config.forcing.harmonics)
        .context("invalid harmonic count")?;

    match &args.export {
        Some(path) => {
            export_csv(path, &series)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                path = %path.display(),
                harmonics = series.harmonics(),
                "coefficients exported"
            );
        }
        None => {
            let mut out = std::io::stdout().lock();
            write_csv(&mut out, &series)?;
        }
    }

    if let Some(samples) = args.show_series {
        print_series(&profile, &series, samples);
    }
    Ok(())
}

fn export_csv(path: &Path, series: &FourierForcing) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_csv(&mut out, series)?;
    out.flush()?;
    Ok(())
}

/// Row 0 carries `a0` (the series mean is `a0 / 2`) and `b0 = 0`.
fn write_csv(out: &mut impl Write, series: &FourierForcing) -> std::io::Result<()> {
    writeln!(out, "n,a_n,b_n")?;
    writeln!(out, "0,{},{}", format_sci(series.a0(), 12), format_sci(0.0, 12))?;
    for (k, (a, b)) in series.coefficients().iter().enumerate() {
        writeln!(out, "{},{},{}", k + 1, format_sci(*a, 12), format_sci(*b, 12))?;
    }
    Ok(())
}

fn print_series(profile: &PiecewiseProfile, series: &FourierForcing, samples: usize) {
    let period = profile.period_len();
    println!("\n{:>12} {:>12} {:>12} {:>12}", "t", "target", "series", "error");
    for k in 0..samples {
        let t = k as f64 * period / samples as f64;
        let target = profile.acceleration(t);
        let value = series.acceleration(t);
        println!(
            "{t:>12.4} {target:>12.6} {value:>12.6} {:>12.3e}",
            (value - target).abs()
        );
    }
}
