//! Command-line interface for the pipeflow solver.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Piston-driven pipe flow solver
#[derive(Parser)]
#[command(name = "pipeflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "One-dimensional piston-driven gas flow solver", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation
    Run(commands::run::RunArgs),
    /// Validate a configuration and print the resolved setup
    Validate(commands::validate::ValidateArgs),
    /// Print or export the Fourier coefficients of the piston profile
    Coefficients(commands::coefficients::CoefficientsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Coefficients(args) => commands::coefficients::execute(args),
    }
}
