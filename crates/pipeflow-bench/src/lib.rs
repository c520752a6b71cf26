//! Benchmark profiles and utilities for the pipeflow solver.
//!
//! Provides pre-built [`RunConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: the 1000-cell reference pipe
//! - [`stress_profile`]: a 100K-cell pipe for stress testing
//! - [`pulse_density`]: a deterministic density field with a Gaussian bump

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use pipeflow_engine::{ForcingKind, RunConfig};

/// Build the reference benchmark profile: 1000 cells, dx=5e-3, dt=1e-5.
///
/// Fourier piston with 50 harmonics. Snapshots and progress lines are
/// off so the benchmark measures stepping only.
pub fn reference_profile(parallel: bool) -> RunConfig {
    let mut config = RunConfig {
        parallel,
        ..RunConfig::default()
    };
    config.grid.cells = 1000;
    config.forcing.kind = ForcingKind::Fourier;
    config.output.snapshots = false;
    config.output.print_every = 0;
    config
}

/// Build the stress benchmark profile: 100K cells.
///
/// Same setup as [`reference_profile`] on a pipe 100x longer, so the
/// stability limit is unchanged.
pub fn stress_profile(parallel: bool) -> RunConfig {
    let mut config = reference_profile(parallel);
    config.grid.cells = 100_000;
    config
}

/// Density samples of a pipe at rest density `rho0` with a 1% Gaussian
/// bump in the middle.
pub fn pulse_density(len: usize, dx: f64, rho0: f64) -> Vec<f64> {
    let centre = (len / 2) as f64 * dx;
    let width = 8.0 * dx;
    (0..len)
        .map(|i| {
            let x = (i as f64 * dx - centre) / width;
            rho0 * (1.0 + 0.01 * (-x * x).exp())
        })
        .collect()
}
