//! pipeflow: a one-dimensional solver for isothermal gas in a pipe driven
//! by a piston.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the pipeflow sub-crates. It also ships the `pipeflow` binary.
//!
//! # Quick start
//!
//! ```rust
//! use pipeflow::prelude::*;
//!
//! let gas = GasProperties::default();
//! let space = Line1D::new(64, 5e-3).unwrap();
//! let rho0 = gas.density_for_pressure(101_325.0);
//! let initial = GridState::uniform(space.len(), rho0, gas.pressure(rho0));
//!
//! let mut driver = Driver::builder(space, initial)
//!     .gas(gas)
//!     .forcing(Box::new(FourierForcing::reference()))
//!     .dt(1e-5)
//!     .total_steps(10)
//!     .build()
//!     .unwrap();
//! let summary = driver.run().unwrap();
//! assert_eq!(summary.steps, 10);
//! assert_eq!(driver.state().velocity()[0], 0.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `pipeflow-core` | IDs, grid state, gas properties, errors, core traits |
//! | [`space`] | `pipeflow-space` | The uniform 1D grid |
//! | [`forcing`] | `pipeflow-forcing` | Piston waveforms (piecewise, Fourier, constant) |
//! | [`scheme`] | `pipeflow-scheme` | Stencils, time derivatives, boundaries, Taylor scheme |
//! | [`engine`] | `pipeflow-engine` | Driver, configuration, snapshots, progress |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`pipeflow-core`).
///
/// Contains [`types::GridState`], [`types::GasProperties`], the error
/// enums, and the [`types::Forcing`] and [`types::FieldReader`] traits.
pub use pipeflow_core as types;

/// The uniform 1D grid (`pipeflow-space`).
pub use pipeflow_space as space;

/// Piston waveforms (`pipeflow-forcing`).
///
/// [`forcing::PiecewiseProfile`] is the stepwise cycle,
/// [`forcing::FourierForcing`] its smooth truncated series.
pub use pipeflow_forcing as forcing;

/// Numerical scheme (`pipeflow-scheme`).
///
/// The [`scheme::Scheme`] trait is the extension point for alternative
/// integrators; [`scheme::TaylorScheme`] is the built-in one.
pub use pipeflow_scheme as scheme;

/// Run driver and its collaborators (`pipeflow-engine`).
pub use pipeflow_engine as engine;

/// Common imports for typical pipeflow usage.
///
/// ```rust
/// use pipeflow::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use pipeflow_core::{
        FieldId, FieldReader, Forcing, GasProperties, GridState, StepId, DENSITY, PRESSURE,
        VELOCITY,
    };

    // Errors
    pub use pipeflow_core::{SchemeError, StepError};

    // Space
    pub use pipeflow_space::Line1D;

    // Forcing
    pub use pipeflow_forcing::{ConstantForcing, FourierForcing, PiecewiseProfile, Segment};

    // Scheme
    pub use pipeflow_scheme::{Scheme, StepContext, TaylorScheme};

    // Engine
    pub use pipeflow_engine::{
        Driver, DriverState, RunConfig, RunSummary, SnapshotSettings, StepMetrics,
    };
}
