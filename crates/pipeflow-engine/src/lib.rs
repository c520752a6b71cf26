//! Run orchestration for pipeflow.
//!
//! - [`RunConfig`]: TOML-backed configuration with defaults and validation
//! - [`Driver`]: owns the committed state and runs the fixed-length time
//!   loop through a [`Scheme`](pipeflow_scheme::Scheme)
//! - [`snapshot`]: threshold cadence and the CSV snapshot format
//! - [`SnapshotSink`]: inline or background snapshot writing
//! - [`Progress`]: periodic progress lines with a wall-clock ETA
//! - [`StepMetrics`] and [`RunSummary`]: per-step timings and run totals

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod egress;
pub mod metrics;
pub mod progress;
pub mod snapshot;

pub use config::{
    ConfigError, ForcingConfig, ForcingKind, GasConfig, GridConfig, InitialConfig, OutputConfig,
    RunConfig, TimeConfig,
};
pub use driver::{Driver, DriverBuilder, DriverState, SnapshotSettings};
pub use egress::{SnapshotSink, SnapshotStats};
pub use metrics::{RunSummary, StepMetrics};
pub use progress::{Progress, ProgressReport};
pub use snapshot::{SnapshotCadence, SnapshotError, SnapshotJob};
