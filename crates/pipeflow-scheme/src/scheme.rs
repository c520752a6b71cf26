//! The [`Scheme`] trait.

use pipeflow_core::{GasProperties, GridState, SchemeError};
use pipeflow_space::Line1D;

use crate::context::StepContext;

/// A one-step integrator: committed state in, next state out.
///
/// # Contract
///
/// - `step()` MUST be deterministic: same inputs produce identical outputs.
/// - `step()` MUST NOT observe anything but `ctx`; schemes are stateless.
/// - A returned `Err` means nothing is committed.
///
/// # Object safety
///
/// This trait is object-safe; the driver stores its scheme as
/// `Box<dyn Scheme>`.
pub trait Scheme: Send + 'static {
    /// Human-readable name for error reporting and logs.
    fn name(&self) -> &str;

    /// Largest timestep the scheme expects to stay stable at.
    ///
    /// Advisory only: the driver logs a warning when the configured `dt`
    /// exceeds it. Return `None` to impose no limit.
    fn max_dt(&self, _space: &Line1D, _gas: &GasProperties) -> Option<f64> {
        None
    }

    /// Build the state one `dt` after `ctx.state()`.
    fn step(&self, ctx: &StepContext<'_>) -> Result<GridState, SchemeError>;
}
