//! Core traits shared across the solver crates.

use crate::id::FieldId;

/// Read-only access to named field data.
///
/// Used by snapshot writers and tests to address fields by [`FieldId`]
/// without knowing the concrete state type.
pub trait FieldReader {
    /// Read a field's data. Returns `None` if the field is not present.
    fn read(&self, field: FieldId) -> Option<&[f64]>;
}

/// Piston forcing: the body acceleration imposed on the gas.
///
/// Implementations are pure functions of simulation time. The step
/// integrator evaluates them from many worker threads at once, hence the
/// `Send + Sync` bound.
pub trait Forcing: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Acceleration `a(t)` at simulation time `t >= 0`.
    fn acceleration(&self, t: f64) -> f64;

    /// Time derivative `ȧ(t)`.
    ///
    /// Piecewise-constant forcings return 0, which is exact everywhere
    /// except at the jumps.
    fn rate(&self, _t: f64) -> f64 {
        0.0
    }

    /// Repetition period, or `None` for aperiodic forcings.
    fn period(&self) -> Option<f64> {
        None
    }
}

impl<F: Forcing + ?Sized> Forcing for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn acceleration(&self, t: f64) -> f64 {
        (**self).acceleration(t)
    }

    fn rate(&self, t: f64) -> f64 {
        (**self).rate(t)
    }

    fn period(&self) -> Option<f64> {
        (**self).period()
    }
}
