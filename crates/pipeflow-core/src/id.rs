//! Strongly-typed identifiers.

use std::fmt;

/// Identifies one of the three grid fields.
///
/// The solver has a fixed field layout; see [`DENSITY`](crate::DENSITY),
/// [`VELOCITY`](crate::VELOCITY) and [`PRESSURE`](crate::PRESSURE).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl FieldId {
    /// Short column name used in logs and snapshot headers.
    pub fn name(self) -> &'static str {
        match self.0 {
            0 => "rho",
            1 => "vel",
            2 => "pres",
            _ => "unknown",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<u32> for FieldId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing step counter.
///
/// Incremented each time the simulation advances one time step.
/// `StepId(0)` is the initial state before any step has run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl StepId {
    /// The step that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Simulation time reached after this many steps of size `dt`.
    ///
    /// Computed by multiplication rather than accumulation so that the
    /// clock does not drift over millions of steps.
    pub fn time(self, dt: f64) -> f64 {
        self.0 as f64 * dt
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
