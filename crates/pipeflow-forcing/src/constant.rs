//! Constant acceleration.

use pipeflow_core::Forcing;

/// A time-independent acceleration.
///
/// `ConstantForcing::zero()` is the unforced piston used by conservation
/// and end-to-end runs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConstantForcing {
    value: f64,
}

impl ConstantForcing {
    /// Forcing fixed at `value` (m/s²).
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    /// No forcing.
    pub fn zero() -> Self {
        Self::new(0.0)
    }

    /// The held acceleration.
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Forcing for ConstantForcing {
    fn name(&self) -> &str {
        "constant"
    }

    fn acceleration(&self, _t: f64) -> f64 {
        self.value
    }
}
