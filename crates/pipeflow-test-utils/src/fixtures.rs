//! Scripted schemes and analytic forcings for tests.
//!
//! - [`ConstScheme`]: returns its input unchanged, or a fixed state.
//! - [`FailingScheme`]: fails deterministically after N calls.
//! - [`SineForcing`]: smooth forcing with an exact rate.
//! - [`CountingForcing`]: constant forcing that counts its evaluations.

use std::sync::atomic::{AtomicUsize, Ordering};

use pipeflow_core::{Forcing, GridState, SchemeError};
use pipeflow_scheme::{Scheme, StepContext};

/// A scheme that does no physics.
///
/// `ConstScheme::identity()` hands back the committed state, which keeps
/// engine tests independent of the numerics. `ConstScheme::returning`
/// always produces the given state, e.g. one with a negative density.
pub struct ConstScheme {
    output: Option<GridState>,
    call_count: AtomicUsize,
}

impl ConstScheme {
    pub fn identity() -> Self {
        Self {
            output: None,
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn returning(state: GridState) -> Self {
        Self {
            output: Some(state),
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `step()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Scheme for ConstScheme {
    fn name(&self) -> &str {
        "ConstScheme"
    }

    fn step(&self, ctx: &StepContext<'_>) -> Result<GridState, SchemeError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.output.clone().unwrap_or_else(|| ctx.state().clone()))
    }
}

/// A scheme that succeeds `succeed_count` times, then returns `error`.
///
/// Successful calls return the committed state unchanged.
pub struct FailingScheme {
    pub succeed_count: usize,
    pub error: SchemeError,
    call_count: AtomicUsize,
}

impl FailingScheme {
    /// Create a scheme that succeeds `succeed_count` times then fails.
    pub fn new(succeed_count: usize, error: SchemeError) -> Self {
        Self {
            succeed_count,
            error,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `step()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Scheme for FailingScheme {
    fn name(&self) -> &str {
        "FailingScheme"
    }

    fn step(&self, ctx: &StepContext<'_>) -> Result<GridState, SchemeError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(self.error.clone());
        }
        Ok(ctx.state().clone())
    }
}

/// `a(t) = amplitude · sin(omega · t)`, with `ȧ` supplied exactly.
#[derive(Clone, Copy, Debug)]
pub struct SineForcing {
    pub amplitude: f64,
    pub omega: f64,
}

impl SineForcing {
    pub fn new(amplitude: f64, omega: f64) -> Self {
        Self { amplitude, omega }
    }
}

impl Forcing for SineForcing {
    fn name(&self) -> &str {
        "sine"
    }

    fn acceleration(&self, t: f64) -> f64 {
        self.amplitude * (self.omega * t).sin()
    }

    fn rate(&self, t: f64) -> f64 {
        self.amplitude * self.omega * (self.omega * t).cos()
    }

    fn period(&self) -> Option<f64> {
        Some(std::f64::consts::TAU / self.omega)
    }
}

/// Constant forcing that counts calls to `acceleration` and `rate`.
pub struct CountingForcing {
    pub value: f64,
    call_count: AtomicUsize,
}

impl CountingForcing {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Total evaluations of `acceleration` and `rate` so far.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Forcing for CountingForcing {
    fn name(&self) -> &str {
        "counting"
    }

    fn acceleration(&self, _t: f64) -> f64 {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.value
    }

    fn rate(&self, _t: f64) -> f64 {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeflow_core::{GasProperties, StepId, DENSITY};
    use pipeflow_space::Line1D;

    fn alloc_error() -> SchemeError {
        SchemeError::AllocationFailed {
            field: DENSITY,
            len: 8,
        }
    }

    #[test]
    fn const_scheme_counts_steps() {
        let space = Line1D::new(8, 0.1).unwrap();
        let gas = GasProperties::default();
        let state = GridState::uniform(8, 1.2, 1e5);
        let forcing = CountingForcing::new(0.0);
        let ctx = StepContext::new(&state, &space, &gas, &forcing, StepId(0), 1e-3);

        let identity = ConstScheme::identity();
        assert_eq!(identity.calls(), 0);
        assert_eq!(identity.step(&ctx).unwrap(), state);
        assert_eq!(identity.step(&ctx).unwrap(), state);
        assert_eq!(identity.calls(), 2);

        let bad = GridState::uniform(8, -1.0, 1e5);
        let fixed = ConstScheme::returning(bad.clone());
        assert_eq!(fixed.step(&ctx).unwrap(), bad);
        assert_eq!(fixed.calls(), 1);
        assert_eq!(forcing.calls(), 0);
    }

    #[test]
    fn failing_scheme_fails_after_budget() {
        let space = Line1D::new(8, 0.1).unwrap();
        let gas = GasProperties::default();
        let state = GridState::uniform(8, 1.2, 1e5);
        let forcing = SineForcing::new(1.0, 2.0);
        let ctx = StepContext::new(&state, &space, &gas, &forcing, StepId(0), 1e-3);

        let scheme = FailingScheme::new(2, alloc_error());
        assert!(scheme.step(&ctx).is_ok());
        assert!(scheme.step(&ctx).is_ok());
        assert_eq!(scheme.step(&ctx).unwrap_err(), alloc_error());
        assert_eq!(scheme.step(&ctx).unwrap_err(), alloc_error());
        assert_eq!(scheme.calls(), 4);
    }

    #[test]
    fn counting_forcing_counts_both_evaluations() {
        let forcing = CountingForcing::new(3.0);
        assert_eq!(forcing.acceleration(0.5), 3.0);
        assert_eq!(forcing.rate(0.5), 0.0);
        assert_eq!(forcing.calls(), 2);
    }
}
