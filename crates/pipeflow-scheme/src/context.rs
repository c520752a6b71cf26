//! Inputs handed to a scheme for one step.

use pipeflow_core::{Forcing, GasProperties, GridState, StepId};
use pipeflow_space::Line1D;

/// Read-only view of everything a [`Scheme`](crate::Scheme) needs to
/// build the next state.
///
/// The committed state is borrowed, never mutated; the scheme returns a
/// new [`GridState`].
pub struct StepContext<'a> {
    state: &'a GridState,
    space: &'a Line1D,
    gas: &'a GasProperties,
    forcing: &'a dyn Forcing,
    step_id: StepId,
    dt: f64,
}

impl<'a> StepContext<'a> {
    /// Construct a new step context.
    ///
    /// Typically called by the driver. Tests build one directly around a
    /// fixture state.
    pub fn new(
        state: &'a GridState,
        space: &'a Line1D,
        gas: &'a GasProperties,
        forcing: &'a dyn Forcing,
        step_id: StepId,
        dt: f64,
    ) -> Self {
        Self {
            state,
            space,
            gas,
            forcing,
            step_id,
            dt,
        }
    }

    /// The committed state at the start of the step.
    pub fn state(&self) -> &GridState {
        self.state
    }

    /// Grid geometry.
    pub fn space(&self) -> &Line1D {
        self.space
    }

    /// Gas constants.
    pub fn gas(&self) -> &GasProperties {
        self.gas
    }

    /// Piston forcing.
    pub fn forcing(&self) -> &dyn Forcing {
        self.forcing
    }

    /// Steps completed before this one.
    pub fn step_id(&self) -> StepId {
        self.step_id
    }

    /// Simulation time at the start of the step.
    pub fn time(&self) -> f64 {
        self.step_id.time(self.dt)
    }

    /// Configured timestep in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }
}
