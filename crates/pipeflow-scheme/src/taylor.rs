//! Second-order Taylor integrator.
//!
//! Each step builds three fresh buffers from the committed state:
//!
//! ```text
//! interior:  f_new = f + dt·f_t + (dt²/2)·f_tt     (ρ and v)
//! index 0:   closed wall, v = 0
//! index N-1: piston face, forward Euler
//! pressure:  p_new = (R/μ)·ρ_old·T0
//! ```
//!
//! Interior cells only read the committed state, so they are computed
//! data-parallel with rayon when enabled. Both paths evaluate the same
//! expression per cell and produce bit-identical results.

use pipeflow_core::{
    try_alloc_field, GasProperties, GridState, SchemeError, DENSITY, PRESSURE, VELOCITY,
};
use pipeflow_space::Line1D;
use rayon::prelude::*;

use crate::boundary::{closed_wall, piston_face};
use crate::context::StepContext;
use crate::derivatives::{ForcingSample, TimeDerivatives};
use crate::scheme::Scheme;
use crate::stencil::Differentiator;

/// Explicit second-order Taylor scheme for the piston-driven pipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaylorScheme {
    parallel: bool,
}

impl TaylorScheme {
    /// Scheme evaluating the interior on the rayon thread pool.
    pub fn parallel() -> Self {
        Self { parallel: true }
    }

    /// Scheme evaluating the interior on the calling thread.
    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    /// Scheme with the given interior strategy.
    pub fn with_parallel(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Whether the interior runs on the rayon pool.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }
}

impl Default for TaylorScheme {
    fn default() -> Self {
        Self::parallel()
    }
}

impl Scheme for TaylorScheme {
    fn name(&self) -> &str {
        "TaylorScheme"
    }

    fn max_dt(&self, space: &Line1D, gas: &GasProperties) -> Option<f64> {
        // Acoustic CFL with the isothermal sound speed sqrt(K).
        Some(space.dx() / gas.k().sqrt())
    }

    fn step(&self, ctx: &StepContext<'_>) -> Result<GridState, SchemeError> {
        let state = ctx.state();
        let n = ctx.space().len();
        if state.len() != n {
            return Err(SchemeError::LengthMismatch {
                field: DENSITY,
                expected: n,
                actual: state.len(),
            });
        }

        let (rho, vel, pres) = (state.density(), state.velocity(), state.pressure());
        let dx = ctx.space().dx();
        let dt = ctx.dt();
        let t = ctx.time();
        let gas = ctx.gas();
        let forcing = ForcingSample::at(ctx.forcing(), t);

        let mut new_vel = try_alloc_field(VELOCITY, n)?;
        let mut new_rho = try_alloc_field(DENSITY, n)?;
        let mut new_pres = try_alloc_field(PRESSURE, n)?;

        let engine = TimeDerivatives::new(
            rho,
            vel,
            Differentiator::new(dx),
            gas.k(),
            ctx.forcing(),
        );

        let interior = ctx.space().interior();
        let first = interior.start;
        let rho_in = &mut new_rho[interior.clone()];
        let vel_in = &mut new_vel[interior];
        let update = |k: usize, (r, v): (&mut f64, &mut f64)| {
            (*r, *v) = engine.taylor(first + k, forcing, dt);
        };
        if self.parallel {
            rho_in
                .par_iter_mut()
                .zip(vel_in.par_iter_mut())
                .enumerate()
                .for_each(|(k, cell)| update(k, cell));
        } else {
            rho_in
                .iter_mut()
                .zip(vel_in.iter_mut())
                .enumerate()
                .for_each(|(k, cell)| update(k, cell));
        }

        let piston = piston_face(rho, vel, pres, dx, dt, forcing.acceleration);
        new_rho[n - 1] = piston.density;
        new_vel[n - 1] = piston.velocity;

        let wall = closed_wall(rho, vel, dx, dt);
        new_rho[0] = wall.density;
        new_vel[0] = wall.velocity;

        for (p, &r) in new_pres.iter_mut().zip(rho) {
            *p = gas.pressure(r);
        }

        GridState::new(new_rho, new_vel, new_pres)
    }
}
