//! Analytic time derivatives of the isothermal Euler equations.
//!
//! With `K = R·T0/μ` and piston forcing `a(t)`:
//!
//! ```text
//! ρ_t  = -v ρ_x - ρ v_x
//! v_t  = -v v_x - (K/ρ) ρ_x - a
//! v_xt = -v_x² - v v_xx + K (ρ_x/ρ)² - (K/ρ) ρ_xx
//! ρ_xt = -v_x ρ_x - v ρ_xx - ρ_x v_x - ρ v_xx
//! ρ_tt = -v_t ρ_x - v ρ_xt - ρ_t v_x - ρ v_xt
//! v_tt = -v_t v_x - v v_xt + (K/ρ²) ρ_t ρ_x - (K/ρ) ρ_xt - ȧ
//! ```
//!
//! Spatial derivatives come from [`Differentiator`], so the expressions
//! are valid at every index the stencils are.

use pipeflow_core::Forcing;

use crate::stencil::Differentiator;

/// Local values and spatial derivatives at one grid index.
#[derive(Clone, Copy, Debug)]
struct Local {
    r: f64,
    v: f64,
    rx: f64,
    vx: f64,
    rxx: f64,
    vxx: f64,
}

/// First- and second-order time derivatives at a grid index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rates {
    /// `ρ_t`
    pub rho_t: f64,
    /// `v_t`
    pub vel_t: f64,
    /// `ρ_tt`
    pub rho_tt: f64,
    /// `v_tt`
    pub vel_tt: f64,
}

/// The forcing `a(t)` and its rate `ȧ(t)` at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ForcingSample {
    /// `a(t)`
    pub acceleration: f64,
    /// `ȧ(t)`
    pub rate: f64,
}

impl ForcingSample {
    /// Evaluate `forcing` at time `t`.
    pub fn at(forcing: &dyn Forcing, t: f64) -> Self {
        Self {
            acceleration: forcing.acceleration(t),
            rate: forcing.rate(t),
        }
    }
}

/// Time-derivative engine over a borrowed density/velocity pair.
pub struct TimeDerivatives<'a> {
    density: &'a [f64],
    velocity: &'a [f64],
    diff: Differentiator,
    k: f64,
    forcing: &'a dyn Forcing,
}

impl<'a> TimeDerivatives<'a> {
    /// Bind the engine to a state.
    ///
    /// `k` is the isothermal constant `R·T0/μ`. `density` and `velocity`
    /// must have the same length.
    pub fn new(
        density: &'a [f64],
        velocity: &'a [f64],
        diff: Differentiator,
        k: f64,
        forcing: &'a dyn Forcing,
    ) -> Self {
        debug_assert_eq!(density.len(), velocity.len());
        Self {
            density,
            velocity,
            diff,
            k,
            forcing,
        }
    }

    fn local(&self, i: usize) -> Local {
        let (rho, vel, d) = (self.density, self.velocity, &self.diff);
        Local {
            r: rho[i],
            v: vel[i],
            rx: d.first(rho, i),
            vx: d.first(vel, i),
            rxx: d.second(rho, i),
            vxx: d.second(vel, i),
        }
    }

    fn rho_t(&self, l: &Local) -> f64 {
        -l.v * l.rx - l.r * l.vx
    }

    fn vel_t(&self, l: &Local, a: f64) -> f64 {
        -l.v * l.vx - self.k / l.r * l.rx - a
    }

    /// `∂ρ/∂t` at index `i`.
    pub fn d_rho_dt(&self, i: usize) -> f64 {
        self.rho_t(&self.local(i))
    }

    /// `∂v/∂t` at index `i` and time `t`.
    pub fn d_vel_dt(&self, i: usize, t: f64) -> f64 {
        self.vel_t(&self.local(i), self.forcing.acceleration(t))
    }

    /// `∂²ρ/∂t²` at index `i` and time `t`.
    pub fn d2_rho_dt2(&self, i: usize, t: f64) -> f64 {
        self.rates(i, t).rho_tt
    }

    /// `∂²v/∂t²` at index `i` and time `t`.
    pub fn d2_vel_dt2(&self, i: usize, t: f64) -> f64 {
        self.rates(i, t).vel_tt
    }

    /// All four derivatives at once, sharing the stencil evaluations.
    pub fn rates(&self, i: usize, t: f64) -> Rates {
        self.rates_with(i, ForcingSample::at(self.forcing, t))
    }

    /// [`rates`](Self::rates) with the forcing already evaluated.
    ///
    /// The forcing is uniform in space, so a step samples it once and
    /// reuses the sample for every cell.
    pub fn rates_with(&self, i: usize, forcing: ForcingSample) -> Rates {
        let l = self.local(i);
        let k = self.k;

        let rt = self.rho_t(&l);
        let vt = self.vel_t(&l, forcing.acceleration);

        let k_over_r = k / l.r;
        let rx_over_r = l.rx / l.r;
        let vxt = -l.vx * l.vx - l.v * l.vxx + k * rx_over_r * rx_over_r - k_over_r * l.rxx;
        let rxt = -l.vx * l.rx - l.v * l.rxx - l.rx * l.vx - l.r * l.vxx;

        let rtt = -vt * l.rx - l.v * rxt - rt * l.vx - l.r * vxt;
        let vtt =
            -vt * l.vx - l.v * vxt + k_over_r / l.r * rt * l.rx - k_over_r * rxt - forcing.rate;

        Rates {
            rho_t: rt,
            vel_t: vt,
            rho_tt: rtt,
            vel_tt: vtt,
        }
    }

    /// Second-order Taylor update `(ρ, v)` at index `i` over one step.
    ///
    /// `f + dt·f_t + (dt²/2)·f_tt` for both fields.
    #[inline]
    pub fn taylor(&self, i: usize, forcing: ForcingSample, dt: f64) -> (f64, f64) {
        let r = self.rates_with(i, forcing);
        let half_dt2 = 0.5 * dt * dt;
        (
            self.density[i] + dt * r.rho_t + half_dt2 * r.rho_tt,
            self.velocity[i] + dt * r.vel_t + half_dt2 * r.vel_tt,
        )
    }
}
