//! Edge updates for the closed wall and the piston face.
//!
//! The interior Taylor stencil needs both neighbours, so the two end
//! cells are advanced separately with first-order updates.

/// New density and velocity for one edge cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeUpdate {
    /// Updated density.
    pub density: f64,
    /// Updated velocity.
    pub velocity: f64,
}

/// Closed wall at index 0.
///
/// Velocity is pinned to zero. Density follows the continuity equation
/// with the one-sided velocity gradient:
/// `ρ₀ - ρ₀·dt·(v₁ - v₀)/h`.
pub fn closed_wall(density: &[f64], velocity: &[f64], dx: f64, dt: f64) -> EdgeUpdate {
    let r0 = density[0];
    EdgeUpdate {
        density: r0 - r0 * dt * (velocity[1] - velocity[0]) / dx,
        velocity: 0.0,
    }
}

/// Piston face at index `N-1`, advanced with forward Euler.
///
/// The piston pushes on the last cell with body force `f = -ρ·a(t)`.
/// The pressure gradient uses the pressure of the state being stepped
/// from, not the pressure being built.
pub fn piston_face(
    density: &[f64],
    velocity: &[f64],
    pressure: &[f64],
    dx: f64,
    dt: f64,
    acceleration: f64,
) -> EdgeUpdate {
    let n = density.len();
    let (r, v) = (density[n - 1], velocity[n - 1]);
    let dr = (density[n - 1] - density[n - 2]) / dx;
    let dv = (velocity[n - 1] - velocity[n - 2]) / dx;
    let dp = (pressure[n - 1] - pressure[n - 2]) / dx;
    let force = -r * acceleration;

    EdgeUpdate {
        density: r + dt * (-r * dv - v * dr),
        velocity: v + dt * ((force - dp) / r - v * dv),
    }
}
