//! Field identifiers and the [`GridState`] value.

use crate::error::SchemeError;
use crate::id::FieldId;
use crate::traits::FieldReader;

/// Mass density per cell (kg/m³).
pub const DENSITY: FieldId = FieldId(0);
/// Flow velocity per cell (m/s).
pub const VELOCITY: FieldId = FieldId(1);
/// Pressure per cell (Pa), derived from density each step.
pub const PRESSURE: FieldId = FieldId(2);

/// All fields, in snapshot column order.
pub const ALL_FIELDS: [FieldId; 3] = [DENSITY, VELOCITY, PRESSURE];

/// The complete simulation state on the grid.
///
/// Three equal-length sequences sampled at the grid points. A step never
/// mutates a `GridState`; it builds a new one from the old one and the
/// driver replaces the committed value wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct GridState {
    density: Vec<f64>,
    velocity: Vec<f64>,
    pressure: Vec<f64>,
}

impl GridState {
    /// Assemble a state from three field buffers.
    ///
    /// Returns `Err(SchemeError::LengthMismatch)` if the velocity or
    /// pressure buffer differs in length from the density buffer.
    pub fn new(
        density: Vec<f64>,
        velocity: Vec<f64>,
        pressure: Vec<f64>,
    ) -> Result<Self, SchemeError> {
        let expected = density.len();
        for (field, len) in [(VELOCITY, velocity.len()), (PRESSURE, pressure.len())] {
            if len != expected {
                return Err(SchemeError::LengthMismatch {
                    field,
                    expected,
                    actual: len,
                });
            }
        }
        Ok(Self {
            density,
            velocity,
            pressure,
        })
    }

    /// Uniform density and pressure with the fluid at rest.
    pub fn uniform(len: usize, density: f64, pressure: f64) -> Self {
        Self {
            density: vec![density; len],
            velocity: vec![0.0; len],
            pressure: vec![pressure; len],
        }
    }

    /// Number of grid cells.
    pub fn len(&self) -> usize {
        self.density.len()
    }

    /// Returns `true` if the state holds no cells.
    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }

    /// Density field.
    pub fn density(&self) -> &[f64] {
        &self.density
    }

    /// Velocity field.
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Pressure field.
    pub fn pressure(&self) -> &[f64] {
        &self.pressure
    }

    /// Mass proxy `Σ density[i]`, used for conservation checks.
    pub fn total_density(&self) -> f64 {
        self.density.iter().sum()
    }

    /// Decompose into `(density, velocity, pressure)` buffers.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.density, self.velocity, self.pressure)
    }

    /// Check the physical invariants of a freshly built state.
    ///
    /// Every value must be finite and every density strictly positive.
    /// Reports the first violation found, scanning density, then
    /// velocity, then pressure.
    pub fn check_physical(&self) -> Result<(), SchemeError> {
        for (index, &value) in self.density.iter().enumerate() {
            if !value.is_finite() {
                return Err(SchemeError::NonFinite {
                    field: DENSITY,
                    index,
                });
            }
            if value <= 0.0 {
                return Err(SchemeError::NonPositiveDensity { index, value });
            }
        }
        for (field, data) in [(VELOCITY, &self.velocity), (PRESSURE, &self.pressure)] {
            if let Some(index) = data.iter().position(|v| !v.is_finite()) {
                return Err(SchemeError::NonFinite { field, index });
            }
        }
        Ok(())
    }
}

impl FieldReader for GridState {
    fn read(&self, field: FieldId) -> Option<&[f64]> {
        match field {
            DENSITY => Some(&self.density),
            VELOCITY => Some(&self.velocity),
            PRESSURE => Some(&self.pressure),
            _ => None,
        }
    }
}

/// Allocate a zeroed working buffer for `field`, surfacing allocation
/// failure as [`SchemeError::AllocationFailed`] instead of aborting.
pub fn try_alloc_field(field: FieldId, len: usize) -> Result<Vec<f64>, SchemeError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| SchemeError::AllocationFailed { field, len })?;
    buf.resize(len, 0.0);
    Ok(buf)
}
