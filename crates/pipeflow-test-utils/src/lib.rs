//! Test utilities and mock types for pipeflow development.
//!
//! Provides a mock [`FieldReader`], grid-state builders, analytic
//! forcings and scripted [`Scheme`](pipeflow_scheme::Scheme)
//! implementations for driving the engine in tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashMap;

use pipeflow_core::gas::ATMOSPHERIC_PRESSURE;
use pipeflow_core::{FieldId, FieldReader, GasProperties, GridState};
use pipeflow_space::Line1D;

pub mod fixtures;

pub use fixtures::{ConstScheme, CountingForcing, FailingScheme, SineForcing};

/// Mock implementation of [`FieldReader`].
///
/// Backed by a `HashMap<FieldId, Vec<f64>>` for flexible test setup.
/// Fields may have any length, which lets tests feed writers data that
/// a [`GridState`] would reject.
pub struct MockFieldReader {
    fields: HashMap<FieldId, Vec<f64>>,
}

impl MockFieldReader {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Pre-populate a field with data for testing.
    pub fn set_field(&mut self, field: FieldId, data: Vec<f64>) {
        self.fields.insert(field, data);
    }
}

impl Default for MockFieldReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldReader for MockFieldReader {
    fn read(&self, field: FieldId) -> Option<&[f64]> {
        self.fields.get(&field).map(|v| v.as_slice())
    }
}

/// The reference initial condition on `space`: one atmosphere, gas at
/// rest, density from the equation of state.
pub fn reference_state(space: &Line1D, gas: &GasProperties) -> GridState {
    GridState::uniform(
        space.len(),
        gas.density_for_pressure(ATMOSPHERIC_PRESSURE),
        ATMOSPHERIC_PRESSURE,
    )
}

/// Sample density and velocity profiles at `x = i·dx`; pressure follows
/// from the equation of state.
pub fn sampled_state(
    len: usize,
    dx: f64,
    density: impl Fn(f64) -> f64,
    velocity: impl Fn(f64) -> f64,
    gas: &GasProperties,
) -> GridState {
    let x = |i: usize| i as f64 * dx;
    let rho: Vec<f64> = (0..len).map(|i| density(x(i))).collect();
    let vel = (0..len).map(|i| velocity(x(i))).collect();
    let pres = rho.iter().map(|&r| gas.pressure(r)).collect();
    match GridState::new(rho, vel, pres) {
        Ok(state) => state,
        Err(e) => unreachable!("fields built with equal lengths: {e}"),
    }
}
