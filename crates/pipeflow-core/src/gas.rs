//! Ideal-gas properties for the isothermal closure.

/// Universal gas constant used by the reference setup (J/(mol·K)).
pub const GAS_CONSTANT: f64 = 8.31;
/// Molar mass of air (kg/mol).
pub const AIR_MOLAR_MASS: f64 = 0.029;
/// Reference temperature (K).
pub const REFERENCE_TEMPERATURE: f64 = 293.15;
/// Reference ambient pressure (Pa).
pub const ATMOSPHERIC_PRESSURE: f64 = 101_325.0;

/// Ideal gas at a fixed temperature.
///
/// The flow is isothermal, so pressure is linear in density:
/// `p = (R/μ)·ρ·T0 = K·ρ`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasProperties {
    /// Gas constant `R`.
    pub gas_constant: f64,
    /// Molar mass `μ`.
    pub molar_mass: f64,
    /// Fixed temperature `T0`.
    pub temperature: f64,
}

impl GasProperties {
    /// The isothermal sound-speed squared, `K = R·T0/μ`.
    pub fn k(&self) -> f64 {
        self.gas_constant * self.temperature / self.molar_mass
    }

    /// Equation of state: pressure for the given density.
    pub fn pressure(&self, density: f64) -> f64 {
        (self.gas_constant / self.molar_mass) * density * self.temperature
    }

    /// Inverse equation of state: `ρ = p·μ/(R·T0)`.
    pub fn density_for_pressure(&self, pressure: f64) -> f64 {
        pressure * self.molar_mass / (self.gas_constant * self.temperature)
    }

    /// Check that every constant is finite and strictly positive.
    ///
    /// Returns the name of the first offending property.
    pub fn validate(&self) -> Result<(), &'static str> {
        for (name, value) in [
            ("gas_constant", self.gas_constant),
            ("molar_mass", self.molar_mass),
            ("temperature", self.temperature),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(name);
            }
        }
        Ok(())
    }
}

impl Default for GasProperties {
    fn default() -> Self {
        Self {
            gas_constant: GAS_CONSTANT,
            molar_mass: AIR_MOLAR_MASS,
            temperature: REFERENCE_TEMPERATURE,
        }
    }
}
