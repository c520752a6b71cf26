//! Truncated Fourier series of a piecewise profile.
//!
//! Coefficients are computed in closed form. Over a constant segment
//! `[t0, t1)` holding value `v`, with `w = 2πn/P`:
//!
//! ```text
//! ∫ v·cos(w t) dt =  v·(sin(w t1) - sin(w t0)) / w
//! ∫ v·sin(w t) dt = -v·(cos(w t1) - cos(w t0)) / w
//! ```
//!
//! and the series is `a0/2 + Σ aₙ cos(w t) + bₙ sin(w t)` with every
//! coefficient scaled by `2/P`.

use std::f64::consts::TAU;

use pipeflow_core::Forcing;

use crate::error::ForcingError;
use crate::profile::PiecewiseProfile;

/// Harmonic count used by the canonical piston forcing.
pub const DEFAULT_HARMONICS: usize = 50;

/// Smooth periodic forcing reconstructed from Fourier coefficients.
///
/// Constructed from a [`PiecewiseProfile`] via [`FourierForcing::from_profile`]
/// or [`FourierForcing::builder`]. The table is immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct FourierForcing {
    period: f64,
    a0: f64,
    /// `(aₙ, bₙ)` for `n = 1..=H`.
    coefficients: Vec<(f64, f64)>,
}

/// Builder for [`FourierForcing`].
///
/// Defaults to the reference profile and [`DEFAULT_HARMONICS`].
pub struct FourierForcingBuilder {
    profile: PiecewiseProfile,
    harmonics: usize,
}

impl FourierForcing {
    /// Create a new builder for configuring a `FourierForcing`.
    pub fn builder() -> FourierForcingBuilder {
        FourierForcingBuilder {
            profile: PiecewiseProfile::reference(),
            harmonics: DEFAULT_HARMONICS,
        }
    }

    /// Integrate `profile` exactly up to harmonic `harmonics`.
    ///
    /// Returns `Err(ForcingError::NoHarmonics)` if `harmonics == 0`.
    pub fn from_profile(
        profile: &PiecewiseProfile,
        harmonics: usize,
    ) -> Result<Self, ForcingError> {
        if harmonics == 0 {
            return Err(ForcingError::NoHarmonics);
        }
        let period = profile.period_len();
        let scale = 2.0 / period;

        let a0 = scale * profile.integral();
        let coefficients = (1..=harmonics)
            .map(|n| {
                let w = TAU * n as f64 / period;
                let (mut a_n, mut b_n) = (0.0, 0.0);
                for seg in profile.segments() {
                    a_n += seg.value * ((w * seg.end).sin() - (w * seg.start).sin()) / w;
                    b_n -= seg.value * ((w * seg.end).cos() - (w * seg.start).cos()) / w;
                }
                (scale * a_n, scale * b_n)
            })
            .collect();

        Ok(Self {
            period,
            a0,
            coefficients,
        })
    }

    /// The canonical 50-harmonic series of the reference piston cycle.
    pub fn reference() -> Self {
        Self::from_profile(&PiecewiseProfile::reference(), DEFAULT_HARMONICS)
            .unwrap_or_else(|_| unreachable!("reference harmonics are non-zero"))
    }

    /// Mean coefficient `a0`; the DC term of the series is `a0 / 2`.
    pub fn a0(&self) -> f64 {
        self.a0
    }

    /// `(aₙ, bₙ)` pairs for `n = 1..=H`.
    pub fn coefficients(&self) -> &[(f64, f64)] {
        &self.coefficients
    }

    /// Number of harmonics `H`.
    pub fn harmonics(&self) -> usize {
        self.coefficients.len()
    }

    /// Angular frequency of harmonic `n`.
    fn omega(&self, n: usize) -> f64 {
        TAU * n as f64 / self.period
    }
}

impl FourierForcingBuilder {
    /// Set the profile to expand (default: the reference cycle).
    pub fn profile(mut self, profile: PiecewiseProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the highest harmonic (default: 50). Must be >= 1.
    pub fn harmonics(mut self, harmonics: usize) -> Self {
        self.harmonics = harmonics;
        self
    }

    /// Build the series.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `harmonics` is zero.
    pub fn build(self) -> Result<FourierForcing, String> {
        FourierForcing::from_profile(&self.profile, self.harmonics).map_err(|e| e.to_string())
    }
}

impl Forcing for FourierForcing {
    fn name(&self) -> &str {
        "fourier"
    }

    fn acceleration(&self, t: f64) -> f64 {
        let t = t.rem_euclid(self.period);
        let mut sum = self.a0 / 2.0;
        for (k, &(a_n, b_n)) in self.coefficients.iter().enumerate() {
            let wt = self.omega(k + 1) * t;
            sum += a_n * wt.cos() + b_n * wt.sin();
        }
        sum
    }

    fn rate(&self, t: f64) -> f64 {
        let t = t.rem_euclid(self.period);
        let mut sum = 0.0;
        for (k, &(a_n, b_n)) in self.coefficients.iter().enumerate() {
            let w = self.omega(k + 1);
            let wt = w * t;
            sum += w * (b_n * wt.cos() - a_n * wt.sin());
        }
        sum
    }

    fn period(&self) -> Option<f64> {
        Some(self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Mean absolute error against the profile at points at least
    /// `margin` seconds from any jump.
    fn mean_error(series: &FourierForcing, margin: f64) -> f64 {
        let target = PiecewiseProfile::reference();
        let jumps = [0.0, 10.0, 30.0, 40.0, 60.0];
        let samples: Vec<f64> = (0..600)
            .map(|i| i as f64 * 0.1 + 0.05)
            .filter(|t| jumps.iter().all(|j| (t - j).abs() > margin))
            .collect();
        let total: f64 = samples
            .iter()
            .map(|&t| (series.acceleration(t) - target.acceleration(t)).abs())
            .sum();
        total / samples.len() as f64
    }

    #[test]
    fn mean_coefficient_is_twice_profile_mean() {
        let f = FourierForcing::reference();
        // Mean of the reference cycle is 40/60.
        assert!((f.a0() - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(f.harmonics(), 50);
    }

    #[test]
    fn first_harmonic_matches_closed_form() {
        let f = FourierForcing::reference();
        let w = TAU / 60.0;
        let a1 = (2.0 / 60.0)
            * (3.0 * (w * 10.0).sin() + ((w * 40.0).sin() - (w * 30.0).sin()))
            / w;
        let b1 = (2.0 / 60.0)
            * -(3.0 * ((w * 10.0).cos() - 1.0) + ((w * 40.0).cos() - (w * 30.0).cos()))
            / w;
        let (a, b) = f.coefficients()[0];
        assert!((a - a1).abs() < 1e-12, "a1 = {a}, expected {a1}");
        assert!((b - b1).abs() < 1e-12, "b1 = {b}, expected {b1}");
    }

    #[test]
    fn fidelity_improves_with_harmonics() {
        let coarse = FourierForcing::from_profile(&PiecewiseProfile::reference(), 5).unwrap();
        let canonical = FourierForcing::reference();
        let fine = FourierForcing::from_profile(&PiecewiseProfile::reference(), 400).unwrap();

        let e5 = mean_error(&coarse, 2.0);
        let e50 = mean_error(&canonical, 2.0);
        let e400 = mean_error(&fine, 2.0);
        assert!(e50 < e5, "e50 = {e50}, e5 = {e5}");
        assert!(e400 < e50, "e400 = {e400}, e50 = {e50}");
        assert!(e50 < 0.05, "e50 = {e50}");
    }

    #[test]
    fn plateau_values_are_close() {
        let f = FourierForcing::reference();
        assert!((f.acceleration(5.0) - 3.0).abs() < 0.1);
        assert!((f.acceleration(20.0)).abs() < 0.1);
        assert!((f.acceleration(35.0) - 1.0).abs() < 0.1);
        assert!((f.acceleration(50.0)).abs() < 0.1);
    }

    #[test]
    fn rate_matches_finite_difference() {
        let f = FourierForcing::reference();
        let h = 1e-5;
        for t in [1.3, 9.0, 17.5, 33.3, 47.0] {
            let numeric = (f.acceleration(t + h) - f.acceleration(t - h)) / (2.0 * h);
            let analytic = f.rate(t);
            assert!(
                (numeric - analytic).abs() < 1e-4 * (1.0 + analytic.abs()),
                "t = {t}: numeric {numeric}, analytic {analytic}"
            );
        }
    }

    #[test]
    fn builder_requires_harmonics() {
        let result = FourierForcing::builder().harmonics(0).build();
        assert!(result.unwrap_err().contains("harmonic"));
    }

    #[test]
    fn builder_defaults_to_reference() {
        let built = FourierForcing::builder().build().unwrap();
        assert_eq!(built, FourierForcing::reference());
    }

    proptest! {
        #[test]
        fn periodic(t in 0.0f64..600.0) {
            let f = FourierForcing::reference();
            let a = f.acceleration(t);
            let b = f.acceleration(t + 60.0);
            prop_assert!((a - b).abs() < 1e-9, "a({t}) = {a}, a(t+P) = {b}");
        }
    }
}
