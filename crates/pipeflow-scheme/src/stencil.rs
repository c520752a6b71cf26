//! Finite-difference stencils on a uniform grid.
//!
//! Interior points use second-order central differences. The two end
//! points fall back to one-sided stencils:
//!
//! ```text
//! f'(0)    = (f[1] - f[0]) / h
//! f'(N-1)  = (f[N-1] - f[N-2]) / h
//! f''(0)   = (2f[0] - 5f[1] + 4f[2] - f[3]) / h²
//! f''(N-1) = (2f[N-1] - 5f[N-2] + 4f[N-3] - f[N-4]) / h²
//! ```

use pipeflow_space::Line1D;

/// Spatial derivative operator for one grid spacing.
///
/// Pure and `Copy`; the reciprocals are precomputed once per step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Differentiator {
    inv_h: f64,
    inv_2h: f64,
    inv_h2: f64,
}

impl Differentiator {
    /// Differentiator for spacing `h`. The caller guarantees `h > 0`.
    pub fn new(h: f64) -> Self {
        Self {
            inv_h: 1.0 / h,
            inv_2h: 0.5 / h,
            inv_h2: 1.0 / (h * h),
        }
    }

    /// Differentiator for a grid's spacing.
    pub fn for_grid(space: &Line1D) -> Self {
        Self::new(space.dx())
    }

    /// First derivative of `f` at index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= f.len()` or `f.len() < 4`.
    #[inline]
    pub fn first(&self, f: &[f64], i: usize) -> f64 {
        let n = check_index(f, i);
        if i == 0 {
            (f[1] - f[0]) * self.inv_h
        } else if i == n - 1 {
            (f[n - 1] - f[n - 2]) * self.inv_h
        } else {
            (f[i + 1] - f[i - 1]) * self.inv_2h
        }
    }

    /// Second derivative of `f` at index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= f.len()` or `f.len() < 4`.
    #[inline]
    pub fn second(&self, f: &[f64], i: usize) -> f64 {
        let n = check_index(f, i);
        if i == 0 {
            (2.0 * f[0] - 5.0 * f[1] + 4.0 * f[2] - f[3]) * self.inv_h2
        } else if i == n - 1 {
            (2.0 * f[n - 1] - 5.0 * f[n - 2] + 4.0 * f[n - 3] - f[n - 4]) * self.inv_h2
        } else {
            (f[i + 1] - 2.0 * f[i] + f[i - 1]) * self.inv_h2
        }
    }
}

#[inline]
fn check_index(f: &[f64], i: usize) -> usize {
    let n = f.len();
    assert!(
        n >= Line1D::MIN_LEN,
        "stencil needs at least {} cells, field has {n}",
        Line1D::MIN_LEN
    );
    assert!(i < n, "stencil index {i} out of range for field of length {n}");
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(n: usize, h: f64, f: impl Fn(f64) -> f64) -> Vec<f64> {
        (0..n).map(|i| f(i as f64 * h)).collect()
    }

    #[test]
    fn linear_first_derivative_is_exact_everywhere() {
        let h = 0.1;
        let f = sample(10, h, |x| x);
        let d = Differentiator::new(h);
        for i in 0..10 {
            assert!((d.first(&f, i) - 1.0).abs() < 1e-12, "i = {i}");
        }
    }

    #[test]
    fn quadratic_second_derivative_is_exact_everywhere() {
        let h = 0.1;
        let f = sample(10, h, |x| x * x);
        let d = Differentiator::new(h);
        for i in 0..10 {
            assert!((d.second(&f, i) - 2.0).abs() < 1e-9, "i = {i}: {}", d.second(&f, i));
        }
    }

    #[test]
    fn constant_field_has_zero_interior_derivatives() {
        let f = vec![1.2345; 8];
        let d = Differentiator::new(5e-3);
        for i in 1..7 {
            assert_eq!(d.first(&f, i), 0.0);
            assert_eq!(d.second(&f, i), 0.0);
        }
    }

    #[test]
    fn minimal_grid_uses_all_four_points() {
        let d = Differentiator::new(1.0);
        let f = [0.0, 1.0, 4.0, 9.0];
        assert_eq!(d.second(&f, 0), 2.0);
        assert_eq!(d.second(&f, 3), 2.0);
        assert_eq!(d.first(&f, 3), 5.0);
    }

    #[test]
    #[should_panic(expected = "stencil index 10 out of range")]
    fn out_of_range_index_panics() {
        let d = Differentiator::new(1.0);
        d.first(&[0.0; 10], 10);
    }

    #[test]
    #[should_panic(expected = "at least 4 cells")]
    fn short_field_panics() {
        let d = Differentiator::new(1.0);
        d.second(&[0.0; 3], 1);
    }

    proptest! {
        #[test]
        fn affine_fields_are_differentiated_exactly(
            a in -10.0f64..10.0,
            b in -10.0f64..10.0,
            n in 4usize..64,
        ) {
            let h = 0.25;
            let f = sample(n, h, |x| a * x + b);
            let d = Differentiator::new(h);
            for i in 0..n {
                prop_assert!((d.first(&f, i) - a).abs() < 1e-9);
                prop_assert!(d.second(&f, i).abs() < 1e-7);
            }
        }
    }
}
