//! Uniform 1D line grid.

use std::ops::Range;

use crate::error::SpaceError;

/// A uniform one-dimensional grid.
///
/// Cell `i` sits at position `i * dx` for `0 <= i < len`. Index `0` is the
/// closed wall and index `len - 1` is the piston face.
///
/// # Examples
///
/// ```
/// use pipeflow_space::Line1D;
///
/// let line = Line1D::new(1000, 5e-3).unwrap();
/// assert_eq!(line.len(), 1000);
/// assert_eq!(line.interior(), 1..999);
/// assert!((line.length() - 4.995).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line1D {
    len: usize,
    dx: f64,
}

impl Line1D {
    /// Smallest grid the four-point one-sided second-derivative stencil
    /// can be evaluated on.
    pub const MIN_LEN: usize = 4;

    /// Create a grid of `len` cells spaced `dx` apart.
    ///
    /// Returns `Err(SpaceError::TooFewCells)` if `len < MIN_LEN`, or
    /// `Err(SpaceError::InvalidSpacing)` if `dx` is not finite and positive.
    pub fn new(len: usize, dx: f64) -> Result<Self, SpaceError> {
        if len < Self::MIN_LEN {
            return Err(SpaceError::TooFewCells {
                len,
                min: Self::MIN_LEN,
            });
        }
        if !dx.is_finite() || dx <= 0.0 {
            return Err(SpaceError::InvalidSpacing { dx });
        }
        Ok(Self { len, dx })
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always returns `false`: construction rejects short grids.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cell spacing.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Distance from the wall to the piston face.
    pub fn length(&self) -> f64 {
        (self.len - 1) as f64 * self.dx
    }

    /// Position of cell `i`.
    pub fn position(&self, i: usize) -> f64 {
        i as f64 * self.dx
    }

    /// Index of the wall cell.
    pub fn left(&self) -> usize {
        0
    }

    /// Index of the piston cell.
    pub fn right(&self) -> usize {
        self.len - 1
    }

    /// Indices updated by the interior scheme, `1..len-1`.
    pub fn interior(&self) -> Range<usize> {
        1..self.len - 1
    }

    /// Stride used when subsampling the grid down to `samples` rows.
    ///
    /// `max(1, len / samples)`; a `samples` of zero is treated as one.
    pub fn sample_stride(&self, samples: usize) -> usize {
        (self.len / samples.max(1)).max(1)
    }

    /// Indices written to a snapshot holding at most `samples` rows.
    ///
    /// Starts at `0` and walks the grid with [`sample_stride`](Self::sample_stride).
    pub fn sample_indices(&self, samples: usize) -> impl Iterator<Item = usize> {
        let stride = self.sample_stride(samples);
        (0..self.len).step_by(stride).take(samples)
    }
}
