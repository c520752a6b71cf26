//! Error types for grid construction.

use std::fmt;

/// Errors arising from grid construction.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// The grid has fewer cells than the one-sided stencils need.
    TooFewCells {
        /// Requested cell count.
        len: usize,
        /// Minimum supported cell count.
        min: usize,
    },
    /// Grid spacing is zero, negative or not finite.
    InvalidSpacing {
        /// The rejected spacing.
        dx: f64,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewCells { len, min } => {
                write!(f, "grid has {len} cells, at least {min} required")
            }
            Self::InvalidSpacing { dx } => {
                write!(f, "grid spacing must be finite and positive, got {dx}")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
