//! Error types for forcing construction.

use std::fmt;

/// Errors arising from building a forcing waveform.
#[derive(Debug, Clone, PartialEq)]
pub enum ForcingError {
    /// The period is zero, negative or not finite.
    InvalidPeriod {
        /// The rejected period.
        period: f64,
    },
    /// The profile has no segments.
    EmptyProfile,
    /// A segment is malformed or does not continue where the previous
    /// one ended.
    InvalidSegment {
        /// Position of the segment in the profile.
        index: usize,
        /// What went wrong.
        reason: String,
    },
    /// The segments do not end exactly at the period.
    IncompleteCover {
        /// End of the last segment.
        end: f64,
        /// Profile period.
        period: f64,
    },
    /// A Fourier series needs at least one harmonic.
    NoHarmonics,
}

impl fmt::Display for ForcingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPeriod { period } => {
                write!(f, "forcing period must be finite and > 0, got {period}")
            }
            Self::EmptyProfile => write!(f, "forcing profile has no segments"),
            Self::InvalidSegment { index, reason } => {
                write!(f, "segment {index}: {reason}")
            }
            Self::IncompleteCover { end, period } => {
                write!(f, "segments end at {end} but the period is {period}")
            }
            Self::NoHarmonics => write!(f, "fourier series needs at least one harmonic"),
        }
    }
}

impl std::error::Error for ForcingError {}
