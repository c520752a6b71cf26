//! Error types for the pipeflow solver.
//!
//! Organized by subsystem: [`SchemeError`] for failures inside a single
//! scheme evaluation and [`StepError`] for the driver that wraps it.

use std::error::Error;
use std::fmt;

use crate::id::FieldId;

/// Errors from a scheme's `step()` evaluation.
///
/// A step that returns one of these is never committed; the previously
/// committed state remains observable.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemeError {
    /// A working buffer for the new state could not be allocated.
    ///
    /// This is the only resource error in the solver and is fatal: the
    /// scheme has no way to proceed without its output buffer.
    AllocationFailed {
        /// The field whose buffer failed to allocate.
        field: FieldId,
        /// Requested element count.
        len: usize,
    },
    /// A field slice handed to the scheme does not match the grid length.
    LengthMismatch {
        /// The offending field.
        field: FieldId,
        /// Grid cell count.
        expected: usize,
        /// Actual slice length.
        actual: usize,
    },
    /// Density at a cell became zero or negative.
    NonPositiveDensity {
        /// Cell index.
        index: usize,
        /// The offending density value.
        value: f64,
    },
    /// A NaN or infinity appeared in the new state.
    NonFinite {
        /// The field containing the value.
        field: FieldId,
        /// Index of the first non-finite cell.
        index: usize,
    },
}

impl fmt::Display for SchemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { field, len } => {
                write!(f, "failed to allocate {len} cells for field {field}")
            }
            Self::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field {field} has {actual} cells, grid has {expected}"
            ),
            Self::NonPositiveDensity { index, value } => {
                write!(f, "density {value} at cell {index} is not positive")
            }
            Self::NonFinite { field, index } => {
                write!(f, "non-finite value in field {field} at cell {index}")
            }
        }
    }
}

impl Error for SchemeError {}

/// Errors from the driver during `step()`.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// The scheme failed while building the next state.
    SchemeFailed {
        /// Name of the failing scheme.
        name: String,
        /// The underlying scheme error.
        reason: SchemeError,
    },
    /// The run already executed its final step.
    Terminated,
}

impl StepError {
    /// Whether this error is the fatal allocation failure.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(
            self,
            Self::SchemeFailed {
                reason: SchemeError::AllocationFailed { .. },
                ..
            }
        )
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemeFailed { name, reason } => {
                write!(f, "scheme '{name}' failed: {reason}")
            }
            Self::Terminated => write!(f, "run has already terminated"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SchemeFailed { reason, .. } => Some(reason),
            Self::Terminated => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{DENSITY, VELOCITY};

    #[test]
    fn scheme_error_display_names_field_and_cell() {
        let err = SchemeError::NonFinite {
            field: VELOCITY,
            index: 17,
        };
        let msg = err.to_string();
        assert!(msg.contains("vel"));
        assert!(msg.contains("17"));
    }

    #[test]
    fn step_error_chains_source() {
        let err = StepError::SchemeFailed {
            name: "taylor".to_string(),
            reason: SchemeError::NonPositiveDensity {
                index: 3,
                value: -0.5,
            },
        };
        assert!(err.to_string().contains("taylor"));
        let source = err.source().expect("scheme failure has a source");
        assert!(source.to_string().contains("not positive"));
        assert!(!err.is_allocation_failure());
    }

    #[test]
    fn allocation_failure_is_detected() {
        let err = StepError::SchemeFailed {
            name: "taylor".to_string(),
            reason: SchemeError::AllocationFailed {
                field: DENSITY,
                len: 1000,
            },
        };
        assert!(err.is_allocation_failure());
        assert!(!StepError::Terminated.is_allocation_failure());
    }
}
