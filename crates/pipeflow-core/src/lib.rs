//! Core types and traits for the pipeflow solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the pipeflow workspace:
//! step and field identifiers, the grid state, gas properties, error
//! types, and the forcing and field-reader traits.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod gas;
pub mod id;
pub mod traits;

pub use error::{SchemeError, StepError};
pub use field::{try_alloc_field, GridState, ALL_FIELDS, DENSITY, PRESSURE, VELOCITY};
pub use gas::GasProperties;
pub use id::{FieldId, StepId};
pub use traits::{FieldReader, Forcing};
