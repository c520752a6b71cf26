//! Spatial grid for pipeflow simulations.
//!
//! The solver works on a single backend, [`Line1D`]: a uniform line of
//! cells with fixed spacing. It owns the geometric questions the rest of
//! the workspace asks: cell count, spacing, positions, which indices are
//! interior, and which indices a snapshot samples.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod line1d;

pub use error::SpaceError;
pub use line1d::Line1D;
