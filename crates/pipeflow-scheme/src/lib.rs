//! Numerical core of the pipeflow solver.
//!
//! - [`Differentiator`]: boundary-aware finite-difference stencils
//! - [`TimeDerivatives`]: analytic first and second time derivatives of
//!   density and velocity from the continuity and momentum equations
//! - [`boundary`]: wall and piston edge updates
//! - [`Scheme`]: the one-step contract, with [`TaylorScheme`] as the
//!   second-order Taylor integrator
//! - [`StepContext`]: everything a scheme reads while building a step

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod context;
pub mod derivatives;
pub mod scheme;
pub mod stencil;
pub mod taylor;

pub use boundary::{closed_wall, piston_face, EdgeUpdate};
pub use context::StepContext;
pub use derivatives::{ForcingSample, TimeDerivatives};
pub use scheme::Scheme;
pub use stencil::Differentiator;
pub use taylor::TaylorScheme;
