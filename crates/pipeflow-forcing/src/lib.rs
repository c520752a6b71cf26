//! Piston forcing waveforms for pipeflow.
//!
//! Every waveform implements [`pipeflow_core::Forcing`]:
//!
//! - [`PiecewiseProfile`]: piecewise-constant acceleration over one period
//! - [`FourierForcing`]: truncated Fourier series of a piecewise profile,
//!   with coefficients integrated exactly segment by segment
//! - [`ConstantForcing`]: a fixed acceleration (zero for unforced runs)
//!
//! The reference piston is [`PiecewiseProfile::reference`]: 3 m/s² for
//! ten seconds, rest, 1 m/s² for ten seconds, rest, repeating every 60 s.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod constant;
pub mod error;
pub mod fourier;
pub mod profile;

pub use constant::ConstantForcing;
pub use error::ForcingError;
pub use fourier::{FourierForcing, FourierForcingBuilder, DEFAULT_HARMONICS};
pub use profile::{PiecewiseProfile, Segment, REFERENCE_PERIOD};
