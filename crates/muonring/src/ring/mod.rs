//! Ring geometry fitting.
//!
//! Implements:
//! - Charge-weighted algebraic circle fits (closed-form, O(n) per call):
//!   the linearized Chaudhuri–Kundu fit and the moment-based Taubin fit.
//! - Fixed three-round iterative refinement that rejects off-ring pixels
//!   between fits.

mod fit;
mod refine;
mod types;

pub use fit::{fit_ring, RingFitMethod};
pub use refine::{refine_ring, RING_DIST_FRACTION};
pub use types::{RingFitError, RingGeometry};
