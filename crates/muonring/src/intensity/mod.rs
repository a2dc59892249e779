//! Photometric muon intensity fit.
//!
//! Given a fitted ring, matches the observed light distribution against an
//! optical line-integration model of Cherenkov emission and mirror
//! collection to recover the muon impact parameter and the ring width, plus
//! derived completeness metrics. See [`MuonLineIntegrator`].

mod fit;
mod model;
mod types;

pub use fit::MuonLineIntegrator;
pub use types::{IntensityError, IntensityFitConfig, IntensityParameters, MirrorOptics};
