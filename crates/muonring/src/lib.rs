//! muonring — muon-ring reconstruction for Cherenkov telescope cameras.
//!
//! A muon crossing near a telescope produces a ring of Cherenkov light on the
//! camera. Because the expected light yield of such a ring is calculable,
//! well-reconstructed rings are the standard probe of optical throughput.
//! The pipeline stages are:
//!
//! 1. **Project** – pixel positions from focal-plane meters to on-sky degrees
//!    ([`Projector`], small-angle or exact reprojection).
//! 2. **Refine** – three rounds of a charge-weighted algebraic circle fit,
//!    each round rejecting pixels far from the current ring
//!    ([`refine_ring`]).
//! 3. **Gate** – per-telescope-type plausibility cuts on the fitted ring
//!    ([`pipeline::is_ring_good`]).
//! 4. **Integrate** – photometric fit of an optical line-integration model
//!    recovering the muon impact parameter and ring width
//!    ([`MuonLineIntegrator`]).
//! 5. **Gate again** – physical windows on impact parameter and ring width
//!    decide the final muon flag ([`pipeline::is_muon_found`]).
//!
//! [`MuonAnalyzer`] drives all stages per telescope per event.
//!
//! # Units
//!
//! A single canonical unit per dimension is used across the whole API:
//! **degrees** for angles (`_deg`), **meters** for lengths (`_m`) and
//! **photoelectrons** for charge (`_pe`). Field and parameter suffixes carry
//! the unit; there are no unit-generic types.

pub mod cleaning;
pub mod config;
pub mod event;
pub mod features;
pub mod intensity;
pub mod pipeline;
pub mod projector;
pub mod ring;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cleaning::{ImageCleaner, PictureThresholdCleaner};
pub use config::{CutTable, TailCuts, TelescopeCutConfig};
pub use event::{ArrayEvent, TelescopeData};
pub use intensity::{
    IntensityError, IntensityFitConfig, IntensityParameters, MirrorOptics, MuonLineIntegrator,
};
pub use pipeline::{AnalysisError, AnalysisErrorKind, MuonAnalyzer, TelescopeMuonRecord};
pub use projector::Projector;
pub use ring::{fit_ring, refine_ring, RingFitError, RingFitMethod, RingGeometry};
