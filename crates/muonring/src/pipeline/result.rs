//! Per-telescope result record and analysis error.

use crate::intensity::IntensityParameters;
use crate::ring::{RingFitError, RingGeometry};

/// Everything reconstructed for one telescope in one event.
///
/// The ring geometry is always present. The intensity section and the muon
/// flag exist only when the ring passed the ring-good gate and the
/// photometric fit converged; a computed intensity record is always attached
/// regardless of what the muon-found gate decided.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelescopeMuonRecord {
    /// Refined ring geometry with identifiers and containment filled in.
    pub ring: RingGeometry,
    /// Mirror radius echoed for downstream convenience, meters.
    pub mirror_radius_m: f64,
    /// Photometric fit output, when the ring-good gate passed and the fit
    /// converged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<IntensityParameters>,
    /// Final muon selection flag, present exactly when `intensity` is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muon_found: Option<bool>,
}

/// What went wrong for one telescope.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisErrorKind {
    /// The telescope-type key has no entry in the cut table.
    ConfigurationMissing {
        /// The missing telescope-type key.
        telescope_name: String,
    },
    /// The ring fit failed during refinement.
    DegenerateFit(RingFitError),
}

/// Per-telescope failure, attached to the event output in place of a record.
///
/// Never aborts sibling telescopes, and is distinct from the silent
/// empty-cleaning-mask early exit.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisError {
    /// Telescope the failure belongs to.
    pub tel_id: u32,
    /// Failure cause.
    pub kind: AnalysisErrorKind,
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            AnalysisErrorKind::ConfigurationMissing { telescope_name } => write!(
                f,
                "tel {}: no cut configuration for telescope type {telescope_name:?}",
                self.tel_id
            ),
            AnalysisErrorKind::DegenerateFit(err) => {
                write!(f, "tel {}: degenerate ring fit: {err}", self.tel_id)
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            AnalysisErrorKind::DegenerateFit(err) => Some(err),
            AnalysisErrorKind::ConfigurationMissing { .. } => None,
        }
    }
}
