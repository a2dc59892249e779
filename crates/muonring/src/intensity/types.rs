//! Intensity-fit configuration, result record and error type.

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that can occur during the photometric fit.
#[derive(Debug, Clone, PartialEq)]
pub enum IntensityError {
    /// Optics constants are physically inconsistent.
    InvalidOptics(String),
    /// No pixels were selected for the fit.
    EmptySelection,
    /// The optimization did not converge within its sweep budget.
    Divergence {
        /// Number of coordinate-descent sweeps performed.
        sweeps: usize,
    },
}

impl std::fmt::Display for IntensityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOptics(reason) => write!(f, "invalid optics: {reason}"),
            Self::EmptySelection => write!(f, "no pixels selected for intensity fit"),
            Self::Divergence { sweeps } => {
                write!(f, "intensity fit did not converge after {sweeps} sweeps")
            }
        }
    }
}

impl std::error::Error for IntensityError {}

// ── Optics ─────────────────────────────────────────────────────────────────

/// Mirror and pixel constants consumed by the line-integration model.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MirrorOptics {
    /// Primary mirror radius, meters.
    pub mirror_radius_m: f64,
    /// Central camera-support hole radius, meters.
    pub hole_radius_m: f64,
    /// Secondary-mirror radius, meters (only used when `sct`).
    pub secondary_radius_m: f64,
    /// Segmented (Schwarzschild–Couder) optics with an obstructing secondary.
    pub sct: bool,
    /// Angular width of one camera pixel, degrees.
    pub ang_pixel_width_deg: f64,
}

impl MirrorOptics {
    /// Check physical consistency.
    pub fn validate(&self) -> Result<(), IntensityError> {
        if !(self.mirror_radius_m > 0.0) {
            return Err(IntensityError::InvalidOptics(format!(
                "mirror radius must be positive, got {}",
                self.mirror_radius_m
            )));
        }
        if self.hole_radius_m < 0.0 || self.secondary_radius_m < 0.0 {
            return Err(IntensityError::InvalidOptics(
                "hole and secondary radii must be non-negative".into(),
            ));
        }
        if !(self.ang_pixel_width_deg > 0.0) {
            return Err(IntensityError::InvalidOptics(format!(
                "pixel width must be positive, got {}",
                self.ang_pixel_width_deg
            )));
        }
        Ok(())
    }
}

// ── Fit configuration ──────────────────────────────────────────────────────

/// Controls for the coordinate-descent optimization and the derived
/// completeness metrics.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IntensityFitConfig {
    /// Maximum number of coordinate-descent sweeps before the fit is
    /// declared divergent.
    pub max_sweeps: usize,
    /// Relative objective-improvement tolerance that ends the descent.
    pub rel_tolerance: f64,
    /// Function evaluations per golden-section line search.
    pub line_search_evals: usize,
    /// Azimuthal bin count for `ring_completeness`.
    pub completeness_bins: usize,
    /// Per-bin charge threshold for `ring_completeness`, photoelectrons.
    pub completeness_threshold_pe: f64,
}

impl Default for IntensityFitConfig {
    fn default() -> Self {
        Self {
            max_sweeps: 60,
            rel_tolerance: 1e-6,
            line_search_evals: 48,
            completeness_bins: 30,
            completeness_threshold_pe: 30.0,
        }
    }
}

// ── Result record ──────────────────────────────────────────────────────────

/// Result of the photometric fit plus derived ring metrics.
///
/// Always carries the fitted impact parameter and ring width, even when the
/// downstream muon-found gate rejects the event, so rejected candidates stay
/// auditable.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IntensityParameters {
    /// Distance from the mirror center to the muon trajectory, meters.
    pub impact_parameter_m: f64,
    /// Gaussian ring width, degrees.
    pub ring_width_deg: f64,
    /// Azimuth of the impact direction in the camera frame, degrees.
    pub phase_deg: f64,
    /// Fitted global scale between model and observed charge; proportional
    /// to the optical throughput being calibrated.
    pub optical_efficiency: f64,
    /// Number of inlier pixels used by the fit.
    pub ring_size: usize,
    /// Fraction of azimuthal bins with signal above threshold, [0, 1].
    pub ring_completeness: f64,
    /// Fraction of width-band pixels above the picture threshold, [0, 1].
    pub ring_pix_completeness: f64,
    /// Telescope identifier.
    pub tel_id: u32,
    /// Observation block identifier.
    pub obs_id: u32,
    /// Event identifier.
    pub event_id: u64,
    /// The inlier mask the fit consumed.
    pub mask: Vec<bool>,
}
