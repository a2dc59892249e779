//! Ring geometry record and fit error type.

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that can occur during an algebraic circle fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingFitError {
    /// Too few masked pixels for the fit.
    TooFewPixels {
        /// Required minimum number of pixels.
        needed: usize,
        /// Provided number of masked pixels.
        got: usize,
    },
    /// The fit system is singular (collinear pixels or zero total weight).
    SingularSystem,
}

impl std::fmt::Display for RingFitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewPixels { needed, got } => {
                write!(f, "too few pixels for ring fit: need {needed}, got {got}")
            }
            Self::SingularSystem => write!(f, "singular ring-fit system"),
        }
    }
}

impl std::error::Error for RingFitError {}

// ── Geometry record ────────────────────────────────────────────────────────

/// Fitted ring geometry in pointing-centered degrees.
///
/// Identifiers and the containment score are zero until the pipeline fills
/// them in; the fit itself only produces center and radius.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RingGeometry {
    /// Ring center x offset, degrees.
    pub center_x_deg: f64,
    /// Ring center y offset, degrees.
    pub center_y_deg: f64,
    /// Ring radius, degrees. Always positive for a successful fit.
    pub radius_deg: f64,
    /// Telescope identifier.
    pub tel_id: u32,
    /// Observation block identifier.
    pub obs_id: u32,
    /// Event identifier.
    pub event_id: u64,
    /// Fraction of the ring circumference inside the camera field of view,
    /// in [0, 1].
    pub containment: f64,
}

impl RingGeometry {
    /// Geometry-only record with identifiers and containment left at zero.
    pub fn new(center_x_deg: f64, center_y_deg: f64, radius_deg: f64) -> Self {
        Self {
            center_x_deg,
            center_y_deg,
            radius_deg,
            tel_id: 0,
            obs_id: 0,
            event_id: 0,
            containment: 0.0,
        }
    }

    /// Distance of the ring center from the camera center, degrees.
    pub fn center_offset_deg(&self) -> f64 {
        self.center_x_deg.hypot(self.center_y_deg)
    }
}
