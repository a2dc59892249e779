//! Focal-plane to on-sky angular projection.
//!
//! Pixel layouts are given in focal-plane meters; every downstream stage
//! works in degrees of angular offset from the telescope pointing. Two
//! strategies are available and the caller picks one explicitly; the choice
//! is never inferred from the telescope type.

/// Projection strategy from focal-plane meters to pointing-centered degrees.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Projector {
    /// Small-angle approximation `angle = value / focal_length`.
    ///
    /// Cheap and accurate near the optical axis; the pipeline default.
    /// Overestimates offsets in wide fields of view.
    #[default]
    FastSmallAngle,
    /// Exact spherical handling: the focal plane is a gnomonic projection of
    /// the sky, so the true field angle of a pixel at radial distance `rho`
    /// is `atan(rho / f)`. The pixel is reprojected azimuthal-equidistantly
    /// into the pointing-centered angular frame, preserving its azimuth.
    EquidistantReprojection,
}

impl Projector {
    /// Project one focal-plane position to angular offsets in degrees.
    pub fn project_point(self, x_m: f64, y_m: f64, focal_length_m: f64) -> (f64, f64) {
        match self {
            Self::FastSmallAngle => (
                (x_m / focal_length_m).to_degrees(),
                (y_m / focal_length_m).to_degrees(),
            ),
            Self::EquidistantReprojection => {
                let rho = x_m.hypot(y_m);
                if rho == 0.0 {
                    return (0.0, 0.0);
                }
                let theta_deg = (rho / focal_length_m).atan().to_degrees();
                (theta_deg * x_m / rho, theta_deg * y_m / rho)
            }
        }
    }

    /// Project full pixel-position slices; returns `(x_deg, y_deg)`.
    pub fn project(self, x_m: &[f64], y_m: &[f64], focal_length_m: f64) -> (Vec<f64>, Vec<f64>) {
        debug_assert_eq!(x_m.len(), y_m.len());
        let mut x_deg = Vec::with_capacity(x_m.len());
        let mut y_deg = Vec::with_capacity(y_m.len());
        for (&x, &y) in x_m.iter().zip(y_m) {
            let (xd, yd) = self.project_point(x, y, focal_length_m);
            x_deg.push(xd);
            y_deg.push(yd);
        }
        (x_deg, y_deg)
    }
}
