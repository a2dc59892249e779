//! Weighted algebraic circle fits.
//!
//! Both methods linearize the circle equation and solve in closed form, so a
//! single fit is O(n) with no inner iteration. That makes them cheap enough
//! to run several times per image for outlier rejection, which is exactly
//! what the refinement loop does.

use nalgebra::{Matrix3, Vector3};

use super::types::{RingFitError, RingGeometry};

/// Algebraic fit variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RingFitMethod {
    /// Chaudhuri–Kundu: charge-weighted least squares on the linearized
    /// circle equation `x² + y² = 2 cx·x + 2 cy·y + (r² − cx² − cy²)`.
    /// The pipeline default.
    #[default]
    ChaudhuriKundu,
    /// Taubin: gradient-normalized algebraic fit via second-order moments
    /// and the smallest positive root of the characteristic cubic. Less
    /// biased toward small radii on short arcs.
    Taubin,
}

/// Fit a circle to the masked pixels, weighting each pixel by its charge.
///
/// Operates only where `mask` is true. Returns a geometry-only
/// [`RingGeometry`] (identifiers zeroed). Fails with
/// [`RingFitError::TooFewPixels`] below 3 masked pixels and
/// [`RingFitError::SingularSystem`] for collinear pixels or zero total
/// weight.
pub fn fit_ring(
    x_deg: &[f64],
    y_deg: &[f64],
    weights: &[f64],
    mask: &[bool],
    method: RingFitMethod,
) -> Result<RingGeometry, RingFitError> {
    debug_assert_eq!(x_deg.len(), y_deg.len());
    debug_assert_eq!(x_deg.len(), weights.len());
    debug_assert_eq!(x_deg.len(), mask.len());

    let points: Vec<[f64; 3]> = mask
        .iter()
        .enumerate()
        .filter(|&(_, &m)| m)
        .map(|(i, _)| [x_deg[i], y_deg[i], weights[i]])
        .collect();
    if points.len() < 3 {
        return Err(RingFitError::TooFewPixels {
            needed: 3,
            got: points.len(),
        });
    }

    // Normalize for numerical stability: shift to the weighted centroid and
    // scale so the weighted mean distance from it is ~sqrt(2).
    let (mx, my, scale) = normalization_params(&points)?;
    let normed: Vec<[f64; 3]> = points
        .iter()
        .map(|&[x, y, w]| [(x - mx) * scale, (y - my) * scale, w])
        .collect();

    let (cx, cy, r) = match method {
        RingFitMethod::ChaudhuriKundu => fit_chaudhuri_kundu(&normed)?,
        RingFitMethod::Taubin => fit_taubin(&normed)?,
    };

    let radius_deg = r / scale;
    if !radius_deg.is_finite() || radius_deg <= 0.0 {
        return Err(RingFitError::SingularSystem);
    }
    Ok(RingGeometry::new(mx + cx / scale, my + cy / scale, radius_deg))
}

/// Weighted centroid and scale such that the weighted mean distance from the
/// centroid becomes ~sqrt(2).
fn normalization_params(points: &[[f64; 3]]) -> Result<(f64, f64, f64), RingFitError> {
    let w_total: f64 = points.iter().map(|p| p[2]).sum();
    if !(w_total > 0.0) {
        return Err(RingFitError::SingularSystem);
    }
    let mx: f64 = points.iter().map(|p| p[0] * p[2]).sum::<f64>() / w_total;
    let my: f64 = points.iter().map(|p| p[1] * p[2]).sum::<f64>() / w_total;
    let mean_dist: f64 = points
        .iter()
        .map(|p| (p[0] - mx).hypot(p[1] - my) * p[2])
        .sum::<f64>()
        / w_total;
    let scale = if mean_dist > 1e-15 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        return Err(RingFitError::SingularSystem);
    };
    Ok((mx, my, scale))
}

/// Chaudhuri–Kundu closed-form solve in normalized coordinates.
///
/// With `g = [2x, 2y, 1]` and `z = x² + y²`, the weighted normal equations
/// are `(Σ w g gᵀ) p = Σ w g z` for `p = [cx, cy, r² − cx² − cy²]`.
fn fit_chaudhuri_kundu(points: &[[f64; 3]]) -> Result<(f64, f64, f64), RingFitError> {
    let w_total: f64 = points.iter().map(|p| p[2]).sum();
    let mut m = Matrix3::<f64>::zeros();
    let mut rhs = Vector3::<f64>::zeros();
    for &[x, y, w] in points {
        let g = Vector3::new(2.0 * x, 2.0 * y, 1.0);
        let z = x * x + y * y;
        m += (w / w_total) * g * g.transpose();
        rhs += (w / w_total) * g * z;
    }

    // Weights are normalized away above, and the caller fixed the coordinate
    // scale, so this threshold is dimensionless.
    if m.determinant().abs() < 1e-10 {
        return Err(RingFitError::SingularSystem);
    }
    let p = m.lu().solve(&rhs).ok_or(RingFitError::SingularSystem)?;

    let (cx, cy, c) = (p[0], p[1], p[2]);
    let r_sq = c + cx * cx + cy * cy;
    if !(r_sq > 0.0) {
        return Err(RingFitError::SingularSystem);
    }
    Ok((cx, cy, r_sq.sqrt()))
}

/// Weighted Taubin solve in normalized coordinates.
///
/// Builds the weighted second-order moments, takes the smallest positive
/// root `eta` of the characteristic cubic and recovers the center from the
/// reduced 2×2 system.
fn fit_taubin(points: &[[f64; 3]]) -> Result<(f64, f64, f64), RingFitError> {
    let w_total: f64 = points.iter().map(|p| p[2]).sum();
    // Input is already centered on the weighted centroid by the caller.
    let mut muu = 0.0;
    let mut mvv = 0.0;
    let mut muv = 0.0;
    let mut muz = 0.0;
    let mut mvz = 0.0;
    let mut mzz = 0.0;
    for &[u, v, w] in points {
        let z = u * u + v * v;
        muu += w * u * u;
        mvv += w * v * v;
        muv += w * u * v;
        muz += w * u * z;
        mvz += w * v * z;
        mzz += w * z * z;
    }
    muu /= w_total;
    mvv /= w_total;
    muv /= w_total;
    muz /= w_total;
    mvz /= w_total;
    mzz /= w_total;

    let mz = muu + mvv;
    let cov_xy = muu * mvv - muv * muv;
    let var_z = mzz - mz * mz;

    let a3 = 4.0 * mz;
    let a2 = -3.0 * mz * mz - mzz;
    let a1 = var_z * mz + 4.0 * cov_xy * mz - muz * muz - mvz * mvz;
    let a0 = muz * (muz * mvv - mvz * muv) + mvz * (mvz * muu - muz * muv) - var_z * cov_xy;
    if a3.abs() < 1e-15 {
        return Err(RingFitError::SingularSystem);
    }

    // Taubin's estimate is the smallest non-negative root of the
    // characteristic cubic. On exact circles that root is 0 and roundoff may
    // push it a hair below zero, hence the tolerance.
    let eta = solve_cubic_real(a3, a2, a1, a0)
        .into_iter()
        .filter(|e| e.is_finite() && *e > -1e-9)
        .fold(f64::INFINITY, f64::min);
    if !eta.is_finite() {
        return Err(RingFitError::SingularSystem);
    }

    let det = eta * eta - eta * mz + cov_xy;
    if det.abs() < 1e-12 {
        return Err(RingFitError::SingularSystem);
    }
    let cx = (muz * (mvv - eta) - mvz * muv) / (2.0 * det);
    let cy = (mvz * (muu - eta) - muz * muv) / (2.0 * det);
    let r_sq = cx * cx + cy * cy + mz;
    if !(r_sq > 0.0) {
        return Err(RingFitError::SingularSystem);
    }
    Ok((cx, cy, r_sq.sqrt()))
}

/// Solve a real cubic equation a x³ + b x² + c x + d = 0.
/// Returns all real roots (1 or 3).
fn solve_cubic_real(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    // Reduce to depressed cubic: t³ + pt + q = 0 with x = t - b/(3a)
    let a_inv = 1.0 / a;
    let b_ = b * a_inv;
    let c_ = c * a_inv;
    let d_ = d * a_inv;

    let p = c_ - b_ * b_ / 3.0;
    let q = 2.0 * b_ * b_ * b_ / 27.0 - b_ * c_ / 3.0 + d_;

    let disc = -4.0 * p * p * p - 27.0 * q * q;
    let shift = -b_ / 3.0;

    if disc >= 0.0 {
        // Three real roots (or repeated roots)
        let r = (-p / 3.0).sqrt();
        let cos_arg = if r.abs() < 1e-15 {
            0.0
        } else {
            (-q / (2.0 * r * r * r)).clamp(-1.0, 1.0)
        };
        let theta = cos_arg.acos();
        let two_r = 2.0 * r;

        vec![
            two_r * (theta / 3.0).cos() + shift,
            two_r * ((theta + 2.0 * std::f64::consts::PI) / 3.0).cos() + shift,
            two_r * ((theta + 4.0 * std::f64::consts::PI) / 3.0).cos() + shift,
        ]
    } else {
        // One real root (Cardano's formula)
        let sqrt_disc = (q * q / 4.0 + p * p * p / 27.0).sqrt();
        let u = (-q / 2.0 + sqrt_disc).cbrt();
        let v = (-q / 2.0 - sqrt_disc).cbrt();
        vec![u + v + shift]
    }
}
