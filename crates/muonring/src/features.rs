//! Scalar image features of a fitted ring.
//!
//! Everything here is a pure function of pixel arrays and a ring geometry;
//! the pipeline composes these into the selection gates and result records.

use crate::ring::RingGeometry;

/// Radial deviation of every pixel from the ring, degrees:
/// `|dist(pixel, center) - radius|`.
pub fn ring_distances(x_deg: &[f64], y_deg: &[f64], ring: &RingGeometry) -> Vec<f64> {
    x_deg
        .iter()
        .zip(y_deg)
        .map(|(&x, &y)| {
            let dist = (x - ring.center_x_deg).hypot(y - ring.center_y_deg);
            (dist - ring.radius_deg).abs()
        })
        .collect()
}

/// Number of pixels strictly above a charge threshold.
pub fn npix_above_threshold(image_pe: &[f64], thresh_pe: f64) -> usize {
    image_pe.iter().filter(|&&q| q > thresh_pe).count()
}

/// Number of pixels with nonzero charge.
pub fn npix_composing_ring(image_pe: &[f64]) -> usize {
    npix_above_threshold(image_pe, 0.0)
}

/// Fraction of the ring circumference inside the camera field of view.
///
/// Treats the camera as a disc of `cam_radius_deg` around the origin and the
/// ring as a circle of `radius_deg` around `(center_x_deg, center_y_deg)`;
/// the overlap arc comes from the circle-circle intersection angle.
pub fn ring_containment(
    radius_deg: f64,
    cam_radius_deg: f64,
    center_x_deg: f64,
    center_y_deg: f64,
) -> f64 {
    let d = center_x_deg.hypot(center_y_deg);
    if d + radius_deg <= cam_radius_deg {
        return 1.0;
    }
    if d >= cam_radius_deg + radius_deg || d == 0.0 {
        // Fully outside, or concentric with a ring larger than the camera.
        return 0.0;
    }
    let cos_half_arc =
        (d * d + radius_deg * radius_deg - cam_radius_deg * cam_radius_deg) / (2.0 * d * radius_deg);
    cos_half_arc.clamp(-1.0, 1.0).acos() / std::f64::consts::PI
}

/// Fraction of azimuthal bins around the ring with summed charge above
/// `threshold_pe`.
///
/// The caller passes the pixels it considers part of the ring (usually the
/// masked ones). Result is in [0, 1] by construction.
pub fn ring_completeness(
    x_deg: &[f64],
    y_deg: &[f64],
    charge_pe: &[f64],
    ring: &RingGeometry,
    threshold_pe: f64,
    bins: usize,
) -> f64 {
    if bins == 0 {
        return 0.0;
    }
    let mut bin_charge = vec![0.0f64; bins];
    for ((&x, &y), &q) in x_deg.iter().zip(y_deg).zip(charge_pe) {
        let phi = (y - ring.center_y_deg).atan2(x - ring.center_x_deg);
        // Map (-pi, pi] onto [0, bins).
        let frac = (phi + std::f64::consts::PI) / (2.0 * std::f64::consts::PI);
        let bin = ((frac * bins as f64) as usize).min(bins - 1);
        bin_charge[bin] += q;
    }
    let filled = bin_charge.iter().filter(|&&c| c > threshold_pe).count();
    filled as f64 / bins as f64
}

/// Fraction of pixels inside the fitted width band (`ring_dist <
/// ring_width_deg`) whose charge exceeds the picture threshold.
///
/// Returns 0 when the band contains no pixels at all.
pub fn ring_pix_completeness(
    x_deg: &[f64],
    y_deg: &[f64],
    image_pe: &[f64],
    ring: &RingGeometry,
    ring_width_deg: f64,
    picture_thresh_pe: f64,
) -> f64 {
    let mut in_band = 0usize;
    let mut bright = 0usize;
    for (dist, &q) in ring_distances(x_deg, y_deg, ring).iter().zip(image_pe) {
        if *dist < ring_width_deg {
            in_band += 1;
            if q > picture_thresh_pe {
                bright += 1;
            }
        }
    }
    if in_band == 0 {
        return 0.0;
    }
    bright as f64 / in_band as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ring_pixels;
    use approx::assert_relative_eq;

    #[test]
    fn counts_distinguish_nonzero_and_above_threshold() {
        let image = [0.0, 0.5, 10.0, 12.0, 0.0];
        assert_eq!(npix_composing_ring(&image), 3);
        assert_eq!(npix_above_threshold(&image, 10.0), 1);
    }

    #[test]
    fn containment_is_one_when_fully_inside() {
        assert_eq!(ring_containment(1.0, 4.0, 0.5, 0.5), 1.0);
        // Concentric ring exactly as large as the camera counts as inside.
        assert_eq!(ring_containment(2.0, 2.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn containment_is_zero_when_fully_outside() {
        assert_eq!(ring_containment(1.0, 2.0, 6.0, 0.0), 0.0);
    }

    #[test]
    fn containment_is_half_for_center_on_the_edge() {
        // Ring centered on the camera edge, small radius: about half the
        // circumference is inside.
        let c = ring_containment(0.1, 3.0, 3.0, 0.0);
        assert_relative_eq!(c, 0.5, epsilon = 0.02);
    }

    #[test]
    fn completeness_spans_zero_to_one() {
        let ring = RingGeometry::new(0.0, 0.0, 1.2);
        let (xs, ys) = ring_pixels(&ring, 120);
        let bright = vec![50.0; xs.len()];
        assert_eq!(ring_completeness(&xs, &ys, &bright, &ring, 30.0, 30), 1.0);
        let faint = vec![0.1; xs.len()];
        assert_eq!(ring_completeness(&xs, &ys, &faint, &ring, 30.0, 30), 0.0);
    }

    #[test]
    fn completeness_sees_a_half_ring() {
        let ring = RingGeometry::new(0.0, 0.0, 1.0);
        let (xs, ys) = ring_pixels(&ring, 120);
        // Only the upper half carries charge.
        let charge: Vec<f64> = ys.iter().map(|&y| if y > 0.0 { 60.0 } else { 0.0 }).collect();
        let c = ring_completeness(&xs, &ys, &charge, &ring, 30.0, 30);
        assert!((0.4..=0.6).contains(&c), "c = {c}");
    }

    #[test]
    fn pix_completeness_counts_only_the_width_band() {
        let ring = RingGeometry::new(0.0, 0.0, 1.0);
        let xs = [1.0, 1.02, 1.5, -1.01];
        let ys = [0.0, 0.0, 0.0, 0.0];
        // Pixels 0, 1, 3 are within 0.05 deg of the ring; pixel 2 is not.
        let image = [20.0, 3.0, 100.0, 15.0];
        let f = ring_pix_completeness(&xs, &ys, &image, &ring, 0.05, 10.0);
        assert_relative_eq!(f, 2.0 / 3.0, epsilon = 1e-12);
        // A zero-width band contains no pixels at all.
        assert_eq!(
            ring_pix_completeness(&xs, &ys, &image, &ring, 0.0, 10.0),
            0.0
        );
    }
}
