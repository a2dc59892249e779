//! Shared synthetic-event helpers for unit tests.
//!
//! Consolidated here so the ring, intensity and pipeline tests all draw the
//! same toy cameras and ring images instead of growing private copies.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ring::RingGeometry;

/// Square-grid toy camera covering `[-half_extent, half_extent]²` with the
/// given pixel pitch. Units are whatever the caller needs (meters for
/// focal-plane layouts, degrees for pre-projected ones).
pub(crate) fn grid_camera(half_extent: f64, pitch: f64) -> (Vec<f64>, Vec<f64>) {
    let n = (2.0 * half_extent / pitch).round() as i64 + 1;
    let mut xs = Vec::with_capacity((n * n) as usize);
    let mut ys = Vec::with_capacity((n * n) as usize);
    for iy in 0..n {
        for ix in 0..n {
            xs.push(-half_extent + ix as f64 * pitch);
            ys.push(-half_extent + iy as f64 * pitch);
        }
    }
    (xs, ys)
}

/// Noise-free Gaussian ring: charge `peak_pe * exp(-ring_dist² / 2 sigma²)`
/// per pixel.
pub(crate) fn gaussian_ring_image(
    xs: &[f64],
    ys: &[f64],
    center_x: f64,
    center_y: f64,
    radius: f64,
    sigma: f64,
    peak_pe: f64,
) -> Vec<f64> {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let ring_dist = (x - center_x).hypot(y - center_y) - radius;
            peak_pe * (-0.5 * (ring_dist / sigma).powi(2)).exp()
        })
        .collect()
}

/// Add reproducible uniform background in `[0, level_pe)` to every pixel.
pub(crate) fn add_background(image: &mut [f64], level_pe: f64, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for q in image.iter_mut() {
        *q += rng.gen_range(0.0..level_pe);
    }
}

/// `n` pixels evenly spaced on the ring circumference.
pub(crate) fn ring_pixels(ring: &RingGeometry, n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for i in 0..n {
        let phi = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
        xs.push(ring.center_x_deg + ring.radius_deg * phi.cos());
        ys.push(ring.center_y_deg + ring.radius_deg * phi.sin());
    }
    (xs, ys)
}
