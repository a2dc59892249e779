//! Iterative ring refinement.
//!
//! Three fits with two mask-tightening steps in between. Each tightening
//! keeps only pixels whose radial deviation from the current ring is below a
//! fixed fraction of the ring radius, ANDed with the previous mask so that a
//! rejected pixel never re-enters. The round count is fixed on purpose: the
//! cleaning mask is assumed to have removed most pure noise already, and the
//! fixed schedule keeps results bit-reproducible across inputs.

use super::fit::{fit_ring, RingFitMethod};
use super::types::{RingFitError, RingGeometry};

/// A pixel counts as on-ring when its radial deviation is below this
/// fraction of the ring radius. Fixed, not telescope-dependent.
pub const RING_DIST_FRACTION: f64 = 0.4;

/// Run the fixed three-round fit, tightening the inlier mask after the
/// first and second fit.
///
/// Returns the third fit's geometry and the mask that fit consumed. Any fit
/// failure (see [`fit_ring`]) aborts the refinement and propagates.
pub fn refine_ring(
    x_deg: &[f64],
    y_deg: &[f64],
    charge_pe: &[f64],
    initial_mask: &[bool],
    method: RingFitMethod,
) -> Result<(RingGeometry, Vec<bool>), RingFitError> {
    let ring = fit_ring(x_deg, y_deg, charge_pe, initial_mask, method)?;
    let mask = tighten_mask(x_deg, y_deg, &ring, initial_mask);

    let ring = fit_ring(x_deg, y_deg, charge_pe, &mask, method)?;
    let mask = tighten_mask(x_deg, y_deg, &ring, &mask);

    let ring = fit_ring(x_deg, y_deg, charge_pe, &mask, method)?;
    Ok((ring, mask))
}

/// AND the previous mask with `ring_dist < RING_DIST_FRACTION * radius`.
fn tighten_mask(x_deg: &[f64], y_deg: &[f64], ring: &RingGeometry, mask: &[bool]) -> Vec<bool> {
    let limit = RING_DIST_FRACTION * ring.radius_deg;
    mask.iter()
        .enumerate()
        .map(|(i, &m)| {
            let dist = (x_deg[i] - ring.center_x_deg).hypot(y_deg[i] - ring.center_y_deg);
            m && (dist - ring.radius_deg).abs() < limit
        })
        .collect()
}
