//! Optical line-integration model.
//!
//! The Cherenkov light a camera pixel sees is proportional to the length of
//! the muon's light pool chord that the mirror collects at that pixel's ring
//! azimuth, minus whatever the central hole (and, for segmented optics, the
//! secondary mirror) obstructs. The radial spread around the nominal ring is
//! modeled as a Gaussian of the ring width.

use super::types::MirrorOptics;

/// Chord length of a disc of `radius_m` along azimuth `phi` for a muon
/// trajectory at distance `impact_m` from the disc center.
///
/// `phi` is measured from the impact direction. Zero where the line at that
/// azimuth misses the disc entirely.
pub(crate) fn chord_length(radius_m: f64, impact_m: f64, phi: f64) -> f64 {
    if radius_m <= 0.0 {
        return 0.0;
    }
    let rho = impact_m / radius_m;
    let s = 1.0 - rho * rho * phi.sin().powi(2);
    if s <= 0.0 {
        return 0.0;
    }
    if rho <= 1.0 {
        // Track point inside the disc: one chord from the track outwards.
        radius_m * (s.sqrt() + rho * phi.cos())
    } else {
        // Track point outside: the full secant, where it exists.
        2.0 * radius_m * s.sqrt()
    }
}

/// Net collected chord length at ring azimuth `phi`: primary mirror minus
/// hole minus (for segmented optics) the secondary, floored at zero.
pub(crate) fn collection_length(optics: &MirrorOptics, impact_m: f64, phi: f64) -> f64 {
    let mut length = chord_length(optics.mirror_radius_m, impact_m, phi)
        - chord_length(optics.hole_radius_m, impact_m, phi);
    if optics.sct {
        length -= chord_length(optics.secondary_radius_m, impact_m, phi);
    }
    length.max(0.0)
}

/// Unit-area Gaussian radial profile of the ring, degrees⁻¹.
pub(crate) fn radial_profile(ring_dist_deg: f64, width_deg: f64) -> f64 {
    let norm = 1.0 / (width_deg * (2.0 * std::f64::consts::PI).sqrt());
    norm * (-0.5 * (ring_dist_deg / width_deg).powi(2)).exp()
}
