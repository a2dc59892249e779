//! Coordinate-descent fit of the line-integration model.

use log::debug;

use super::model::{collection_length, radial_profile};
use super::types::{IntensityError, IntensityFitConfig, IntensityParameters, MirrorOptics};
use crate::features::{ring_completeness, ring_pix_completeness};
use crate::ring::RingGeometry;

/// Photometric fitter for one telescope's optics.
///
/// Holds the mirror constants and the optimization controls; the ring
/// geometry and pixel data are passed per fit. Create once per telescope,
/// fit many rings.
#[derive(Debug, Clone)]
pub struct MuonLineIntegrator {
    optics: MirrorOptics,
    config: IntensityFitConfig,
}

/// Masked pixel samples in ring-centered coordinates.
struct RingSamples {
    /// Azimuth around the ring center, radians.
    phi: Vec<f64>,
    /// Radial deviation from the ring, degrees.
    ring_dist_deg: Vec<f64>,
    /// Observed charge, photoelectrons.
    charge_pe: Vec<f64>,
    /// Azimuthal pixel coverage `pixel_width / radius`, unitless.
    pixel_factor: f64,
}

impl RingSamples {
    /// Sum of squared residuals with the model scale profiled out in closed
    /// form; returns `(sse, scale)`.
    fn sse_and_scale(
        &self,
        optics: &MirrorOptics,
        impact_m: f64,
        phase_rad: f64,
        width_deg: f64,
    ) -> (f64, f64) {
        let mut sum_qp = 0.0;
        let mut sum_pp = 0.0;
        let mut predictions = Vec::with_capacity(self.phi.len());
        for i in 0..self.phi.len() {
            let p = collection_length(optics, impact_m, self.phi[i] - phase_rad)
                * radial_profile(self.ring_dist_deg[i], width_deg)
                * self.pixel_factor;
            sum_qp += self.charge_pe[i] * p;
            sum_pp += p * p;
            predictions.push(p);
        }
        if sum_pp <= f64::MIN_POSITIVE {
            let sse = self.charge_pe.iter().map(|q| q * q).sum();
            return (sse, 0.0);
        }
        let scale = (sum_qp / sum_pp).max(0.0);
        let sse = self
            .charge_pe
            .iter()
            .zip(&predictions)
            .map(|(q, p)| (q - scale * p).powi(2))
            .sum();
        (sse, scale)
    }
}

impl MuonLineIntegrator {
    /// Fitter with default optimization controls.
    pub fn new(optics: MirrorOptics) -> Self {
        Self::with_config(optics, IntensityFitConfig::default())
    }

    /// Fitter with explicit optimization controls.
    pub fn with_config(optics: MirrorOptics, config: IntensityFitConfig) -> Self {
        Self { optics, config }
    }

    /// The optics this fitter models.
    pub fn optics(&self) -> &MirrorOptics {
        &self.optics
    }

    /// The optimization controls in use.
    pub fn config(&self) -> &IntensityFitConfig {
        &self.config
    }

    /// Fit impact parameter, impact-direction phase and ring width to the
    /// masked pixels, with the ring geometry held fixed.
    ///
    /// `picture_thresh_pe` only feeds the derived `ring_pix_completeness`
    /// metric. Identifiers on the returned record are zero; the pipeline
    /// fills them in.
    pub fn fit(
        &self,
        x_deg: &[f64],
        y_deg: &[f64],
        image_pe: &[f64],
        mask: &[bool],
        ring: &RingGeometry,
        picture_thresh_pe: f64,
    ) -> Result<IntensityParameters, IntensityError> {
        self.optics.validate()?;
        if !(ring.radius_deg > 0.0) {
            return Err(IntensityError::InvalidOptics(format!(
                "ring radius must be positive, got {}",
                ring.radius_deg
            )));
        }

        let samples = self.collect_samples(x_deg, y_deg, image_pe, mask, ring)?;
        let (impact_m, phase_rad, width_deg, efficiency) = self.minimize(&samples, ring)?;

        // Derived metrics are computed from the data, not the fit.
        let (mx, my, mq) = masked_arrays(x_deg, y_deg, image_pe, mask);
        let completeness = ring_completeness(
            &mx,
            &my,
            &mq,
            ring,
            self.config.completeness_threshold_pe,
            self.config.completeness_bins,
        );
        let pix_completeness =
            ring_pix_completeness(x_deg, y_deg, image_pe, ring, width_deg, picture_thresh_pe);

        Ok(IntensityParameters {
            impact_parameter_m: impact_m,
            ring_width_deg: width_deg,
            phase_deg: phase_rad.to_degrees(),
            optical_efficiency: efficiency,
            ring_size: mask.iter().filter(|&&m| m).count(),
            ring_completeness: completeness,
            ring_pix_completeness: pix_completeness,
            tel_id: 0,
            obs_id: 0,
            event_id: 0,
            mask: mask.to_vec(),
        })
    }

    fn collect_samples(
        &self,
        x_deg: &[f64],
        y_deg: &[f64],
        image_pe: &[f64],
        mask: &[bool],
        ring: &RingGeometry,
    ) -> Result<RingSamples, IntensityError> {
        debug_assert_eq!(x_deg.len(), y_deg.len());
        debug_assert_eq!(x_deg.len(), image_pe.len());
        debug_assert_eq!(x_deg.len(), mask.len());

        let mut samples = RingSamples {
            phi: Vec::new(),
            ring_dist_deg: Vec::new(),
            charge_pe: Vec::new(),
            pixel_factor: self.optics.ang_pixel_width_deg / ring.radius_deg,
        };
        for i in 0..x_deg.len() {
            if !mask[i] {
                continue;
            }
            let dx = x_deg[i] - ring.center_x_deg;
            let dy = y_deg[i] - ring.center_y_deg;
            samples.phi.push(dy.atan2(dx));
            samples.ring_dist_deg.push((dx.hypot(dy) - ring.radius_deg).abs());
            samples.charge_pe.push(image_pe[i]);
        }
        if samples.phi.is_empty() {
            return Err(IntensityError::EmptySelection);
        }
        Ok(samples)
    }

    /// Coordinate descent over (impact, phase, width), each coordinate
    /// minimized by a bounded golden-section line search.
    fn minimize(
        &self,
        samples: &RingSamples,
        ring: &RingGeometry,
    ) -> Result<(f64, f64, f64, f64), IntensityError> {
        use std::f64::consts::PI;

        let mirror_r = self.optics.mirror_radius_m;
        let impact_hi = 2.0 * mirror_r;
        let width_lo = 1e-3;
        let width_hi = (0.5 * ring.radius_deg).max(2.0 * self.optics.ang_pixel_width_deg);

        // Coarse seed over impact distance and phase; the objective is
        // periodic in phase, so the line search later stays within a
        // half-period window around the seed.
        let mut width = self
            .optics
            .ang_pixel_width_deg
            .clamp(2.0 * width_lo, width_hi);
        let mut impact = 0.5 * mirror_r;
        let mut phase = 0.0;
        let mut best = f64::INFINITY;
        for ib in 0..5 {
            let b = (0.1 + 0.2 * ib as f64) * mirror_r;
            for ip in 0..12 {
                let p = -PI + 2.0 * PI * ip as f64 / 12.0;
                let (sse, _) = samples.sse_and_scale(&self.optics, b, p, width);
                if sse < best {
                    best = sse;
                    impact = b;
                    phase = p;
                }
            }
        }
        let phase_window = (phase - 0.5 * PI, phase + 0.5 * PI);

        let evals = self.config.line_search_evals;
        let mut objective = best;
        for sweep in 0..self.config.max_sweeps {
            (impact, _) = golden_section_minimize(
                |b| samples.sse_and_scale(&self.optics, b, phase, width).0,
                0.0,
                impact_hi,
                evals,
            );
            (phase, _) = golden_section_minimize(
                |p| samples.sse_and_scale(&self.optics, impact, p, width).0,
                phase_window.0,
                phase_window.1,
                evals,
            );
            let (w, sse) = golden_section_minimize(
                |w| samples.sse_and_scale(&self.optics, impact, phase, w).0,
                width_lo,
                width_hi,
                evals,
            );
            width = w;

            let improved = objective - sse;
            objective = sse;
            if improved <= self.config.rel_tolerance * (1.0 + sse) {
                let (_, scale) = samples.sse_and_scale(&self.optics, impact, phase, width);
                debug!(
                    "intensity fit converged after {} sweeps: b={:.3} m, phase={:.3} rad, \
                     width={:.4} deg",
                    sweep + 1,
                    impact,
                    phase,
                    width
                );
                return Ok((impact, phase, width, scale));
            }
        }
        Err(IntensityError::Divergence {
            sweeps: self.config.max_sweeps,
        })
    }
}

fn masked_arrays(
    x_deg: &[f64],
    y_deg: &[f64],
    image_pe: &[f64],
    mask: &[bool],
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut qs = Vec::new();
    for i in 0..mask.len() {
        if mask[i] {
            xs.push(x_deg[i]);
            ys.push(y_deg[i]);
            qs.push(image_pe[i]);
        }
    }
    (xs, ys, qs)
}

/// Golden-section search for the minimum of `f` on `[a, b]`.
///
/// Returns `(x_min, f_min)`.
fn golden_section_minimize(f: impl Fn(f64) -> f64, mut a: f64, mut b: f64, max_evals: usize) -> (f64, f64) {
    const PHI: f64 = 1.618_033_988_749_895;
    const RESP: f64 = 2.0 - PHI;

    let mut x1 = a + RESP * (b - a);
    let mut x2 = b - RESP * (b - a);
    let mut f1 = f(x1);
    let mut f2 = f(x2);
    let mut evals = 2;

    while evals < max_evals && (b - a).abs() > 1e-18 {
        if f1 < f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = a + RESP * (b - a);
            f1 = f(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = b - RESP * (b - a);
            f2 = f(x2);
        }
        evals += 1;
    }

    if f1 < f2 {
        (x1, f1)
    } else {
        (x2, f2)
    }
}
