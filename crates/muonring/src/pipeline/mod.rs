//! Per-event orchestration: clean → project → refine → gate → integrate.

mod result;

pub use result::{AnalysisError, AnalysisErrorKind, TelescopeMuonRecord};

use log::{debug, warn};

use crate::cleaning::ImageCleaner;
use crate::config::{CutTable, TelescopeCutConfig};
use crate::event::{ArrayEvent, TelescopeData};
use crate::features::{npix_above_threshold, npix_composing_ring, ring_containment};
use crate::intensity::{IntensityFitConfig, IntensityParameters, MirrorOptics, MuonLineIntegrator};
use crate::projector::Projector;
use crate::ring::{refine_ring, RingFitMethod, RingGeometry};

// ── Selection gates ────────────────────────────────────────────────────────
//
// The thresholds and comparison operators below have not been independently
// validated against simulations; any change needs domain-expert review.

/// Geometric plausibility gate on a refined ring.
///
/// `masked_image` is the camera image with off-ring pixels zeroed (charge
/// times inlier mask). Muon rings are expected in the fixed absolute radius
/// window `[1.0, 1.5)` degrees regardless of telescope type.
pub fn is_ring_good(
    masked_image: &[f64],
    ring: &RingGeometry,
    cuts: &TelescopeCutConfig,
) -> bool {
    let enough_bright = npix_above_threshold(masked_image, cuts.tail_cuts.picture_thresh_pe)
        as f64
        > 0.1 * cuts.min_pix as f64;
    let enough_nonzero = npix_composing_ring(masked_image) as f64 > cuts.min_pix as f64;
    let center_inside = ring.center_offset_deg() < cuts.cam_radius_deg;
    enough_bright
        && enough_nonzero
        && center_inside
        && ring.radius_deg >= 1.0
        && ring.radius_deg < 1.5
}

/// Physical plausibility gate on a completed intensity fit.
///
/// The impact-parameter window scales with the mirror radius; both windows
/// are inclusive on both ends.
pub fn is_muon_found(
    intensity: &IntensityParameters,
    cuts: &TelescopeCutConfig,
    mirror_radius_m: f64,
) -> bool {
    let (impact_lo, impact_hi) = cuts.impact_range;
    let (width_lo, width_hi) = cuts.ring_width_range_deg;
    intensity.impact_parameter_m >= impact_lo * mirror_radius_m
        && intensity.impact_parameter_m <= impact_hi * mirror_radius_m
        && intensity.ring_width_deg >= width_lo
        && intensity.ring_width_deg <= width_hi
}

// ── Orchestrator ───────────────────────────────────────────────────────────

/// Per-event muon analysis driver.
///
/// Holds the injected cut table and the strategy choices; everything else is
/// per-call data. Telescopes are processed independently: one telescope's
/// failure never aborts its siblings, and nothing here retries a fit.
#[derive(Debug, Clone)]
pub struct MuonAnalyzer {
    cuts: CutTable,
    projector: Projector,
    ring_fit_method: RingFitMethod,
    intensity_config: IntensityFitConfig,
}

impl MuonAnalyzer {
    /// Analyzer over the given cut table with default strategies
    /// (fast projection, Chaudhuri–Kundu ring fit).
    pub fn new(cuts: CutTable) -> Self {
        Self {
            cuts,
            projector: Projector::default(),
            ring_fit_method: RingFitMethod::default(),
            intensity_config: IntensityFitConfig::default(),
        }
    }

    /// Select the coordinate projection strategy.
    pub fn with_projector(mut self, projector: Projector) -> Self {
        self.projector = projector;
        self
    }

    /// Select the algebraic ring-fit variant.
    pub fn with_ring_fit_method(mut self, method: RingFitMethod) -> Self {
        self.ring_fit_method = method;
        self
    }

    /// Override the intensity-fit controls.
    pub fn with_intensity_config(mut self, config: IntensityFitConfig) -> Self {
        self.intensity_config = config;
        self
    }

    /// The injected cut table.
    pub fn cuts(&self) -> &CutTable {
        &self.cuts
    }

    /// Analyze every telescope with data in the event.
    ///
    /// Returns one outcome per telescope in iteration order, except
    /// telescopes whose cleaning mask selects nothing: those produce no
    /// entry at all, which keeps "no signal" distinguishable from a failure.
    pub fn analyze_event(
        &self,
        event: &ArrayEvent,
        cleaner: &dyn ImageCleaner,
    ) -> Vec<Result<TelescopeMuonRecord, AnalysisError>> {
        event
            .telescopes
            .iter()
            .filter_map(|tel| self.analyze_telescope(event.obs_id, event.event_id, tel, cleaner))
            .collect()
    }

    fn analyze_telescope(
        &self,
        obs_id: u32,
        event_id: u64,
        tel: &TelescopeData,
        cleaner: &dyn ImageCleaner,
    ) -> Option<Result<TelescopeMuonRecord, AnalysisError>> {
        let Some(cuts) = self.cuts.get(&tel.telescope_name) else {
            return Some(Err(AnalysisError {
                tel_id: tel.tel_id,
                kind: AnalysisErrorKind::ConfigurationMissing {
                    telescope_name: tel.telescope_name.clone(),
                },
            }));
        };

        let clean_mask = cleaner.clean(&tel.image_pe, &cuts.tail_cuts);
        if !clean_mask.iter().any(|&m| m) {
            debug!("tel {}: empty cleaning mask, skipping", tel.tel_id);
            return None;
        }

        let (x_deg, y_deg) = self
            .projector
            .project(&tel.pix_x_m, &tel.pix_y_m, tel.focal_length_m);

        let (mut ring, mask) = match refine_ring(
            &x_deg,
            &y_deg,
            &tel.image_pe,
            &clean_mask,
            self.ring_fit_method,
        ) {
            Ok(out) => out,
            Err(err) => {
                return Some(Err(AnalysisError {
                    tel_id: tel.tel_id,
                    kind: AnalysisErrorKind::DegenerateFit(err),
                }))
            }
        };
        ring.tel_id = tel.tel_id;
        ring.obs_id = obs_id;
        ring.event_id = event_id;
        ring.containment = ring_containment(
            ring.radius_deg,
            cuts.cam_radius_deg,
            ring.center_x_deg,
            ring.center_y_deg,
        );

        let masked_image: Vec<f64> = tel
            .image_pe
            .iter()
            .zip(&mask)
            .map(|(&q, &m)| if m { q } else { 0.0 })
            .collect();

        let mut record = TelescopeMuonRecord {
            ring: ring.clone(),
            mirror_radius_m: tel.mirror_radius_m,
            intensity: None,
            muon_found: None,
        };

        if is_ring_good(&masked_image, &ring, cuts) {
            let optics = MirrorOptics {
                mirror_radius_m: tel.mirror_radius_m,
                hole_radius_m: cuts.hole_radius_m,
                secondary_radius_m: cuts.secondary_radius_m,
                sct: cuts.sct,
                ang_pixel_width_deg: cuts.ang_pixel_width_deg,
            };
            let integrator =
                MuonLineIntegrator::with_config(optics, self.intensity_config.clone());
            match integrator.fit(
                &x_deg,
                &y_deg,
                &tel.image_pe,
                &mask,
                &ring,
                cuts.tail_cuts.picture_thresh_pe,
            ) {
                Ok(mut intensity) => {
                    intensity.tel_id = tel.tel_id;
                    intensity.obs_id = obs_id;
                    intensity.event_id = event_id;
                    let found = is_muon_found(&intensity, cuts, tel.mirror_radius_m);
                    record.intensity = Some(intensity);
                    record.muon_found = Some(found);
                }
                // The ring stays useful for auditing, so the record is kept
                // without its intensity section.
                Err(err) => warn!("tel {}: intensity fit failed: {err}", tel.tel_id),
            }
        } else {
            debug!("tel {}: ring rejected by the ring-good gate", tel.tel_id);
        }

        Some(Ok(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::PictureThresholdCleaner;
    use crate::test_utils::{add_background, gaussian_ring_image, grid_camera};
    use approx::assert_relative_eq;

    fn toy_cuts(min_pix: u32) -> TelescopeCutConfig {
        TelescopeCutConfig {
            tail_cuts: crate::config::TailCuts {
                picture_thresh_pe: 10.0,
                boundary_thresh_pe: 12.0,
            },
            impact_range: (0.2, 0.9),
            ring_width_range_deg: (0.01, 0.1),
            total_pix: 1764,
            min_pix,
            cam_radius_deg: 3.87,
            ang_pixel_width_deg: 0.18,
            hole_radius_m: 0.244,
            secondary_radius_m: 0.0,
            sct: false,
        }
    }

    fn bright_masked_image(n: usize) -> Vec<f64> {
        vec![20.0; n]
    }

    #[test]
    fn ring_good_radius_window_boundaries() {
        let cuts = toy_cuts(2);
        let image = bright_masked_image(16);
        let at = |radius_deg: f64| {
            let ring = RingGeometry::new(0.1, 0.1, radius_deg);
            is_ring_good(&image, &ring, &cuts)
        };
        assert!(!at(1.0 - 1e-9));
        assert!(at(1.0));
        assert!(at(1.5 - 1e-9));
        assert!(!at(1.5));
    }

    #[test]
    fn ring_good_requires_center_inside_camera() {
        let cuts = toy_cuts(2);
        let image = bright_masked_image(16);
        let inside = RingGeometry::new(2.0, 2.0, 1.2);
        let outside = RingGeometry::new(3.0, 3.0, 1.2);
        assert!(is_ring_good(&image, &inside, &cuts));
        assert!(!is_ring_good(&image, &outside, &cuts));
    }

    #[test]
    fn ring_good_requires_enough_pixels() {
        let ring = RingGeometry::new(0.0, 0.0, 1.2);
        // 16 nonzero pixels but min_pix 100: fails the nonzero count.
        assert!(!is_ring_good(&bright_masked_image(16), &ring, &toy_cuts(100)));
        // Plenty of nonzero pixels but none above the picture threshold.
        let faint = vec![5.0; 300];
        assert!(!is_ring_good(&faint, &ring, &toy_cuts(100)));
    }

    fn toy_intensity(impact_m: f64, width_deg: f64) -> IntensityParameters {
        IntensityParameters {
            impact_parameter_m: impact_m,
            ring_width_deg: width_deg,
            phase_deg: 0.0,
            optical_efficiency: 1.0,
            ring_size: 200,
            ring_completeness: 1.0,
            ring_pix_completeness: 1.0,
            tel_id: 0,
            obs_id: 0,
            event_id: 0,
            mask: Vec::new(),
        }
    }

    #[test]
    fn muon_found_windows_are_inclusive() {
        let cuts = toy_cuts(141);
        let mirror_radius_m = 6.0;
        // Exactly at the low impact bound: accepted.
        assert!(is_muon_found(&toy_intensity(0.2 * 6.0, 0.05), &cuts, mirror_radius_m));
        // Exactly at the high width bound: accepted.
        assert!(is_muon_found(&toy_intensity(3.0, 0.1), &cuts, mirror_radius_m));
        // Just below the low impact bound: rejected.
        assert!(!is_muon_found(&toy_intensity(0.2 * 6.0 - 1e-9, 0.05), &cuts, mirror_radius_m));
        // Width outside its window: rejected.
        assert!(!is_muon_found(&toy_intensity(3.0, 0.2), &cuts, mirror_radius_m));
        assert!(!is_muon_found(&toy_intensity(3.0, 0.005), &cuts, mirror_radius_m));
        // Impact above the high bound: rejected.
        assert!(!is_muon_found(&toy_intensity(5.9, 0.05), &cuts, mirror_radius_m));
    }

    /// FlashCam-like toy telescope with a Gaussian ring drawn on a grid
    /// camera in focal-plane meters.
    fn toy_telescope(tel_id: u32, peak_pe: f64) -> TelescopeData {
        let (pix_x_m, pix_y_m) = grid_camera(1.1, 0.024);
        let mut image_pe =
            gaussian_ring_image(&pix_x_m, &pix_y_m, 0.3, 0.6, 0.3, 0.05, peak_pe);
        add_background(&mut image_pe, 5.0, 42);
        TelescopeData {
            tel_id,
            telescope_name: "MST_MST_FlashCam".into(),
            pix_x_m,
            pix_y_m,
            image_pe,
            focal_length_m: 16.0,
            mirror_radius_m: 6.0,
        }
    }

    #[test]
    fn end_to_end_toy_ring_is_recovered() {
        let event = ArrayEvent {
            obs_id: 1,
            event_id: 100,
            telescopes: vec![toy_telescope(4, 30.0)],
        };
        let analyzer = MuonAnalyzer::new(CutTable::builtin());
        let outcomes = analyzer.analyze_event(&event, &PictureThresholdCleaner);
        assert_eq!(outcomes.len(), 1);
        let record = outcomes[0].as_ref().unwrap();

        // Back-project the fitted geometry to focal-plane meters and compare
        // with the generating values.
        let f = 16.0;
        let ring = &record.ring;
        assert_relative_eq!(ring.center_x_deg.to_radians() * f, 0.3, max_relative = 0.1);
        assert_relative_eq!(ring.center_y_deg.to_radians() * f, 0.6, max_relative = 0.1);
        assert_relative_eq!(ring.radius_deg.to_radians() * f, 0.3, max_relative = 0.1);

        assert_eq!(ring.tel_id, 4);
        assert_eq!(ring.obs_id, 1);
        assert_eq!(ring.event_id, 100);
        assert_eq!(ring.containment, 1.0);
        assert_eq!(record.mirror_radius_m, 6.0);

        // The ring is bright and well-placed, so the intensity fit ran; a
        // centered ring is not a usable calibration muon, so the gate says no.
        let intensity = record.intensity.as_ref().expect("ring-good should pass");
        assert_eq!(intensity.tel_id, 4);
        assert!(intensity.ring_completeness > 0.9);
        assert_eq!(record.muon_found, Some(false));
    }

    #[test]
    fn all_zero_image_produces_no_entry() {
        let (pix_x_m, pix_y_m) = grid_camera(1.1, 0.024);
        let n = pix_x_m.len();
        let event = ArrayEvent {
            obs_id: 1,
            event_id: 101,
            telescopes: vec![TelescopeData {
                tel_id: 9,
                telescope_name: "MST_MST_FlashCam".into(),
                pix_x_m,
                pix_y_m,
                image_pe: vec![0.0; n],
                focal_length_m: 16.0,
                mirror_radius_m: 6.0,
            }],
        };
        let analyzer = MuonAnalyzer::new(CutTable::builtin());
        let outcomes = analyzer.analyze_event(&event, &PictureThresholdCleaner);
        assert!(outcomes.is_empty());
    }

    #[test]
    fn unknown_telescope_type_is_a_hard_error_but_spares_siblings() {
        let mut bad = toy_telescope(2, 30.0);
        bad.telescope_name = "MST_MST_HESSCam".into();
        let event = ArrayEvent {
            obs_id: 1,
            event_id: 102,
            telescopes: vec![bad, toy_telescope(3, 30.0)],
        };
        let analyzer = MuonAnalyzer::new(CutTable::builtin());
        let outcomes = analyzer.analyze_event(&event, &PictureThresholdCleaner);
        assert_eq!(outcomes.len(), 2);

        let err = outcomes[0].as_ref().unwrap_err();
        assert_eq!(err.tel_id, 2);
        assert_eq!(
            err.kind,
            AnalysisErrorKind::ConfigurationMissing {
                telescope_name: "MST_MST_HESSCam".into()
            }
        );
        assert!(outcomes[1].is_ok());
    }

    #[test]
    fn too_few_cleaned_pixels_surface_as_degenerate_fit() {
        let (pix_x_m, pix_y_m) = grid_camera(1.1, 0.024);
        let mut image_pe = vec![0.0; pix_x_m.len()];
        image_pe[10] = 50.0;
        image_pe[500] = 50.0;
        let event = ArrayEvent {
            obs_id: 1,
            event_id: 103,
            telescopes: vec![TelescopeData {
                tel_id: 6,
                telescope_name: "MST_MST_FlashCam".into(),
                pix_x_m,
                pix_y_m,
                image_pe,
                focal_length_m: 16.0,
                mirror_radius_m: 6.0,
            }],
        };
        let analyzer = MuonAnalyzer::new(CutTable::builtin());
        let outcomes = analyzer.analyze_event(&event, &PictureThresholdCleaner);
        assert_eq!(outcomes.len(), 1);
        let err = outcomes[0].as_ref().unwrap_err();
        assert_eq!(err.tel_id, 6);
        assert!(matches!(err.kind, AnalysisErrorKind::DegenerateFit(_)));
    }

    #[test]
    fn faint_ring_keeps_geometry_but_skips_intensity() {
        // Bright enough to clean and fit, too few pixels for the ring-good
        // pixel-count cut.
        let (pix_x_m, pix_y_m) = grid_camera(1.1, 0.06);
        let image_pe = gaussian_ring_image(&pix_x_m, &pix_y_m, 0.3, 0.6, 0.3, 0.05, 30.0);
        let event = ArrayEvent {
            obs_id: 1,
            event_id: 104,
            telescopes: vec![TelescopeData {
                tel_id: 5,
                telescope_name: "MST_MST_FlashCam".into(),
                pix_x_m,
                pix_y_m,
                image_pe,
                focal_length_m: 16.0,
                mirror_radius_m: 6.0,
            }],
        };
        let analyzer = MuonAnalyzer::new(CutTable::builtin());
        let outcomes = analyzer.analyze_event(&event, &PictureThresholdCleaner);
        assert_eq!(outcomes.len(), 1);
        let record = outcomes[0].as_ref().unwrap();
        assert!(record.intensity.is_none());
        assert!(record.muon_found.is_none());
        assert!(record.ring.radius_deg > 0.0);
    }
}
