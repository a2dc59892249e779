//! Per-telescope-type selection constants.
//!
//! Every telescope type comes with cleaning thresholds, acceptance windows
//! and camera constants that the pipeline reads but never derives. The table
//! is built once and injected into [`crate::MuonAnalyzer`]; a lookup miss is
//! a hard error, not a skip.

use std::collections::HashMap;

/// Two-level cleaning thresholds, photoelectrons.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TailCuts {
    /// Core ("picture") threshold.
    pub picture_thresh_pe: f64,
    /// Neighbor ("boundary") threshold.
    pub boundary_thresh_pe: f64,
}

/// Selection constants for one telescope type.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TelescopeCutConfig {
    /// Cleaning thresholds handed to the external cleaner.
    pub tail_cuts: TailCuts,
    /// Accepted impact-parameter window `(low, high)`, fractions of the
    /// mirror radius.
    pub impact_range: (f64, f64),
    /// Accepted ring-width window `(low, high)`, degrees.
    pub ring_width_range_deg: (f64, f64),
    /// Number of pixels in the camera.
    pub total_pix: u32,
    /// Minimum number of nonzero ring pixels for a usable ring.
    pub min_pix: u32,
    /// Camera field-of-view radius, degrees.
    pub cam_radius_deg: f64,
    /// Angular width of one pixel, degrees.
    pub ang_pixel_width_deg: f64,
    /// Radius of the central camera-support hole in the mirror, meters.
    pub hole_radius_m: f64,
    /// Secondary-mirror radius, meters (0 for single-mirror optics).
    pub secondary_radius_m: f64,
    /// Segmented (Schwarzschild–Couder) optics with a real secondary.
    pub sct: bool,
}

/// Cut table keyed by telescope-type name.
///
/// Read-only after construction; the analyzer borrows it for the lifetime of
/// the processing run.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CutTable {
    cuts: HashMap<String, TelescopeCutConfig>,
}

impl CutTable {
    /// Empty table. Entries are added with [`CutTable::insert`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the production constants for the eight supported
    /// telescope types.
    pub fn builtin() -> Self {
        #[allow(clippy::too_many_arguments)]
        fn cfg(
            tail: (f64, f64),
            impact: (f64, f64),
            width_deg: (f64, f64),
            total_pix: u32,
            min_pix: u32,
            cam_radius_deg: f64,
            ang_pixel_width_deg: f64,
            hole_radius_m: f64,
            secondary_radius_m: f64,
            sct: bool,
        ) -> TelescopeCutConfig {
            TelescopeCutConfig {
                tail_cuts: TailCuts {
                    picture_thresh_pe: tail.0,
                    boundary_thresh_pe: tail.1,
                },
                impact_range: impact,
                ring_width_range_deg: width_deg,
                total_pix,
                min_pix,
                cam_radius_deg,
                ang_pixel_width_deg,
                hole_radius_m,
                secondary_radius_m,
                sct,
            }
        }

        let mut table = Self::new();
        #[rustfmt::skip]
        let entries = [
            ("LST_LST_LSTCam",     cfg((5.0, 7.0),   (0.2, 0.9),  (0.04, 0.08), 1855,  148, 2.26, 0.1,   0.308,  0.0, false)),
            ("MST_MST_NectarCam",  cfg((5.0, 7.0),   (0.1, 0.95), (0.02, 0.1),  1855,  148, 3.96, 0.2,   0.244,  0.0, false)),
            ("MST_MST_FlashCam",   cfg((10.0, 12.0), (0.2, 0.9),  (0.01, 0.1),  1764,  141, 3.87, 0.18,  0.244,  0.0, false)),
            ("MST_SCT_SCTCam",     cfg((5.0, 7.0),   (0.2, 0.9),  (0.02, 0.1),  11328, 680, 4.0,  0.067, 4.3866, 2.7, true)),
            ("SST_1M_DigiCam",     cfg((5.0, 7.0),   (0.1, 0.95), (0.01, 0.5),  1296,  104, 4.45, 0.24,  0.160,  0.0, false)),
            ("SST_GCT_CHEC",       cfg((5.0, 7.0),   (0.1, 0.95), (0.02, 0.2),  2048,  164, 2.86, 0.2,   0.130,  1.0, true)),
            ("SST_ASTRI_ASTRICam", cfg((5.0, 7.0),   (0.1, 0.95), (0.02, 0.2),  2368,  142, 5.25, 0.17,  0.171,  1.8, true)),
            ("SST_ASTRI_CHEC",     cfg((5.0, 7.0),   (0.1, 0.95), (0.02, 0.2),  2048,  164, 2.86, 0.2,   0.171,  1.8, true)),
        ];
        for (name, cut) in entries {
            table.insert(name, cut);
        }
        table
    }

    /// Add or replace the entry for a telescope type.
    pub fn insert(&mut self, telescope_name: &str, cuts: TelescopeCutConfig) {
        self.cuts.insert(telescope_name.to_owned(), cuts);
    }

    /// Look up the entry for a telescope type.
    pub fn get(&self, telescope_name: &str) -> Option<&TelescopeCutConfig> {
        self.cuts.get(telescope_name)
    }

    /// Number of configured telescope types.
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_all_types() {
        let table = CutTable::builtin();
        assert_eq!(table.len(), 8);
        for name in [
            "LST_LST_LSTCam",
            "MST_MST_NectarCam",
            "MST_MST_FlashCam",
            "MST_SCT_SCTCam",
            "SST_1M_DigiCam",
            "SST_GCT_CHEC",
            "SST_ASTRI_ASTRICam",
            "SST_ASTRI_CHEC",
        ] {
            assert!(table.get(name).is_some(), "missing entry for {name}");
        }
        assert!(table.get("MST_MST_HESSCam").is_none());
    }

    #[test]
    fn flashcam_constants_are_stable() {
        let table = CutTable::builtin();
        let cut = table.get("MST_MST_FlashCam").unwrap();
        assert_eq!(cut.tail_cuts.picture_thresh_pe, 10.0);
        assert_eq!(cut.tail_cuts.boundary_thresh_pe, 12.0);
        assert_eq!(cut.impact_range, (0.2, 0.9));
        assert_eq!(cut.ring_width_range_deg, (0.01, 0.1));
        assert_eq!(cut.total_pix, 1764);
        assert_eq!(cut.min_pix, 141);
        assert_eq!(cut.cam_radius_deg, 3.87);
        assert_eq!(cut.ang_pixel_width_deg, 0.18);
        assert_eq!(cut.hole_radius_m, 0.244);
        assert_eq!(cut.secondary_radius_m, 0.0);
        assert!(!cut.sct);
    }

    #[test]
    fn sct_types_carry_a_secondary() {
        let table = CutTable::builtin();
        let expected = [
            ("MST_SCT_SCTCam", 2.7),
            ("SST_GCT_CHEC", 1.0),
            ("SST_ASTRI_ASTRICam", 1.8),
            ("SST_ASTRI_CHEC", 1.8),
        ];
        for (name, secondary_radius_m) in expected {
            let cut = table.get(name).unwrap();
            assert!(cut.sct, "{name}");
            assert_eq!(cut.secondary_radius_m, secondary_radius_m, "{name}");
        }
    }
}
