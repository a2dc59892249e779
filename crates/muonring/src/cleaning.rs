//! Boundary to the external image-cleaning step.
//!
//! Proper tail-cuts cleaning needs the camera neighbor graph and lives with
//! the camera description, outside this crate. The analyzer only needs a
//! boolean signal mask, so the cleaning step is a trait object injected per
//! call.

use crate::config::TailCuts;

/// Produces a boolean signal mask for a camera image.
///
/// `true` marks a pixel as likely signal under the given tail cuts. The
/// returned mask has the same length as `image_pe`.
pub trait ImageCleaner {
    fn clean(&self, image_pe: &[f64], cuts: &TailCuts) -> Vec<bool>;
}

/// Picture-threshold-only cleaner: keeps pixels at or above the picture
/// threshold, ignoring the boundary threshold.
///
/// A stand-in for neighbor-aware tail-cuts cleaning, sufficient for tests
/// and toy examples where the signal is well above noise.
#[derive(Debug, Clone, Copy, Default)]
pub struct PictureThresholdCleaner;

impl ImageCleaner for PictureThresholdCleaner {
    fn clean(&self, image_pe: &[f64], cuts: &TailCuts) -> Vec<bool> {
        image_pe
            .iter()
            .map(|&q| q >= cuts.picture_thresh_pe)
            .collect()
    }
}
