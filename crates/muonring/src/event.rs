//! Per-event input containers handed to the analyzer.
//!
//! These mirror what the surrounding framework already knows about an event:
//! calibrated per-pixel charges, the focal-plane pixel layout and the optics
//! constants of each telescope that recorded data. The analyzer never reads
//! raw waveforms or files.

/// One telescope's data for one event.
///
/// Pixel positions are focal-plane coordinates in meters; `image_pe` holds
/// the calibrated charge of each pixel in photoelectrons. All three slices
/// have the same length.
#[derive(Debug, Clone)]
pub struct TelescopeData {
    /// Telescope identifier within the array.
    pub tel_id: u32,
    /// Telescope-type key used for cut lookup, e.g. `"MST_MST_FlashCam"`.
    pub telescope_name: String,
    /// Pixel x positions on the focal plane, meters.
    pub pix_x_m: Vec<f64>,
    /// Pixel y positions on the focal plane, meters.
    pub pix_y_m: Vec<f64>,
    /// Calibrated per-pixel charge, photoelectrons.
    pub image_pe: Vec<f64>,
    /// Equivalent focal length, meters.
    pub focal_length_m: f64,
    /// Primary mirror radius, meters.
    pub mirror_radius_m: f64,
}

/// One array event: identifiers plus every telescope with recorded data.
#[derive(Debug, Clone)]
pub struct ArrayEvent {
    /// Observation block identifier.
    pub obs_id: u32,
    /// Event identifier within the observation block.
    pub event_id: u64,
    /// Telescopes that recorded data for this event.
    pub telescopes: Vec<TelescopeData>,
}
