//! Analyze a synthetic muon ring on a toy FlashCam-style camera and print
//! the resulting records as JSON.

use muonring::{ArrayEvent, CutTable, MuonAnalyzer, PictureThresholdCleaner, TelescopeData};

/// Square-grid camera covering [-1.1, 1.1] m with 24 mm pitch.
fn grid_camera() -> (Vec<f64>, Vec<f64>) {
    let pitch: f64 = 0.024;
    let half: f64 = 1.1;
    let n = (2.0 * half / pitch).round() as i64 + 1;
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for iy in 0..n {
        for ix in 0..n {
            xs.push(-half + ix as f64 * pitch);
            ys.push(-half + iy as f64 * pitch);
        }
    }
    (xs, ys)
}

fn main() {
    let (pix_x_m, pix_y_m) = grid_camera();
    let image_pe: Vec<f64> = pix_x_m
        .iter()
        .zip(&pix_y_m)
        .map(|(&x, &y)| {
            let ring_dist = (x - 0.3).hypot(y - 0.6) - 0.3;
            30.0 * (-0.5 * (ring_dist / 0.05).powi(2)).exp()
        })
        .collect();

    let event = ArrayEvent {
        obs_id: 1,
        event_id: 1,
        telescopes: vec![TelescopeData {
            tel_id: 1,
            telescope_name: "MST_MST_FlashCam".into(),
            pix_x_m,
            pix_y_m,
            image_pe,
            focal_length_m: 16.0,
            mirror_radius_m: 6.0,
        }],
    };

    let analyzer = MuonAnalyzer::new(CutTable::builtin());
    for outcome in analyzer.analyze_event(&event, &PictureThresholdCleaner) {
        match outcome {
            Ok(record) => match serde_json::to_string_pretty(&record) {
                Ok(json) => println!("{json}"),
                Err(err) => eprintln!("serialization failed: {err}"),
            },
            Err(err) => eprintln!("analysis failed: {err}"),
        }
    }
}
