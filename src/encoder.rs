//! Still-frame JPEG encoding and burst capture.
//!
//! Raw camera frames are decoded and re-encoded as JPEG at a fixed quality
//! at their native resolution. A frame that cannot be decoded is dropped
//! with a warning instead of failing the whole capture.

use crate::camera::CameraSession;
use anyhow::Result;
use image::codecs::jpeg::JpegEncoder;
use image::GenericImageView;
use log::{debug, warn};
use std::thread;
use std::time::Duration;

/// Fixed JPEG quality for submitted stills.
pub const JPEG_QUALITY: u8 = 90;

/// Spacing between burst frames. Gives the classifier distinct expression
/// samples; a heuristic, not a correctness requirement.
pub const BURST_SPACING: Duration = Duration::from_millis(300);

/// Re-encode one raw frame as JPEG at [`JPEG_QUALITY`].
///
/// Returns `None` when the frame cannot be decoded or encoded; callers skip
/// such frames rather than aborting a burst over one bad sample.
#[must_use]
pub fn encode_jpeg(raw: &[u8]) -> Option<Vec<u8>> {
    let img = match image::load_from_memory(raw) {
        Ok(img) => img,
        Err(e) => {
            warn!("Skipping frame that failed to decode: {e}");
            return None;
        }
    };

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    if let Err(e) = encoder.encode_image(&img) {
        warn!("Skipping frame that failed to encode: {e}");
        return None;
    }

    debug!("Encoded {}x{} frame to {} bytes", img.width(), img.height(), out.len());
    Some(out)
}

/// Capture and encode `frames` stills from an open session, spaced by
/// [`BURST_SPACING`].
///
/// Frames that fail to encode are skipped. The burst runs sequentially on
/// the calling thread, so dropping the session cancels any further grabs.
///
/// # Errors
///
/// Returns an error if the stream dies mid-burst, or if every single frame
/// was unusable and there is nothing to submit.
pub fn capture_burst(session: &mut CameraSession, frames: usize) -> Result<Vec<Vec<u8>>> {
    let mut encoded = Vec::with_capacity(frames);

    for i in 0..frames {
        if i > 0 {
            thread::sleep(BURST_SPACING);
        }
        let raw = session.grab()?;
        if let Some(jpeg) = encode_jpeg(&raw) {
            encoded.push(jpeg);
        }
    }

    if encoded.is_empty() {
        anyhow::bail!("No usable frames captured; nothing to submit");
    }

    debug!("Burst complete: {}/{frames} frames usable", encoded.len());
    Ok(encoded)
}
