//! Webcam acquisition via V4L2.
//!
//! Wraps a capture device and its memory-mapped stream in an owned session.
//! The device is released when the session is dropped, so teardown never
//! leaks the camera even if the caller forgets to close it explicitly.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::{Format, FourCC};

/// Preferred capture resolution requested from the driver.
const PREFERRED_WIDTH: u32 = 1280;
const PREFERRED_HEIGHT: u32 = 720;

/// Fallback resolution when the driver rejects the preferred format.
const FALLBACK_WIDTH: u32 = 640;
const FALLBACK_HEIGHT: u32 = 480;

/// An open capture session owning the device and its live stream.
///
/// Exists from [`CameraSession::open`] until drop; never persisted. Only one
/// command owns a session at a time, so no other component can touch the
/// stream while it is live.
pub struct CameraSession {
    stream: MmapStream<'static>,
    // Kept alive for the duration of the stream; the fd closes on drop.
    _device: Device,
    format: Format,
}

impl CameraSession {
    /// Open `/dev/video<index>` and start streaming.
    ///
    /// Requests 1280x720 MJPG and accepts whatever nearby format the driver
    /// settles on, falling back to 640x480 when the preferred size is
    /// refused outright.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is missing, permission is denied, or
    /// the stream cannot be started. Capture stays inactive in that case.
    pub fn open(index: usize) -> Result<Self> {
        let device = Device::new(index).with_context(|| {
            format!("Failed to open camera device /dev/video{index}")
        })?;

        let format = negotiate_format(&device)?;
        info!(
            "Camera ready: /dev/video{index} at {}x{} ({})",
            format.width, format.height, format.fourcc
        );

        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, 4)
            .context("Failed to start camera stream")?;

        // The first frame after stream start is often underexposed while the
        // sensor settles; throw one away.
        if stream.next().is_err() {
            warn!("Could not read warm-up frame from camera");
        }

        Ok(Self {
            stream,
            _device: device,
            format,
        })
    }

    /// Grab exactly one raw frame from the live stream.
    ///
    /// The returned bytes are in the negotiated pixel format (normally a
    /// complete MJPG image); decoding is the encoder's concern.
    pub fn grab(&mut self) -> Result<Vec<u8>> {
        let (data, meta) = self
            .stream
            .next()
            .context("Failed to read a frame from the camera")?;
        debug!("Grabbed frame {}: {} bytes", meta.sequence, data.len());
        Ok(data.to_vec())
    }

    /// Negotiated capture resolution.
    #[must_use]
    pub fn resolution(&self) -> (u32, u32) {
        (self.format.width, self.format.height)
    }

    /// Release the camera. Dropping the session does the same; this exists
    /// so call sites can make the hand-back explicit. Consuming `self` makes
    /// a double release impossible.
    pub fn close(self) {
        debug!("Releasing camera device");
    }
}

/// Ask the driver for the preferred format and fall back if it refuses.
fn negotiate_format(device: &Device) -> Result<Format> {
    let requested = Format::new(PREFERRED_WIDTH, PREFERRED_HEIGHT, FourCC::new(b"MJPG"));
    let actual = device
        .set_format(&requested)
        .context("Failed to configure camera format")?;

    // Drivers adjust the request to the nearest supported size. A zero
    // dimension means the negotiation produced nothing usable.
    if actual.width == 0 || actual.height == 0 {
        warn!("Camera rejected {PREFERRED_WIDTH}x{PREFERRED_HEIGHT}, falling back to {FALLBACK_WIDTH}x{FALLBACK_HEIGHT}");
        let fallback = Format::new(FALLBACK_WIDTH, FALLBACK_HEIGHT, FourCC::new(b"MJPG"));
        return device
            .set_format(&fallback)
            .context("Failed to configure fallback camera format");
    }

    if actual.width != PREFERRED_WIDTH || actual.height != PREFERRED_HEIGHT {
        debug!(
            "Camera negotiated {}x{} instead of {PREFERRED_WIDTH}x{PREFERRED_HEIGHT}",
            actual.width, actual.height
        );
    }

    Ok(actual)
}
