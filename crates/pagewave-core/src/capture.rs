//! Camera frames and the capture device trait.

use async_trait::async_trait;
use image::RgbImage;
use std::path::PathBuf;
use tokio::time::Instant;

use crate::error::Result;

/// One raw image taken from a capture device.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Monotonic sequence number within one sampling run
    pub seq: u64,
    pub captured_at: Instant,
    pub image: RgbImage,
    /// File the frame was read from, for replayed sources
    pub source: Option<PathBuf>,
}

impl Frame {
    pub fn new(seq: u64, image: RgbImage) -> Self {
        Self {
            seq,
            captured_at: Instant::now(),
            image,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// A camera, or anything that produces frames like one.
///
/// `acquire` and `release` bracket exclusive use of the device. `release`
/// is synchronous so it can run from `Drop` on every exit path.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Opens the device.
    ///
    /// # Errors
    ///
    /// `DeviceUnavailable` when permission is denied or no device exists.
    async fn acquire(&self) -> Result<()>;

    /// Grabs the next frame. Only valid between `acquire` and `release`.
    async fn capture(&self, seq: u64) -> Result<Frame>;

    /// Releases the device. Must be safe to call more than once.
    fn release(&self);
}
