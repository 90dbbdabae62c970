//! ReplayCamera - a capture device that cycles through image files.
//!
//! Useful for headless runs and tests. Frames are read in filename order
//! and wrap around at the end of the directory.

use async_trait::async_trait;
use pagewave_core::capture::{CaptureDevice, Frame};
use pagewave_core::{PagewaveError, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub struct ReplayCamera {
    dir: PathBuf,
    frames: Mutex<Vec<PathBuf>>,
    cursor: AtomicUsize,
    acquired: AtomicBool,
}

impl ReplayCamera {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            frames: Mutex::new(Vec::new()),
            cursor: AtomicUsize::new(0),
            acquired: AtomicBool::new(false),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired.load(Ordering::SeqCst)
    }

    async fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            PagewaveError::device_unavailable(format!("cannot open {}: {e}", self.dir.display()))
        })?;

        let mut frames = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_frame = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if is_frame {
                frames.push(path);
            }
        }
        frames.sort();
        Ok(frames)
    }

    fn next_path(&self) -> Result<PathBuf> {
        let frames = self
            .frames
            .lock()
            .map_err(|_| PagewaveError::internal("replay frame list poisoned"))?;
        if frames.is_empty() {
            return Err(PagewaveError::device_unavailable("replay camera has no frames"));
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % frames.len();
        Ok(frames[index].clone())
    }
}

#[async_trait]
impl CaptureDevice for ReplayCamera {
    fn name(&self) -> &str {
        "replay"
    }

    async fn acquire(&self) -> Result<()> {
        let frames = self.scan().await?;
        if frames.is_empty() {
            return Err(PagewaveError::device_unavailable(format!(
                "no frames found in {}",
                self.dir.display()
            )));
        }

        tracing::info!(dir = %self.dir.display(), frames = frames.len(), "replay camera acquired");
        *self
            .frames
            .lock()
            .map_err(|_| PagewaveError::internal("replay frame list poisoned"))? = frames;
        self.cursor.store(0, Ordering::SeqCst);
        self.acquired.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn capture(&self, seq: u64) -> Result<Frame> {
        if !self.is_acquired() {
            return Err(PagewaveError::device_unavailable("replay camera is not acquired"));
        }

        let path = self.next_path()?;
        let decode_path = path.clone();
        let image = tokio::task::spawn_blocking(move || image::open(&decode_path))
            .await
            .map_err(|e| PagewaveError::internal(format!("frame decode task failed: {e}")))??
            .to_rgb8();

        Ok(Frame::new(seq, image).with_source(path))
    }

    fn release(&self) {
        if self.acquired.swap(false, Ordering::SeqCst) {
            tracing::info!(dir = %self.dir.display(), "replay camera released");
        }
        if let Ok(mut frames) = self.frames.lock() {
            frames.clear();
        }
    }
}
