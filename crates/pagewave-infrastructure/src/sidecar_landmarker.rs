//! SidecarLandmarker - hand landmarks recorded next to replayed frames.
//!
//! For a frame read from `clip/0007.png` the landmarks live in
//! `clip/0007.landmarks.json`:
//!
//! ```json
//! { "hands": [ [ { "x": 0.51, "y": 0.72, "z": 0.0 }, ... 21 points ... ] ] }
//! ```
//!
//! A missing sidecar or an empty `hands` list means no hand was detected.

use async_trait::async_trait;
use pagewave_core::capture::Frame;
use pagewave_core::gesture::{HandLandmarker, HandLandmarks, Landmark};
use pagewave_core::{PagewaveError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const SIDECAR_SUFFIX: &str = "landmarks.json";

#[derive(Debug, Deserialize)]
struct LandmarkFile {
    #[serde(default)]
    hands: Vec<Vec<Landmark>>,
}

#[derive(Debug, Default, Clone)]
pub struct SidecarLandmarker;

impl SidecarLandmarker {
    pub fn new() -> Self {
        Self
    }

    /// Path of the sidecar belonging to `frame_path`.
    pub fn sidecar_path(frame_path: &Path) -> PathBuf {
        let stem = frame_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        frame_path.with_file_name(format!("{stem}.{SIDECAR_SUFFIX}"))
    }
}

#[async_trait]
impl HandLandmarker for SidecarLandmarker {
    async fn detect(&self, frame: &Frame) -> Result<Option<HandLandmarks>> {
        let source = frame.source.as_ref().ok_or_else(|| {
            PagewaveError::classification("frame has no source file to read landmarks for")
        })?;
        let sidecar = Self::sidecar_path(source);

        let content = match tokio::fs::read_to_string(&sidecar).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: LandmarkFile = serde_json::from_str(&content).map_err(|e| {
            PagewaveError::classification(format!("invalid landmarks in {}: {e}", sidecar.display()))
        })?;

        // First detected hand only.
        file.hands
            .first()
            .map(|points| HandLandmarks::from_slice(points))
            .transpose()
    }
}
