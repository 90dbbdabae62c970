//! Builds pipeline components from configuration.

use anyhow::Result;
use async_trait::async_trait;
use pagewave_core::capture::{CaptureDevice, Frame};
use pagewave_core::config::{ClassifierKind, GestureConfig, PagewaveConfig};
use pagewave_core::document::SessionService;
use pagewave_core::gesture::GestureClassifier;
use pagewave_core::PagewaveError;
use pagewave_application::LandmarkClassifier;
use pagewave_infrastructure::{ReplayCamera, SidecarLandmarker};
use pagewave_interaction::{HttpSessionService, RemoteGestureClassifier};
use std::path::PathBuf;
use std::sync::Arc;

pub fn session_service(config: &PagewaveConfig) -> Result<Arc<dyn SessionService>> {
    let service = HttpSessionService::from_config(&config.service)?;
    tracing::debug!(base_url = service.base_url(), "session service configured");
    Ok(Arc::new(service))
}

pub fn classifier(config: &GestureConfig) -> Result<Arc<dyn GestureClassifier>> {
    let classifier: Arc<dyn GestureClassifier> = match config.classifier {
        ClassifierKind::Local => Arc::new(LandmarkClassifier::new(SidecarLandmarker::new())),
        ClassifierKind::Remote => Arc::new(RemoteGestureClassifier::from_config(config)?),
    };
    tracing::debug!(classifier = classifier.name(), "gesture classifier configured");
    Ok(classifier)
}

/// The replay camera for `frames` (or `camera.frames_dir`); without either,
/// a device that reports itself unavailable.
pub fn camera(config: &PagewaveConfig, frames: Option<PathBuf>) -> Arc<dyn CaptureDevice> {
    let device: Arc<dyn CaptureDevice> = match frames.or_else(|| config.camera.frames_dir.clone()) {
        Some(dir) => Arc::new(ReplayCamera::new(dir)),
        None => Arc::new(NoCamera),
    };
    device
}

struct NoCamera;

#[async_trait]
impl CaptureDevice for NoCamera {
    fn name(&self) -> &str {
        "none"
    }

    async fn acquire(&self) -> pagewave_core::Result<()> {
        Err(PagewaveError::device_unavailable(
            "no camera configured (set camera.frames_dir or pass --frames)",
        ))
    }

    async fn capture(&self, _seq: u64) -> pagewave_core::Result<Frame> {
        Err(PagewaveError::device_unavailable("no camera configured"))
    }

    fn release(&self) {}
}
