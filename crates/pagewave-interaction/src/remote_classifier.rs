//! RemoteGestureClassifier - asks the gesture inference endpoint for a label.
//!
//! Each frame is JPEG-encoded and uploaded as a multipart `file` field.
//! The endpoint is best-effort: timeouts, non-2xx responses and malformed
//! bodies all become a `none` sample.

use async_trait::async_trait;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use pagewave_core::capture::Frame;
use pagewave_core::config::GestureConfig;
use pagewave_core::gesture::{GestureClassifier, GestureLabel, GestureSample};
use pagewave_core::{PagewaveError, Result};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct InferResponse {
    gesture: String,
    #[serde(default)]
    confidence: Option<f32>,
}

/// Gesture classifier backed by a remote inference service.
#[derive(Clone)]
pub struct RemoteGestureClassifier {
    client: Client,
    endpoint: String,
    jpeg_quality: u8,
}

impl RemoteGestureClassifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, jpeg_quality: u8) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PagewaveError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        })
    }

    pub fn from_config(config: &GestureConfig) -> Result<Self> {
        Self::new(
            config.inference_url.clone(),
            config.inference_timeout(),
            config.jpeg_quality,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one frame and returns the label the service reports.
    pub async fn infer(&self, frame: &Frame) -> Result<(GestureLabel, Option<f32>)> {
        let image = frame.image.clone();
        let quality = self.jpeg_quality;
        let jpeg = tokio::task::spawn_blocking(move || encode_jpeg(&image, quality))
            .await
            .map_err(|e| PagewaveError::internal(format!("frame encode task failed: {e}")))??;
        let part = Part::bytes(jpeg)
            .file_name("frame.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| PagewaveError::classification(format!("Invalid multipart part: {e}")))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PagewaveError::classification(format!("Inference request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PagewaveError::classification(format!(
                "Inference service answered {status}"
            )));
        }

        let parsed: InferResponse = response.json().await.map_err(|e| {
            PagewaveError::classification(format!("Failed to parse inference response: {e}"))
        })?;

        let label = GestureLabel::from_str(&parsed.gesture).map_err(|_| {
            PagewaveError::classification(format!("Unknown gesture label '{}'", parsed.gesture))
        })?;

        Ok((label, parsed.confidence))
    }
}

#[async_trait]
impl GestureClassifier for RemoteGestureClassifier {
    fn name(&self) -> &str {
        "remote"
    }

    async fn classify(&self, frame: &Frame) -> GestureSample {
        match self.infer(frame).await {
            Ok((label, confidence)) => {
                let sample = GestureSample::new(frame.captured_at, label);
                match confidence {
                    Some(c) => sample.with_confidence(c),
                    None => sample,
                }
            }
            Err(e) => {
                tracing::debug!(seq = frame.seq, error = %e, "remote classification degraded to none");
                GestureSample::none(frame.captured_at)
            }
        }
    }
}

/// Compresses an image to JPEG at the given quality (1-100). CPU-bound;
/// async callers run it on the blocking pool.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode_image(image)
        .map_err(|e| PagewaveError::classification(format!("Failed to encode frame: {e}")))?;
    Ok(buffer)
}
