//! Configuration model.
//!
//! Every field has a default so a partial (or missing) `config.toml` is
//! always usable.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PagewaveError, Result};
use crate::gesture::{DEFAULT_DEBOUNCE_POLICY, DebouncePolicy};

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_INFERENCE_URL: &str = "http://localhost:8000/api/gestures/infer";

/// Recommended sampling window; slower starves the debouncer, faster lets
/// classification latency queue up.
pub const RECOMMENDED_SAMPLE_PERIOD_MS: std::ops::RangeInclusive<u64> = 600..=800;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Runs a hand-pose model in process
    Local,
    /// Sends each frame to the inference endpoint
    #[default]
    Remote,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PagewaveConfig {
    pub service: ServiceConfig,
    pub gestures: GestureConfig,
    pub camera: CameraConfig,
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    pub classifier: ClassifierKind,
    pub inference_url: String,
    pub inference_timeout_ms: u64,
    pub sample_period_ms: u64,
    pub cooldown_ms: u64,
    pub debounce_policy: DebouncePolicy,
    pub jpeg_quality: u8,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::default(),
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            inference_timeout_ms: 2_000,
            sample_period_ms: 700,
            cooldown_ms: 800,
            debounce_policy: DEFAULT_DEBOUNCE_POLICY,
            jpeg_quality: 70,
        }
    }
}

impl GestureConfig {
    pub fn sample_period(&self) -> Duration {
        Duration::from_millis(self.sample_period_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_millis(self.inference_timeout_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Directory of frames replayed as a camera
    pub frames_dir: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Also write a daily-rolling log file under the data directory
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
        }
    }
}

impl PagewaveConfig {
    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.service.base_url.trim().is_empty() {
            return Err(PagewaveError::config("service.base_url must not be empty"));
        }
        if self.service.request_timeout_ms == 0 {
            return Err(PagewaveError::config("service.request_timeout_ms must be > 0"));
        }

        let gestures = &self.gestures;
        if gestures.sample_period_ms == 0 {
            return Err(PagewaveError::config("gestures.sample_period_ms must be > 0"));
        }
        if gestures.cooldown_ms == 0 {
            return Err(PagewaveError::config("gestures.cooldown_ms must be > 0"));
        }
        if gestures.classifier == ClassifierKind::Remote {
            if gestures.inference_url.trim().is_empty() {
                return Err(PagewaveError::config(
                    "gestures.inference_url must be set for the remote classifier",
                ));
            }
            if gestures.inference_timeout_ms == 0 {
                return Err(PagewaveError::config("gestures.inference_timeout_ms must be > 0"));
            }
        }
        if !(1..=100).contains(&gestures.jpeg_quality) {
            return Err(PagewaveError::config(format!(
                "gestures.jpeg_quality must be within 1..=100, got {}",
                gestures.jpeg_quality
            )));
        }
        if !RECOMMENDED_SAMPLE_PERIOD_MS.contains(&gestures.sample_period_ms) {
            tracing::warn!(
                sample_period_ms = gestures.sample_period_ms,
                "sampling period outside the recommended 600-800 ms window"
            );
        }
        Ok(())
    }
}
