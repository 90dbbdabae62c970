use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tokio::time::Instant;

/// Per-frame classification result.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GestureLabel {
    #[default]
    None,
    Prev,
    Next,
}

impl GestureLabel {
    /// The navigation direction this label asks for, if any.
    pub fn kind(self) -> Option<GestureKind> {
        match self {
            GestureLabel::None => None,
            GestureLabel::Prev => Some(GestureKind::Prev),
            GestureLabel::Next => Some(GestureKind::Next),
        }
    }
}

/// Direction of a discrete gesture event. There is no `none` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GestureKind {
    Prev,
    Next,
}

impl From<GestureKind> for GestureLabel {
    fn from(kind: GestureKind) -> Self {
        match kind {
            GestureKind::Prev => GestureLabel::Prev,
            GestureKind::Next => GestureLabel::Next,
        }
    }
}

/// One sampled frame's classification. Consumed by the debouncer and dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub timestamp: Instant,
    pub label: GestureLabel,
    pub confidence: Option<f32>,
}

impl GestureSample {
    pub fn new(timestamp: Instant, label: GestureLabel) -> Self {
        Self {
            timestamp,
            label,
            confidence: None,
        }
    }

    /// A `none` sample, used wherever a failure degrades to "no gesture".
    pub fn none(timestamp: Instant) -> Self {
        Self::new(timestamp, GestureLabel::None)
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// A debounced, edge-triggered navigation trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub emitted_at: Instant,
}
