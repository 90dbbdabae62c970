//! Hand landmarks and the finger-extension label rule.
//!
//! Landmarks follow the common 21-point hand model with normalized image
//! coordinates in `[0, 1]`; smaller `y` is higher in the image.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::model::GestureLabel;
use crate::capture::Frame;
use crate::error::{PagewaveError, Result};

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;

pub const LANDMARK_COUNT: usize = 21;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// The landmarks of one detected hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Builds from a slice, which must hold exactly 21 points.
    pub fn from_slice(points: &[Landmark]) -> Result<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            PagewaveError::classification(format!(
                "expected {LANDMARK_COUNT} hand landmarks, got {}",
                points.len()
            ))
        })?;
        Ok(Self::new(points))
    }

    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    /// Tip above its proximal joint means the finger is extended.
    /// Out-of-range indices count as not extended.
    pub fn is_finger_up(&self, tip: usize, pip: usize) -> bool {
        match (self.get(tip), self.get(pip)) {
            (Some(tip), Some(pip)) => tip.y < pip.y,
            _ => false,
        }
    }

    pub fn index_up(&self) -> bool {
        self.is_finger_up(INDEX_TIP, INDEX_PIP)
    }

    pub fn middle_up(&self) -> bool {
        self.is_finger_up(MIDDLE_TIP, MIDDLE_PIP)
    }

    /// Index and middle up is `next`, index alone is `prev`, anything else
    /// is `none`.
    pub fn label(&self) -> GestureLabel {
        match (self.index_up(), self.middle_up()) {
            (true, true) => GestureLabel::Next,
            (true, false) => GestureLabel::Prev,
            _ => GestureLabel::None,
        }
    }
}

/// Label for an optional detection; no hand means `none`.
pub fn label_for(hand: Option<&HandLandmarks>) -> GestureLabel {
    hand.map(HandLandmarks::label).unwrap_or_default()
}

/// A hand-pose model: finds the first hand in a frame.
#[async_trait]
pub trait HandLandmarker: Send + Sync {
    /// Returns `Ok(None)` when no hand is visible.
    async fn detect(&self, frame: &Frame) -> Result<Option<HandLandmarks>>;
}
