//! Local gesture classification from hand landmarks.

use async_trait::async_trait;
use pagewave_core::capture::Frame;
use pagewave_core::gesture::landmarks::label_for;
use pagewave_core::gesture::{GestureClassifier, GestureSample, HandLandmarker};

/// Runs a hand landmarker on each frame and applies the finger-extension
/// rule: index and middle up is `next`, index alone is `prev`.
pub struct LandmarkClassifier<L> {
    landmarker: L,
}

impl<L: HandLandmarker> LandmarkClassifier<L> {
    pub fn new(landmarker: L) -> Self {
        Self { landmarker }
    }
}

#[async_trait]
impl<L: HandLandmarker> GestureClassifier for LandmarkClassifier<L> {
    fn name(&self) -> &str {
        "local"
    }

    async fn classify(&self, frame: &Frame) -> GestureSample {
        match self.landmarker.detect(frame).await {
            Ok(hand) => {
                let label = label_for(hand.as_ref());
                tracing::trace!(seq = frame.seq, %label, hand = hand.is_some(), "frame classified");
                GestureSample::new(frame.captured_at, label)
            }
            Err(e) => {
                tracing::debug!(seq = frame.seq, error = %e, "landmark detection failed, treating as none");
                GestureSample::none(frame.captured_at)
            }
        }
    }
}
