use async_trait::async_trait;

use super::model::GestureSample;
use crate::capture::Frame;

/// Reduces one frame to a gesture sample.
///
/// Implementations are chosen at construction time from configuration;
/// downstream stages only ever see this trait.
///
/// `classify` is infallible on purpose: a model error, a transport failure
/// or a malformed response all come back as a `none` sample stamped with
/// the frame's capture time.
#[async_trait]
pub trait GestureClassifier: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn classify(&self, frame: &Frame) -> GestureSample;
}
