//! Remote collaborators reached over HTTP.
//!
//! - [`HttpSessionService`]: the document session service
//! - [`RemoteGestureClassifier`]: the gesture inference service

pub mod remote_classifier;
pub mod session_client;

pub use remote_classifier::{RemoteGestureClassifier, encode_jpeg};
pub use session_client::HttpSessionService;
