//! Application layer for Pagewave.
//!
//! Wires the gesture pipeline together: the sampler owns the camera, the
//! classifier and debouncer turn frames into events, the dispatcher turns
//! events into page changes and the synchronizer owns the selected session.

pub mod dispatcher;
pub mod frame_sampler;
pub mod landmark_classifier;
pub mod navigator;
pub mod notice;
pub mod session_sync;

pub use dispatcher::{DispatchOutcome, NavigationDispatcher, SkipReason};
pub use frame_sampler::{FrameSampler, SamplerLease};
pub use landmark_classifier::LandmarkClassifier;
pub use navigator::{GestureNavigator, NavigatorSettings};
pub use notice::{Notice, NoticeLevel, NoticeSender};
pub use session_sync::SessionSynchronizer;
