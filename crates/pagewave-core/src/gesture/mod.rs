//! Gesture domain module.
//!
//! - `model`: labels, samples and events
//! - `debouncer`: the `Idle`/`Cooldown` state machine
//! - `landmarks`: hand landmarks, the finger-extension rule and the
//!   `HandLandmarker` trait
//! - `classifier`: the `GestureClassifier` trait

mod classifier;
mod debouncer;
pub mod landmarks;
mod model;

pub use classifier::GestureClassifier;
pub use debouncer::{
    DEFAULT_COOLDOWN, DEFAULT_DEBOUNCE_POLICY, DebouncePolicy, DebounceState, GestureDebouncer,
};
pub use landmarks::{HandLandmarker, HandLandmarks, Landmark};
pub use model::{GestureEvent, GestureKind, GestureLabel, GestureSample};
