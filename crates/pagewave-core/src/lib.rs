//! Domain layer for Pagewave.
//!
//! Holds the types shared by every stage of the gesture navigation
//! pipeline, the capability traits the outer crates implement, and the
//! pure pieces of logic (debouncing, the landmark label rule) that need no
//! I/O.

pub mod capture;
pub mod config;
pub mod document;
pub mod error;
pub mod gesture;

// Re-export common error type
pub use error::{PagewaveError, Result};
