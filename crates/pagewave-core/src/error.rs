//! Error types for Pagewave.

use thiserror::Error;

/// A shared error type for the whole gesture navigation pipeline.
///
/// Variants fall into two groups. Capture and classification failures are
/// absorbed inside the pipeline and degrade to "no gesture". Session
/// failures are always surfaced to whoever issued the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PagewaveError {
    /// Camera acquisition failed (permission denied, no device, bad source)
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Another sampler already holds the capture device
    #[error("Capture device is already in use")]
    DeviceBusy,

    /// Hand-pose model or remote inference failed
    #[error("Gesture classification failed: {0}")]
    Classification(String),

    /// Entity not found; `message` is what the service said, unchanged
    #[error("{message}")]
    NotFound {
        entity_type: &'static str,
        id: String,
        message: String,
    },

    /// Remote session call failed
    #[error("Session request failed{}: {message}", status_suffix(.status))]
    SessionRequest {
        status: Option<u16>,
        message: String,
    },

    /// The server rejected the requested transition
    #[error("Invalid transition: {message}")]
    InvalidTransition { message: String },

    /// No document session is currently selected
    #[error("No document session is selected")]
    NoSelection,

    /// A page change is already outstanding
    #[error("A page change request is already in flight")]
    RequestInFlight,

    /// The response arrived after the selection it belongs to was replaced
    #[error("Response discarded: selection changed while the request was in flight")]
    Superseded,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", "JPEG", ...
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PagewaveError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error with a generated message
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        let id = id.into();
        let message = format!("{entity_type} '{id}' not found");
        Self::NotFound {
            entity_type,
            id,
            message,
        }
    }

    /// Creates a NotFound error carrying the service's own message
    pub fn not_found_with_message(
        entity_type: &'static str,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates a DeviceUnavailable error
    pub fn device_unavailable(message: impl Into<String>) -> Self {
        Self::DeviceUnavailable(message.into())
    }

    /// Creates a Classification error
    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification(message.into())
    }

    /// Creates a SessionRequest error
    pub fn session_request(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::SessionRequest {
            status,
            message: message.into(),
        }
    }

    /// Creates an InvalidTransition error
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a DeviceUnavailable error
    pub fn is_device_unavailable(&self) -> bool {
        matches!(self, Self::DeviceUnavailable(_))
    }

    /// Check if this error comes from a remote session round trip.
    pub fn is_session_failure(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::SessionRequest { .. } | Self::InvalidTransition { .. }
        )
    }

    /// Check if this error is a gating outcome rather than a failure.
    ///
    /// Gated requests never reached the server, or their response was
    /// dropped on purpose, so local state is untouched and nothing needs
    /// to be reported to the user.
    pub fn is_gated(&self) -> bool {
        matches!(
            self,
            Self::NoSelection | Self::RequestInFlight | Self::Superseded
        )
    }

    /// HTTP-like status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::SessionRequest { status, .. } => *status,
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PagewaveError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PagewaveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PagewaveError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PagewaveError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<image::ImageError> for PagewaveError {
    fn from(err: image::ImageError) -> Self {
        Self::Serialization {
            format: "image".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at binary boundaries)
impl From<anyhow::Error> for PagewaveError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

/// A type alias for `Result<T, PagewaveError>`.
pub type Result<T> = std::result::Result<T, PagewaveError>;
