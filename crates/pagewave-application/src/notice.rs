//! User-facing notices.
//!
//! Outcomes the user should hear about (a document opened, a page change
//! that failed, a camera that could not be acquired) are pushed to the UI
//! over an unbounded channel.

use chrono::{DateTime, Utc};
use pagewave_core::PagewaveError;
use serde::Serialize;
use strum::{AsRefStr, Display};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// One message for the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    /// An error notice `"<action>: <error>"`, keeping the error text verbatim.
    pub fn failure(action: &str, error: &PagewaveError) -> Self {
        Self::error(format!("{action}: {error}"))
    }
}

/// Sending half of the notice channel.
///
/// A disabled sender drops everything; sends never fail the caller.
#[derive(Debug, Clone, Default)]
pub struct NoticeSender {
    tx: Option<mpsc::UnboundedSender<Notice>>,
}

impl NoticeSender {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn send(&self, notice: Notice) {
        if let Some(tx) = &self.tx {
            // Receiver gone means nobody is listening; nothing to do.
            let _ = tx.send(notice);
        }
    }
}
