use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PagewaveError, Result};

/// Stable identifier the document service assigns at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The service's authoritative view of one document and its reading state.
///
/// The client only ever holds copies of this value that came back from the
/// service. It is never incremented, decremented or otherwise advanced
/// locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSession {
    pub id: DocumentId,
    /// Stored filename on the service side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Name the document was uploaded with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    pub num_pages: u32,
    pub current_page: u32,
    pub is_open: bool,
}

impl DocumentSession {
    /// Checks `1 <= current_page <= num_pages`.
    ///
    /// A response that breaks this is treated as malformed and never adopted.
    pub fn validate(&self) -> Result<()> {
        if self.num_pages == 0 {
            return Err(PagewaveError::session_request(
                None,
                format!("document {} reports zero pages", self.id),
            ));
        }
        if self.current_page == 0 || self.current_page > self.num_pages {
            return Err(PagewaveError::session_request(
                None,
                format!(
                    "document {} reports page {} outside 1..={}",
                    self.id, self.current_page, self.num_pages
                ),
            ));
        }
        Ok(())
    }

    /// Display name, falling back to the id.
    pub fn display_name(&self) -> String {
        self.original_name
            .clone()
            .or_else(|| self.filename.clone())
            .unwrap_or_else(|| format!("document {}", self.id))
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.num_pages
    }
}

/// Page mutation sent to the service.
///
/// `Set` carries its target, `Next`/`Prev` carry nothing, so a set request
/// without a value cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Next,
    Prev,
    Set(u32),
}

impl PageRequest {
    /// Wire name of the mode.
    pub fn mode(&self) -> &'static str {
        match self {
            PageRequest::Next => "next",
            PageRequest::Prev => "prev",
            PageRequest::Set(_) => "set",
        }
    }

    /// Explicit target page, only present for `Set`.
    pub fn value(&self) -> Option<u32> {
        match self {
            PageRequest::Set(page) => Some(*page),
            _ => None,
        }
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRequest::Set(page) => write!(f, "set {page}"),
            other => f.write_str(other.mode()),
        }
    }
}
