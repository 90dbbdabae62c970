//! Document session service trait.
//!
//! Defines the contract of the remote service that owns every document
//! session. All persistence lives behind this trait.

use super::model::{DocumentId, DocumentSession, PageRequest};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract client for the remote document session service.
///
/// Every method is one request/response round trip. Implementations return
/// the service's representation verbatim and must not cache anything; the
/// [`DocumentSession`] they return is the only truth the caller adopts.
///
/// # Errors
///
/// - `NotFound`: the document no longer exists
/// - `InvalidTransition`: the service rejected the request (message verbatim)
/// - `SessionRequest`: any other transport or status failure
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Marks the document open and returns it at its starting page.
    ///
    /// `page` asks for a specific starting page; the service clamps it.
    async fn open(&self, id: DocumentId, page: Option<u32>) -> Result<DocumentSession>;

    /// Marks the document closed.
    async fn close(&self, id: DocumentId) -> Result<DocumentSession>;

    /// Asks the service to move the current page. The service clamps
    /// `next`/`prev` at the document bounds.
    async fn change_page(&self, id: DocumentId, request: PageRequest) -> Result<DocumentSession>;

    /// Updates the topic label of the document.
    async fn classify(&self, id: DocumentId, topic: &str) -> Result<DocumentSession>;

    /// Removes the document.
    async fn delete(&self, id: DocumentId) -> Result<()>;

    /// Fetches the current representation of a document.
    async fn get(&self, id: DocumentId) -> Result<DocumentSession>;

    /// Lists documents, optionally filtered by a name/topic search string.
    async fn list(&self, query: Option<&str>) -> Result<Vec<DocumentSession>>;
}
