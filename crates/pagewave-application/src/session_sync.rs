//! Session state synchronizer.
//!
//! Owns the one "selected" [`DocumentSession`] that the viewer renders and
//! the gesture pipeline navigates. Every mutation is a round trip to the
//! [`SessionService`]; local state changes only when a response comes back,
//! and it is replaced by that response verbatim.
//!
//! # Ordering
//!
//! - At most one page change is in flight. A second request, manual or
//!   gesture-driven, is refused with `RequestInFlight` without touching the
//!   service.
//! - Opening, closing or deleting the selection bumps a selection epoch.
//!   A page change or refresh whose response arrives after the epoch moved
//!   is discarded with `Superseded`.

use crate::notice::{Notice, NoticeSender};
use pagewave_core::document::{DocumentId, DocumentSession, PageRequest, SessionService};
use pagewave_core::{PagewaveError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::watch;

pub struct SessionSynchronizer {
    service: Arc<dyn SessionService>,
    selected: watch::Sender<Option<DocumentSession>>,
    epoch: AtomicU64,
    page_in_flight: AtomicBool,
    notices: NoticeSender,
}

/// Clears the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SessionSynchronizer {
    pub fn new(service: Arc<dyn SessionService>) -> Self {
        let (selected, _) = watch::channel(None);
        Self {
            service,
            selected,
            epoch: AtomicU64::new(0),
            page_in_flight: AtomicBool::new(false),
            notices: NoticeSender::disabled(),
        }
    }

    /// Reports operation outcomes to `notices`.
    pub fn with_notices(mut self, notices: NoticeSender) -> Self {
        self.notices = notices;
        self
    }

    /// Snapshot of the selected session.
    pub fn current(&self) -> Option<DocumentSession> {
        self.selected.borrow().clone()
    }

    pub fn selected_id(&self) -> Option<DocumentId> {
        self.selected.borrow().as_ref().map(|s| s.id)
    }

    /// Receiver that sees every adopted selection, including `None`.
    pub fn subscribe(&self) -> watch::Receiver<Option<DocumentSession>> {
        self.selected.subscribe()
    }

    pub fn is_page_change_in_flight(&self) -> bool {
        self.page_in_flight.load(Ordering::SeqCst)
    }

    /// Opens `id` and makes it the selection.
    ///
    /// `page` asks for a starting page; the service clamps it. On failure
    /// the previous selection (or lack of one) is kept.
    pub async fn open(&self, id: DocumentId, page: Option<u32>) -> Result<DocumentSession> {
        tracing::debug!(document_id = %id, ?page, "opening document");
        let session = self
            .service
            .open(id, page)
            .await
            .and_then(validated)
            .inspect_err(|e| self.report_failure("Open failed", id, e))?;

        self.replace_selection(Some(session.clone()));
        tracing::info!(document_id = %id, page = session.current_page, pages = session.num_pages, "document opened");
        self.notices
            .send(Notice::success(format!("Opened {}", session.display_name())));
        Ok(session)
    }

    /// Closes the selected document. The selection is cleared only after the
    /// service confirms.
    pub async fn close(&self) -> Result<DocumentSession> {
        let id = self.selected_id().ok_or(PagewaveError::NoSelection)?;
        tracing::debug!(document_id = %id, "closing document");
        let session = self
            .service
            .close(id)
            .await
            .inspect_err(|e| self.report_failure("Close failed", id, e))?;

        self.clear_selection_if(id);
        tracing::info!(document_id = %id, "document closed");
        self.notices
            .send(Notice::success(format!("Closed {}", session.display_name())));
        Ok(session)
    }

    /// Moves the selected document's page and adopts the service's answer.
    ///
    /// # Errors
    ///
    /// - `NoSelection`: nothing is open; the service is not called
    /// - `RequestInFlight`: another page change is outstanding; the service is not called
    /// - `Superseded`: the selection changed before the response arrived
    /// - session failures from the service, with local state unchanged
    pub async fn change_page(&self, request: PageRequest) -> Result<DocumentSession> {
        let id = self.selected_id().ok_or(PagewaveError::NoSelection)?;
        let _guard = InFlightGuard::try_acquire(&self.page_in_flight).ok_or_else(|| {
            tracing::debug!(document_id = %id, mode = request.mode(), "page change already in flight");
            PagewaveError::RequestInFlight
        })?;
        let epoch = self.epoch.load(Ordering::SeqCst);

        tracing::debug!(document_id = %id, mode = request.mode(), value = ?request.value(), "changing page");
        let session = self
            .service
            .change_page(id, request)
            .await
            .and_then(validated)
            .inspect_err(|e| self.report_failure("Page change failed", id, e))?;

        let session = self.adopt_if_current(epoch, session)?;
        tracing::info!(document_id = %id, mode = request.mode(), page = session.current_page, "page changed");
        Ok(session)
    }

    /// Sets the topic label of the selected document.
    pub async fn classify(&self, topic: &str) -> Result<DocumentSession> {
        let id = self.selected_id().ok_or(PagewaveError::NoSelection)?;
        let epoch = self.epoch.load(Ordering::SeqCst);
        let session = self
            .service
            .classify(id, topic)
            .await
            .and_then(validated)
            .inspect_err(|e| self.report_failure("Classify failed", id, e))?;

        let session = self.adopt_if_current(epoch, session)?;
        tracing::info!(document_id = %id, topic, "document classified");
        self.notices
            .send(Notice::success(format!("Classified {} as {topic}", session.display_name())));
        Ok(session)
    }

    /// Deletes `id`; clears the selection if it was the selected document.
    pub async fn delete(&self, id: DocumentId) -> Result<()> {
        self.service
            .delete(id)
            .await
            .inspect_err(|e| self.report_failure("Delete failed", id, e))?;

        self.clear_selection_if(id);
        tracing::info!(document_id = %id, "document deleted");
        self.notices.send(Notice::success(format!("Deleted document {id}")));
        Ok(())
    }

    /// Re-reads the selected document from the service and adopts it.
    pub async fn refresh(&self) -> Result<DocumentSession> {
        let id = self.selected_id().ok_or(PagewaveError::NoSelection)?;
        let epoch = self.epoch.load(Ordering::SeqCst);
        let session = self.service.get(id).await.and_then(validated)?;
        self.adopt_if_current(epoch, session)
    }

    /// Fetches one document without touching the selection.
    pub async fn get(&self, id: DocumentId) -> Result<DocumentSession> {
        self.service.get(id).await
    }

    /// Lists documents without touching the selection.
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<DocumentSession>> {
        self.service.list(query).await
    }

    fn replace_selection(&self, selection: Option<DocumentSession>) {
        self.selected.send_modify(|selected| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *selected = selection;
        });
    }

    fn clear_selection_if(&self, id: DocumentId) {
        self.selected.send_if_modified(|selected| {
            if selected.as_ref().is_some_and(|s| s.id == id) {
                self.epoch.fetch_add(1, Ordering::SeqCst);
                *selected = None;
                true
            } else {
                false
            }
        });
    }

    /// Adopts `session` only if the selection is the one the request was
    /// issued against.
    fn adopt_if_current(&self, epoch: u64, session: DocumentSession) -> Result<DocumentSession> {
        let adopted = self.selected.send_if_modified(|selected| {
            let current = self.epoch.load(Ordering::SeqCst) == epoch
                && selected.as_ref().is_some_and(|s| s.id == session.id);
            if current {
                *selected = Some(session.clone());
            }
            current
        });

        if adopted {
            Ok(session)
        } else {
            tracing::debug!(document_id = %session.id, "discarding response for replaced selection");
            Err(PagewaveError::Superseded)
        }
    }

    fn report_failure(&self, action: &str, id: DocumentId, error: &PagewaveError) {
        tracing::warn!(document_id = %id, error = %error, "{action}");
        self.notices.send(Notice::failure(action, error));
    }
}

fn validated(session: DocumentSession) -> Result<DocumentSession> {
    session.validate()?;
    Ok(session)
}
