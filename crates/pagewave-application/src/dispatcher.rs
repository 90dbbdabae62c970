//! Navigation command dispatcher.

use crate::session_sync::SessionSynchronizer;
use pagewave_core::document::{DocumentSession, PageRequest};
use pagewave_core::gesture::{GestureEvent, GestureKind};
use pagewave_core::{PagewaveError, Result};
use std::sync::Arc;
use strum::Display;

/// Why a gesture event did not turn into an adopted page change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    NoSelection,
    RequestInFlight,
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The service moved the page; this is its answer.
    Applied(DocumentSession),
    Skipped(SkipReason),
}

/// Maps gesture events to page changes on the shared synchronizer.
pub struct NavigationDispatcher {
    sync: Arc<SessionSynchronizer>,
}

impl NavigationDispatcher {
    pub fn new(sync: Arc<SessionSynchronizer>) -> Self {
        Self { sync }
    }

    pub fn request_for(kind: GestureKind) -> PageRequest {
        match kind {
            GestureKind::Prev => PageRequest::Prev,
            GestureKind::Next => PageRequest::Next,
        }
    }

    /// Turns `event` into one page change.
    ///
    /// Gated events (nothing open, a page change outstanding, selection
    /// replaced mid-flight) come back as `Skipped`. Service failures are
    /// returned as errors.
    pub async fn dispatch(&self, event: GestureEvent) -> Result<DispatchOutcome> {
        if self.sync.selected_id().is_none() {
            tracing::debug!(kind = %event.kind, "no document open, gesture ignored");
            return Ok(DispatchOutcome::Skipped(SkipReason::NoSelection));
        }

        match self.sync.change_page(Self::request_for(event.kind)).await {
            Ok(session) => Ok(DispatchOutcome::Applied(session)),
            Err(e) => match skip_reason(&e) {
                Some(reason) => {
                    tracing::debug!(kind = %event.kind, %reason, "gesture dispatch skipped");
                    Ok(DispatchOutcome::Skipped(reason))
                }
                None => Err(e),
            },
        }
    }
}

fn skip_reason(error: &PagewaveError) -> Option<SkipReason> {
    match error {
        PagewaveError::NoSelection => Some(SkipReason::NoSelection),
        PagewaveError::RequestInFlight => Some(SkipReason::RequestInFlight),
        PagewaveError::Superseded => Some(SkipReason::Superseded),
        _ => None,
    }
}
