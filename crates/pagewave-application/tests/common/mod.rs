//! Hand-written test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use image::RgbImage;
use pagewave_core::capture::{CaptureDevice, Frame};
use pagewave_core::document::{DocumentId, DocumentSession, PageRequest, SessionService};
use pagewave_core::gesture::{GestureClassifier, GestureLabel, GestureSample};
use pagewave_core::{PagewaveError, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Detail text the service returns for unknown ids.
pub const MISSING_DOCUMENT: &str = "PDF no encontrado";

pub fn doc(id: u64, num_pages: u32, current_page: u32) -> DocumentSession {
    DocumentSession {
        id: DocumentId(id),
        filename: Some(format!("{id}.pdf")),
        original_name: Some(format!("doc-{id}.pdf")),
        topic: None,
        num_pages,
        current_page,
        is_open: false,
    }
}

/// In-memory document service that clamps pages the way the real one does.
#[derive(Default)]
pub struct MockSessionService {
    docs: Mutex<HashMap<DocumentId, DocumentSession>>,
    page_calls: Mutex<Vec<(DocumentId, PageRequest)>>,
    scripted: Mutex<VecDeque<Result<DocumentSession>>>,
    page_gate: Mutex<Option<Arc<Notify>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockSessionService {
    pub fn with_docs(docs: impl IntoIterator<Item = DocumentSession>) -> Arc<Self> {
        let service = Self::default();
        {
            let mut map = service.docs.lock().unwrap();
            for d in docs {
                map.insert(d.id, d);
            }
        }
        Arc::new(service)
    }

    /// Page changes wait for a permit on the returned `Notify` before
    /// answering.
    pub fn gate_page_changes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.page_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// The next page change answers with `response` instead of the stored document.
    pub fn script_page_response(&self, response: Result<DocumentSession>) {
        self.scripted.lock().unwrap().push_back(response);
    }

    /// Changes a stored document behind the client's back.
    pub fn set_page(&self, id: u64, page: u32) {
        if let Some(d) = self.docs.lock().unwrap().get_mut(&DocumentId(id)) {
            d.current_page = page;
        }
    }

    pub fn stored(&self, id: u64) -> Option<DocumentSession> {
        self.docs.lock().unwrap().get(&DocumentId(id)).cloned()
    }

    pub fn page_calls(&self) -> Vec<(DocumentId, PageRequest)> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn update(
        &self,
        id: DocumentId,
        f: impl FnOnce(&mut DocumentSession),
    ) -> Result<DocumentSession> {
        let mut docs = self.docs.lock().unwrap();
        let d = docs
            .get_mut(&id)
            .ok_or_else(|| PagewaveError::not_found_with_message("document", id.to_string(), MISSING_DOCUMENT))?;
        f(d);
        Ok(d.clone())
    }

    async fn apply_page(&self, id: DocumentId, request: PageRequest) -> Result<DocumentSession> {
        let gate = self.page_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(response) = self.scripted.lock().unwrap().pop_front() {
            return response;
        }
        self.update(id, |d| match request {
            PageRequest::Next => d.current_page = (d.current_page + 1).min(d.num_pages),
            PageRequest::Prev => d.current_page = d.current_page.saturating_sub(1).max(1),
            PageRequest::Set(page) if page > 0 => d.current_page = page.clamp(1, d.num_pages),
            PageRequest::Set(_) => {}
        })
    }
}

#[async_trait]
impl SessionService for MockSessionService {
    async fn open(&self, id: DocumentId, page: Option<u32>) -> Result<DocumentSession> {
        self.update(id, |d| {
            d.is_open = true;
            if let Some(page) = page.filter(|p| *p > 0) {
                d.current_page = page.clamp(1, d.num_pages);
            }
        })
    }

    async fn close(&self, id: DocumentId) -> Result<DocumentSession> {
        self.update(id, |d| d.is_open = false)
    }

    async fn change_page(&self, id: DocumentId, request: PageRequest) -> Result<DocumentSession> {
        self.page_calls.lock().unwrap().push((id, request));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = self.apply_page(id, request).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn classify(&self, id: DocumentId, topic: &str) -> Result<DocumentSession> {
        self.update(id, |d| d.topic = Some(topic.to_string()))
    }

    async fn delete(&self, id: DocumentId) -> Result<()> {
        self.docs
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PagewaveError::not_found_with_message("document", id.to_string(), MISSING_DOCUMENT))
    }

    async fn get(&self, id: DocumentId) -> Result<DocumentSession> {
        self.update(id, |_| {})
    }

    async fn list(&self, _query: Option<&str>) -> Result<Vec<DocumentSession>> {
        Ok(self.docs.lock().unwrap().values().cloned().collect())
    }
}

/// Capture device producing blank frames, or refusing access.
#[derive(Default)]
pub struct MockCamera {
    deny: bool,
    acquire_delay: Option<Duration>,
    acquired: AtomicBool,
    acquires: AtomicUsize,
    captures: AtomicUsize,
    releases: AtomicUsize,
}

impl MockCamera {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A camera whose permission prompt was declined.
    pub fn denied() -> Arc<Self> {
        Arc::new(Self {
            deny: true,
            ..Self::default()
        })
    }

    /// A camera that takes `delay` to come up.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            acquire_delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn acquires(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureDevice for MockCamera {
    fn name(&self) -> &str {
        "mock"
    }

    async fn acquire(&self) -> Result<()> {
        self.acquires.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.acquire_delay {
            tokio::time::sleep(delay).await;
        }
        if self.deny {
            return Err(PagewaveError::device_unavailable("permission denied"));
        }
        self.acquired.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn capture(&self, seq: u64) -> Result<Frame> {
        if !self.is_acquired() {
            return Err(PagewaveError::device_unavailable("not acquired"));
        }
        self.captures.fetch_add(1, Ordering::SeqCst);
        Ok(Frame::new(seq, RgbImage::new(2, 2)))
    }

    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.acquired.store(false, Ordering::SeqCst);
    }
}

/// Classifier that replays a fixed label sequence, then reports `none`.
#[derive(Default)]
pub struct ScriptedClassifier {
    labels: Mutex<VecDeque<GestureLabel>>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn new(labels: impl IntoIterator<Item = GestureLabel>) -> Arc<Self> {
        Arc::new(Self {
            labels: Mutex::new(labels.into_iter().collect()),
            ..Self::default()
        })
    }

    /// Every classification blocks until `gate` hands out a permit.
    pub fn gated(labels: impl IntoIterator<Item = GestureLabel>, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            labels: Mutex::new(labels.into_iter().collect()),
            gate: Some(gate),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GestureClassifier for ScriptedClassifier {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn classify(&self, frame: &Frame) -> GestureSample {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let label = self.labels.lock().unwrap().pop_front().unwrap_or_default();
        GestureSample::new(frame.captured_at, label)
    }
}
