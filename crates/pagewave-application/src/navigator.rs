//! Gesture navigation controller.
//!
//! [`GestureNavigator`] is the "gestures enabled" toggle. Enabling it
//! acquires the camera and spawns a cancellable pipeline task:
//!
//! ```text
//! SamplerLease ──frame──▶ GestureClassifier ──sample──▶ GestureDebouncer
//!                                                          │ event
//!                                                          ▼
//!                                   NavigationDispatcher ──▶ SessionSynchronizer
//! ```
//!
//! The task owns the [`SamplerLease`], so the camera is released whenever
//! the task ends: the toggle is switched off, the navigator is dropped, or
//! the selected document is closed or deleted.

use crate::dispatcher::{DispatchOutcome, NavigationDispatcher};
use crate::frame_sampler::{FrameSampler, SamplerLease};
use crate::notice::{Notice, NoticeSender};
use crate::session_sync::SessionSynchronizer;
use pagewave_core::config::GestureConfig;
use pagewave_core::document::DocumentSession;
use pagewave_core::gesture::{
    DEFAULT_COOLDOWN, DEFAULT_DEBOUNCE_POLICY, DebouncePolicy, GestureClassifier, GestureDebouncer,
    GestureSample,
};
use pagewave_core::{PagewaveError, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Debounce settings for a navigator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorSettings {
    pub policy: DebouncePolicy,
    pub cooldown: Duration,
}

impl NavigatorSettings {
    pub fn from_config(config: &GestureConfig) -> Self {
        Self {
            policy: config.debounce_policy,
            cooldown: config.cooldown(),
        }
    }
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            policy: DEFAULT_DEBOUNCE_POLICY,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

struct RunHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

pub struct GestureNavigator {
    sampler: Arc<FrameSampler>,
    classifier: Arc<dyn GestureClassifier>,
    sync: Arc<SessionSynchronizer>,
    dispatcher: Arc<NavigationDispatcher>,
    settings: NavigatorSettings,
    notices: NoticeSender,
    run: Mutex<Option<RunHandle>>,
}

impl GestureNavigator {
    pub fn new(
        sampler: Arc<FrameSampler>,
        classifier: Arc<dyn GestureClassifier>,
        sync: Arc<SessionSynchronizer>,
        settings: NavigatorSettings,
    ) -> Self {
        Self {
            sampler,
            classifier,
            dispatcher: Arc::new(NavigationDispatcher::new(Arc::clone(&sync))),
            sync,
            settings,
            notices: NoticeSender::disabled(),
            run: Mutex::new(None),
        }
    }

    pub fn with_notices(mut self, notices: NoticeSender) -> Self {
        self.notices = notices;
        self
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Whether a pipeline run is live.
    pub fn is_enabled(&self) -> bool {
        self.lock_run()
            .as_ref()
            .is_some_and(|run| !run.cancel.is_cancelled() && !run.task.is_finished())
    }

    /// Switches gesture mode on.
    ///
    /// Requires a selected document, both before and after the camera is
    /// acquired. If the camera cannot be acquired the error is reported as
    /// a notice and returned, and gesture mode stays off. Enabling an
    /// already enabled navigator is a no-op.
    pub async fn enable(&self) -> Result<()> {
        if self.is_enabled() {
            return Ok(());
        }

        let selection = self.sync.subscribe();
        if selection.borrow().is_none() {
            self.notices
                .send(Notice::warning("Open a document before enabling gestures"));
            return Err(PagewaveError::NoSelection);
        }

        let lease = match self.sampler.start().await {
            Ok(lease) => lease,
            Err(e) => {
                self.notices.send(Notice::failure("Gesture mode unavailable", &e));
                return Err(e);
            }
        };

        // The document may have been closed while the camera was starting.
        if selection.borrow().is_none() {
            lease.stop();
            self.notices
                .send(Notice::warning("Document closed before gestures started"));
            return Err(PagewaveError::NoSelection);
        }

        let cancel = CancellationToken::new();
        let pipeline = Pipeline {
            classifier: Arc::clone(&self.classifier),
            dispatcher: Arc::clone(&self.dispatcher),
            debouncer: GestureDebouncer::new(self.settings.policy, self.settings.cooldown),
            selection,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(pipeline.run(lease));

        tracing::info!(
            classifier = self.classifier.name(),
            device = self.sampler.device_name(),
            policy = ?self.settings.policy,
            cooldown_ms = self.settings.cooldown.as_millis() as u64,
            "gesture mode enabled"
        );
        *self.lock_run() = Some(RunHandle { cancel, task });
        Ok(())
    }

    /// Switches gesture mode off.
    ///
    /// Pending classification results are dropped, and the camera is
    /// released by the time this returns.
    pub async fn disable(&self) {
        let run = self.lock_run().take();
        let Some(RunHandle { cancel, task }) = run else {
            return;
        };

        cancel.cancel();
        if let Err(e) = task.await
            && e.is_panic()
        {
            tracing::error!("gesture pipeline panicked: {e}");
        }
        tracing::info!("gesture mode disabled");
    }

    /// Flips gesture mode and returns the new state.
    pub async fn toggle(&self) -> Result<bool> {
        if self.is_enabled() {
            self.disable().await;
            Ok(false)
        } else {
            self.enable().await.map(|_| true)
        }
    }

    fn lock_run(&self) -> MutexGuard<'_, Option<RunHandle>> {
        self.run.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for GestureNavigator {
    fn drop(&mut self) {
        let run = match self.run.get_mut() {
            Ok(run) => run.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(run) = run {
            run.cancel.cancel();
        }
    }
}

struct Pipeline {
    classifier: Arc<dyn GestureClassifier>,
    dispatcher: Arc<NavigationDispatcher>,
    debouncer: GestureDebouncer,
    selection: watch::Receiver<Option<DocumentSession>>,
    cancel: CancellationToken,
}

impl Pipeline {
    async fn run(self, lease: SamplerLease) {
        let Pipeline {
            classifier,
            dispatcher,
            mut debouncer,
            mut selection,
            cancel,
        } = self;
        let mut lease = lease;
        let mut document = selection.borrow_and_update().as_ref().map(|s| s.id);
        if document.is_none() {
            tracing::info!("no document selected, stopping gesture mode");
            cancel.cancel();
            lease.stop();
            return;
        }

        loop {
            let frame = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                changed = selection.changed() => {
                    let selected = match changed {
                        Ok(()) => selection.borrow_and_update().as_ref().map(|s| s.id),
                        Err(_) => None,
                    };
                    let Some(id) = selected else {
                        tracing::info!("selected document closed, stopping gesture mode");
                        cancel.cancel();
                        break;
                    };
                    // Page updates keep the debouncer; a different document starts fresh.
                    if document != Some(id) {
                        document = Some(id);
                        debouncer.reset();
                    }
                    continue;
                }
                frame = lease.next_frame() => frame,
            };

            let sample = match frame {
                Ok(frame) => tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    sample = classifier.classify(&frame) => sample,
                },
                Err(e) => {
                    tracing::debug!(error = %e, "frame capture failed, treating as none");
                    GestureSample::none(Instant::now())
                }
            };

            if cancel.is_cancelled() {
                break;
            }
            let Some(event) = debouncer.feed(&sample) else {
                continue;
            };

            if cancel.is_cancelled() {
                break;
            }
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                match dispatcher.dispatch(event).await {
                    Ok(DispatchOutcome::Applied(session)) => {
                        tracing::debug!(kind = %event.kind, page = session.current_page, "gesture applied");
                    }
                    Ok(DispatchOutcome::Skipped(_)) => {}
                    // Already reported by the synchronizer.
                    Err(e) => tracing::debug!(kind = %event.kind, error = %e, "gesture dispatch failed"),
                }
            });
        }

        lease.stop();
    }
}
