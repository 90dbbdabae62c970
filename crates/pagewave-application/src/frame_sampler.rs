//! Frame sampling with scoped camera acquisition.
//!
//! [`FrameSampler::start`] acquires the device and hands back a
//! [`SamplerLease`]. The lease yields frames at the sampling period and
//! releases the device when it is dropped, whichever way the consumer exits.

use pagewave_core::capture::{CaptureDevice, Frame};
use pagewave_core::{PagewaveError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

/// Owns one capture device and hands out at most one lease on it at a time.
pub struct FrameSampler {
    device: Arc<dyn CaptureDevice>,
    period: Duration,
    /// Set while a lease is alive
    held: Arc<AtomicBool>,
}

impl FrameSampler {
    pub fn new(device: Arc<dyn CaptureDevice>, period: Duration) -> Self {
        Self {
            device,
            period,
            held: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn device_name(&self) -> &str {
        self.device.name()
    }

    /// Whether a lease currently holds the device.
    pub fn is_active(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }

    /// Acquires the device and starts the sampling clock.
    ///
    /// # Errors
    ///
    /// - `DeviceBusy` if a lease from this sampler is still alive
    /// - `DeviceUnavailable` if the device refused (permission denied, no camera)
    pub async fn start(&self) -> Result<SamplerLease> {
        if self.held.swap(true, Ordering::SeqCst) {
            tracing::warn!(device = self.device.name(), "sampler already running");
            return Err(PagewaveError::DeviceBusy);
        }

        if let Err(e) = self.device.acquire().await {
            self.held.store(false, Ordering::SeqCst);
            tracing::warn!(device = self.device.name(), error = %e, "capture device unavailable");
            return Err(match e {
                PagewaveError::DeviceUnavailable(_) => e,
                other => PagewaveError::device_unavailable(other.to_string()),
            });
        }

        // The first tick completes immediately; later ticks that fall behind
        // a slow classification are skipped rather than queued.
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            device = self.device.name(),
            period_ms = self.period.as_millis() as u64,
            "frame sampling started"
        );

        Ok(SamplerLease {
            device: Arc::clone(&self.device),
            held: Arc::clone(&self.held),
            ticker,
            seq: 0,
        })
    }
}

/// Exclusive hold on the capture device for one sampling run.
pub struct SamplerLease {
    device: Arc<dyn CaptureDevice>,
    held: Arc<AtomicBool>,
    ticker: Interval,
    seq: u64,
}

impl SamplerLease {
    /// Waits for the next sampling tick and captures a frame.
    ///
    /// Cancel safe: dropping the future between ticks loses nothing.
    pub async fn next_frame(&mut self) -> Result<Frame> {
        self.ticker.tick().await;
        let seq = self.seq;
        self.seq += 1;
        self.device.capture(seq).await
    }

    /// Number of frames requested so far.
    pub fn frames_taken(&self) -> u64 {
        self.seq
    }

    /// Stops sampling and releases the device.
    pub fn stop(self) {}
}

impl Drop for SamplerLease {
    fn drop(&mut self) {
        self.device.release();
        self.held.store(false, Ordering::SeqCst);
        tracing::info!(device = self.device.name(), frames = self.seq, "frame sampling stopped");
    }
}
