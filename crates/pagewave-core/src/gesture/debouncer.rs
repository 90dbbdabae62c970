//! Turns the noisy per-frame label stream into discrete gesture events.
//!
//! A physical gesture held in front of the camera shows up as a burst of
//! identical (or flickering) labels. The debouncer lets exactly one event
//! out per burst.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

use super::model::{GestureEvent, GestureKind, GestureSample};

/// How the `Cooldown` state is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebouncePolicy {
    /// Cooldown clears when the label differs from the emitted kind.
    /// `none` counts as a change, so lowering the hand re-arms the gesture.
    /// Repeating the same kind still waits for the minimum interval.
    #[default]
    Edge,
    /// Cooldown clears only once the minimum interval has elapsed since the
    /// last emission. `none` never clears it early.
    TimeGate,
}

/// Policy used when configuration does not pick one.
pub const DEFAULT_DEBOUNCE_POLICY: DebouncePolicy = DebouncePolicy::Edge;

/// Minimum interval used when configuration does not set one.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Cooldown { kind: GestureKind, since: Instant },
}

/// Two-state machine: `Idle` emits on `prev`/`next`, `Cooldown` holds
/// further events back until its gate clears.
#[derive(Debug, Clone)]
pub struct GestureDebouncer {
    policy: DebouncePolicy,
    min_interval: Duration,
    state: DebounceState,
    last_emitted: Option<GestureEvent>,
}

impl GestureDebouncer {
    pub fn new(policy: DebouncePolicy, min_interval: Duration) -> Self {
        Self {
            policy,
            min_interval,
            state: DebounceState::Idle,
            last_emitted: None,
        }
    }

    pub fn policy(&self) -> DebouncePolicy {
        self.policy
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Feeds one sample and returns the event it triggers, if any.
    ///
    /// Samples must arrive in timestamp order.
    pub fn feed(&mut self, sample: &GestureSample) -> Option<GestureEvent> {
        if let DebounceState::Cooldown { kind, since } = self.state {
            let cleared = match self.policy {
                DebouncePolicy::Edge => sample.label.kind() != Some(kind),
                DebouncePolicy::TimeGate => {
                    sample.timestamp.saturating_duration_since(since) >= self.min_interval
                }
            };
            if !cleared {
                return None;
            }
            self.state = DebounceState::Idle;
        }

        let kind = sample.label.kind()?;

        // A repeat inside the interval goes back to cooling down on the
        // earlier event, so only a fresh release re-arms it.
        if let Some(last) = self.last_emitted
            && last.kind == kind
            && sample.timestamp.saturating_duration_since(last.emitted_at) < self.min_interval
        {
            self.state = DebounceState::Cooldown {
                kind,
                since: last.emitted_at,
            };
            return None;
        }

        let event = GestureEvent {
            kind,
            emitted_at: sample.timestamp,
        };
        self.state = DebounceState::Cooldown {
            kind,
            since: sample.timestamp,
        };
        self.last_emitted = Some(event);
        tracing::debug!(kind = %kind, policy = ?self.policy, "gesture event emitted");
        Some(event)
    }

    /// Forgets all history. Used when the pipeline restarts.
    pub fn reset(&mut self) {
        self.state = DebounceState::Idle;
        self.last_emitted = None;
    }
}

impl Default for GestureDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_POLICY, DEFAULT_COOLDOWN)
    }
}
