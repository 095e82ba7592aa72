//! # Transition Controller
//!
//! Orchestrates the handoff from the current slide to the next one.
//!
//! ## Handoff Timeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    begin(B) at t (transition = 1000 ms)                 │
//! │                                                                         │
//! │  t                t + 50 ms                          t + 1000 ms        │
//! │  │                   │                                    │             │
//! │  ▼                   ▼                                    ▼             │
//! │  pending = B      animate = true                      Committed(B)      │
//! │  (B mounted       (CSS transform/opacity              pending = none    │
//! │   off-screen)      transition runs)                   animate = false   │
//! │                                                                         │
//! │  A second begin() anywhere in [t, t + 1000) is dropped, not queued.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both scheduled steps are deadlines checked in [`TransitionController::tick`].
//! `cancel()` clears them and the pending target together, so a remount
//! always starts clean.

use std::time::{Duration, Instant};

/// Event returned from [`TransitionController::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEvent<K> {
    /// The entering slide should now animate into place.
    AnimationStarted(K),
    /// The entering slide is now the current slide.
    Committed(K),
}

#[derive(Debug, Clone)]
struct Pending<K> {
    target: K,
    started_at: Instant,
    animating: bool,
}

/// One-at-a-time transition state machine.
#[derive(Debug, Clone)]
pub struct TransitionController<K> {
    mount_delay: Duration,
    duration: Duration,
    pending: Option<Pending<K>>,
}

impl<K: Clone + PartialEq> TransitionController<K> {
    /// Creates an idle controller.
    ///
    /// `duration` is measured from `begin`; the animation flag flips after
    /// `mount_delay`.
    pub fn new(mount_delay: Duration, duration: Duration) -> Self {
        TransitionController {
            mount_delay,
            duration,
            pending: None,
        }
    }

    /// Requests a transition to `target`.
    ///
    /// Returns false (and changes nothing) if a transition is already in flight.
    pub fn begin(&mut self, target: K, now: Instant) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(Pending {
            target,
            started_at: now,
            animating: false,
        });
        true
    }

    /// Fires every deadline that has passed by `now`, in order.
    pub fn tick(&mut self, now: Instant) -> Vec<TransitionEvent<K>> {
        let mut events = Vec::new();
        let Some(pending) = self.pending.as_mut() else {
            return events;
        };

        let elapsed = now.saturating_duration_since(pending.started_at);

        if !pending.animating && elapsed >= self.mount_delay {
            pending.animating = true;
            events.push(TransitionEvent::AnimationStarted(pending.target.clone()));
        }

        if elapsed >= self.duration {
            if let Some(done) = self.pending.take() {
                events.push(TransitionEvent::Committed(done.target));
            }
        }

        events
    }

    /// Abandons the in-flight transition, returning its target.
    ///
    /// Clears both deadlines and the pending target.
    pub fn cancel(&mut self) -> Option<K> {
        self.pending.take().map(|p| p.target)
    }

    /// Target of the in-flight transition.
    pub fn pending(&self) -> Option<&K> {
        self.pending.as_ref().map(|p| &p.target)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// True between the mount delay and the commit.
    pub fn is_animating(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.animating)
    }

    /// Replaces the timings; an in-flight transition keeps its start time.
    pub fn set_timings(&mut self, mount_delay: Duration, duration: Duration) {
        self.mount_delay = mount_delay;
        self.duration = duration;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn mount_delay(&self) -> Duration {
        self.mount_delay
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
