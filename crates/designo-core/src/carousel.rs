//! # Carousel Component
//!
//! Composes the [`TimingEngine`], the sequence selector and the
//! [`TransitionController`] into the rotating hero slider / category rotator.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Carousel Phases                                  │
//! │                                                                         │
//! │   mount(empty)          append / mount(non-empty)                       │
//! │  ┌──────┐ ────────────────────────────────────────► ┌──────────┐        │
//! │  │ Idle │                                           │ Dwelling │◄──┐    │
//! │  └──────┘                  timing Completed         └────┬─────┘   │    │
//! │                            or select(key)                │         │    │
//! │                                                          ▼         │    │
//! │  ┌────────┐  pointer_enter(current) ┌───────────────┐    │ commit  │    │
//! │  │ Paused │◄────────────────────────│ Transitioning │◄───┘         │    │
//! │  └───┬────┘     suspend()           └───────┬───────┘              │    │
//! │      │                                      └──────────────────────┘    │
//! │      └── pointer_leave / resume_from_clean ──► Dwelling                 │
//! │                                                                         │
//! │  unmount() from any phase ──► Unmounted (every call is a no-op after)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `current` and the pending target are held as [`SlideKey`]s and resolved to
//! positions on demand, so appending or reordering slides never swaps what is
//! on screen.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::sequence::{self, RotationPolicy, ShownSet};
use crate::timing::{TimingEngine, TimingEvent};
use crate::transition::{TransitionController, TransitionEvent};
use crate::types::{Slide, SlideKey};
use crate::{
    DEFAULT_DWELL_MS, DEFAULT_MOBILE_BREAKPOINT, DEFAULT_MOUNT_DELAY_MS, DEFAULT_TRANSITION_MS,
    PLACEHOLDER_SOURCE,
};

// =============================================================================
// Configuration
// =============================================================================

/// Construction inputs of a carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselConfig {
    /// How long a slide stays fully visible.
    pub dwell: Duration,

    /// Length of the slide-in animation, measured from `begin`.
    pub transition: Duration,

    /// Delay before the entering slide starts animating.
    pub mount_delay: Duration,

    /// Viewports narrower than this use mobile sources.
    pub mobile_breakpoint: u32,

    /// Rotation order.
    pub policy: RotationPolicy,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        CarouselConfig {
            dwell: Duration::from_millis(DEFAULT_DWELL_MS),
            transition: Duration::from_millis(DEFAULT_TRANSITION_MS),
            mount_delay: Duration::from_millis(DEFAULT_MOUNT_DELAY_MS),
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            policy: RotationPolicy::Sequential,
        }
    }
}

impl CarouselConfig {
    /// Sets the rotation policy.
    pub fn with_policy(mut self, policy: RotationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets dwell and transition durations.
    pub fn with_timings(mut self, dwell: Duration, transition: Duration) -> Self {
        self.dwell = dwell;
        self.transition = transition;
        self
    }

    /// Checks that the timings can produce a visible animation.
    pub fn validate(&self) -> CoreResult<()> {
        if self.dwell.is_zero() {
            return Err(CoreError::InvalidTiming {
                reason: "dwell must be greater than 0".into(),
            });
        }
        if self.transition <= self.mount_delay {
            return Err(CoreError::InvalidTiming {
                reason: format!(
                    "transition ({} ms) must be longer than the mount delay ({} ms)",
                    self.transition.as_millis(),
                    self.mount_delay.as_millis()
                ),
            });
        }
        if self.mobile_breakpoint == 0 {
            return Err(CoreError::InvalidTiming {
                reason: "mobile_breakpoint must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Phases, Events, Views
// =============================================================================

/// Observable phase of the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CarouselPhase {
    /// No slides to show yet.
    Idle,
    /// A slide is fully visible and the dwell timer runs.
    Dwelling,
    /// A slide is entering.
    Transitioning,
    /// Hovered or suspended by the gallery browser.
    Paused,
    /// Torn down; nothing changes any more.
    Unmounted,
}

/// Event produced by the carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselEvent {
    /// The first slide's asset finished loading (or failed and fell back).
    /// Emitted at most once per carousel.
    FirstPaint,
    /// A transition was accepted.
    TransitionStarted { from: SlideKey, to: SlideKey },
    /// The entering slide should animate now.
    AnimationStarted { to: SlideKey },
    /// The entering slide became current.
    SlideCommitted { current: SlideKey },
}

/// Render-ready description of one slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SlideView {
    pub key: SlideKey,
    /// Source resolved for the current viewport (placeholder if failed).
    pub source: String,
    pub alt: String,
    /// True if the asset failed to load.
    pub failed: bool,
}

/// Snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CarouselView {
    pub current: Option<SlideView>,
    pub entering: Option<SlideView>,
    /// Bind to the entering slide's transform/opacity transition.
    pub animate: bool,
    /// Dwell progress of the current slide, `[0, 1]`.
    pub progress: f64,
    pub phase: CarouselPhase,
    pub slide_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

// =============================================================================
// Carousel
// =============================================================================

/// Auto-rotating carousel state machine. Single owner, driven by `tick`.
#[derive(Debug)]
pub struct Carousel {
    config: CarouselConfig,
    lifecycle: Lifecycle,
    slides: Vec<Slide>,
    current: Option<SlideKey>,
    shown: HashSet<SlideKey>,
    failed: HashSet<SlideKey>,
    timing: TimingEngine,
    transition: TransitionController<SlideKey>,
    hovered: bool,
    suspended: bool,
    viewport_width: u32,
    first_paint_done: bool,
    events: Vec<CarouselEvent>,
}

impl Carousel {
    /// Creates an unmounted carousel.
    pub fn new(config: CarouselConfig) -> Self {
        Carousel {
            timing: TimingEngine::new(config.dwell),
            transition: TransitionController::new(config.mount_delay, config.transition),
            config,
            lifecycle: Lifecycle::Created,
            slides: Vec::new(),
            current: None,
            shown: HashSet::new(),
            failed: HashSet::new(),
            hovered: false,
            suspended: false,
            viewport_width: u32::MAX,
            first_paint_done: false,
            events: Vec::new(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mounts with an initial collection (possibly empty).
    ///
    /// Shuffled policies permute the collection and start on a uniformly
    /// random slide, so repeated page loads don't always open on the same one.
    pub fn mount<R: Rng + ?Sized>(&mut self, slides: Vec<Slide>, now: Instant, rng: &mut R) {
        if self.lifecycle != Lifecycle::Created {
            warn!("carousel mounted twice; ignoring");
            return;
        }
        self.lifecycle = Lifecycle::Mounted;

        let slides = dedupe(Vec::new(), slides);
        let (slides, start) = if self.config.policy.is_shuffled() {
            let shuffled = sequence::shuffle(slides, rng);
            let start = sequence::random_start(shuffled.len(), rng);
            (shuffled, start)
        } else {
            let start = (!slides.is_empty()).then_some(0);
            (slides, start)
        };

        self.slides = slides;
        if let Some(start) = start {
            self.show_first(start, now);
        }
    }

    /// Tears the carousel down. Cancels the dwell timer and any in-flight
    /// transition (clearing its target); every later call is a no-op.
    pub fn unmount(&mut self) {
        if let Some(abandoned) = self.transition.cancel() {
            debug!(slide = %abandoned, "transition cancelled by unmount");
        }
        self.timing.stop();
        self.hovered = false;
        self.events.clear();
        self.lifecycle = Lifecycle::Unmounted;
    }

    fn is_live(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    fn show_first(&mut self, index: usize, now: Instant) {
        let key = self.slides[index].key.clone();
        self.shown.clear();
        self.shown.insert(key.clone());
        self.current = Some(key);
        self.start_dwell(now);
    }

    fn start_dwell(&mut self, now: Instant) {
        self.timing.start(now);
        if self.is_paused() {
            self.timing.pause();
        }
    }

    // =========================================================================
    // Collection changes
    // =========================================================================

    /// Appends slides without disturbing the current slide, the in-flight
    /// transition or the dwell progress. Duplicate keys are ignored.
    ///
    /// With a shuffled policy only the appended batch is permuted.
    pub fn append_slides<R: Rng + ?Sized>(
        &mut self,
        slides: Vec<Slide>,
        now: Instant,
        rng: &mut R,
    ) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }

        let existing = std::mem::take(&mut self.slides);
        let before = existing.len();
        let mut merged = dedupe(existing, slides);
        if self.config.policy.is_shuffled() {
            let added = merged.split_off(before);
            merged.extend(sequence::shuffle(added, rng));
        }
        self.slides = merged;

        if self.is_live() && self.current.is_none() && !self.slides.is_empty() {
            let start = self.start_index(rng);
            self.show_first(start, now);
        }
    }

    fn start_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        if self.config.policy.is_shuffled() {
            sequence::random_start(self.slides.len(), rng).unwrap_or(0)
        } else {
            0
        }
    }

    /// Replaces the whole collection, keeping the current slide and the
    /// in-flight transition when their keys survive.
    ///
    /// If the current slide disappeared a new start is picked the way `mount`
    /// picks one (random under a shuffled policy) with a fresh dwell; a
    /// vanished transition target is cancelled.
    pub fn replace_slides<R: Rng + ?Sized>(&mut self, slides: Vec<Slide>, now: Instant, rng: &mut R) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }

        self.slides = dedupe(Vec::new(), slides);
        let keys: HashSet<SlideKey> = self.slides.iter().map(|s| s.key.clone()).collect();
        self.shown.retain(|k| keys.contains(k));
        self.failed.retain(|k| keys.contains(k));

        let target_vanished = self
            .transition
            .pending()
            .is_some_and(|target| !keys.contains(target));
        if target_vanished {
            self.transition.cancel();
            self.start_dwell(now);
        }

        let current_kept = self.current.as_ref().is_some_and(|c| keys.contains(c));
        if current_kept {
            return;
        }
        self.transition.cancel();
        if self.slides.is_empty() {
            self.current = None;
            self.timing.stop();
        } else if self.is_live() {
            let start = self.start_index(rng);
            self.show_first(start, now);
        }
    }

    /// Applies new timings. A running dwell restarts from 0.
    pub fn configure(&mut self, config: CarouselConfig, now: Instant) {
        self.timing.set_duration(config.dwell, now);
        self.transition.set_timings(config.mount_delay, config.transition);
        self.config = config;
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Advances every deadline to `now` and returns what happened.
    pub fn tick(&mut self, now: Instant) -> Vec<CarouselEvent> {
        if !self.is_live() {
            return Vec::new();
        }

        for event in self.transition.tick(now) {
            match event {
                TransitionEvent::AnimationStarted(to) => {
                    self.events.push(CarouselEvent::AnimationStarted { to });
                }
                TransitionEvent::Committed(key) => self.commit(key, now),
            }
        }

        if !self.transition.is_pending() && self.timing.tick(now) == Some(TimingEvent::Completed)
        {
            self.advance(now);
        }

        self.take_events()
    }

    /// Drains events produced outside `tick` (selection, asset loads).
    pub fn take_events(&mut self) -> Vec<CarouselEvent> {
        std::mem::take(&mut self.events)
    }

    fn advance(&mut self, now: Instant) {
        let Some(current_index) = self.current_index() else {
            return;
        };
        let len = self.slides.len();
        if len < 2 {
            // Nothing to rotate to; just start another dwell.
            self.start_dwell(now);
            return;
        }

        let mut shown: ShownSet = self
            .shown
            .iter()
            .filter_map(|key| self.position(key))
            .collect();
        let Some(next) = sequence::next_index(current_index, self.config.policy, len, &mut shown)
        else {
            return;
        };

        // next_index may have collapsed the set for a new cycle.
        self.shown = shown
            .iter()
            .filter_map(|idx| self.slides.get(idx))
            .map(|slide| slide.key.clone())
            .collect();

        if let Some(target) = self.slides.get(next).map(|s| s.key.clone()) {
            self.begin_transition(target, now);
        }
    }

    fn begin_transition(&mut self, target: SlideKey, now: Instant) -> bool {
        let Some(from) = self.current.clone() else {
            return false;
        };
        if from == target {
            return false;
        }
        if !self.transition.begin(target.clone(), now) {
            debug!(slide = %target, "transition already in flight; trigger dropped");
            return false;
        }
        self.timing.stop();
        self.events
            .push(CarouselEvent::TransitionStarted { from, to: target });
        true
    }

    fn commit(&mut self, key: SlideKey, now: Instant) {
        self.shown.insert(key.clone());
        self.current = Some(key.clone());
        self.start_dwell(now);
        self.events
            .push(CarouselEvent::SlideCommitted { current: key });
    }

    // =========================================================================
    // Manual interaction
    // =========================================================================

    /// Pointer entered a slide. Pauses only when it is the current one.
    pub fn pointer_enter(&mut self, key: &SlideKey) {
        if !self.is_live() || self.current.as_ref() != Some(key) {
            return;
        }
        self.hovered = true;
        self.timing.pause();
    }

    /// Pointer left; resumes unless the gallery suspended rotation.
    pub fn pointer_leave(&mut self, now: Instant) {
        if !self.is_live() || !self.hovered {
            return;
        }
        self.hovered = false;
        if !self.suspended {
            self.timing.resume(now);
        }
    }

    /// Click on a slide: jump straight to it, bypassing the selector.
    ///
    /// Returns false if the slide is unknown, already current, or another
    /// transition is in flight (the click is dropped, not queued).
    pub fn select(&mut self, key: &SlideKey, now: Instant) -> bool {
        if !self.is_live() || self.suspended || self.position(key).is_none() {
            return false;
        }
        self.begin_transition(key.clone(), now)
    }

    /// Stops automatic rotation (gallery category opened).
    ///
    /// Any in-flight transition is abandoned and the current slide stays.
    pub fn suspend(&mut self) {
        if !self.is_live() {
            return;
        }
        self.suspended = true;
        self.transition.cancel();
        self.timing.stop();
    }

    /// Restarts rotation from a clean state: progress 0, no pause.
    pub fn resume_from_clean(&mut self, now: Instant) {
        if !self.is_live() {
            return;
        }
        self.suspended = false;
        self.hovered = false;
        self.transition.cancel();
        if self.current.is_some() {
            self.timing.start(now);
        }
    }

    /// Records the viewport width; sources are re-resolved on the next view.
    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    // =========================================================================
    // Asset loading
    // =========================================================================

    /// The underlying asset of `key` finished loading.
    pub fn asset_loaded(&mut self, key: &SlideKey) {
        if self.is_live() {
            self.failed.remove(key);
            self.maybe_first_paint(key);
        }
    }

    /// The underlying asset of `key` failed. The slide renders a placeholder
    /// and still counts as shown; rotation is unaffected.
    pub fn asset_failed(&mut self, key: &SlideKey) {
        if !self.is_live() {
            return;
        }
        warn!(slide = %key, "slide asset failed to load; rendering placeholder");
        self.failed.insert(key.clone());
        self.maybe_first_paint(key);
    }

    fn maybe_first_paint(&mut self, key: &SlideKey) {
        if !self.first_paint_done && self.current.as_ref() == Some(key) {
            self.first_paint_done = true;
            self.events.push(CarouselEvent::FirstPaint);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn phase(&self) -> CarouselPhase {
        match self.lifecycle {
            Lifecycle::Unmounted => CarouselPhase::Unmounted,
            _ if self.current.is_none() => CarouselPhase::Idle,
            _ if self.transition.is_pending() => CarouselPhase::Transitioning,
            _ if self.is_paused() => CarouselPhase::Paused,
            _ => CarouselPhase::Dwelling,
        }
    }

    /// True while hovered or suspended.
    pub fn is_paused(&self) -> bool {
        self.hovered || self.suspended
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn current_key(&self) -> Option<&SlideKey> {
        self.current.as_ref()
    }

    pub fn pending_key(&self) -> Option<&SlideKey> {
        self.transition.pending()
    }

    /// Position of the current slide in the live collection.
    pub fn current_index(&self) -> Option<usize> {
        self.current.as_ref().and_then(|k| self.position(k))
    }

    /// Position of the entering slide in the live collection.
    pub fn pending_index(&self) -> Option<usize> {
        self.transition.pending().and_then(|k| self.position(k))
    }

    pub fn progress(&self) -> f64 {
        self.timing.progress()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Number of slides shown in the current no-repeat cycle.
    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }

    pub fn is_failed(&self, key: &SlideKey) -> bool {
        self.failed.contains(key)
    }

    fn position(&self, key: &SlideKey) -> Option<usize> {
        self.slides.iter().position(|s| &s.key == key)
    }

    fn slide_view(&self, key: &SlideKey) -> Option<SlideView> {
        let slide = self.slides.iter().find(|s| &s.key == key)?;
        let failed = self.failed.contains(key);
        let source = if failed {
            PLACEHOLDER_SOURCE.to_string()
        } else {
            slide
                .source
                .for_viewport(self.viewport_width, self.config.mobile_breakpoint)
                .to_string()
        };
        Some(SlideView {
            key: slide.key.clone(),
            source,
            alt: slide.alt.clone(),
            failed,
        })
    }

    /// Render snapshot for the current viewport.
    pub fn view(&self) -> CarouselView {
        CarouselView {
            current: self.current.as_ref().and_then(|k| self.slide_view(k)),
            entering: self.transition.pending().and_then(|k| self.slide_view(k)),
            animate: self.transition.is_animating(),
            progress: self.timing.progress(),
            phase: self.phase(),
            slide_count: self.slides.len(),
        }
    }
}

/// Appends `incoming` to `existing`, skipping keys already present.
fn dedupe(mut existing: Vec<Slide>, incoming: Vec<Slide>) -> Vec<Slide> {
    let mut seen: HashSet<SlideKey> = existing.iter().map(|s| s.key.clone()).collect();
    for slide in incoming {
        if seen.insert(slide.key.clone()) {
            existing.push(slide);
        } else {
            debug!(slide = %slide.key, "duplicate slide key ignored");
        }
    }
    existing
}

// =============================================================================
// Unit Tests
// =============================================================================
