//! # Sequence Selector
//!
//! Decides which slide comes next.
//!
//! ## Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rotation Policies                                │
//! │                                                                         │
//! │  SEQUENTIAL          (current + 1) mod n                               │
//! │  ──────────          A → B → C → A → B → C ...                         │
//! │                                                                         │
//! │  SHUFFLED            collection permuted once at mount, random start,  │
//! │  ────────            then sequential over the permutation              │
//! │                                                                         │
//! │  SHUFFLED_NO_REPEAT  like SHUFFLED, but next() skips anything already  │
//! │  ──────────────────  shown this cycle. When every index has been      │
//! │                      shown the set collapses to {current} and a new    │
//! │                      cycle begins. Slides appended mid-cycle are       │
//! │                      simply "unshown" and become eligible.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shuffling happens once per collection change, never per tick.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Rotation Policy
// =============================================================================

/// How the carousel walks its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Collection order, wrapping around.
    #[default]
    Sequential,

    /// Permuted at mount with a random first slide, then sequential.
    Shuffled,

    /// Permuted at mount; every slide shown once before any repeats.
    ShuffledNoRepeat,
}

impl RotationPolicy {
    /// Returns true if the collection is permuted at mount.
    pub fn is_shuffled(&self) -> bool {
        matches!(self, RotationPolicy::Shuffled | RotationPolicy::ShuffledNoRepeat)
    }
}

impl std::fmt::Display for RotationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotationPolicy::Sequential => write!(f, "sequential"),
            RotationPolicy::Shuffled => write!(f, "shuffled"),
            RotationPolicy::ShuffledNoRepeat => write!(f, "shuffled_no_repeat"),
        }
    }
}

impl std::str::FromStr for RotationPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sequential" | "straight" => Ok(RotationPolicy::Sequential),
            "shuffled" | "shuffle" => Ok(RotationPolicy::Shuffled),
            "shuffled_no_repeat" | "no_repeat" => Ok(RotationPolicy::ShuffledNoRepeat),
            other => Err(CoreError::Validation(
                crate::error::ValidationError::NotAllowed {
                    field: format!("rotation policy '{}'", other),
                    allowed: vec![
                        "sequential".into(),
                        "shuffled".into(),
                        "shuffled_no_repeat".into(),
                    ],
                },
            )),
        }
    }
}

// =============================================================================
// Shown Set
// =============================================================================

/// Indices displayed since the last full cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShownSet(BTreeSet<usize>);

impl ShownSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding only `index`.
    pub fn starting_at(index: usize) -> Self {
        let mut set = Self::new();
        set.insert(index);
        set
    }

    pub fn insert(&mut self, index: usize) {
        self.0.insert(index);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Collapses the set to `{current}`.
    pub fn reset(&mut self, current: usize) {
        self.0.clear();
        self.0.insert(current);
    }

    /// True if every index below `len` has been shown.
    pub fn covers(&self, len: usize) -> bool {
        self.0.range(..len).count() >= len
    }

    /// Shown indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<usize> for ShownSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        ShownSet(iter.into_iter().collect())
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Returns the index to show after `current`.
///
/// `None` only for an empty collection; callers must not rotate then. For a
/// single-slide collection the answer is always that slide, and callers
/// should not start a transition.
///
/// With [`RotationPolicy::ShuffledNoRepeat`] a fully covered `shown` set is
/// reset to `{current}` before scanning.
pub fn next_index(
    current: usize,
    policy: RotationPolicy,
    len: usize,
    shown: &mut ShownSet,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if len == 1 {
        return Some(0);
    }

    let sequential = (current + 1) % len;
    if policy != RotationPolicy::ShuffledNoRepeat {
        return Some(sequential);
    }

    if shown.covers(len) {
        shown.reset(current);
    }

    let unshown = (1..=len)
        .map(|step| (current + step) % len)
        .find(|idx| !shown.contains(*idx));

    Some(unshown.unwrap_or(sequential))
}

/// Unbiased Fisher-Yates permutation.
///
/// For `i` from `len - 1` down to 1, swaps element `i` with a uniformly
/// chosen `j` in `[0, i]`.
pub fn shuffle<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
    items
}

/// Uniformly random start position, or `None` for an empty collection.
pub fn random_start<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    (len > 0).then(|| rng.random_range(0..len))
}

// =============================================================================
// Unit Tests
// =============================================================================
