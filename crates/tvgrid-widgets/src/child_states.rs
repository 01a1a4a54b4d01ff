#![forbid(unsafe_code)]

//! Per-item transient state kept across view recycling.
//!
//! When an item view detaches while its item still exists, the host may hand
//! over an opaque blob (scroll offset, expansion, ...). The blob is given back
//! when a view for that position attaches again, and it is persisted with the
//! rest of the selection state.
//!
//! # Invariants
//!
//! 1. Under [`SavePolicy::Limited`], at most `n` blobs are retained; the least
//!    recently saved position is evicted first.
//! 2. Blobs never survive a structural mutation of the data set; an update
//!    drops only the blobs of the updated range.

use std::collections::{BTreeMap, VecDeque};

/// Which children have their state retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SavePolicy {
    /// Never retain child state.
    NoChild,
    /// Retain state only for children on screen when the grid is saved.
    #[default]
    OnScreen,
    /// Also retain state of detached children, up to a limit.
    Limited(usize),
    /// Retain state of every detached child.
    AllChildren,
}

/// Position-keyed store of child state blobs.
#[derive(Debug, Clone, Default)]
pub struct ChildStates {
    policy: SavePolicy,
    states: BTreeMap<usize, Vec<u8>>,
    recency: VecDeque<usize>,
}

impl ChildStates {
    /// Create an empty store.
    #[must_use]
    pub fn new(policy: SavePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Active save policy.
    #[inline]
    #[must_use]
    pub fn policy(&self) -> SavePolicy {
        self.policy
    }

    /// Change the policy, trimming retained state to fit it.
    pub fn set_policy(&mut self, policy: SavePolicy) {
        self.policy = policy;
        match policy {
            SavePolicy::NoChild => self.clear(),
            SavePolicy::Limited(limit) => self.evict_to(limit),
            SavePolicy::OnScreen | SavePolicy::AllChildren => {}
        }
    }

    /// Number of retained blobs.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether nothing is retained.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Retained blob for `position`, without removing it.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&[u8]> {
        self.states.get(&position).map(Vec::as_slice)
    }

    /// Retain the state of a child that just detached.
    ///
    /// Ignored unless the policy keeps off-screen children.
    pub fn save_off_screen(&mut self, position: usize, state: Vec<u8>) {
        match self.policy {
            SavePolicy::NoChild | SavePolicy::OnScreen => {}
            SavePolicy::Limited(limit) => {
                if limit == 0 {
                    return;
                }
                self.insert(position, state);
                self.evict_to(limit);
            }
            SavePolicy::AllChildren => self.insert(position, state),
        }
    }

    /// Remove and return the blob for `position` (a view for it attached).
    pub fn take(&mut self, position: usize) -> Option<Vec<u8>> {
        let state = self.states.remove(&position)?;
        self.recency.retain(|&p| p != position);
        Some(state)
    }

    /// Drop the blob for `position`.
    pub fn remove(&mut self, position: usize) {
        let _ = self.take(position);
    }

    /// Drop blobs for `start..start + count`.
    pub fn remove_range(&mut self, start: usize, count: usize) {
        let end = start.saturating_add(count);
        let doomed: Vec<usize> = self.states.range(start..end).map(|(&p, _)| p).collect();
        for position in doomed {
            self.remove(position);
        }
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.states.clear();
        self.recency.clear();
    }

    /// Copy of all retained blobs.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<usize, Vec<u8>> {
        self.states.clone()
    }

    /// Snapshot merged with the state of children currently on screen.
    ///
    /// On-screen entries win over retained ones for the same position.
    #[must_use]
    pub fn snapshot_with(
        &self,
        on_screen: impl IntoIterator<Item = (usize, Vec<u8>)>,
    ) -> BTreeMap<usize, Vec<u8>> {
        let mut merged = self.snapshot();
        if self.policy != SavePolicy::NoChild {
            merged.extend(on_screen);
        }
        merged
    }

    /// Replace the store with a persisted snapshot.
    pub fn load(&mut self, states: BTreeMap<usize, Vec<u8>>) {
        self.clear();
        if self.policy == SavePolicy::NoChild {
            return;
        }
        self.recency.extend(states.keys().copied());
        self.states = states;
    }

    fn insert(&mut self, position: usize, state: Vec<u8>) {
        if self.states.insert(position, state).is_some() {
            self.recency.retain(|&p| p != position);
        }
        self.recency.push_back(position);
    }

    fn evict_to(&mut self, limit: usize) {
        while self.states.len() > limit {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            self.states.remove(&oldest);
        }
    }
}
