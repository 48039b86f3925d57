#![forbid(unsafe_code)]

//! Recording fakes for registry tests.
//!
//! [`FakeElement`] stands in for a DOM container: clones share state, tags
//! are a sorted set, and every tag write is counted so tests can assert that
//! reconciliation leaves unchanged tiers untouched.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::element::{SizeObserver, WatchedElement};

#[derive(Debug, Default)]
struct FakeState {
    key: Option<u32>,
    breakpoints: Option<String>,
    tags: BTreeSet<String>,
    mutations: usize,
}

/// Shared-state stand-in for a watched container.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    state: Rc<RefCell<FakeState>>,
}

impl FakeElement {
    #[must_use]
    pub fn new(key: u32) -> Self {
        let element = Self::default();
        element.state.borrow_mut().key = Some(key);
        element
    }

    /// An element without identity; the registry refuses it.
    #[must_use]
    pub fn unkeyed() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_breakpoints(self, raw: &str) -> Self {
        self.set_breakpoints(Some(raw));
        self
    }

    pub fn set_breakpoints(&self, raw: Option<&str>) {
        self.state.borrow_mut().breakpoints = raw.map(str::to_string);
    }

    /// Current tags, sorted.
    #[must_use]
    pub fn tiers(&self) -> Vec<String> {
        self.state.borrow().tags.iter().cloned().collect()
    }

    /// Number of tag writes so far.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.state.borrow().mutations
    }
}

impl WatchedElement for FakeElement {
    type Key = u32;

    fn key(&self) -> Option<u32> {
        self.state.borrow().key
    }

    fn breakpoints_attribute(&self) -> Option<String> {
        self.state.borrow().breakpoints.clone()
    }

    fn has_tier(&self, tier: &str) -> bool {
        self.state.borrow().tags.contains(tier)
    }

    fn add_tier(&self, tier: &str) {
        let mut state = self.state.borrow_mut();
        state.tags.insert(tier.to_string());
        state.mutations += 1;
    }

    fn remove_tier(&self, tier: &str) {
        let mut state = self.state.borrow_mut();
        state.tags.remove(tier);
        state.mutations += 1;
    }
}

/// Observer that records observe/unobserve calls by key.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    observed: Vec<u32>,
    unobserved: Vec<u32>,
}

impl RecordingObserver {
    #[must_use]
    pub fn observed(&self) -> Vec<u32> {
        self.observed.clone()
    }

    #[must_use]
    pub fn unobserved(&self) -> Vec<u32> {
        self.unobserved.clone()
    }
}

impl SizeObserver<FakeElement> for RecordingObserver {
    fn observe(&mut self, element: &FakeElement) {
        self.observed.extend(element.key());
    }

    fn unobserve(&mut self, element: &FakeElement) {
        self.unobserved.extend(element.key());
    }
}
