#![forbid(unsafe_code)]

//! `ResizeObserver` subscription.
//!
//! The browser delivers an initial notification right after `observe`, then
//! one per content-box change, batched per animation frame. Entries are
//! translated into [`SizeChange`]s and pushed into a host-supplied handler.

use ftui_tiers::{SizeChange, SizeObserver, SubscriptionError};
use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::{ResizeObserver, ResizeObserverEntry};

use crate::attributes::ContainerAttributes;
use crate::dom::{DomContainer, ElementKeys};

type EntriesCallback = Closure<dyn FnMut(Array, ResizeObserver)>;

/// The single `ResizeObserver` shared by every container.
pub struct DomSizeObserver {
    observer: ResizeObserver,
    // Must outlive the observer; the subscription is never torn down.
    _callback: EntriesCallback,
}

impl core::fmt::Debug for DomSizeObserver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomSizeObserver").finish_non_exhaustive()
    }
}

impl DomSizeObserver {
    /// Create the observer, routing every batch of entries to `on_entries`.
    ///
    /// # Errors
    ///
    /// [`SubscriptionError::Unavailable`] if the constructor throws (no
    /// `ResizeObserver` in this host).
    pub fn connect(
        mut on_entries: impl FnMut(Array) + 'static,
    ) -> Result<Self, SubscriptionError> {
        let callback: EntriesCallback =
            Closure::new(move |entries: Array, _observer: ResizeObserver| on_entries(entries));
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|err| SubscriptionError::Unavailable(format!("{err:?}")))?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl SizeObserver<DomContainer> for DomSizeObserver {
    fn observe(&mut self, element: &DomContainer) {
        self.observer.observe(element.element());
    }

    fn unobserve(&mut self, element: &DomContainer) {
        self.observer.unobserve(element.element());
    }
}

/// Translate raw `ResizeObserverEntry` values into size changes.
///
/// Values that are not entries are skipped; the width is the content-box
/// width from `contentRect`. Targets without a key in `keys` come through
/// unkeyed and the registry counts them as stale.
#[must_use]
pub fn entries_to_changes(
    entries: &Array,
    keys: &ElementKeys,
    attributes: ContainerAttributes,
) -> Vec<SizeChange<DomContainer>> {
    entries
        .iter()
        .filter_map(|value| value.dyn_into::<ResizeObserverEntry>().ok())
        .map(|entry| {
            let width = entry.content_rect().width();
            SizeChange::new(keys.container(entry.target(), attributes), width)
        })
        .collect()
}
