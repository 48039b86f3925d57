#![forbid(unsafe_code)]

//! Process-wide tier host and the JS-facing mount API.
//!
//! One [`TierHost`] per wasm instance (thread-local; the browser main thread
//! is the only thread that touches the DOM). It owns the shared
//! [`ObservationRegistry`], whose `ResizeObserver` is created by the first
//! attach and then reused for every container.
//!
//! ```text
//! component mount   → mountContainer(el, breakpoints?)   // write attrs, attach
//! ResizeObserver    → on_entries(Array)                  // reconcile batch
//! component unmount → unmountContainer(el)               // detach
//! ```

use std::cell::RefCell;

use ftui_tiers::{BatchReport, BreakpointTable, ObservationRegistry};
use js_sys::{Array, JSON};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::attributes::ContainerAttributes;
use crate::dom::{DomContainer, ElementKeys};
use crate::observer::{DomSizeObserver, entries_to_changes};

/// Shared registry plus the element → key map for DOM containers.
#[derive(Debug)]
pub struct TierHost {
    registry: ObservationRegistry<DomContainer, DomSizeObserver>,
    keys: ElementKeys,
    attributes: ContainerAttributes,
}

thread_local! {
    static HOST: RefCell<TierHost> =
        RefCell::new(TierHost::new(ContainerAttributes::default()));
}

impl TierHost {
    fn new(attributes: ContainerAttributes) -> Self {
        Self {
            registry: ObservationRegistry::new(|| DomSizeObserver::connect(on_entries)),
            keys: ElementKeys::default(),
            attributes,
        }
    }

    fn container(&self, element: &Element) -> DomContainer {
        self.keys.container(element.clone(), self.attributes)
    }

    /// Attach `element` under a fresh key and mark it.
    ///
    /// Returns `false` if this exact element is already attached.
    fn attach(&mut self, element: &Element) -> Result<bool, JsValue> {
        if self.registry.is_attached(&self.container(element)) {
            return Ok(false);
        }
        let key = self.keys.assign(element);
        let container = DomContainer::new(element.clone(), Some(key), self.attributes);
        if let Err(err) = container.set_marker() {
            self.keys.forget(element);
            return Err(err);
        }
        Ok(self.registry.attach(&container))
    }

    /// Detach `element` and clear its marker. Unknown elements are a no-op.
    fn detach(&mut self, element: &Element) -> bool {
        let container = self.container(element);
        if !self.registry.detach(&container) {
            return false;
        }
        self.keys.forget(element);
        if let Err(err) = container.clear_marker() {
            tracing::warn!(error = ?err, "failed to clear container marker");
        }
        true
    }

    fn dispatch(&mut self, entries: &Array) -> BatchReport {
        let changes = entries_to_changes(entries, &self.keys, self.attributes);
        self.registry.on_batch(changes)
    }
}

fn with_host<R>(f: impl FnOnce(&mut TierHost) -> R) -> R {
    HOST.with(|host| f(&mut host.borrow_mut()))
}

/// `ResizeObserver` callback target.
fn on_entries(entries: Array) {
    HOST.with(|host| {
        let Ok(mut host) = host.try_borrow_mut() else {
            tracing::warn!("re-entrant resize notification dropped");
            return;
        };
        let report = host.dispatch(&entries);
        if report.stale > 0 || report.fallbacks > 0 {
            tracing::debug!(
                reconciled = report.reconciled,
                stale = report.stale,
                fallbacks = report.fallbacks,
                "resize batch reconciled"
            );
        }
    });
}

/// Start watching `element`. Tier classes appear on the next resize
/// notification (the browser sends one right after observing).
///
/// # Errors
///
/// Propagates a DOM exception while writing the marker attribute; the
/// element is left unattached.
pub fn attach(element: &Element) -> Result<bool, JsValue> {
    with_host(|host| host.attach(element))
}

/// Stop watching `element` and remove its marker. Its current tier classes
/// stay in place.
pub fn detach(element: &Element) -> bool {
    with_host(|host| host.detach(element))
}

/// Write the optional custom table onto `element` and attach it.
///
/// # Errors
///
/// Propagates DOM exceptions from `setAttribute`.
pub fn mount_container(
    element: &Element,
    breakpoints: Option<&BreakpointTable>,
) -> Result<bool, JsValue> {
    if let Some(table) = breakpoints {
        let attributes = with_host(|host| host.attributes);
        element.set_attribute(attributes.breakpoints, &table.to_attribute_value())?;
    }
    attach(element)
}

/// Number of containers currently watched.
#[must_use]
pub fn attached_count() -> usize {
    with_host(|host| host.registry.len())
}

/// Whether `element` is currently watched.
#[must_use]
pub fn is_attached(element: &Element) -> bool {
    with_host(|host| host.registry.is_attached(&host.container(element)))
}

// ---------------------------------------------------------------------------
// JS exports
// ---------------------------------------------------------------------------

/// Decode a JS breakpoint object (`{ SM: 384, ... }`) into a table.
fn table_from_js(value: &JsValue) -> Result<Option<BreakpointTable>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    let raw = JSON::stringify(value)?
        .as_string()
        .ok_or_else(|| JsValue::from_str("breakpoints are not serializable"))?;
    BreakpointTable::from_attribute_value(&raw)
        .map(Some)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Mount a responsive container: store `breakpoints` (optional object of
/// tier name → min width) as `data-breakpoints` and start watching.
#[wasm_bindgen(js_name = mountContainer)]
pub fn mount_container_js(element: Element, breakpoints: JsValue) -> Result<bool, JsValue> {
    let table = table_from_js(&breakpoints)?;
    mount_container(&element, table.as_ref())
}

/// Stop watching a container on unmount.
#[wasm_bindgen(js_name = unmountContainer)]
pub fn unmount_container_js(element: Element) -> bool {
    detach(&element)
}

#[wasm_bindgen(js_name = attachContainer)]
pub fn attach_js(element: Element) -> Result<bool, JsValue> {
    attach(&element)
}

#[wasm_bindgen(js_name = attachedContainerCount)]
pub fn attached_count_js() -> u32 {
    u32::try_from(attached_count()).unwrap_or(u32::MAX)
}
