#![forbid(unsafe_code)]

//! [`WatchedElement`] over a DOM `Element`.
//!
//! Tier tags are CSS classes. Registry keys live in a JS `WeakMap` keyed by
//! the element object itself, so identity follows the node rather than any
//! attribute a `cloneNode` could copy, and a removed container is never kept
//! alive by the registry.

use ftui_tiers::WatchedElement;
use js_sys::{Object, WeakMap};
use wasm_bindgen::JsValue;
use web_sys::Element;

use crate::attributes::{ContainerAttributes, KeyAllocator};

/// Element → registry key, held weakly.
#[derive(Debug)]
pub struct ElementKeys {
    map: WeakMap,
    next: KeyAllocator,
}

impl Default for ElementKeys {
    fn default() -> Self {
        Self {
            map: WeakMap::new(),
            next: KeyAllocator::default(),
        }
    }
}

impl ElementKeys {
    /// Key currently assigned to `element`, if any.
    #[must_use]
    pub fn lookup(&self, element: &Element) -> Option<u32> {
        let object: &Object = element.as_ref();
        self.map
            .get(object)
            .as_f64()
            .and_then(|raw| u32::try_from(raw as u64).ok())
    }

    /// Assign a fresh key to `element`, replacing any earlier one.
    pub fn assign(&mut self, element: &Element) -> u32 {
        let key = self.next.allocate();
        let object: &Object = element.as_ref();
        self.map.set(object, &JsValue::from(key));
        key
    }

    /// Drop `element`'s key. Returns the key it had.
    pub fn forget(&mut self, element: &Element) -> Option<u32> {
        let key = self.lookup(element)?;
        let object: &Object = element.as_ref();
        self.map.delete(object);
        Some(key)
    }

    /// Wrap `element` with whatever key it currently has.
    #[must_use]
    pub fn container(&self, element: Element, attributes: ContainerAttributes) -> DomContainer {
        let key = self.lookup(&element);
        DomContainer::new(element, key, attributes)
    }
}

/// A DOM container as seen by the tier registry.
#[derive(Debug, Clone)]
pub struct DomContainer {
    element: Element,
    key: Option<u32>,
    attributes: ContainerAttributes,
}

impl DomContainer {
    #[must_use]
    pub fn new(element: Element, key: Option<u32>, attributes: ContainerAttributes) -> Self {
        Self {
            element,
            key,
            attributes,
        }
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Write the marker attribute so watched containers match
    /// `[data-observe-resizes]`.
    ///
    /// # Errors
    ///
    /// Propagates a DOM exception from `setAttribute`.
    pub fn set_marker(&self) -> Result<(), JsValue> {
        let value = self.key.map(|key| key.to_string()).unwrap_or_default();
        self.element.set_attribute(self.attributes.marker, &value)
    }

    /// Remove the marker attribute.
    ///
    /// # Errors
    ///
    /// Propagates a DOM exception from `removeAttribute`.
    pub fn clear_marker(&self) -> Result<(), JsValue> {
        self.element.remove_attribute(self.attributes.marker)
    }
}

impl WatchedElement for DomContainer {
    type Key = u32;

    fn key(&self) -> Option<u32> {
        self.key
    }

    fn breakpoints_attribute(&self) -> Option<String> {
        self.element.get_attribute(self.attributes.breakpoints)
    }

    fn has_tier(&self, tier: &str) -> bool {
        self.element.class_list().contains(tier)
    }

    fn add_tier(&self, tier: &str) {
        if let Err(err) = self.element.class_list().add_1(tier) {
            tracing::warn!(tier, error = ?err, "failed to add tier class");
        }
    }

    fn remove_tier(&self, tier: &str) {
        if let Err(err) = self.element.class_list().remove_1(tier) {
            tracing::warn!(tier, error = ?err, "failed to remove tier class");
        }
    }
}
