#![forbid(unsafe_code)]

//! Attribute names and registry keys for DOM containers.
//!
//! A watched container carries a marker attribute (`data-observe-resizes`
//! by default) for as long as it is attached, which makes watched containers
//! discoverable by selector. The marker is informational only: registry keys
//! are tracked per element object, never read back from the attribute.

/// Attribute names used on watched containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerAttributes {
    /// Serialized custom breakpoint table.
    pub breakpoints: &'static str,
    /// Marker present while the container is watched.
    pub marker: &'static str,
}

impl Default for ContainerAttributes {
    fn default() -> Self {
        Self {
            breakpoints: "data-breakpoints",
            marker: "data-observe-resizes",
        }
    }
}

/// Monotonic registry key source. Key 0 is never handed out.
#[derive(Debug, Clone)]
pub struct KeyAllocator {
    next: u32,
}

impl Default for KeyAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl KeyAllocator {
    /// Hand out the next key, skipping the reserved 0 on wrap-around.
    pub fn allocate(&mut self) -> u32 {
        let key = self.next;
        self.next = self.next.checked_add(1).unwrap_or(1);
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_attribute_names() {
        let attrs = ContainerAttributes::default();
        assert_eq!(attrs.breakpoints, "data-breakpoints");
        assert_eq!(attrs.marker, "data-observe-resizes");
    }

    #[test]
    fn keys_start_at_one() {
        let mut keys = KeyAllocator::default();
        assert_eq!(keys.allocate(), 1);
        assert_eq!(keys.allocate(), 2);
    }

    #[test]
    fn keys_skip_zero_on_wrap() {
        let mut keys = KeyAllocator { next: u32::MAX };
        assert_eq!(keys.allocate(), u32::MAX);
        assert_eq!(keys.allocate(), 1);
    }
}
