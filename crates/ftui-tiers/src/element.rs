#![forbid(unsafe_code)]

//! Host-facing seams: watched elements, the size-observation primitive, and
//! the change records it delivers.
//!
//! The registry never creates or destroys elements. It only needs to
//! identify them ([`WatchedElement::key`]), read their custom table, and
//! toggle tier tags. Everything platform specific lives behind these two
//! traits, so the core runs the same against the DOM and against test fakes.

use core::fmt::Debug;
use core::hash::Hash;

/// Error creating the platform size-observation subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The host refused or lacks the primitive.
    Unavailable(String),
}

impl core::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "size observer unavailable: {msg}"),
        }
    }
}

impl std::error::Error for SubscriptionError {}

/// Handle to an externally owned, renderable container.
///
/// Handles are cheap views; dropping one must not destroy the element.
pub trait WatchedElement {
    /// Stable identity used for registration bookkeeping.
    type Key: Copy + Eq + Hash + Debug;

    /// Identity of this element, or `None` if it was never given one (such
    /// an element cannot be registered).
    fn key(&self) -> Option<Self::Key>;

    /// Raw serialized custom table, if the element carries one.
    fn breakpoints_attribute(&self) -> Option<String>;

    /// Whether the tier tag is currently present.
    fn has_tier(&self, tier: &str) -> bool;

    /// Add a tier tag. Only called when the tag is absent.
    fn add_tier(&self, tier: &str);

    /// Remove a tier tag. Only called when the tag is present.
    fn remove_tier(&self, tier: &str);
}

/// Platform size-change primitive.
///
/// Notifications are pushed back into
/// [`ObservationRegistry::on_batch`](crate::ObservationRegistry::on_batch) by
/// the host callback, never polled.
pub trait SizeObserver<E: WatchedElement> {
    fn observe(&mut self, element: &E);
    fn unobserve(&mut self, element: &E);
}

/// One entry of a notification batch.
#[derive(Debug, Clone)]
pub struct SizeChange<E> {
    pub element: E,
    /// Observed content width.
    pub width: f64,
}

impl<E> SizeChange<E> {
    #[must_use]
    pub fn new(element: E, width: f64) -> Self {
        Self { element, width }
    }
}
