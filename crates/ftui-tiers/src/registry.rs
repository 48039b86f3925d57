#![forbid(unsafe_code)]

//! The shared size-observation registry.
//!
//! # Design
//!
//! One [`ObservationRegistry`] serves every watched container. It owns the
//! single platform subscription, created lazily by the first
//! [`attach`](ObservationRegistry::attach) and never recreated, plus a
//! registration map keyed by element identity. It holds no element handles:
//! notifications carry the element, and the map only decides whether that
//! element is still of interest.
//!
//! Each notification is reconciled independently:
//!
//! ```text
//! SizeChange(element, width)
//!   → registration lookup            // unknown key: stale, skipped
//!   → custom table (cached decode)   // malformed or absent: default table
//!   → resolve(width, table)
//!   → add missing / remove stale tier tags, leave the rest untouched
//! ```
//!
//! # Invariants
//!
//! 1. After reconciling element E at width w against table T, the tier tags
//!    of E that name tiers of T are exactly `resolve(w, T)`.
//! 2. Tags already in the desired state are never touched.
//! 3. Tiers this registry applied from a previous table of E that are absent
//!    from the current table are removed.
//! 4. A bad entry in a batch never prevents reconciliation of the others.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Malformed custom table | Bad `data-breakpoints` | Default table, `warn` once per raw value |
//! | Stale notification | Element detached or never attached | Skipped, counted in [`BatchReport::stale`] |
//! | Invalid width | NaN, infinite or negative reading | Empty tier set |
//! | No platform primitive | Subscription creation failed | Bookkeeping continues, `error` logged once |

use rustc_hash::FxHashMap;

use crate::element::{SizeChange, SizeObserver, SubscriptionError, WatchedElement};
use crate::resolve::{TierSet, resolve};
use crate::table::{BreakpointTable, ConfigParseError, decode_custom_table};

/// Registry policy knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryConfig {
    /// Table used for containers without a usable custom table.
    pub default_table: BreakpointTable,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_table: BreakpointTable::standard().clone(),
        }
    }
}

/// Lifecycle of the single platform subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Nothing attached yet.
    Pending,
    Connected,
    /// Creation failed; it is not retried.
    Unavailable,
}

impl SubscriptionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Connected => "connected",
            Self::Unavailable => "unavailable",
        }
    }
}

type Connector<P> = Box<dyn FnOnce() -> Result<P, SubscriptionError>>;

enum Subscription<P> {
    Pending(Connector<P>),
    Connected(P),
    Unavailable,
}

impl<P> Subscription<P> {
    fn state(&self) -> SubscriptionState {
        match self {
            Self::Pending(_) => SubscriptionState::Pending,
            Self::Connected(_) => SubscriptionState::Connected,
            Self::Unavailable => SubscriptionState::Unavailable,
        }
    }
}

/// Last decoded custom table of one element.
struct CachedTable {
    raw: Option<String>,
    decoded: Result<Option<BreakpointTable>, ConfigParseError>,
}

#[derive(Default)]
struct Registration {
    table: Option<CachedTable>,
    /// Tiers this registry left active on the element after the last pass.
    applied: TierSet,
}

/// Tag mutations performed for one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl TierDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Summary of one [`ObservationRegistry::on_batch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Entries reconciled against a registered element.
    pub reconciled: u32,
    /// Entries skipped because the element is not registered.
    pub stale: u32,
    /// Entries whose custom table was malformed.
    pub fallbacks: u32,
    /// Tier tags added across the batch.
    pub added: u32,
    /// Tier tags removed across the batch.
    pub removed: u32,
}

/// Bring the tier tags of `element` in line with `resolve(width, table)`.
///
/// Only tiers named by `table` are considered, and only tags whose state
/// differs from the target are written.
pub fn reconcile<E: WatchedElement>(
    element: &E,
    width: f64,
    table: &BreakpointTable,
) -> TierDiff {
    let target = resolve(width, table);
    let mut diff = TierDiff::default();
    for name in table.names() {
        let wanted = target.contains(name);
        let present = element.has_tier(name);
        if wanted && !present {
            element.add_tier(name);
            diff.added.push(name.to_string());
        } else if !wanted && present {
            element.remove_tier(name);
            diff.removed.push(name.to_string());
        }
    }
    diff
}

/// Process-wide dispatcher from size notifications to tier tags.
///
/// Hosts create one instance and hand it (by reference) to whatever mounts
/// and unmounts containers. See the module docs for the processing model.
pub struct ObservationRegistry<E: WatchedElement, P: SizeObserver<E>> {
    config: RegistryConfig,
    subscription: Subscription<P>,
    registrations: FxHashMap<E::Key, Registration>,
}

impl<E: WatchedElement, P: SizeObserver<E>> core::fmt::Debug for ObservationRegistry<E, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObservationRegistry")
            .field("subscription", &self.subscription.state())
            .field("attached", &self.registrations.len())
            .finish_non_exhaustive()
    }
}

impl<E: WatchedElement, P: SizeObserver<E>> ObservationRegistry<E, P> {
    /// Create a registry with the default configuration.
    ///
    /// `connect` creates the platform subscription. It runs at most once,
    /// on the first successful [`attach`](Self::attach).
    #[must_use]
    pub fn new(connect: impl FnOnce() -> Result<P, SubscriptionError> + 'static) -> Self {
        Self::with_config(RegistryConfig::default(), connect)
    }

    #[must_use]
    pub fn with_config(
        config: RegistryConfig,
        connect: impl FnOnce() -> Result<P, SubscriptionError> + 'static,
    ) -> Self {
        Self {
            config,
            subscription: Subscription::Pending(Box::new(connect)),
            registrations: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    #[must_use]
    pub fn subscription_state(&self) -> SubscriptionState {
        self.subscription.state()
    }

    /// The platform observer, once connected.
    #[must_use]
    pub fn observer(&self) -> Option<&P> {
        match &self.subscription {
            Subscription::Connected(observer) => Some(observer),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_attached(&self, element: &E) -> bool {
        element
            .key()
            .is_some_and(|key| self.registrations.contains_key(&key))
    }

    /// Number of attached elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Start watching `element`.
    ///
    /// Returns `false` if it was already attached (no-op) or has no key.
    /// Classification happens on the next notification, not here.
    pub fn attach(&mut self, element: &E) -> bool {
        let Some(key) = element.key() else {
            tracing::warn!("attach ignored: element has no registry key");
            return false;
        };
        if self.registrations.contains_key(&key) {
            return false;
        }
        if let Some(observer) = self.connected_observer() {
            observer.observe(element);
        }
        self.registrations.insert(key, Registration::default());
        tracing::debug!(
            ?key,
            attached = self.registrations.len(),
            "tier container attached"
        );
        true
    }

    /// Stop watching `element`. Returns `false` if it was not attached.
    ///
    /// Tags already on the element are left as they are.
    pub fn detach(&mut self, element: &E) -> bool {
        let Some(key) = element.key() else {
            return false;
        };
        if self.registrations.remove(&key).is_none() {
            return false;
        }
        if let Subscription::Connected(observer) = &mut self.subscription {
            observer.unobserve(element);
        }
        tracing::debug!(
            ?key,
            attached = self.registrations.len(),
            "tier container detached"
        );
        true
    }

    /// Reconcile a batch of size changes in delivery order.
    pub fn on_batch<I>(&mut self, changes: I) -> BatchReport
    where
        I: IntoIterator<Item = SizeChange<E>>,
    {
        let mut report = BatchReport::default();
        for change in changes {
            self.reconcile_change(&change, &mut report);
        }
        report
    }

    fn reconcile_change(&mut self, change: &SizeChange<E>, report: &mut BatchReport) {
        let element = &change.element;
        let Some(key) = element.key() else {
            tracing::trace!("size change for unkeyed element ignored");
            report.stale += 1;
            return;
        };
        let Some(registration) = self.registrations.get_mut(&key) else {
            tracing::trace!(?key, "size change for detached element ignored");
            report.stale += 1;
            return;
        };

        let raw = element.breakpoints_attribute();
        let cache_hit = registration
            .table
            .as_ref()
            .is_some_and(|cached| cached.raw == raw);
        if !cache_hit {
            let decoded = decode_custom_table(raw.as_deref());
            if let Err(err) = &decoded {
                tracing::warn!(
                    ?key,
                    error = %err,
                    "malformed breakpoint table; using defaults"
                );
            }
            registration.table = Some(CachedTable { raw, decoded });
        } else if registration
            .table
            .as_ref()
            .is_some_and(|cached| cached.decoded.is_err())
        {
            tracing::debug!(?key, "breakpoint table still invalid; using defaults");
        }

        let table = match registration.table.as_ref().map(|cached| &cached.decoded) {
            Some(Ok(Some(custom))) => custom,
            Some(Err(_)) => {
                report.fallbacks += 1;
                &self.config.default_table
            }
            _ => &self.config.default_table,
        };

        let mut diff = reconcile(element, change.width, table);
        for name in &registration.applied {
            if !table.contains(name) && element.has_tier(name) {
                element.remove_tier(name);
                diff.removed.push(name.clone());
            }
        }
        registration.applied = resolve(change.width, table);

        report.reconciled += 1;
        report.added += diff.added.len() as u32;
        report.removed += diff.removed.len() as u32;
        if !diff.is_empty() {
            tracing::trace!(
                ?key,
                width = change.width,
                added = ?diff.added,
                removed = ?diff.removed,
                "tier tags reconciled"
            );
        }
    }

    /// Connect on first use; later calls reuse the result.
    fn connected_observer(&mut self) -> Option<&mut P> {
        if matches!(self.subscription, Subscription::Pending(_)) {
            let pending = std::mem::replace(&mut self.subscription, Subscription::Unavailable);
            if let Subscription::Pending(connect) = pending {
                match connect() {
                    Ok(observer) => {
                        tracing::debug!("size observer subscription created");
                        self.subscription = Subscription::Connected(observer);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "size observer subscription failed");
                    }
                }
            }
        }
        match &mut self.subscription {
            Subscription::Connected(observer) => Some(observer),
            _ => None,
        }
    }
}
