#![forbid(unsafe_code)]

//! Container breakpoint tiers for FrankenTUI web surfaces.
//!
//! # Role in FrankenTUI
//! `ftui-tiers` classifies the width of a rendered container into named
//! tiers (`SM`, `MD`, ...) and mirrors the result as class tags on the
//! container, so styling can follow container size instead of viewport size.
//!
//! # Primary responsibilities
//! - **BreakpointTable**: tier → minimum width, with the serialized
//!   `data-breakpoints` decoder.
//! - **resolve**: pure width → active tier set classification.
//! - **ObservationRegistry**: the single shared dispatcher that owns the
//!   platform size subscription and reconciles tier tags on every batch.
//!
//! # How it fits in the system
//! The core is platform independent. `ftui-tiers-web` implements
//! [`WatchedElement`] and [`SizeObserver`] on top of the DOM and
//! `ResizeObserver`, and owns the process-wide registry instance.
//!
//! # Example
//!
//! ```
//! use ftui_tiers::{BreakpointTable, resolve};
//!
//! let tiers = resolve(576.0, BreakpointTable::standard());
//! assert!(tiers.contains("SM") && tiers.contains("MD"));
//! assert!(!tiers.contains("LG"));
//! ```

pub mod element;
pub mod registry;
pub mod resolve;
pub mod table;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;


pub use element::{SizeChange, SizeObserver, SubscriptionError, WatchedElement};
pub use registry::{
    BatchReport, ObservationRegistry, RegistryConfig, SubscriptionState, TierDiff, reconcile,
};
pub use resolve::{TierSet, resolve, satisfies, usable_width};
pub use table::{BreakpointTable, ConfigParseError, DEFAULT_TIERS, Tier, decode_custom_table};
