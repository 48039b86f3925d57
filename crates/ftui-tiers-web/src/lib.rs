//! Browser binding for `ftui-tiers`.
//!
//! Containers mounted through this crate get tier classes (`SM`, `MD`,
//! `LG`, `XL`, or the names of their own `data-breakpoints` table) kept in
//! sync with their content width by a single shared `ResizeObserver`.
//!
//! The DOM-facing modules only build for `wasm32`; attribute handling is
//! platform independent so it can be tested natively.

pub mod attributes;

#[cfg(target_arch = "wasm32")]
pub mod container;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod observer;

pub use attributes::{ContainerAttributes, KeyAllocator};

#[cfg(target_arch = "wasm32")]
pub use container::{attach, attached_count, detach, is_attached, mount_container};
#[cfg(target_arch = "wasm32")]
pub use dom::{DomContainer, ElementKeys};
#[cfg(target_arch = "wasm32")]
pub use observer::{DomSizeObserver, entries_to_changes};
