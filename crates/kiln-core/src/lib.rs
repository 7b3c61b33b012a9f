//! Component registry, state store, and live preview for kiln.
//!
//! This crate holds the single selected component instance, the static table
//! of component descriptors it is seeded from, and the pure preview renderer
//! that maps the current instance to markup.

pub mod component;
pub mod preview;
pub mod registry;
pub mod store;
pub mod style;

pub use component::{
    check_properties, ComponentKind, ComponentProps, EffectPreset, Effects, PropValue,
    PropertyWarning, SelectedComponent,
};
pub use preview::{escape_html, list_items, render_preview, RenderedPreview};
pub use registry::{
    Animation, Category, ComponentDescriptor, ComponentRegistry, EffectDescriptor, HoverEffect,
    PropertyDescriptor, PropertyGroup, PropertyKind, RegistryError,
};
pub use store::{ComponentStore, StoreEvent, StoreObserver, SubscriptionId};
pub use style::{StateStyle, StyleConfig, StyleError};
