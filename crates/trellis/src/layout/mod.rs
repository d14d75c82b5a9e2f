//! Layout management for widget children.
//!
//! A layout owns the ordered collection of a widget's children and is the
//! fan-out point of the message protocol: every lifecycle message the
//! owning widget receives is forwarded to its layout, and the layout
//! re-broadcasts the relevant subset to the children.
//!
//! This module fixes the *propagation* contract only. How children are
//! arranged geometrically is a concern of concrete layouts and the host,
//! not of this crate.
//!
//! # Key Types
//!
//! - [`Layout`] - The propagation contract and child-enumeration surface
//! - [`LayoutBase`] - Shared state helper (set-once parent back-reference)
//! - [`PanelLayout`] - The stock concrete layout: an ordered list of
//!   children with no arrangement policy
//!
//! The free functions ([`send_to_children`], [`send_to_unhidden_children`],
//! [`send_resize_to_children`]) are the stock fan-out bodies; an
//! overriding hook that wants the default behavior as well calls the same
//! helper the default implementation uses.

mod base;
mod panel;
mod traits;

pub use base::LayoutBase;
pub use panel::PanelLayout;
pub use traits::{
    Layout, send_resize_to_children, send_to_children, send_to_unhidden_children,
};
