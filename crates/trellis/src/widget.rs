//! Core widget trait definition.
//!
//! A widget is a node in the tree whose lifecycle is driven entirely by
//! message delivery: the engine owns the state flags and performs every
//! transition, while the [`Widget`] trait is the hook surface a concrete
//! widget implements to observe those transitions.
//!
//! # Key Types
//!
//! - [`WidgetId`] - Stable handle into the [`WidgetTree`]
//! - [`Widget`] - Hook trait with default no-op implementations
//! - [`WidgetState`] - The lifecycle flags kept per widget by the tree
//!
//! # Implementing a Widget
//!
//! Every hook has a default no-op body, so a widget implements only what
//! it cares about. Hooks receive the tree and the widget's own ID, so they
//! can query state, mutate structure, and send or post further messages:
//!
//! ```
//! use trellis::{Widget, WidgetId, WidgetTree};
//!
//! struct StatusBar {
//!     refreshes: usize,
//! }
//!
//! impl Widget for StatusBar {
//!     fn on_update_request(&mut self, tree: &mut WidgetTree, id: WidgetId) {
//!         self.refreshes += 1;
//!         // A refresh invalidates our fit; ask for one next frame.
//!         tree.fit(id);
//!     }
//! }
//!
//! let mut tree = WidgetTree::new();
//! let bar = tree.register(Box::new(StatusBar { refreshes: 0 }));
//! tree.update(bar);
//! tree.flush_posted();
//! assert_eq!(tree.widget::<StatusBar>(bar).unwrap().refreshes, 1);
//! ```
//!
//! [`WidgetTree`]: crate::WidgetTree

use std::any::Any;

use slotmap::new_key_type;

use crate::message::{ChildMessage, ResizeMessage};
use crate::tree::WidgetTree;

new_key_type! {
    /// A unique, stable identifier for a widget in a [`WidgetTree`].
    ///
    /// IDs remain valid as the tree changes shape; they stop resolving
    /// only if the tree itself is dropped. A disposed widget keeps its ID
    /// so late queries still answer truthfully.
    ///
    /// [`WidgetTree`]: crate::WidgetTree
    pub struct WidgetId;
}

/// Lifecycle flags the tree keeps for each widget.
///
/// These are the widget's own state; effective visibility additionally
/// depends on ancestors and is computed by
/// [`WidgetTree::is_visible`](crate::WidgetTree::is_visible).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetState {
    /// Whether the widget's render node is part of the host's live tree.
    pub attached: bool,
    /// Whether the widget is explicitly hidden (its own state, not
    /// considering ancestors).
    pub hidden: bool,
    /// Whether the widget has been disposed. Terminal.
    pub disposed: bool,
}

/// The hook surface for concrete widgets.
///
/// The engine calls exactly one hook per delivered message, after it has
/// applied the state transition for that message. All hooks default to
/// doing nothing; a widget overrides the ones it needs. Because the state
/// machine itself lives in the engine, overriding a hook never disturbs
/// the transition semantics.
pub trait Widget: Any + Send {
    /// The widget received a resize; re-measure or re-arrange content.
    ///
    /// The message carries explicit dimensions when the sender knows
    /// them, or [`ResizeMessage::UNKNOWN`] when the widget should measure
    /// for itself.
    fn on_resize(&mut self, _tree: &mut WidgetTree, _id: WidgetId, _msg: &ResizeMessage) {}

    /// The widget should refresh itself (coalesced, delivered on flush).
    fn on_update_request(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// The widget should fit itself to its content (coalesced, delivered
    /// on flush).
    fn on_fit_request(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// The widget's render node entered the host tree.
    fn on_after_attach(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// The widget's render node is about to leave the host tree.
    fn on_before_detach(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// The widget became visible.
    fn on_after_show(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// The widget is about to become hidden.
    fn on_before_hide(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// The widget was asked to close. A common reaction is
    /// `tree.hide(id)`.
    fn on_close_request(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// A child was added to this widget.
    fn on_child_added(&mut self, _tree: &mut WidgetTree, _id: WidgetId, _msg: &ChildMessage) {}

    /// A child was removed from this widget.
    fn on_child_removed(&mut self, _tree: &mut WidgetTree, _id: WidgetId, _msg: &ChildMessage) {}

    /// A child of this widget became visible.
    fn on_child_shown(&mut self, _tree: &mut WidgetTree, _id: WidgetId, _msg: &ChildMessage) {}

    /// A child of this widget became hidden.
    fn on_child_hidden(&mut self, _tree: &mut WidgetTree, _id: WidgetId, _msg: &ChildMessage) {}
}

/// A widget with no behavior of its own.
///
/// Useful as a plain container node and as the simplest possible widget
/// in tests and examples.
#[derive(Debug, Default)]
pub struct EmptyWidget;

impl Widget for EmptyWidget {}
