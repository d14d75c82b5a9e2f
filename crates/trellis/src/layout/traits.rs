//! Core Layout trait definition.
//!
//! The Layout trait defines the child-enumeration surface and the message
//! propagation contract every layout implements. Concrete layouts supply
//! the backing ordered collection; the default hook bodies here implement
//! the stock fan-out behavior.

use std::any::Any;

use crate::error::Result;
use crate::message::{ChildMessage, Message, ResizeMessage};
use crate::tree::WidgetTree;
use crate::widget::WidgetId;

/// The propagation contract between a widget and its children.
///
/// A layout belongs to exactly one widget for its entire lifetime: the
/// parent back-reference is set when the layout is installed and can
/// never change afterwards. The owning widget forwards every message it
/// receives to [`process_parent_message`](Self::process_parent_message),
/// which re-dispatches to a per-kind hook.
///
/// # Implementing a Layout
///
/// 1. Store children in an ordered collection of your choice
/// 2. Implement the enumeration methods (`child_count`, `child_at`) and
///    the bookkeeping mutations (`insert_child`, `remove_child`)
/// 3. Hold a [`LayoutBase`](super::LayoutBase) and delegate `parent` /
///    `set_parent` to it
/// 4. Override the hooks whose stock behavior you need to change; chain
///    to the stock behavior through the free fan-out helpers
///
/// # Propagation defaults
///
/// | parent message | default behavior |
/// |---|---|
/// | `resize`, `update-request` | send `resize` to every child, in index order, synchronously |
/// | `after-attach`, `before-detach` | send the same message to every child |
/// | `after-show`, `before-hide` | send the same message to every child that is not itself hidden |
/// | `child-added` | insert the child into the backing collection |
/// | `child-removed` | remove the child from the backing collection |
/// | `fit-request`, `child-shown`, `child-hidden` | nothing |
pub trait Layout: Any + Send {
    // =========================================================================
    // Child Enumeration
    // =========================================================================

    /// The number of children in the layout.
    fn child_count(&self) -> usize;

    /// Get the child at the given index.
    ///
    /// Out-of-range indexes return `None`, never an error; "not there" is
    /// an expected outcome for collection queries.
    fn child_at(&self, index: usize) -> Option<WidgetId>;

    /// Get the index of a child, or `None` if it is not in the layout.
    ///
    /// The default implementation is a linear scan over `child_at`.
    fn child_index(&self, child: WidgetId) -> Option<usize> {
        (0..self.child_count()).find(|&i| self.child_at(i) == Some(child))
    }

    // =========================================================================
    // Bookkeeping Mutations
    // =========================================================================

    /// Insert a child into the backing collection.
    ///
    /// `index` is the requested position; `None` or an out-of-range value
    /// appends. Driven by `child-added` delivery; callers outside the
    /// message flow must not reach for this directly.
    fn insert_child(&mut self, index: Option<usize>, child: WidgetId);

    /// Remove a child from the backing collection.
    ///
    /// Driven by `child-removed` delivery. Removing an untracked child is
    /// a no-op.
    fn remove_child(&mut self, child: WidgetId);

    // =========================================================================
    // Ownership
    // =========================================================================

    /// The widget that owns this layout, or `None` before installation.
    fn parent(&self) -> Option<WidgetId>;

    /// Set the owning widget. Called by the tree during installation.
    ///
    /// The parent is set at most once; any attempt to change it fails
    /// with [`WidgetError::LayoutParentChange`]. Setting the same parent
    /// again is a no-op.
    ///
    /// [`WidgetError::LayoutParentChange`]: crate::WidgetError::LayoutParentChange
    fn set_parent(&mut self, parent: WidgetId) -> Result<()>;

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// One-time setup, delivered synchronously right after installation.
    ///
    /// The default adopts every pre-added child (children recorded in the
    /// collection before the layout had an owner get their parent
    /// back-reference set now) and posts a fit request to the owner so a
    /// concrete layout can translate the new arrangement into geometry on
    /// the next flush.
    fn initialize(&mut self, tree: &mut WidgetTree, owner: WidgetId) {
        for index in 0..self.child_count() {
            let Some(child) = self.child_at(index) else {
                continue;
            };
            if tree.parent(child) == Some(owner) {
                continue;
            }
            if let Err(error) = tree.set_parent(child, Some(owner)) {
                tracing::warn!(
                    target: "trellis::layout",
                    widget = ?child,
                    %error,
                    "could not adopt pre-added child during layout initialization"
                );
            }
        }
        tree.fit(owner);
    }

    /// Dispose every owned child, then clear the backing collection.
    ///
    /// Called when the owning widget is disposed. Idempotent: a second
    /// call finds an empty collection and does nothing.
    fn dispose(&mut self, tree: &mut WidgetTree) {
        let children: Vec<WidgetId> = (0..self.child_count())
            .filter_map(|i| self.child_at(i))
            .collect();
        for child in children {
            tree.dispose(child);
            self.remove_child(child);
        }
    }

    // =========================================================================
    // Message Propagation
    // =========================================================================

    /// The single entry point for every message the owning widget
    /// receives.
    ///
    /// The default re-dispatches to the per-kind hooks below. Overriding
    /// this method directly is rarely necessary; override the hooks
    /// instead.
    fn process_parent_message(
        &mut self,
        tree: &mut WidgetTree,
        owner: WidgetId,
        msg: &Message,
    ) {
        match msg {
            Message::Resize(m) => self.on_resize(tree, owner, m),
            Message::UpdateRequest => self.on_update_request(tree, owner),
            Message::FitRequest => self.on_fit_request(tree, owner),
            Message::AfterAttach => self.on_after_attach(tree, owner),
            Message::BeforeDetach => self.on_before_detach(tree, owner),
            Message::AfterShow => self.on_after_show(tree, owner),
            Message::BeforeHide => self.on_before_hide(tree, owner),
            Message::ChildAdded(m) => self.on_child_added(tree, owner, m),
            Message::ChildRemoved(m) => self.on_child_removed(tree, owner, m),
            Message::ChildShown(m) => self.on_child_shown(tree, owner, m),
            Message::ChildHidden(m) => self.on_child_hidden(tree, owner, m),
            // Request messages are handled by the engine before the hook
            // they trigger reaches the layout.
            Message::ShowRequest | Message::HideRequest | Message::CloseRequest => {}
        }
    }

    /// The owner was resized. Default: re-send a resize to every child.
    ///
    /// Propagation is synchronous and immediate so a descendant querying
    /// its ancestor's geometry mid-handler sees consistent state.
    fn on_resize(&mut self, tree: &mut WidgetTree, _owner: WidgetId, _msg: &ResizeMessage) {
        send_resize_to_children(self, tree);
    }

    /// The owner received an update request. Default: treated identically
    /// to a resize for propagation purposes.
    fn on_update_request(&mut self, tree: &mut WidgetTree, _owner: WidgetId) {
        send_resize_to_children(self, tree);
    }

    /// The owner received a fit request. Default: nothing - translating a
    /// fit into geometry is a concrete layout's decision.
    fn on_fit_request(&mut self, _tree: &mut WidgetTree, _owner: WidgetId) {}

    /// The owner was attached. Default: forward to every child.
    fn on_after_attach(&mut self, tree: &mut WidgetTree, _owner: WidgetId) {
        send_to_children(self, tree, Message::AfterAttach);
    }

    /// The owner is about to detach. Default: forward to every child.
    fn on_before_detach(&mut self, tree: &mut WidgetTree, _owner: WidgetId) {
        send_to_children(self, tree, Message::BeforeDetach);
    }

    /// The owner became visible. Default: forward to every child that is
    /// not itself hidden.
    fn on_after_show(&mut self, tree: &mut WidgetTree, _owner: WidgetId) {
        send_to_unhidden_children(self, tree, Message::AfterShow);
    }

    /// The owner is about to hide. Default: forward to every child that
    /// is not itself hidden.
    fn on_before_hide(&mut self, tree: &mut WidgetTree, _owner: WidgetId) {
        send_to_unhidden_children(self, tree, Message::BeforeHide);
    }

    /// A child was added to the owner. Default: record it in the backing
    /// collection at the requested index (appending if none), unless it
    /// is already tracked.
    fn on_child_added(&mut self, _tree: &mut WidgetTree, _owner: WidgetId, msg: &ChildMessage) {
        if self.child_index(msg.child).is_none() {
            self.insert_child(msg.current_index, msg.child);
        }
    }

    /// A child was removed from the owner. Default: drop it from the
    /// backing collection. Never fanned out further.
    fn on_child_removed(&mut self, _tree: &mut WidgetTree, _owner: WidgetId, msg: &ChildMessage) {
        self.remove_child(msg.child);
    }

    /// A child of the owner became visible. Default: nothing.
    fn on_child_shown(&mut self, _tree: &mut WidgetTree, _owner: WidgetId, _msg: &ChildMessage) {}

    /// A child of the owner became hidden. Default: nothing.
    fn on_child_hidden(&mut self, _tree: &mut WidgetTree, _owner: WidgetId, _msg: &ChildMessage) {}
}

/// Send a message to every child of a layout, in index order.
///
/// This is the stock fan-out body for `after-attach` and `before-detach`.
pub fn send_to_children<L: Layout + ?Sized>(layout: &L, tree: &mut WidgetTree, msg: Message) {
    for index in 0..layout.child_count() {
        if let Some(child) = layout.child_at(index) {
            tree.send_message(child, msg);
        }
    }
}

/// Send a message to every child that is not itself hidden, in index
/// order.
///
/// This is the stock fan-out body for `after-show` and `before-hide`: a
/// child that is explicitly hidden does not change visibility when its
/// parent does.
pub fn send_to_unhidden_children<L: Layout + ?Sized>(
    layout: &L,
    tree: &mut WidgetTree,
    msg: Message,
) {
    for index in 0..layout.child_count() {
        if let Some(child) = layout.child_at(index) {
            if !tree.is_hidden(child) {
                tree.send_message(child, msg);
            }
        }
    }
}

/// Send an unknown-size resize to every child, in index order.
///
/// This is the stock fan-out body for `resize` and `update-request`. The
/// parent's new geometry does not determine any child's geometry, so each
/// child is told to re-measure for itself.
pub fn send_resize_to_children<L: Layout + ?Sized>(layout: &L, tree: &mut WidgetTree) {
    for index in 0..layout.child_count() {
        if let Some(child) = layout.child_at(index) {
            tree.send_message(child, Message::Resize(ResizeMessage::UNKNOWN));
        }
    }
}
