//! The widget tree: arena storage plus the message-driven state machine.
//!
//! [`WidgetTree`] owns every widget, its lifecycle flags, its parent
//! back-reference, its installed layout and its title, together with the
//! deferred message queue and the host adapter. All structural operations
//! and all message delivery go through the tree, which is what makes the
//! ordering and idempotence guarantees enforceable: flags change only
//! when the corresponding message is delivered, never through direct
//! external mutation.
//!
//! # Delivery and re-entrancy
//!
//! Synchronous sends run to completion inside the caller's stack frame,
//! including sends triggered from hooks while another delivery is in
//! progress. While a widget's hook (or its layout) is on the stack, its
//! box is lifted out of the arena, so hooks receive `&mut WidgetTree`
//! and may freely mutate structure - attach, detach and reparent of
//! *other* widgets mid-delivery are fully supported.
//!
//! # Posted messages
//!
//! [`post_message`](WidgetTree::post_message) defers delivery to the next
//! [`flush_posted`](WidgetTree::flush_posted) call, the engine's stand-in
//! for an animation-frame tick. A flush processes exactly the messages
//! pending when it starts; messages posted during the flush wait for the
//! next one.

use std::any::Any;
use std::fmt::Write as _;

use slotmap::SlotMap;

use crate::error::{Result, WidgetError};
use crate::host::{HostTree, NullHost};
use crate::layout::Layout;
use crate::message::{ChildMessage, Message, ResizeMessage};
use crate::queue::MessageQueue;
use crate::title::Title;
use crate::widget::{Widget, WidgetId, WidgetState};

/// A slot that can be temporarily vacated while its content's hook is on
/// the stack.
enum HookSlot<T> {
    Ready(T),
    Borrowed,
}

/// Per-widget storage.
struct WidgetEntry {
    widget: HookSlot<Box<dyn Widget>>,
    layout: Option<HookSlot<Box<dyn Layout>>>,
    parent: Option<WidgetId>,
    state: WidgetState,
    title: Option<Title>,
    name: String,
}

impl WidgetEntry {
    fn new(widget: Box<dyn Widget>) -> Self {
        Self {
            widget: HookSlot::Ready(widget),
            layout: None,
            parent: None,
            state: WidgetState::default(),
            title: None,
            name: String::new(),
        }
    }
}

/// The tree of widgets and the engine that drives their lifecycle.
///
/// See the [module documentation](self) for the delivery model. Structural
/// operations validate their preconditions and either fully complete or
/// fail before mutating state; redundant operations (same parent, already
/// shown) are successful no-ops.
pub struct WidgetTree {
    widgets: SlotMap<WidgetId, WidgetEntry>,
    queue: MessageQueue,
    host: Box<dyn HostTree>,
    flushing: bool,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree {
    /// Create a tree with a [`NullHost`].
    pub fn new() -> Self {
        Self::with_host(Box::new(NullHost::new()))
    }

    /// Create a tree backed by the given host adapter.
    pub fn with_host(host: Box<dyn HostTree>) -> Self {
        Self {
            widgets: SlotMap::with_key(),
            queue: MessageQueue::new(),
            host,
            flushing: false,
        }
    }

    // =========================================================================
    // Registration & Queries
    // =========================================================================

    /// Register a widget and return its ID.
    pub fn register(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        let id = self.widgets.insert(WidgetEntry::new(widget));
        tracing::trace!(target: "trellis::tree", widget = ?id, "registered widget");
        id
    }

    /// Check whether an ID refers to a registered widget.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    /// The widget's parent, or `None` for roots and unknown IDs.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.widgets.get(id).and_then(|e| e.parent)
    }

    /// The widget's lifecycle flags, or `None` for unknown IDs.
    pub fn state(&self, id: WidgetId) -> Option<WidgetState> {
        self.widgets.get(id).map(|e| e.state)
    }

    /// Whether the widget's render node is part of the host's live tree.
    pub fn is_attached(&self, id: WidgetId) -> bool {
        self.widgets.get(id).is_some_and(|e| e.state.attached)
    }

    /// Whether the widget is explicitly hidden (its own flag, ignoring
    /// ancestors).
    pub fn is_hidden(&self, id: WidgetId) -> bool {
        self.widgets.get(id).is_some_and(|e| e.state.hidden)
    }

    /// Whether the widget has been disposed.
    pub fn is_disposed(&self, id: WidgetId) -> bool {
        self.widgets.get(id).is_some_and(|e| e.state.disposed)
    }

    /// Whether the widget is effectively visible.
    ///
    /// True iff the widget is not hidden and no ancestor up to its root
    /// is hidden. This is computed, never stored, so the invariant that a
    /// widget cannot be visible under a hidden ancestor holds by
    /// construction.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        let Some(entry) = self.widgets.get(id) else {
            return false;
        };
        if entry.state.hidden {
            return false;
        }
        self.ancestors_unhidden(id)
    }

    /// The widget's debug name.
    pub fn name(&self, id: WidgetId) -> &str {
        self.widgets.get(id).map_or("", |e| e.name.as_str())
    }

    /// Set the widget's debug name.
    pub fn set_name(&mut self, id: WidgetId, name: impl Into<String>) {
        if let Some(entry) = self.widgets.get_mut(id) {
            entry.name = name.into();
        }
    }

    /// The widget's title, created lazily on first access.
    ///
    /// Title setters take `&self`, so the shared reference returned here
    /// is enough to mutate and to connect to `changed`.
    pub fn title(&mut self, id: WidgetId) -> Option<&Title> {
        let entry = self.widgets.get_mut(id)?;
        Some(entry.title.get_or_insert_with(Title::new))
    }

    /// Downcast access to a registered widget.
    ///
    /// Returns `None` for unknown IDs, wrong types, and while the
    /// widget's own hook is on the stack.
    pub fn widget<W: Widget>(&self, id: WidgetId) -> Option<&W> {
        match &self.widgets.get(id)?.widget {
            HookSlot::Ready(w) => (w.as_ref() as &dyn Any).downcast_ref::<W>(),
            HookSlot::Borrowed => None,
        }
    }

    /// Mutable downcast access to a registered widget.
    pub fn widget_mut<W: Widget>(&mut self, id: WidgetId) -> Option<&mut W> {
        match &mut self.widgets.get_mut(id)?.widget {
            HookSlot::Ready(w) => (w.as_mut() as &mut dyn Any).downcast_mut::<W>(),
            HookSlot::Borrowed => None,
        }
    }

    /// The widget's installed layout, if any.
    ///
    /// Returns `None` while the layout is processing a message.
    pub fn layout_of(&self, id: WidgetId) -> Option<&dyn Layout> {
        match self.widgets.get(id)?.layout.as_ref()? {
            HookSlot::Ready(layout) => Some(layout.as_ref()),
            HookSlot::Borrowed => None,
        }
    }

    /// The host adapter.
    pub fn host(&self) -> &dyn HostTree {
        self.host.as_ref()
    }

    // =========================================================================
    // Message Delivery
    // =========================================================================

    /// Deliver a message synchronously, before returning.
    ///
    /// Messages to unknown or disposed targets are dropped.
    pub fn send_message(&mut self, target: WidgetId, msg: Message) {
        self.deliver(target, &msg);
    }

    /// Enqueue a message for delivery on the next flush.
    ///
    /// Compressible kinds replace a pending message of the same kind for
    /// the same target; see
    /// [`MessageKind::is_compressible`](crate::MessageKind::is_compressible).
    pub fn post_message(&mut self, target: WidgetId, msg: Message) {
        self.queue.post(target, msg);
    }

    /// Deliver everything pending, in post order. Returns the number of
    /// messages processed.
    ///
    /// One flush corresponds to one animation-frame tick: messages posted
    /// while the flush runs wait for the next call. Synchronous sends
    /// triggered by the delivery of a posted message run immediately,
    /// nested in-call, before the flush continues.
    #[tracing::instrument(skip(self), target = "trellis::tree", level = "trace")]
    pub fn flush_posted(&mut self) -> usize {
        if self.flushing {
            tracing::warn!(target: "trellis::tree", "ignoring re-entrant flush");
            return 0;
        }
        self.flushing = true;
        let batch = self.queue.drain_batch();
        let count = batch.len();
        for posted in batch {
            self.deliver(posted.target, &posted.message);
        }
        self.flushing = false;
        count
    }

    /// Drop every pending posted message for a target.
    pub fn clear_posted(&mut self, target: WidgetId) {
        self.queue.clear(target);
    }

    /// Number of pending posted messages.
    pub fn pending_posted(&self) -> usize {
        self.queue.pending_count()
    }

    /// Number of pending posted messages for a target.
    pub fn pending_posted_for(&self, target: WidgetId) -> usize {
        self.queue.pending_count_for(target)
    }

    // =========================================================================
    // Lifecycle Operations
    // =========================================================================

    /// Attach a root widget to the host tree.
    ///
    /// Inserts the render node into the host, then delivers
    /// `after-attach`, which marks the whole subtree attached via layout
    /// fan-out.
    pub fn attach(&mut self, id: WidgetId) -> Result<()> {
        let entry = self.widgets.get(id).ok_or(WidgetError::UnknownWidget(id))?;
        if entry.state.disposed {
            return Err(WidgetError::Disposed(id));
        }
        if entry.state.attached {
            return Err(WidgetError::AlreadyAttached(id));
        }
        if entry.parent.is_some() {
            return Err(WidgetError::NotRoot(id));
        }
        self.host.insert(id);
        self.send_message(id, Message::AfterAttach);
        Ok(())
    }

    /// Detach a root widget from the host tree.
    ///
    /// Delivers `before-detach` while the subtree is still attached, then
    /// removes the render node from the host.
    pub fn detach(&mut self, id: WidgetId) -> Result<()> {
        let entry = self.widgets.get(id).ok_or(WidgetError::UnknownWidget(id))?;
        if entry.state.disposed {
            return Err(WidgetError::Disposed(id));
        }
        if !entry.state.attached {
            return Err(WidgetError::NotAttached(id));
        }
        if entry.parent.is_some() {
            return Err(WidgetError::NotRoot(id));
        }
        self.send_message(id, Message::BeforeDetach);
        self.host.remove(id);
        Ok(())
    }

    /// Request that the widget become visible (sends `show-request`).
    ///
    /// The widget becomes visible only if every ancestor is visible;
    /// otherwise it stays hidden pending ancestor visibility.
    pub fn show(&mut self, id: WidgetId) {
        self.send_message(id, Message::ShowRequest);
    }

    /// Request that the widget become hidden (sends `hide-request`).
    pub fn hide(&mut self, id: WidgetId) {
        self.send_message(id, Message::HideRequest);
    }

    /// Ask the widget to close itself (sends `close-request`).
    pub fn close(&mut self, id: WidgetId) {
        self.send_message(id, Message::CloseRequest);
    }

    /// Request a refresh on the next flush (posts `update-request`,
    /// coalesced).
    pub fn update(&mut self, id: WidgetId) {
        self.post_message(id, Message::UpdateRequest);
    }

    /// Request a fit on the next flush (posts `fit-request`, coalesced).
    pub fn fit(&mut self, id: WidgetId) {
        self.post_message(id, Message::FitRequest);
    }

    /// Notify the widget of new geometry (sends `resize` synchronously).
    ///
    /// Resize is never deferred: propagation through the subtree completes
    /// before this returns, so the caller observes consistent geometry.
    pub fn resize(&mut self, id: WidgetId, width: i32, height: i32) {
        self.send_message(id, Message::Resize(ResizeMessage::new(width, height)));
    }

    // =========================================================================
    // Structural Operations
    // =========================================================================

    /// Set or clear the widget's parent.
    ///
    /// Setting the current parent again is a no-op. Moving a widget from
    /// one parent to another directly is forbidden: clear the parent
    /// first, then set the new one. Clearing goes through an internal
    /// removal path that sends `child-removed` to the old parent; setting
    /// sends `child-added` to the new parent, which records the child in
    /// its layout bookkeeping.
    pub fn set_parent(&mut self, child: WidgetId, parent: Option<WidgetId>) -> Result<()> {
        self.set_parent_at(child, parent, None)
    }

    /// Add a child at the end of a parent's layout collection.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        self.set_parent_at(child, Some(parent), None)
    }

    /// Add a child at a specific index of a parent's layout collection.
    pub fn insert_child(&mut self, parent: WidgetId, index: usize, child: WidgetId) -> Result<()> {
        self.set_parent_at(child, Some(parent), Some(index))
    }

    fn set_parent_at(
        &mut self,
        child: WidgetId,
        parent: Option<WidgetId>,
        index: Option<usize>,
    ) -> Result<()> {
        let entry = self
            .widgets
            .get(child)
            .ok_or(WidgetError::UnknownWidget(child))?;
        if entry.state.disposed {
            return Err(WidgetError::Disposed(child));
        }
        let current = entry.parent;
        if current == parent {
            return Ok(());
        }

        match parent {
            Some(p) => {
                let parent_entry = self.widgets.get(p).ok_or(WidgetError::UnknownWidget(p))?;
                if parent_entry.state.disposed {
                    return Err(WidgetError::Disposed(p));
                }
                if p == child || self.is_ancestor_of(child, p) {
                    return Err(WidgetError::CircularParentage(child));
                }
                if current.is_some() {
                    return Err(WidgetError::AlreadyParented(child));
                }
                self.widgets[child].parent = Some(p);
                let mut msg = ChildMessage::new(child);
                msg.current_index = index;
                self.send_message(p, Message::ChildAdded(msg));
            }
            None => {
                // current is Some here; None == None returned above.
                let old = current.expect("no-op case already handled");
                self.remove_from_parent(child, old);
            }
        }
        Ok(())
    }

    /// Internal removal path: unlink without re-entering the public
    /// setter's validation, then tell the old parent's layout.
    fn remove_from_parent(&mut self, child: WidgetId, old_parent: WidgetId) {
        let previous_index = self.layout_child_index(old_parent, child);
        self.widgets[child].parent = None;
        let mut msg = ChildMessage::new(child);
        msg.previous_index = previous_index;
        self.send_message(old_parent, Message::ChildRemoved(msg));
    }

    /// Install a layout on a widget.
    ///
    /// Fails if the widget is disposed, if the layout already belongs to
    /// a different widget, or if the widget already has a layout -
    /// installed layouts are never replaced. On success the layout's
    /// parent back-reference is set (once, forever) and the layout runs
    /// its synchronous initialize step, which adopts pre-added children
    /// and posts a fit request to the owner.
    pub fn set_layout(&mut self, id: WidgetId, mut layout: Box<dyn Layout>) -> Result<()> {
        let entry = self.widgets.get(id).ok_or(WidgetError::UnknownWidget(id))?;
        if entry.state.disposed {
            return Err(WidgetError::Disposed(id));
        }
        if let Some(owner) = layout.parent() {
            if owner != id {
                return Err(WidgetError::LayoutOwned(owner));
            }
        }
        if entry.layout.is_some() {
            return Err(WidgetError::LayoutAlreadyInstalled(id));
        }
        layout.set_parent(id)?;
        self.widgets[id].layout = Some(HookSlot::Ready(layout));
        tracing::trace!(target: "trellis::tree", widget = ?id, "installed layout");

        if let Some(mut installed) = self.take_layout(id) {
            installed.initialize(self, id);
            self.restore_layout(id, installed);
        }
        Ok(())
    }

    /// Dispose a widget. Idempotent and terminal.
    ///
    /// Clears the widget's pending posted messages, unlinks it from its
    /// parent (notifying the parent's layout via `child-removed`),
    /// removes it from the host if attached, and disposes its layout,
    /// which disposes the children the layout owns.
    #[tracing::instrument(skip(self), target = "trellis::tree", level = "trace")]
    pub fn dispose(&mut self, id: WidgetId) {
        let Some(entry) = self.widgets.get_mut(id) else {
            return;
        };
        if entry.state.disposed {
            return;
        }
        entry.state.disposed = true;
        self.queue.clear(id);

        if let Some(old_parent) = self.widgets[id].parent {
            self.remove_from_parent(id, old_parent);
        }

        // Plain host removal; the detach protocol does not run for a
        // widget that is already disposed.
        if self.widgets[id].state.attached {
            self.host.remove(id);
            self.widgets[id].state.attached = false;
        }

        if let Some(mut layout) = self.take_layout(id) {
            layout.dispose(self);
            if let Some(entry) = self.widgets.get_mut(id) {
                entry.layout = None;
            }
        }
    }

    // =========================================================================
    // Debug / Diagnostics
    // =========================================================================

    /// Render the subtree rooted at `id` as an indented debug listing.
    pub fn dump_tree(&self, id: WidgetId) -> String {
        let mut out = String::new();
        self.dump_tree_recursive(id, 0, &mut out);
        out
    }

    fn dump_tree_recursive(&self, id: WidgetId, depth: usize, out: &mut String) {
        let Some(entry) = self.widgets.get(id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        let name = if entry.name.is_empty() {
            "(unnamed)"
        } else {
            entry.name.as_str()
        };
        let _ = writeln!(
            out,
            "{indent}[{id:?}] {name} attached={} hidden={} disposed={}",
            entry.state.attached, entry.state.hidden, entry.state.disposed
        );
        if let Some(HookSlot::Ready(layout)) = &entry.layout {
            for index in 0..layout.child_count() {
                if let Some(child) = layout.child_at(index) {
                    self.dump_tree_recursive(child, depth + 1, out);
                }
            }
        }
    }

    // =========================================================================
    // Delivery Internals
    // =========================================================================

    fn deliver(&mut self, target: WidgetId, msg: &Message) {
        match self.widgets.get(target) {
            None => {
                tracing::trace!(
                    target: "trellis::tree",
                    widget = ?target,
                    kind = %msg.kind(),
                    "dropping message for unknown widget"
                );
                return;
            }
            Some(entry) if entry.state.disposed => {
                tracing::trace!(
                    target: "trellis::tree",
                    widget = ?target,
                    kind = %msg.kind(),
                    "dropping message for disposed widget"
                );
                return;
            }
            Some(_) => {}
        }
        tracing::trace!(
            target: "trellis::tree",
            widget = ?target,
            kind = %msg.kind(),
            "delivering message"
        );

        match msg {
            Message::ShowRequest => {
                if !self.widgets[target].state.hidden {
                    return;
                }
                if !self.ancestors_unhidden(target) {
                    // Remains hidden pending ancestor visibility.
                    return;
                }
                self.widgets[target].state.hidden = false;
                self.deliver(target, &Message::AfterShow);
            }
            Message::HideRequest => {
                if self.widgets[target].state.hidden {
                    return;
                }
                // Hooks observe the still-visible state.
                self.deliver(target, &Message::BeforeHide);
                self.widgets[target].state.hidden = true;
            }
            Message::AfterAttach => {
                self.widgets[target].state.attached = true;
                self.invoke_widget_hook(target, msg);
                self.forward_to_layout(target, msg);
            }
            Message::BeforeDetach => {
                self.invoke_widget_hook(target, msg);
                self.forward_to_layout(target, msg);
                if let Some(entry) = self.widgets.get_mut(target) {
                    entry.state.attached = false;
                }
            }
            Message::AfterShow => {
                self.invoke_widget_hook(target, msg);
                self.forward_to_layout(target, msg);
                self.post_visibility_to_parent(target, true);
            }
            Message::BeforeHide => {
                self.invoke_widget_hook(target, msg);
                self.forward_to_layout(target, msg);
                self.post_visibility_to_parent(target, false);
            }
            Message::CloseRequest => {
                self.invoke_widget_hook(target, msg);
            }
            Message::Resize(_)
            | Message::UpdateRequest
            | Message::FitRequest
            | Message::ChildAdded(_)
            | Message::ChildRemoved(_)
            | Message::ChildShown(_)
            | Message::ChildHidden(_) => {
                self.invoke_widget_hook(target, msg);
                self.forward_to_layout(target, msg);
            }
        }
    }

    /// Post `child-shown` / `child-hidden` to the parent, if the parent
    /// has a layout to bookkeep with.
    fn post_visibility_to_parent(&mut self, child: WidgetId, shown: bool) {
        let Some(parent) = self.widgets.get(child).and_then(|e| e.parent) else {
            return;
        };
        if self
            .widgets
            .get(parent)
            .is_none_or(|e| e.layout.is_none())
        {
            return;
        }
        let mut msg = ChildMessage::new(child);
        msg.current_index = self.layout_child_index(parent, child);
        let message = if shown {
            Message::ChildShown(msg)
        } else {
            Message::ChildHidden(msg)
        };
        self.post_message(parent, message);
    }

    fn invoke_widget_hook(&mut self, id: WidgetId, msg: &Message) {
        let Some(mut widget) = self.take_widget(id) else {
            tracing::trace!(
                target: "trellis::tree",
                widget = ?id,
                kind = %msg.kind(),
                "skipping nested hook for widget already mid-delivery"
            );
            return;
        };
        match msg {
            Message::Resize(m) => widget.on_resize(self, id, m),
            Message::UpdateRequest => widget.on_update_request(self, id),
            Message::FitRequest => widget.on_fit_request(self, id),
            Message::AfterAttach => widget.on_after_attach(self, id),
            Message::BeforeDetach => widget.on_before_detach(self, id),
            Message::AfterShow => widget.on_after_show(self, id),
            Message::BeforeHide => widget.on_before_hide(self, id),
            Message::CloseRequest => widget.on_close_request(self, id),
            Message::ChildAdded(m) => widget.on_child_added(self, id, m),
            Message::ChildRemoved(m) => widget.on_child_removed(self, id, m),
            Message::ChildShown(m) => widget.on_child_shown(self, id, m),
            Message::ChildHidden(m) => widget.on_child_hidden(self, id, m),
            // Requests resolve into the notifications above before any
            // hook runs.
            Message::ShowRequest | Message::HideRequest => {}
        }
        self.restore_widget(id, widget);
    }

    fn forward_to_layout(&mut self, id: WidgetId, msg: &Message) {
        let Some(mut layout) = self.take_layout(id) else {
            return;
        };
        layout.process_parent_message(self, id, msg);
        self.restore_layout(id, layout);
    }

    fn take_widget(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        let entry = self.widgets.get_mut(id)?;
        match std::mem::replace(&mut entry.widget, HookSlot::Borrowed) {
            HookSlot::Ready(widget) => Some(widget),
            HookSlot::Borrowed => None,
        }
    }

    fn restore_widget(&mut self, id: WidgetId, widget: Box<dyn Widget>) {
        if let Some(entry) = self.widgets.get_mut(id) {
            entry.widget = HookSlot::Ready(widget);
        }
    }

    fn take_layout(&mut self, id: WidgetId) -> Option<Box<dyn Layout>> {
        let entry = self.widgets.get_mut(id)?;
        let slot = entry.layout.as_mut()?;
        match std::mem::replace(slot, HookSlot::Borrowed) {
            HookSlot::Ready(layout) => Some(layout),
            HookSlot::Borrowed => None,
        }
    }

    fn restore_layout(&mut self, id: WidgetId, mut layout: Box<dyn Layout>) {
        let disposed = match self.widgets.get(id) {
            Some(entry) => entry.state.disposed,
            None => return,
        };
        if disposed {
            // The owner was disposed while its layout was on the stack;
            // finish the layout's teardown instead of reinstalling it.
            layout.dispose(self);
            if let Some(entry) = self.widgets.get_mut(id) {
                entry.layout = None;
            }
        } else if let Some(entry) = self.widgets.get_mut(id) {
            entry.layout = Some(HookSlot::Ready(layout));
        }
    }

    /// Index of `child` in `parent`'s layout collection, when the layout
    /// is present and not mid-delivery.
    fn layout_child_index(&self, parent: WidgetId, child: WidgetId) -> Option<usize> {
        match self.widgets.get(parent)?.layout.as_ref()? {
            HookSlot::Ready(layout) => layout.child_index(child),
            HookSlot::Borrowed => None,
        }
    }

    /// Check if `potential_ancestor` is an ancestor of `id`.
    fn is_ancestor_of(&self, potential_ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.widgets.get(current_id).and_then(|e| e.parent);
        }
        false
    }

    /// Check that no ancestor of `id` is hidden.
    fn ancestors_unhidden(&self, id: WidgetId) -> bool {
        let mut current = self.widgets.get(id).and_then(|e| e.parent);
        while let Some(ancestor) = current {
            match self.widgets.get(ancestor) {
                Some(entry) if entry.state.hidden => return false,
                Some(entry) => current = entry.parent,
                None => break,
            }
        }
        true
    }
}

static_assertions::assert_impl_all!(WidgetTree: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PanelLayout;
    use crate::widget::EmptyWidget;

    fn tree_with_widgets(count: usize) -> (WidgetTree, Vec<WidgetId>) {
        let mut tree = WidgetTree::new();
        let ids = (0..count)
            .map(|_| tree.register(Box::new(EmptyWidget)))
            .collect();
        (tree, ids)
    }

    /// Parent `child` under `parent`, installing a panel layout on the
    /// parent if it has none yet.
    fn adopt(tree: &mut WidgetTree, parent: WidgetId, child: WidgetId) {
        if tree.layout_of(parent).is_none() {
            tree.set_layout(parent, Box::new(PanelLayout::new())).unwrap();
        }
        tree.add_child(parent, child).unwrap();
    }

    #[test]
    fn test_register_and_query() {
        let (tree, ids) = tree_with_widgets(1);
        assert!(tree.contains(ids[0]));
        assert_eq!(tree.parent(ids[0]), None);
        assert!(!tree.is_attached(ids[0]));
        assert!(!tree.is_hidden(ids[0]));
        assert!(!tree.is_disposed(ids[0]));
        assert!(tree.is_visible(ids[0]));
    }

    #[test]
    fn test_set_parent_self_rejected() {
        let (mut tree, ids) = tree_with_widgets(1);
        let result = tree.set_parent(ids[0], Some(ids[0]));
        assert_eq!(result, Err(WidgetError::CircularParentage(ids[0])));
    }

    #[test]
    fn test_set_parent_cycle_rejected() {
        let (mut tree, ids) = tree_with_widgets(2);
        adopt(&mut tree, ids[0], ids[1]);

        // Parenting the ancestor under its own descendant must fail.
        let result = tree.set_parent(ids[0], Some(ids[1]));
        assert_eq!(result, Err(WidgetError::CircularParentage(ids[0])));
    }

    #[test]
    fn test_reparent_without_clearing_rejected() {
        let (mut tree, ids) = tree_with_widgets(3);
        adopt(&mut tree, ids[0], ids[2]);
        tree.set_layout(ids[1], Box::new(PanelLayout::new())).unwrap();

        let result = tree.set_parent(ids[2], Some(ids[1]));
        assert_eq!(result, Err(WidgetError::AlreadyParented(ids[2])));

        // Clearing first, then setting, succeeds.
        tree.set_parent(ids[2], None).unwrap();
        tree.set_parent(ids[2], Some(ids[1])).unwrap();
        assert_eq!(tree.parent(ids[2]), Some(ids[1]));
    }

    #[test]
    fn test_set_parent_same_is_noop() {
        let (mut tree, ids) = tree_with_widgets(2);
        adopt(&mut tree, ids[0], ids[1]);

        tree.set_parent(ids[1], Some(ids[0])).unwrap();
        assert_eq!(tree.parent(ids[1]), Some(ids[0]));
        assert_eq!(tree.layout_of(ids[0]).unwrap().child_count(), 1);

        // Clearing when already parentless is also a no-op.
        tree.set_parent(ids[0], None).unwrap();
    }

    #[test]
    fn test_child_bookkeeping_via_messages() {
        let (mut tree, ids) = tree_with_widgets(3);
        adopt(&mut tree, ids[0], ids[1]);
        adopt(&mut tree, ids[0], ids[2]);

        let layout = tree.layout_of(ids[0]).unwrap();
        assert_eq!(layout.child_at(0), Some(ids[1]));
        assert_eq!(layout.child_at(1), Some(ids[2]));
        assert_eq!(layout.child_at(2), None);

        tree.set_parent(ids[1], None).unwrap();
        let layout = tree.layout_of(ids[0]).unwrap();
        assert_eq!(layout.child_count(), 1);
        assert_eq!(layout.child_index(ids[1]), None);
    }

    #[test]
    fn test_insert_child_at_index() {
        let (mut tree, ids) = tree_with_widgets(3);
        adopt(&mut tree, ids[0], ids[1]);
        tree.insert_child(ids[0], 0, ids[2]).unwrap();

        let layout = tree.layout_of(ids[0]).unwrap();
        assert_eq!(layout.child_at(0), Some(ids[2]));
        assert_eq!(layout.child_at(1), Some(ids[1]));
    }

    #[test]
    fn test_attach_detach_validation() {
        let (mut tree, ids) = tree_with_widgets(2);
        adopt(&mut tree, ids[0], ids[1]);

        assert_eq!(tree.detach(ids[0]), Err(WidgetError::NotAttached(ids[0])));
        assert_eq!(tree.attach(ids[1]), Err(WidgetError::NotRoot(ids[1])));

        tree.attach(ids[0]).unwrap();
        assert!(tree.is_attached(ids[0]));
        // Fan-out marked the child attached too.
        assert!(tree.is_attached(ids[1]));
        assert!(tree.host().contains(ids[0]));
        assert_eq!(tree.attach(ids[0]), Err(WidgetError::AlreadyAttached(ids[0])));

        tree.detach(ids[0]).unwrap();
        assert!(!tree.is_attached(ids[0]));
        assert!(!tree.is_attached(ids[1]));
        assert!(!tree.host().contains(ids[0]));
    }

    #[test]
    fn test_visibility_computed_from_ancestors() {
        let (mut tree, ids) = tree_with_widgets(3);
        adopt(&mut tree, ids[0], ids[1]);
        adopt(&mut tree, ids[1], ids[2]);

        assert!(tree.is_visible(ids[2]));

        tree.hide(ids[0]);
        // The grandchild's own flag is untouched, but no chain through a
        // hidden ancestor is visible.
        assert!(!tree.is_hidden(ids[2]));
        assert!(!tree.is_visible(ids[2]));
        assert!(!tree.is_visible(ids[1]));

        tree.show(ids[0]);
        assert!(tree.is_visible(ids[2]));
    }

    #[test]
    fn test_show_pending_ancestor_visibility() {
        let (mut tree, ids) = tree_with_widgets(2);
        adopt(&mut tree, ids[0], ids[1]);

        tree.hide(ids[0]);
        tree.hide(ids[1]);

        // Showing under a hidden parent leaves the widget hidden.
        tree.show(ids[1]);
        assert!(tree.is_hidden(ids[1]));

        tree.show(ids[0]);
        tree.show(ids[1]);
        assert!(tree.is_visible(ids[1]));
    }

    #[test]
    fn test_set_layout_validation() {
        let (mut tree, ids) = tree_with_widgets(2);

        tree.set_layout(ids[0], Box::new(PanelLayout::new())).unwrap();
        let result = tree.set_layout(ids[0], Box::new(PanelLayout::new()));
        assert_eq!(result, Err(WidgetError::LayoutAlreadyInstalled(ids[0])));

        // A layout whose parent was already claimed cannot be installed
        // elsewhere.
        let mut owned = PanelLayout::new();
        Layout::set_parent(&mut owned, ids[0]).unwrap();
        let result = tree.set_layout(ids[1], Box::new(owned));
        assert_eq!(result, Err(WidgetError::LayoutOwned(ids[0])));
    }

    #[test]
    fn test_set_layout_posts_fit() {
        let (mut tree, ids) = tree_with_widgets(1);
        tree.set_layout(ids[0], Box::new(PanelLayout::new())).unwrap();
        assert_eq!(tree.pending_posted_for(ids[0]), 1);
    }

    #[test]
    fn test_dispose_idempotent_and_terminal() {
        let (mut tree, ids) = tree_with_widgets(2);
        adopt(&mut tree, ids[0], ids[1]);
        tree.attach(ids[0]).unwrap();
        tree.update(ids[0]);

        tree.dispose(ids[0]);
        tree.dispose(ids[0]); // second call is a no-op

        assert!(tree.is_disposed(ids[0]));
        assert!(tree.is_disposed(ids[1])); // layout cascade
        assert_eq!(tree.parent(ids[1]), None);
        assert!(!tree.is_attached(ids[0]));
        assert!(!tree.host().contains(ids[0]));
        assert!(tree.layout_of(ids[0]).is_none());
        assert_eq!(tree.pending_posted_for(ids[0]), 0);

        // A disposed widget accepts no further structural mutation.
        assert_eq!(tree.attach(ids[0]), Err(WidgetError::Disposed(ids[0])));
        assert_eq!(
            tree.set_parent(ids[1], None),
            Err(WidgetError::Disposed(ids[1]))
        );
    }

    #[test]
    fn test_dispose_notifies_parent_layout() {
        let (mut tree, ids) = tree_with_widgets(2);
        adopt(&mut tree, ids[0], ids[1]);

        tree.dispose(ids[1]);

        assert_eq!(tree.parent(ids[1]), None);
        let layout = tree.layout_of(ids[0]).unwrap();
        assert_eq!(layout.child_index(ids[1]), None);
        assert!(!tree.is_disposed(ids[0]));
    }

    #[test]
    fn test_dump_tree() {
        let (mut tree, ids) = tree_with_widgets(2);
        adopt(&mut tree, ids[0], ids[1]);
        tree.set_name(ids[0], "root");
        tree.set_name(ids[1], "leaf");

        let dump = tree.dump_tree(ids[0]);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("root"));
        assert!(lines[1].starts_with("  "));
        assert!(lines[1].contains("leaf"));
    }

    #[test]
    fn test_title_lazily_created() {
        let (mut tree, ids) = tree_with_widgets(1);
        let title = tree.title(ids[0]).unwrap();
        assert_eq!(title.text(), "");
        title.set_text("hello");
        assert_eq!(tree.title(ids[0]).unwrap().text(), "hello");
    }
}
