//! The lifecycle message vocabulary.
//!
//! Widget state transitions never happen through direct mutation; they are
//! driven by messages delivered through the [`WidgetTree`]. This module
//! defines the closed set of message variants, their payload types, and
//! the per-variant delivery policy (which kinds coalesce when posted).
//!
//! # Key Types
//!
//! - [`Message`] - The closed union of lifecycle messages
//! - [`MessageKind`] - Fieldless discriminant, the stable type-tag
//!   vocabulary subclass hooks and tests switch on
//! - [`ResizeMessage`] - Geometry payload with the shared
//!   [`ResizeMessage::UNKNOWN`] "unknown size" value
//! - [`ChildMessage`] - Structural payload naming a child and its indexes
//!
//! [`WidgetTree`]: crate::WidgetTree

use std::fmt;

use crate::widget::WidgetId;

/// A geometry payload carried by resize messages.
///
/// The width and height are host pixels. A negative dimension means the
/// size is not known to the sender; the shared [`Self::UNKNOWN`] value is
/// used whenever a resize must be propagated without concrete geometry,
/// which tells the receiver to measure for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeMessage {
    width: i32,
    height: i32,
}

impl ResizeMessage {
    /// The shared "unknown size" value: both dimensions are -1.
    pub const UNKNOWN: ResizeMessage = ResizeMessage {
        width: -1,
        height: -1,
    };

    /// Create a resize message with explicit dimensions.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// The width carried by this message, or -1 if unknown.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// The height carried by this message, or -1 if unknown.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Whether this message carries no concrete geometry.
    #[inline]
    pub const fn is_unknown(&self) -> bool {
        self.width < 0 || self.height < 0
    }
}

/// A structural payload naming a child widget.
///
/// Carried by the `child-added`, `child-removed`, `child-shown` and
/// `child-hidden` messages. The indexes refer to positions in the
/// receiving layout's child collection; `None` means the position is not
/// known to (or not chosen by) the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildMessage {
    /// The child widget this message is about. A reference into the tree,
    /// not ownership.
    pub child: WidgetId,
    /// The child's index before the operation, if known.
    pub previous_index: Option<usize>,
    /// The child's index after the operation, or the requested insertion
    /// index, if known.
    pub current_index: Option<usize>,
}

impl ChildMessage {
    /// Create a child message with no index information.
    pub fn new(child: WidgetId) -> Self {
        Self {
            child,
            previous_index: None,
            current_index: None,
        }
    }

    /// Set the previous index (builder pattern).
    pub fn with_previous_index(mut self, index: usize) -> Self {
        self.previous_index = Some(index);
        self
    }

    /// Set the current index (builder pattern).
    pub fn with_current_index(mut self, index: usize) -> Self {
        self.current_index = Some(index);
        self
    }
}

/// A lifecycle message.
///
/// The set is closed: every message the engine delivers is one of these
/// variants, and each variant carries only its own payload. Delivery
/// policy lives on [`MessageKind`] so it is a property of the variant,
/// not of individual instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Request that a hidden widget become visible.
    ShowRequest,
    /// Request that a visible widget become hidden.
    HideRequest,
    /// Request that the widget close itself; the default reaction is up
    /// to the widget.
    CloseRequest,
    /// Delivered after the widget's render node entered the host tree.
    AfterAttach,
    /// Delivered before the widget's render node leaves the host tree.
    BeforeDetach,
    /// Delivered after the widget became visible.
    AfterShow,
    /// Delivered before the widget becomes hidden.
    BeforeHide,
    /// The widget's geometry changed, or a descendant must re-measure.
    Resize(ResizeMessage),
    /// Request that the widget refresh itself; coalesced when posted.
    UpdateRequest,
    /// Request that the widget fit itself to its content; coalesced when
    /// posted.
    FitRequest,
    /// A child was added to the widget's layout bookkeeping.
    ChildAdded(ChildMessage),
    /// A child was removed from the widget; the layout drops it from its
    /// bookkeeping.
    ChildRemoved(ChildMessage),
    /// A child of the widget became visible.
    ChildShown(ChildMessage),
    /// A child of the widget became hidden.
    ChildHidden(ChildMessage),
}

impl Message {
    /// Get this message's kind tag.
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::ShowRequest => MessageKind::ShowRequest,
            Self::HideRequest => MessageKind::HideRequest,
            Self::CloseRequest => MessageKind::CloseRequest,
            Self::AfterAttach => MessageKind::AfterAttach,
            Self::BeforeDetach => MessageKind::BeforeDetach,
            Self::AfterShow => MessageKind::AfterShow,
            Self::BeforeHide => MessageKind::BeforeHide,
            Self::Resize(_) => MessageKind::Resize,
            Self::UpdateRequest => MessageKind::UpdateRequest,
            Self::FitRequest => MessageKind::FitRequest,
            Self::ChildAdded(_) => MessageKind::ChildAdded,
            Self::ChildRemoved(_) => MessageKind::ChildRemoved,
            Self::ChildShown(_) => MessageKind::ChildShown,
            Self::ChildHidden(_) => MessageKind::ChildHidden,
        }
    }
}

/// The fieldless discriminant of a [`Message`].
///
/// Kinds are the stable vocabulary of the protocol: the string form
/// returned by [`as_str`](Self::as_str) never changes, and the coalescing
/// policy is defined per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// `show-request`
    ShowRequest,
    /// `hide-request`
    HideRequest,
    /// `close-request`
    CloseRequest,
    /// `after-attach`
    AfterAttach,
    /// `before-detach`
    BeforeDetach,
    /// `after-show`
    AfterShow,
    /// `before-hide`
    BeforeHide,
    /// `resize`
    Resize,
    /// `update-request`
    UpdateRequest,
    /// `fit-request`
    FitRequest,
    /// `child-added`
    ChildAdded,
    /// `child-removed`
    ChildRemoved,
    /// `child-shown`
    ChildShown,
    /// `child-hidden`
    ChildHidden,
}

impl MessageKind {
    /// The stable string tag for this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShowRequest => "show-request",
            Self::HideRequest => "hide-request",
            Self::CloseRequest => "close-request",
            Self::AfterAttach => "after-attach",
            Self::BeforeDetach => "before-detach",
            Self::AfterShow => "after-show",
            Self::BeforeHide => "before-hide",
            Self::Resize => "resize",
            Self::UpdateRequest => "update-request",
            Self::FitRequest => "fit-request",
            Self::ChildAdded => "child-added",
            Self::ChildRemoved => "child-removed",
            Self::ChildShown => "child-shown",
            Self::ChildHidden => "child-hidden",
        }
    }

    /// Whether at most one message of this kind may be pending per target.
    ///
    /// When a compressible message is posted for a target that already has
    /// one of the same kind pending, the new message replaces the old one
    /// at the position of the latest post. The replacement guarantees the
    /// delivered payload reflects the most recent request.
    pub const fn is_compressible(&self) -> bool {
        matches!(self, Self::Resize | Self::UpdateRequest | Self::FitRequest)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn test_id() -> WidgetId {
        let mut map: SlotMap<WidgetId, ()> = SlotMap::with_key();
        map.insert(())
    }

    #[test]
    fn test_resize_message_fields() {
        let msg = ResizeMessage::new(100, 200);
        assert_eq!(msg.width(), 100);
        assert_eq!(msg.height(), 200);
        assert!(!msg.is_unknown());
    }

    #[test]
    fn test_unknown_size_singleton() {
        assert_eq!(ResizeMessage::UNKNOWN.width(), -1);
        assert_eq!(ResizeMessage::UNKNOWN.height(), -1);
        assert!(ResizeMessage::UNKNOWN.is_unknown());
    }

    #[test]
    fn test_child_message_defaults() {
        let id = test_id();
        let msg = ChildMessage::new(id);
        assert_eq!(msg.child, id);
        assert_eq!(msg.previous_index, None);
        assert_eq!(msg.current_index, None);

        let msg = ChildMessage::new(id).with_previous_index(2).with_current_index(0);
        assert_eq!(msg.previous_index, Some(2));
        assert_eq!(msg.current_index, Some(0));
    }

    #[test]
    fn test_kind_tags_stable() {
        assert_eq!(MessageKind::Resize.as_str(), "resize");
        assert_eq!(MessageKind::UpdateRequest.as_str(), "update-request");
        assert_eq!(MessageKind::FitRequest.as_str(), "fit-request");
        assert_eq!(MessageKind::AfterAttach.as_str(), "after-attach");
        assert_eq!(MessageKind::BeforeDetach.as_str(), "before-detach");
        assert_eq!(MessageKind::ChildRemoved.as_str(), "child-removed");
        assert_eq!(MessageKind::ShowRequest.to_string(), "show-request");
    }

    #[test]
    fn test_compressible_kinds() {
        assert!(MessageKind::Resize.is_compressible());
        assert!(MessageKind::UpdateRequest.is_compressible());
        assert!(MessageKind::FitRequest.is_compressible());

        assert!(!MessageKind::ShowRequest.is_compressible());
        assert!(!MessageKind::AfterAttach.is_compressible());
        assert!(!MessageKind::ChildShown.is_compressible());
        assert!(!MessageKind::CloseRequest.is_compressible());
    }

    #[test]
    fn test_message_kind_matches_variant() {
        let id = test_id();
        assert_eq!(Message::Resize(ResizeMessage::UNKNOWN).kind(), MessageKind::Resize);
        assert_eq!(Message::ChildAdded(ChildMessage::new(id)).kind(), MessageKind::ChildAdded);
        assert_eq!(Message::UpdateRequest.kind(), MessageKind::UpdateRequest);
    }
}
