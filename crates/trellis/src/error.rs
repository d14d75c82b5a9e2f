//! Error types for the widget engine.
//!
//! Every error here is an invariant violation in the sense of the
//! structural rules: an illegal mutation that fails synchronously before
//! any state changes. Redundant mutations (same parent, same value) are
//! successful no-ops rather than errors, and collection lookups report
//! absence with `Option`, never through this type.

use crate::widget::WidgetId;

/// Result type alias for widget-tree operations.
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Errors raised by structural operations on the widget tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    /// The widget ID does not refer to a registered widget.
    #[error("unknown widget {0:?}")]
    UnknownWidget(WidgetId),

    /// The widget has been disposed and accepts no further structural
    /// mutation.
    #[error("widget {0:?} is disposed")]
    Disposed(WidgetId),

    /// Attempted to parent a widget to itself or to one of its own
    /// descendants.
    #[error("cannot parent widget {0:?} to itself or one of its descendants")]
    CircularParentage(WidgetId),

    /// Attempted to reparent a widget that already has a different
    /// parent. The parent must be cleared first.
    #[error("widget {0:?} already has a parent; clear it before reparenting")]
    AlreadyParented(WidgetId),

    /// The widget already has a layout installed; layouts cannot be
    /// replaced.
    #[error("widget {0:?} already has a layout installed")]
    LayoutAlreadyInstalled(WidgetId),

    /// The layout already belongs to a different widget.
    #[error("layout already belongs to widget {0:?}")]
    LayoutOwned(WidgetId),

    /// A layout's parent is set exactly once and can never change.
    #[error("layout parent is set once and cannot change")]
    LayoutParentChange,

    /// The widget is already attached to the host tree.
    #[error("widget {0:?} is already attached to the host")]
    AlreadyAttached(WidgetId),

    /// The widget is not attached to the host tree.
    #[error("widget {0:?} is not attached to the host")]
    NotAttached(WidgetId),

    /// Only root widgets (widgets without a parent) can be attached to or
    /// detached from the host tree.
    #[error("widget {0:?} has a parent and cannot be attached or detached directly")]
    NotRoot(WidgetId),
}
