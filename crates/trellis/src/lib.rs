//! A message-driven widget tree.
//!
//! Trellis is the lifecycle core of a hierarchical widget framework:
//!
//! - **Widget tree**: Arena-owned widgets with parent links, lifecycle
//!   flags, and per-widget [`Title`] metadata
//! - **Message engine**: Every state transition happens through message
//!   delivery - synchronous sends and deferred, coalesced posts
//! - **Layout protocol**: A widget's layout owns its ordered children and
//!   fans lifecycle messages out to them
//! - **Host adapter**: Attach/detach go through an opaque [`HostTree`]
//!   trait, so the engine is independent of any rendering environment
//!
//! What this crate deliberately does *not* contain: arrangement
//! algorithms (how children get geometry is a concrete layout's or the
//! host's business), styling, and input handling.
//!
//! # The message model
//!
//! State flags (`attached`, `hidden`, `disposed`) belong to the
//! [`WidgetTree`] and change only when the corresponding message is
//! delivered, so a subclass observes every transition by overriding the
//! matching [`Widget`] hook. Two delivery modes exist:
//!
//! - [`WidgetTree::send_message`] delivers synchronously, in-call.
//!   Resizes and the attach/detach/show/hide protocols use this mode so
//!   an entire subtree settles before the caller continues.
//! - [`WidgetTree::post_message`] defers to the next
//!   [`WidgetTree::flush_posted`] call and coalesces compressible kinds:
//!   at most one `update-request`, `fit-request` or `resize` is pending
//!   per widget, and the latest payload wins.
//!
//! # Example
//!
//! ```
//! use trellis::{EmptyWidget, PanelLayout, Message, ResizeMessage, WidgetTree};
//!
//! let mut tree = WidgetTree::new();
//!
//! // Build a parent with two children under a layout.
//! let parent = tree.register(Box::new(EmptyWidget));
//! let a = tree.register(Box::new(EmptyWidget));
//! let b = tree.register(Box::new(EmptyWidget));
//! tree.set_layout(parent, Box::new(PanelLayout::new())).unwrap();
//! tree.add_child(parent, a).unwrap();
//! tree.add_child(parent, b).unwrap();
//!
//! // Attaching the root attaches the whole subtree.
//! tree.attach(parent).unwrap();
//! assert!(tree.is_attached(a) && tree.is_attached(b));
//!
//! // A resize reaches both children synchronously, in index order.
//! tree.send_message(parent, Message::Resize(ResizeMessage::new(800, 600)));
//!
//! // Posted updates coalesce until the next flush.
//! tree.flush_posted(); // settle the fit request posted at layout install
//! tree.update(parent);
//! tree.update(parent);
//! assert_eq!(tree.pending_posted_for(parent), 1);
//! tree.flush_posted();
//! ```

mod error;
mod host;
pub mod layout;
mod message;
mod queue;
mod title;
mod tree;
mod widget;

pub use error::{Result, WidgetError};
pub use host::{HostTree, NullHost};
pub use layout::{Layout, LayoutBase, PanelLayout};
pub use message::{ChildMessage, Message, MessageKind, ResizeMessage};
pub use title::{Title, TitleChange, TitleEditHandler};
pub use tree::WidgetTree;
pub use widget::{EmptyWidget, Widget, WidgetId, WidgetState};

// Re-export the foundation primitives so downstream crates can work with
// titles and signals without naming trellis-core directly.
pub use trellis_core::{ConnectionGuard, ConnectionId, Property, ReadOnlyProperty, Signal};
