//! The widget title value store.
//!
//! A [`Title`] is the display metadata a widget exposes to chrome such as
//! tab bars and side panels: text, icon, CSS-ish class name, and the
//! closable/editable affordances. Every field is independently change
//! tracked, and each mutation that actually changes a stored value raises
//! exactly one synchronous [`TitleChange`] notification on the
//! [`changed`](Title::changed) signal.
//!
//! Notifications here are deliberately *uncoalesced*: N changes raise N
//! notifications within one call stack. This is the opposite contract
//! from the posted message queue, and the two must not be mixed up - a
//! title listener sees every intermediate value.
//!
//! # Example
//!
//! ```
//! use trellis::{Title, TitleChange};
//! use std::sync::{Arc, Mutex};
//!
//! let title = Title::new().with_text("foo");
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let seen_clone = seen.clone();
//! title.changed.connect(move |change| {
//!     seen_clone.lock().unwrap().push(change.clone());
//! });
//!
//! title.set_text("baz");
//! title.set_text("baz"); // no-op, no notification
//!
//! let seen = seen.lock().unwrap();
//! assert_eq!(seen.len(), 1);
//! assert_eq!(
//!     seen[0],
//!     TitleChange::Text { old: "foo".into(), new: "baz".into() }
//! );
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use trellis_core::{Property, Signal};

/// Callback invoked when a title's text is edited interactively.
pub type TitleEditHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// A single field change, carrying the field tag and the old and new
/// values.
///
/// The edit handler variant carries no values: closures have no useful
/// value representation, so handler changes are detected by `Arc`
/// identity and reported without payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleChange {
    /// The `text` field changed.
    Text {
        /// Value before the change.
        old: String,
        /// Value after the change.
        new: String,
    },
    /// The `icon` field changed.
    Icon {
        /// Value before the change.
        old: String,
        /// Value after the change.
        new: String,
    },
    /// The `class-name` field changed.
    ClassName {
        /// Value before the change.
        old: String,
        /// Value after the change.
        new: String,
    },
    /// The `closable` field changed.
    Closable {
        /// Value before the change.
        old: bool,
        /// Value after the change.
        new: bool,
    },
    /// The `editable` field changed.
    Editable {
        /// Value before the change.
        old: bool,
        /// Value after the change.
        new: bool,
    },
    /// The `edit-handler` field changed.
    EditHandler,
}

impl TitleChange {
    /// The stable string tag of the changed field.
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Icon { .. } => "icon",
            Self::ClassName { .. } => "class-name",
            Self::Closable { .. } => "closable",
            Self::Editable { .. } => "editable",
            Self::EditHandler => "edit-handler",
        }
    }
}

/// Display metadata attached to a widget.
///
/// All setters take `&self`; the fields use interior mutability so a
/// title can be mutated through the shared reference handed out by the
/// tree. Builder-style `with_*` constructors set initial values silently
/// - construction is not mutation and raises nothing.
pub struct Title {
    text: Property<String>,
    icon: Property<String>,
    class_name: Property<String>,
    closable: Property<bool>,
    editable: Property<bool>,
    edit_handler: RwLock<Option<TitleEditHandler>>,
    /// Raised synchronously, once per actual value change.
    pub changed: Signal<TitleChange>,
}

impl Title {
    /// Create a title with every field at its empty/false default.
    pub fn new() -> Self {
        Self {
            text: Property::default(),
            icon: Property::default(),
            class_name: Property::default(),
            closable: Property::default(),
            editable: Property::default(),
            edit_handler: RwLock::new(None),
            changed: Signal::new(),
        }
    }

    // =========================================================================
    // Builder-style construction
    // =========================================================================

    /// Set the initial text (builder pattern, no notification).
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.text.set_silent(text.into());
        self
    }

    /// Set the initial icon (builder pattern, no notification).
    pub fn with_icon(self, icon: impl Into<String>) -> Self {
        self.icon.set_silent(icon.into());
        self
    }

    /// Set the initial class name (builder pattern, no notification).
    pub fn with_class_name(self, class_name: impl Into<String>) -> Self {
        self.class_name.set_silent(class_name.into());
        self
    }

    /// Set the initial closable flag (builder pattern, no notification).
    pub fn with_closable(self, closable: bool) -> Self {
        self.closable.set_silent(closable);
        self
    }

    /// Set the initial editable flag (builder pattern, no notification).
    pub fn with_editable(self, editable: bool) -> Self {
        self.editable.set_silent(editable);
        self
    }

    // =========================================================================
    // Field Accessors
    // =========================================================================

    /// The display text.
    pub fn text(&self) -> String {
        self.text.get()
    }

    /// Set the display text, notifying on actual change.
    pub fn set_text(&self, text: impl Into<String>) {
        let new = text.into();
        if let Some(old) = self.text.replace(new.clone()) {
            self.changed.emit(TitleChange::Text { old, new });
        }
    }

    /// The icon identifier.
    pub fn icon(&self) -> String {
        self.icon.get()
    }

    /// Set the icon identifier, notifying on actual change.
    pub fn set_icon(&self, icon: impl Into<String>) {
        let new = icon.into();
        if let Some(old) = self.icon.replace(new.clone()) {
            self.changed.emit(TitleChange::Icon { old, new });
        }
    }

    /// The extra class name applied to title nodes.
    pub fn class_name(&self) -> String {
        self.class_name.get()
    }

    /// Set the class name, notifying on actual change.
    pub fn set_class_name(&self, class_name: impl Into<String>) {
        let new = class_name.into();
        if let Some(old) = self.class_name.replace(new.clone()) {
            self.changed.emit(TitleChange::ClassName { old, new });
        }
    }

    /// Whether the title shows a close affordance.
    pub fn closable(&self) -> bool {
        self.closable.get()
    }

    /// Set the closable flag, notifying on actual change.
    pub fn set_closable(&self, closable: bool) {
        if self.closable.set(closable) {
            self.changed.emit(TitleChange::Closable {
                old: !closable,
                new: closable,
            });
        }
    }

    /// Whether the title text is user editable.
    pub fn editable(&self) -> bool {
        self.editable.get()
    }

    /// Set the editable flag, notifying on actual change.
    pub fn set_editable(&self, editable: bool) {
        if self.editable.set(editable) {
            self.changed.emit(TitleChange::Editable {
                old: !editable,
                new: editable,
            });
        }
    }

    /// The handler invoked when the text is edited, if any.
    pub fn edit_handler(&self) -> Option<TitleEditHandler> {
        self.edit_handler.read().clone()
    }

    /// Set the edit handler, notifying on actual change.
    ///
    /// Handlers are compared by `Arc` identity: installing the same
    /// handler instance again is a no-op.
    pub fn set_edit_handler(&self, handler: Option<TitleEditHandler>) {
        let mut current = self.edit_handler.write();
        let unchanged = match (&*current, &handler) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        if unchanged {
            return;
        }
        *current = handler;
        drop(current);
        self.changed.emit(TitleChange::EditHandler);
    }
}

impl Default for Title {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Title")
            .field("text", &self.text())
            .field("icon", &self.icon())
            .field("class_name", &self.class_name())
            .field("closable", &self.closable())
            .field("editable", &self.editable())
            .finish()
    }
}

static_assertions::assert_impl_all!(Title: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder(title: &Title) -> Arc<Mutex<Vec<TitleChange>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        title.changed.connect(move |change: &TitleChange| {
            seen_clone.lock().push(change.clone());
        });
        seen
    }

    #[test]
    fn test_defaults() {
        let title = Title::new();
        assert_eq!(title.text(), "");
        assert_eq!(title.icon(), "");
        assert_eq!(title.class_name(), "");
        assert!(!title.closable());
        assert!(!title.editable());
        assert!(title.edit_handler().is_none());
    }

    #[test]
    fn test_builder_does_not_notify() {
        let title = Title::new();
        let seen = recorder(&title);

        // Builders run before listeners exist in practice, but even with
        // a listener attached they must stay silent.
        let title = title.with_text("foo").with_closable(true);
        assert_eq!(title.text(), "foo");
        assert!(title.closable());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_text_change_notifies_once() {
        let title = Title::new()
            .with_text("foo")
            .with_icon("bar")
            .with_closable(true)
            .with_class_name("baz");
        let seen = recorder(&title);

        title.set_text("baz");

        {
            let seen = seen.lock();
            assert_eq!(seen.len(), 1);
            assert_eq!(
                seen[0],
                TitleChange::Text {
                    old: "foo".into(),
                    new: "baz".into()
                }
            );
            assert_eq!(seen[0].field_name(), "text");
        }

        // Same value again raises nothing.
        title.set_text("baz");
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_each_field_notifies_independently() {
        let title = Title::new();
        let seen = recorder(&title);

        title.set_icon("icon-a");
        title.set_class_name("class-a");
        title.set_closable(true);
        title.set_editable(true);

        let seen = seen.lock();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0].field_name(), "icon");
        assert_eq!(seen[1].field_name(), "class-name");
        assert_eq!(seen[2].field_name(), "closable");
        assert_eq!(
            seen[3],
            TitleChange::Editable {
                old: false,
                new: true
            }
        );
    }

    #[test]
    fn test_no_coalescing() {
        let title = Title::new();
        let seen = recorder(&title);

        // Three changes in one synchronous stack raise three
        // notifications carrying every intermediate value.
        title.set_text("a");
        title.set_text("b");
        title.set_text("c");

        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert_eq!(
            seen[1],
            TitleChange::Text {
                old: "a".into(),
                new: "b".into()
            }
        );
    }

    #[test]
    fn test_edit_handler_identity() {
        let title = Title::new();
        let seen = recorder(&title);

        let handler: TitleEditHandler = Arc::new(|_text| {});
        title.set_edit_handler(Some(handler.clone()));
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(seen.lock()[0], TitleChange::EditHandler);

        // Same Arc again is a no-op.
        title.set_edit_handler(Some(handler.clone()));
        assert_eq!(seen.lock().len(), 1);

        // Clearing notifies.
        title.set_edit_handler(None);
        assert_eq!(seen.lock().len(), 2);

        // Clearing again is a no-op.
        title.set_edit_handler(None);
        assert_eq!(seen.lock().len(), 2);
    }
}
