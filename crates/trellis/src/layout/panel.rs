//! The stock concrete layout.

use crate::error::Result;
use crate::layout::{Layout, LayoutBase};
use crate::widget::WidgetId;

/// An ordered collection of children with no arrangement policy.
///
/// `PanelLayout` is the minimal useful layout: it maintains its children
/// in insertion order and relies entirely on the stock propagation
/// defaults of the [`Layout`] trait. Arrangement (where children end up
/// on screen) is left to the host or to a subclassing layout.
///
/// Children can be recorded before the layout is installed; installation
/// adopts them (sets their parent back-reference) during initialization.
/// After installation, structure changes flow through the tree:
/// [`WidgetTree::add_child`], [`WidgetTree::insert_child`] and
/// [`WidgetTree::set_parent`] drive the bookkeeping here via
/// `child-added` / `child-removed` delivery.
///
/// # Example
///
/// ```
/// use trellis::{EmptyWidget, PanelLayout, WidgetTree};
///
/// let mut tree = WidgetTree::new();
/// let parent = tree.register(Box::new(EmptyWidget));
/// let child = tree.register(Box::new(EmptyWidget));
///
/// let mut layout = PanelLayout::new();
/// layout.add(child); // recorded before installation
/// tree.set_layout(parent, Box::new(layout)).unwrap();
///
/// assert_eq!(tree.parent(child), Some(parent));
/// assert_eq!(tree.layout_of(parent).unwrap().child_at(0), Some(child));
/// ```
///
/// [`WidgetTree::add_child`]: crate::WidgetTree::add_child
/// [`WidgetTree::insert_child`]: crate::WidgetTree::insert_child
/// [`WidgetTree::set_parent`]: crate::WidgetTree::set_parent
#[derive(Debug, Default)]
pub struct PanelLayout {
    base: LayoutBase,
    children: Vec<WidgetId>,
}

impl PanelLayout {
    /// Create an empty panel layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a panel layout pre-populated with children.
    ///
    /// The children are adopted when the layout is installed.
    pub fn with_children(children: impl IntoIterator<Item = WidgetId>) -> Self {
        let mut layout = Self::new();
        for child in children {
            layout.add(child);
        }
        layout
    }

    /// Record a child prior to installation.
    ///
    /// Duplicates are ignored. Once the layout is installed, add children
    /// through the owning tree instead.
    pub fn add(&mut self, child: WidgetId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// The children in index order.
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }
}

impl Layout for PanelLayout {
    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_at(&self, index: usize) -> Option<WidgetId> {
        self.children.get(index).copied()
    }

    fn insert_child(&mut self, index: Option<usize>, child: WidgetId) {
        let index = index.unwrap_or(self.children.len()).min(self.children.len());
        self.children.insert(index, child);
    }

    fn remove_child(&mut self, child: WidgetId) {
        self.children.retain(|&c| c != child);
    }

    fn parent(&self) -> Option<WidgetId> {
        self.base.parent()
    }

    fn set_parent(&mut self, parent: WidgetId) -> Result<()> {
        self.base.set_parent(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn test_ids(count: usize) -> Vec<WidgetId> {
        let mut map: SlotMap<WidgetId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_enumeration_contract() {
        let ids = test_ids(3);
        let layout = PanelLayout::with_children(ids.iter().copied());

        assert_eq!(layout.child_count(), 3);
        assert_eq!(layout.child_at(0), Some(ids[0]));
        assert_eq!(layout.child_at(2), Some(ids[2]));
        // Out of range is absence, not an error.
        assert_eq!(layout.child_at(3), None);
        assert_eq!(layout.child_at(usize::MAX), None);

        assert_eq!(layout.child_index(ids[1]), Some(1));
    }

    #[test]
    fn test_child_index_absent() {
        let ids = test_ids(2);
        let layout = PanelLayout::with_children([ids[0]]);
        assert_eq!(layout.child_index(ids[1]), None);
    }

    #[test]
    fn test_insert_positions() {
        let ids = test_ids(3);
        let mut layout = PanelLayout::new();

        layout.insert_child(None, ids[0]);
        layout.insert_child(Some(0), ids[1]);
        // Out-of-range request appends.
        layout.insert_child(Some(99), ids[2]);

        assert_eq!(layout.children(), &[ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn test_remove_child() {
        let ids = test_ids(3);
        let mut layout = PanelLayout::with_children(ids.iter().copied());

        layout.remove_child(ids[1]);
        assert_eq!(layout.children(), &[ids[0], ids[2]]);

        // Removing an untracked child is a no-op.
        layout.remove_child(ids[1]);
        assert_eq!(layout.child_count(), 2);
    }

    #[test]
    fn test_add_ignores_duplicates() {
        let ids = test_ids(1);
        let mut layout = PanelLayout::new();

        layout.add(ids[0]);
        layout.add(ids[0]);
        assert_eq!(layout.child_count(), 1);
    }
}
