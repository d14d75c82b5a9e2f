//! Common layout implementation.
//!
//! LayoutBase provides the shared state every layout carries: the
//! set-once parent back-reference. Layout implementations include it as a
//! field and delegate `parent` / `set_parent` to it.

use crate::error::{Result, WidgetError};
use crate::widget::WidgetId;

/// Shared state for layout implementations.
///
/// A layout exists as the layout of exactly one widget for its entire
/// lifetime, and this struct enforces that: the parent slot is written
/// once, at installation, and every later attempt to change it fails.
#[derive(Debug, Default)]
pub struct LayoutBase {
    /// The widget that owns this layout. `None` until installed.
    parent: Option<WidgetId>,
}

impl LayoutBase {
    /// Create a new, uninstalled layout base.
    pub fn new() -> Self {
        Self::default()
    }

    /// The owning widget, or `None` before installation.
    #[inline]
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Set the owning widget.
    ///
    /// Setting the same owner again is a no-op; setting a different owner
    /// after installation fails with
    /// [`WidgetError::LayoutParentChange`].
    pub fn set_parent(&mut self, parent: WidgetId) -> Result<()> {
        match self.parent {
            None => {
                self.parent = Some(parent);
                Ok(())
            }
            Some(current) if current == parent => Ok(()),
            Some(_) => Err(WidgetError::LayoutParentChange),
        }
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
    fn test_parent_unset_reads_none() {
        let base = LayoutBase::new();
        assert_eq!(base.parent(), None);
    }

    #[test]
    fn test_parent_set_once() {
        let ids = test_ids(2);
        let mut base = LayoutBase::new();

        base.set_parent(ids[0]).unwrap();
        assert_eq!(base.parent(), Some(ids[0]));

        // Same owner again is a no-op.
        base.set_parent(ids[0]).unwrap();
        assert_eq!(base.parent(), Some(ids[0]));

        // A different owner is an invariant violation.
        let result = base.set_parent(ids[1]);
        assert_eq!(result, Err(WidgetError::LayoutParentChange));
        assert_eq!(base.parent(), Some(ids[0]));
    }
}
