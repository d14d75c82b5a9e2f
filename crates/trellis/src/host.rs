//! The host-tree adapter.
//!
//! The engine never touches a real rendering environment. Attach and
//! detach operations go through the [`HostTree`] trait, which a host
//! integration implements against its actual node hierarchy. The engine
//! treats the three operations as opaque.

use std::collections::HashSet;

use crate::widget::WidgetId;

/// Adapter to the external rendering environment's live node hierarchy.
///
/// Implementations insert and remove a widget's render node; what a
/// "render node" is belongs entirely to the host. Only root widgets are
/// ever passed to these methods.
pub trait HostTree: Send {
    /// Insert the widget's render node into the host's live tree.
    fn insert(&mut self, id: WidgetId);

    /// Remove the widget's render node from the host's live tree.
    fn remove(&mut self, id: WidgetId);

    /// Whether the widget's render node is currently part of the live
    /// tree.
    fn contains(&self, id: WidgetId) -> bool;
}

/// A host adapter with no rendering environment behind it.
///
/// Tracks membership so [`contains`](HostTree::contains) stays truthful,
/// which is all the engine and its tests need. This is the default host
/// of a [`WidgetTree`](crate::WidgetTree).
#[derive(Debug, Default)]
pub struct NullHost {
    members: HashSet<WidgetId>,
}

impl NullHost {
    /// Create an empty null host.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HostTree for NullHost {
    fn insert(&mut self, id: WidgetId) {
        self.members.insert(id);
    }

    fn remove(&mut self, id: WidgetId) {
        self.members.remove(&id);
    }

    fn contains(&self, id: WidgetId) -> bool {
        self.members.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_null_host_membership() {
        let mut map: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let id = map.insert(());

        let mut host = NullHost::new();
        assert!(!host.contains(id));

        host.insert(id);
        assert!(host.contains(id));

        host.remove(id);
        assert!(!host.contains(id));
    }
}
