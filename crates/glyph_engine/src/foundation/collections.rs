//! Handle types for arena-backed collections
//!
//! Every screen object and component is stored in a [`SlotMap`] and referred
//! to by a generational key. A key that outlived its slot never aliases a
//! newer object, which is what lets a child hold a non-owning `parent`
//! handle without creating an ownership cycle.

pub use slotmap::{Key, SlotMap};

slotmap::new_key_type! {
    /// Handle to a screen object stored in a [`Scene`](crate::scene::Scene)
    pub struct NodeId;

    /// Handle to a component stored in a
    /// [`ComponentRegistry`](crate::components::ComponentRegistry)
    pub struct ComponentId;

    /// Handle returned when an observer subscribes to change events
    pub struct SubscriptionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_handle_is_not_reused() {
        let mut map: SlotMap<NodeId, &str> = SlotMap::with_key();
        let first = map.insert("first");
        map.remove(first);
        let second = map.insert("second");

        assert_ne!(first, second);
        assert!(map.get(first).is_none());
        assert_eq!(map.get(second), Some(&"second"));
    }

    #[test]
    fn test_default_handle_is_null() {
        assert!(NodeId::default().is_null());
    }
}
