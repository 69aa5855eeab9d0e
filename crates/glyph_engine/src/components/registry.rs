//! Observable component collection with capability-filtered views
//!
//! The registry owns a node's components in insertion order and keeps five
//! derived views in step with every mutation:
//!
//! - update, draw, mouse, keyboard: components declaring that capability,
//!   sorted by [`Component::sort_order`] ascending. The sort is stable, so
//!   components with equal order keep the order in which they joined the view.
//! - empty: components declaring no capability, in the order they were added.
//!
//! Every mutation is expressed as a [`CollectionChange`] and routed through a
//! single handler, so the views can never observe a mutation the handler did
//! not see.

use std::fmt;

use crate::foundation::collections::{ComponentId, NodeId, SlotMap};
use super::component::{Capabilities, Component, NodeContext};
use crate::input::{Keyboard, MouseState};

/// Component collection errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// The operation would desynchronize the filtered views
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Index outside the backing collection
    #[error("index {index} is out of range for a collection of {len} components")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Collection length at the time of the call
        len: usize,
    },

    /// Handle does not name a component in this collection
    #[error("component {0:?} is not in this collection")]
    NotFound(ComponentId),
}

/// A mutation of the backing collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionChange {
    /// Items were inserted
    Add {
        /// Inserted items
        new_items: Vec<ComponentId>,
    },
    /// Items were taken out
    Remove {
        /// Removed items
        old_items: Vec<ComponentId>,
    },
    /// Items were swapped in place; new items are filed before old ones are dropped
    Replace {
        /// Incoming items
        new_items: Vec<ComponentId>,
        /// Outgoing items
        old_items: Vec<ComponentId>,
    },
    /// An item changed index; the views are ordered independently and stay as they are
    Move {
        /// Previous index
        from: usize,
        /// New index
        to: usize,
    },
    /// The whole collection was cleared
    Reset,
}

struct ComponentEntry {
    component: Box<dyn Component>,
    // Captured on add so removal always finds the views it was filed into
    capabilities: Capabilities,
}

/// A node's components plus their derived dispatch views
pub struct ComponentRegistry {
    owner: NodeId,
    entries: SlotMap<ComponentId, ComponentEntry>,
    items: Vec<ComponentId>,
    update: Vec<ComponentId>,
    draw: Vec<ComponentId>,
    mouse: Vec<ComponentId>,
    keyboard: Vec<ComponentId>,
    empty: Vec<ComponentId>,
}

impl ComponentRegistry {
    /// Create an empty registry owned by `owner`
    pub fn new(owner: NodeId) -> Self {
        Self {
            owner,
            entries: SlotMap::with_key(),
            items: Vec::new(),
            update: Vec::new(),
            draw: Vec::new(),
            mouse: Vec::new(),
            keyboard: Vec::new(),
            empty: Vec::new(),
        }
    }

    /// Node passed to lifecycle hooks
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when there are no components
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `id` names a component in this collection
    pub fn contains(&self, id: ComponentId) -> bool {
        self.entries.contains_key(id)
    }

    /// Component handles in collection order
    pub fn ids(&self) -> &[ComponentId] {
        &self.items
    }

    /// Position of `id` in collection order
    pub fn index_of(&self, id: ComponentId) -> Option<usize> {
        self.items.iter().position(|existing| *existing == id)
    }

    /// Append a component
    pub fn add(&mut self, component: impl Component) -> ComponentId {
        self.add_boxed(Box::new(component))
    }

    /// Append an already boxed component
    pub fn add_boxed(&mut self, component: Box<dyn Component>) -> ComponentId {
        let id = self.store(component);
        self.items.push(id);
        self.apply(CollectionChange::Add { new_items: vec![id] });
        id
    }

    /// Insert a component at `index` in collection order
    pub fn insert(&mut self, index: usize, component: impl Component) -> Result<ComponentId, ComponentError> {
        if index > self.items.len() {
            return Err(ComponentError::IndexOutOfRange { index, len: self.items.len() });
        }
        let id = self.store(Box::new(component));
        self.items.insert(index, id);
        self.apply(CollectionChange::Add { new_items: vec![id] });
        Ok(id)
    }

    /// Remove a component and hand it back
    pub fn remove(&mut self, id: ComponentId) -> Result<Box<dyn Component>, ComponentError> {
        let index = self.index_of(id).ok_or(ComponentError::NotFound(id))?;
        self.items.remove(index);
        self.apply(CollectionChange::Remove { old_items: vec![id] });
        self.take(id)
    }

    /// Swap the component `id` for `component` at the same index
    ///
    /// Returns the new handle and the component that was replaced.
    pub fn replace(
        &mut self,
        id: ComponentId,
        component: impl Component,
    ) -> Result<(ComponentId, Box<dyn Component>), ComponentError> {
        let index = self.index_of(id).ok_or(ComponentError::NotFound(id))?;
        let new_id = self.store(Box::new(component));
        self.items[index] = new_id;
        self.apply(CollectionChange::Replace {
            new_items: vec![new_id],
            old_items: vec![id],
        });
        Ok((new_id, self.take(id)?))
    }

    /// Move the component at `from` to `to` in collection order
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), ComponentError> {
        let len = self.items.len();
        if from >= len {
            return Err(ComponentError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(ComponentError::IndexOutOfRange { index: to, len });
        }
        let id = self.items.remove(from);
        self.items.insert(to, id);
        self.apply(CollectionChange::Move { from, to });
        Ok(())
    }

    /// Always fails: clearing in one step would skip the per-component
    /// bookkeeping. Use [`remove_all`](Self::remove_all) instead.
    pub fn clear(&mut self) -> Result<(), ComponentError> {
        self.handle_change(&CollectionChange::Reset)
    }

    /// Remove every component one at a time, front to back
    pub fn remove_all(&mut self) -> Vec<Box<dyn Component>> {
        let mut removed = Vec::with_capacity(self.items.len());
        while let Some(&id) = self.items.first() {
            match self.remove(id) {
                Ok(component) => removed.push(component),
                Err(err) => {
                    // Unreachable: the id came straight from `items`
                    log::warn!("Dropping unknown component {id:?} during remove_all: {err}");
                    self.items.retain(|existing| *existing != id);
                }
            }
        }
        removed
    }

    /// Re-sort the capability views after components changed their sort order
    pub fn refresh_sort_order(&mut self) {
        self.sort_views();
    }

    /// Components running in the update pass, in dispatch order
    pub fn update_view(&self) -> &[ComponentId] {
        &self.update
    }

    /// Components running in the draw pass, in dispatch order
    pub fn draw_view(&self) -> &[ComponentId] {
        &self.draw
    }

    /// Components receiving mouse input, in dispatch order
    pub fn mouse_view(&self) -> &[ComponentId] {
        &self.mouse
    }

    /// Components receiving keyboard input, in dispatch order
    pub fn keyboard_view(&self) -> &[ComponentId] {
        &self.keyboard
    }

    /// Components declaring no capability
    pub fn empty_view(&self) -> &[ComponentId] {
        &self.empty
    }

    /// Borrow a component
    pub fn get(&self, id: ComponentId) -> Option<&dyn Component> {
        self.entries.get(id).map(|entry| entry.component.as_ref())
    }

    /// Mutably borrow a component
    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut dyn Component> {
        self.entries.get_mut(id).map(|entry| entry.component.as_mut())
    }

    /// Borrow a component as its concrete type
    pub fn get_as<T: Component>(&self, id: ComponentId) -> Option<&T> {
        self.get(id)?.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow a component as its concrete type
    pub fn get_as_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// All components in collection order
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &dyn Component)> + '_ {
        self.items
            .iter()
            .filter_map(move |id| self.get(*id).map(|component| (*id, component)))
    }

    /// Components of type `T`, in collection order
    ///
    /// Scans the backing collection each time it is called, so the order is
    /// insertion order rather than dispatch order.
    pub fn components_of<T: Component>(&self) -> impl Iterator<Item = (ComponentId, &T)> + '_ {
        self.iter()
            .filter_map(|(id, component)| component.as_any().downcast_ref::<T>().map(|typed| (id, typed)))
    }

    /// First component of type `T`
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.components_of::<T>().next().map(|(_, component)| component)
    }

    /// First component of type `T`, mutably
    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        let id = self.components_of::<T>().next().map(|(id, _)| id)?;
        self.get_as_mut::<T>(id)
    }

    /// Components whose filed capabilities include all of `capabilities`,
    /// in collection order
    ///
    /// An empty set selects the components that declared no capability.
    pub fn with_capabilities(
        &self,
        capabilities: Capabilities,
    ) -> impl Iterator<Item = (ComponentId, &dyn Component)> + '_ {
        self.items.iter().filter_map(move |id| {
            let entry = self.entries.get(*id)?;
            let matches = if capabilities.is_empty() {
                entry.capabilities.is_empty()
            } else {
                entry.capabilities.contains(capabilities)
            };
            matches.then(|| (*id, entry.component.as_ref()))
        })
    }

    /// Run the update view in dispatch order
    pub fn update_all(&mut self, host: &NodeContext, delta_time: f32) {
        for id in &self.update {
            if let Some(entry) = self.entries.get_mut(*id) {
                entry.component.update(host, delta_time);
            }
        }
    }

    /// Run the draw view in dispatch order
    pub fn draw_all(&mut self, host: &NodeContext, delta_time: f32) {
        for id in &self.draw {
            if let Some(entry) = self.entries.get_mut(*id) {
                entry.component.draw(host, delta_time);
            }
        }
    }

    /// Offer mouse input to the mouse view; stops at the first component that handles it
    pub fn dispatch_mouse(&mut self, host: &NodeContext, mouse: &MouseState) -> bool {
        for id in &self.mouse {
            if let Some(entry) = self.entries.get_mut(*id) {
                if entry.component.process_mouse(host, mouse) {
                    return true;
                }
            }
        }
        false
    }

    /// Offer keyboard input to the keyboard view; stops at the first component that handles it
    pub fn dispatch_keyboard(&mut self, host: &NodeContext, keyboard: &Keyboard) -> bool {
        for id in &self.keyboard {
            if let Some(entry) = self.entries.get_mut(*id) {
                if entry.component.process_keyboard(host, keyboard) {
                    return true;
                }
            }
        }
        false
    }

    fn store(&mut self, component: Box<dyn Component>) -> ComponentId {
        let capabilities = component.capabilities();
        self.entries.insert(ComponentEntry { component, capabilities })
    }

    fn take(&mut self, id: ComponentId) -> Result<Box<dyn Component>, ComponentError> {
        self.entries
            .remove(id)
            .map(|entry| entry.component)
            .ok_or(ComponentError::NotFound(id))
    }

    fn apply(&mut self, change: CollectionChange) {
        if let Err(err) = self.handle_change(&change) {
            log::warn!("Component collection change {change:?} rejected: {err}");
        }
    }

    fn handle_change(&mut self, change: &CollectionChange) -> Result<(), ComponentError> {
        match change {
            CollectionChange::Add { new_items } => {
                for id in new_items {
                    self.filter_add(*id);
                    self.notify_added(*id);
                }
            }
            CollectionChange::Remove { old_items } => {
                for id in old_items {
                    self.filter_remove(*id);
                    self.notify_removed(*id);
                }
            }
            CollectionChange::Replace { new_items, old_items } => {
                for id in new_items {
                    self.filter_add(*id);
                    self.notify_added(*id);
                }
                for id in old_items {
                    self.filter_remove(*id);
                    self.notify_removed(*id);
                }
            }
            CollectionChange::Move { from, to } => {
                log::trace!("Component moved from {from} to {to} on {:?}", self.owner);
            }
            CollectionChange::Reset => {
                return Err(ComponentError::UnsupportedOperation(
                    "clearing a component collection is not supported; remove components individually with remove_all",
                ));
            }
        }
        Ok(())
    }

    fn filter_add(&mut self, id: ComponentId) {
        let Some(capabilities) = self.entries.get(id).map(|entry| entry.capabilities) else {
            return;
        };

        if capabilities.contains(Capabilities::DRAW) {
            add_unique(&mut self.draw, id);
        }
        if capabilities.contains(Capabilities::UPDATE) {
            add_unique(&mut self.update, id);
        }
        if capabilities.contains(Capabilities::KEYBOARD) {
            add_unique(&mut self.keyboard, id);
        }
        if capabilities.contains(Capabilities::MOUSE) {
            add_unique(&mut self.mouse, id);
        }
        if capabilities.is_empty() {
            add_unique(&mut self.empty, id);
        }

        self.sort_views();
    }

    fn filter_remove(&mut self, id: ComponentId) {
        let Some(capabilities) = self.entries.get(id).map(|entry| entry.capabilities) else {
            return;
        };

        if capabilities.contains(Capabilities::DRAW) {
            remove_present(&mut self.draw, id);
        }
        if capabilities.contains(Capabilities::UPDATE) {
            remove_present(&mut self.update, id);
        }
        if capabilities.contains(Capabilities::KEYBOARD) {
            remove_present(&mut self.keyboard, id);
        }
        if capabilities.contains(Capabilities::MOUSE) {
            remove_present(&mut self.mouse, id);
        }
        if capabilities.is_empty() {
            remove_present(&mut self.empty, id);
        }

        self.sort_views();
    }

    fn sort_views(&mut self) {
        sort_view(&mut self.draw, &self.entries);
        sort_view(&mut self.update, &self.entries);
        sort_view(&mut self.keyboard, &self.entries);
        sort_view(&mut self.mouse, &self.entries);
    }

    fn notify_added(&mut self, id: ComponentId) {
        let owner = self.owner;
        if let Some(entry) = self.entries.get_mut(id) {
            log::trace!("Component {id:?} added to {owner:?} as {:?}", entry.capabilities);
            entry.component.on_added(owner);
        }
    }

    fn notify_removed(&mut self, id: ComponentId) {
        let owner = self.owner;
        if let Some(entry) = self.entries.get_mut(id) {
            log::trace!("Component {id:?} removed from {owner:?}");
            entry.component.on_removed(owner);
        }
    }
}

fn add_unique(view: &mut Vec<ComponentId>, id: ComponentId) {
    if !view.contains(&id) {
        view.push(id);
    }
}

fn remove_present(view: &mut Vec<ComponentId>, id: ComponentId) {
    if let Some(index) = view.iter().position(|existing| *existing == id) {
        view.remove(index);
    }
}

// `sort_by_key` is a stable sort: equal orders keep their relative position
fn sort_view(view: &mut [ComponentId], entries: &SlotMap<ComponentId, ComponentEntry>) {
    view.sort_by_key(|id| entries.get(*id).map_or(0, |entry| entry.component.sort_order()));
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("owner", &self.owner)
            .field("items", &self.items)
            .field("update", &self.update)
            .field("draw", &self.draw)
            .field("mouse", &self.mouse)
            .field("keyboard", &self.keyboard)
            .field("empty", &self.empty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: &'static str,
        order: Rc<Cell<i32>>,
        capabilities: Rc<Cell<Capabilities>>,
        log: Log,
    }

    impl Probe {
        fn new(name: &'static str, order: i32, capabilities: Capabilities, log: &Log) -> Self {
            Self {
                name,
                order: Rc::new(Cell::new(order)),
                capabilities: Rc::new(Cell::new(capabilities)),
                log: Rc::clone(log),
            }
        }
    }

    impl Component for Probe {
        fn capabilities(&self) -> Capabilities {
            self.capabilities.get()
        }

        fn sort_order(&self) -> i32 {
            self.order.get()
        }

        fn on_added(&mut self, _owner: NodeId) {
            self.log.borrow_mut().push(format!("added:{}", self.name));
        }

        fn on_removed(&mut self, _owner: NodeId) {
            self.log.borrow_mut().push(format!("removed:{}", self.name));
        }

        fn process_keyboard(&mut self, _host: &NodeContext, _keyboard: &Keyboard) -> bool {
            self.log.borrow_mut().push(format!("key:{}", self.name));
            self.name.starts_with("stop")
        }
    }

    struct Marker;

    impl Component for Marker {
        fn capabilities(&self) -> Capabilities {
            Capabilities::empty()
        }
    }

    fn owner() -> NodeId {
        let mut nodes: SlotMap<NodeId, ()> = SlotMap::with_key();
        nodes.insert(())
    }

    fn names(registry: &ComponentRegistry, view: &[ComponentId]) -> Vec<&'static str> {
        view.iter()
            .map(|id| registry.get_as::<Probe>(*id).map_or("?", |probe| probe.name))
            .collect()
    }

    fn host(id: NodeId) -> NodeContext {
        NodeContext {
            id,
            position: crate::foundation::math::Point::zeros(),
            absolute_position: crate::foundation::math::Point::zeros(),
            is_visible: true,
            is_enabled: true,
        }
    }

    #[test]
    fn test_draw_view_sorted_by_order() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new(owner());
        let _c1 = registry.add(Probe::new("c1", 5, Capabilities::DRAW, &log));
        let c2 = registry.add(Probe::new("c2", 2, Capabilities::DRAW, &log));

        assert_eq!(names(&registry, registry.draw_view()), vec!["c2", "c1"]);

        registry.remove(c2).unwrap();
        assert_eq!(names(&registry, registry.draw_view()), vec!["c1"]);
    }

    #[test]
    fn test_equal_order_keeps_insertion_order_across_resorts() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new(owner());
        registry.add(Probe::new("a", 1, Capabilities::UPDATE, &log));
        registry.add(Probe::new("b", 1, Capabilities::UPDATE, &log));

        let other = registry.add(Probe::new("other", 0, Capabilities::UPDATE, &log));
        assert_eq!(names(&registry, registry.update_view()), vec!["other", "a", "b"]);

        registry.remove(other).unwrap();
        registry.add(Probe::new("late", 1, Capabilities::DRAW, &log));
        assert_eq!(names(&registry, registry.update_view()), vec!["a", "b"]);
    }

    #[test]
    fn test_views_match_filtered_collection_after_mixed_mutations() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new(owner());
        let all = [
            Capabilities::DRAW,
            Capabilities::UPDATE | Capabilities::DRAW,
            Capabilities::MOUSE,
            Capabilities::KEYBOARD | Capabilities::MOUSE,
            Capabilities::empty(),
            Capabilities::all(),
        ];
        let labels = ["p0", "p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9"];

        // Deterministic LCG so the sequence is reproducible without extra crates
        let mut seed: u32 = 0x2545_f491;
        let mut next = || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (seed >> 16) as usize
        };

        for step in 0..200 {
            if registry.is_empty() || next() % 3 != 0 {
                let label = labels[step % labels.len()];
                let order = i32::try_from(next() % 4).unwrap();
                let capabilities = all[next() % all.len()];
                registry.add(Probe::new(label, order, capabilities, &log));
            } else {
                let victim = registry.ids()[next() % registry.len()];
                registry.remove(victim).unwrap();
            }

            for (flag, view) in [
                (Capabilities::UPDATE, registry.update_view()),
                (Capabilities::DRAW, registry.draw_view()),
                (Capabilities::MOUSE, registry.mouse_view()),
                (Capabilities::KEYBOARD, registry.keyboard_view()),
            ] {
                let mut expected: Vec<ComponentId> = registry
                    .with_capabilities(flag)
                    .map(|(id, _)| id)
                    .collect();
                expected.sort_by_key(|id| registry.get(*id).map_or(0, |c| c.sort_order()));
                assert_eq!(view, expected.as_slice(), "view {flag:?} diverged at step {step}");
            }

            let expected_empty: Vec<ComponentId> = registry
                .with_capabilities(Capabilities::empty())
                .map(|(id, _)| id)
                .collect();
            assert_eq!(registry.empty_view(), expected_empty.as_slice());
        }
    }

    #[test]
    fn test_empty_view_entry_is_removed() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new(owner());
        let plain = registry.add(Probe::new("plain", 0, Capabilities::empty(), &log));
        let marker = registry.add(Marker);

        assert_eq!(registry.empty_view(), &[plain, marker]);

        registry.remove(plain).unwrap();
        assert_eq!(registry.empty_view(), &[marker]);
        registry.remove(marker).unwrap();
        assert!(registry.empty_view().is_empty());
    }

    #[test]
    fn test_clear_is_rejected_and_changes_nothing() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new(owner());
        let id = registry.add(Probe::new("kept", 0, Capabilities::DRAW, &log));
        log.borrow_mut().clear();

        let err = registry.clear().unwrap_err();
        assert!(matches!(err, ComponentError::UnsupportedOperation(_)));
        assert_eq!(registry.ids(), &[id]);
        assert_eq!(registry.draw_view(), &[id]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_remove_all_fires_every_hook() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new(owner());
        registry.add(Probe::new("a", 0, Capabilities::DRAW, &log));
        registry.add(Probe::new("b", 0, Capabilities::empty(), &log));
        log.borrow_mut().clear();

        let removed = registry.remove_all();

        assert_eq!(removed.len(), 2);
        assert!(registry.is_empty());
        assert!(registry.draw_view().is_empty());
        assert!(registry.empty_view().is_empty());
        assert_eq!(*log.borrow(), vec!["removed:a", "removed:b"]);
    }

    #[test]
    fn test_replace_adds_new_before_removing_old() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new(owner());
        registry.add(Probe::new("first", 0, Capabilities::DRAW, &log));
        let old = registry.add(Probe::new("old", 3, Capabilities::DRAW, &log));
        log.borrow_mut().clear();

        let (new_id, replaced) = registry
            .replace(old, Probe::new("new", -1, Capabilities::MOUSE, &log))
            .unwrap();

        assert_eq!(*log.borrow(), vec!["added:new", "removed:old"]);
        assert_eq!(registry.index_of(new_id), Some(1));
        assert!(!registry.contains(old));
        assert_eq!(names(&registry, registry.draw_view()), vec!["first"]);
        assert_eq!(names(&registry, registry.mouse_view()), vec!["new"]);
        assert_eq!(replaced.as_ref().as_any().downcast_ref::<Probe>().map(|p| p.name), Some("old"));
    }

    #[test]
    fn test_hooks_receive_owner() {
        struct OwnerProbe(Rc<Cell<Option<NodeId>>>);
        impl Component for OwnerProbe {
            fn capabilities(&self) -> Capabilities {
                Capabilities::UPDATE
            }
            fn on_added(&mut self, owner: NodeId) {
                self.0.set(Some(owner));
            }
            fn on_removed(&mut self, _owner: NodeId) {
                self.0.set(None);
            }
        }

        let seen = Rc::new(Cell::new(None));
        let node = owner();
        let mut registry = ComponentRegistry::new(node);
        let id = registry.add(OwnerProbe(Rc::clone(&seen)));
        assert_eq!(seen.get(), Some(node));

        registry.remove(id).unwrap();
        assert_eq!(seen.get(), None);
    }

    #[test]
    fn test_capabilities_are_captured_when_added() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new(owner());
        let probe = Probe::new("fickle", 0, Capabilities::DRAW, &log);
        let flags = Rc::clone(&probe.capabilities);
        let id = registry.add(probe);

        flags.set(Capabilities::MOUSE);
        registry.remove(id).unwrap();

        assert!(registry.draw_view().is_empty());
        assert!(registry.mouse_view().is_empty());
    }

    #[test]
    fn test_refresh_sort_order_after_priority_change() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new(owner());
        let a = Probe::new("a", 0, Capabilities::DRAW, &log);
        let a_order = Rc::clone(&a.order);
        registry.add(a);
        registry.add(Probe::new("b", 1, Capabilities::DRAW, &log));

        a_order.set(2);
        assert_eq!(names(&registry, registry.draw_view()), vec!["a", "b"]);
        registry.refresh_sort_order();
        assert_eq!(names(&registry, registry.draw_view()), vec!["b", "a"]);
    }

    #[test]
    fn test_move_and_insert_bounds() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new(owner());
        let a = registry.add(Probe::new("a", 1, Capabilities::DRAW, &log));
        let b = registry.add(Probe::new("b", 1, Capabilities::DRAW, &log));

        registry.move_item(1, 0).unwrap();
        assert_eq!(registry.ids(), &[b, a]);
        // Views keep the order components joined them
        assert_eq!(registry.draw_view(), &[a, b]);

        assert_eq!(
            registry.move_item(0, 2),
            Err(ComponentError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(matches!(
            registry.insert(3, Marker),
            Err(ComponentError::IndexOutOfRange { index: 3, len: 2 })
        ));

        let front = registry.insert(0, Marker).unwrap();
        assert_eq!(registry.ids()[0], front);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut registry = ComponentRegistry::new(owner());
        let id = registry.add(Marker);
        registry.remove(id).unwrap();

        assert!(matches!(registry.remove(id), Err(ComponentError::NotFound(missing)) if missing == id));
        assert!(matches!(registry.replace(id, Marker), Err(ComponentError::NotFound(_))));
    }

    #[test]
    fn test_typed_queries_use_collection_order() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new(owner());
        registry.add(Probe::new("late", 9, Capabilities::DRAW, &log));
        registry.add(Marker);
        registry.add(Probe::new("early", -9, Capabilities::DRAW, &log));

        let found: Vec<&str> = registry.components_of::<Probe>().map(|(_, p)| p.name).collect();
        assert_eq!(found, vec!["late", "early"]);
        // Restartable: a second scan yields the same sequence
        assert_eq!(registry.components_of::<Probe>().count(), 2);

        assert_eq!(registry.component::<Probe>().map(|p| p.name), Some("late"));
        assert!(registry.component::<Marker>().is_some());

        registry.component_mut::<Probe>().unwrap().name = "renamed";
        assert_eq!(registry.component::<Probe>().map(|p| p.name), Some("renamed"));
    }

    #[test]
    fn test_typed_query_absent_type() {
        let registry = ComponentRegistry::new(owner());
        assert!(registry.component::<Marker>().is_none());
        assert_eq!(registry.components_of::<Marker>().count(), 0);
    }

    #[test]
    fn test_keyboard_dispatch_stops_when_handled() {
        let log = Log::default();
        let node = owner();
        let mut registry = ComponentRegistry::new(node);
        registry.add(Probe::new("never", 5, Capabilities::KEYBOARD, &log));
        registry.add(Probe::new("stop", 1, Capabilities::KEYBOARD, &log));
        registry.add(Probe::new("first", 0, Capabilities::KEYBOARD, &log));
        log.borrow_mut().clear();

        let handled = registry.dispatch_keyboard(&host(node), &Keyboard::new());

        assert!(handled);
        assert_eq!(*log.borrow(), vec!["key:first", "key:stop"]);
    }
}
