//! Screen object: one node of the scene graph
//!
//! Structural state (parent, children, position) is changed through
//! [`Scene`](super::Scene) because it involves other nodes. Flags that only
//! concern the node itself are changed here directly.

use crate::components::{ComponentRegistry, NodeContext};
use crate::core::config::SceneConfig;
use crate::events::{EventHandler, EventSystem, EventType, ScreenObjectEvent};
use crate::foundation::collections::{NodeId, SubscriptionId};
use crate::foundation::math::Point;

use super::children::ScreenObjectCollection;

/// A positioned, visible/enabled entity in the scene graph
#[derive(Debug)]
pub struct ScreenObject {
    id: NodeId,
    // Relation only; the scene arena owns every node
    parent: Option<NodeId>,
    children: ScreenObjectCollection,
    position: Point,
    absolute_position: Point,
    is_visible: bool,
    is_enabled: bool,
    is_dirty: bool,
    use_keyboard: bool,
    use_mouse: bool,
    components: ComponentRegistry,
    events: EventSystem,
}

impl ScreenObject {
    pub(crate) fn new(id: NodeId, config: &SceneConfig) -> Self {
        Self {
            id,
            parent: None,
            children: ScreenObjectCollection::new(),
            position: Point::zeros(),
            absolute_position: Point::zeros(),
            is_visible: config.default_visible,
            is_enabled: config.default_enabled,
            is_dirty: true,
            use_keyboard: false,
            use_mouse: false,
            components: ComponentRegistry::new(id),
            events: EventSystem::new(),
        }
    }

    /// Handle of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Parent node, `None` when detached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in draw order
    pub fn children(&self) -> &ScreenObjectCollection {
        &self.children
    }

    /// Local position
    pub fn position(&self) -> Point {
        self.position
    }

    /// Position composed through the parent chain
    pub fn absolute_position(&self) -> Point {
        self.absolute_position
    }

    /// Whether the node and its subtree take part in the draw pass
    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Whether the node and its subtree take part in the update pass and input
    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Set when derived state or visibility changed since the last draw
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Whether keyboard input is dispatched to this node
    pub fn use_keyboard(&self) -> bool {
        self.use_keyboard
    }

    /// Whether mouse input is dispatched to this node
    pub fn use_mouse(&self) -> bool {
        self.use_mouse
    }

    /// Show or hide the node; raises [`ScreenObjectEvent::VisibleChanged`]
    pub fn set_visible(&mut self, visible: bool) {
        if self.is_visible == visible {
            return;
        }
        self.is_visible = visible;
        self.is_dirty = true;
        self.raise(ScreenObjectEvent::VisibleChanged);
    }

    /// Enable or disable the node; raises [`ScreenObjectEvent::EnabledChanged`]
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.is_enabled == enabled {
            return;
        }
        self.is_enabled = enabled;
        self.raise(ScreenObjectEvent::EnabledChanged);
    }

    /// Opt in or out of keyboard dispatch
    pub fn set_use_keyboard(&mut self, use_keyboard: bool) {
        self.use_keyboard = use_keyboard;
    }

    /// Opt in or out of mouse dispatch
    pub fn set_use_mouse(&mut self, use_mouse: bool) {
        self.use_mouse = use_mouse;
    }

    /// Force or clear the dirty flag
    pub fn set_dirty(&mut self, dirty: bool) {
        self.is_dirty = dirty;
    }

    /// Components attached to this node
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Components attached to this node, mutably
    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    /// Subscribe a closure to one event type
    pub fn subscribe(
        &mut self,
        event_type: EventType,
        handler: impl FnMut(&ScreenObject, &ScreenObjectEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(event_type, Box::new(handler))
    }

    /// Subscribe an already boxed handler to one event type
    pub fn subscribe_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) -> SubscriptionId {
        self.events.subscribe(event_type, handler)
    }

    /// Remove a subscription; returns `false` if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Snapshot handed to component callbacks
    pub fn context(&self) -> NodeContext {
        NodeContext {
            id: self.id,
            position: self.position,
            absolute_position: self.absolute_position,
            is_visible: self.is_visible,
            is_enabled: self.is_enabled,
        }
    }

    pub(crate) fn set_parent_link(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn set_local_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn set_absolute_position(&mut self, absolute_position: Point) {
        if self.absolute_position != absolute_position {
            self.absolute_position = absolute_position;
            self.is_dirty = true;
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut ScreenObjectCollection {
        &mut self.children
    }

    pub(crate) fn raise(&mut self, event: ScreenObjectEvent) {
        // Handlers only get `&ScreenObject`, so nothing can subscribe while the list is out
        let mut events = std::mem::take(&mut self.events);
        events.dispatch(self, &event);
        self.events = events;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn node() -> ScreenObject {
        ScreenObject::new(NodeId::default(), &SceneConfig::default())
    }

    #[test]
    fn test_defaults_follow_config() {
        let config = SceneConfig {
            default_visible: false,
            ..SceneConfig::default()
        };
        let node = ScreenObject::new(NodeId::default(), &config);

        assert!(!node.is_visible());
        assert!(node.is_enabled());
        assert!(!node.use_keyboard());
        assert!(!node.use_mouse());
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
        assert_eq!(node.absolute_position(), Point::zeros());
    }

    #[test]
    fn test_visible_changed_fires_only_on_change() {
        let count = Rc::new(RefCell::new(0));
        let mut node = node();
        let seen = Rc::clone(&count);
        node.subscribe(EventType::VisibleChanged, move |sender: &ScreenObject, _event: &ScreenObjectEvent| {
            assert!(!sender.is_visible());
            *seen.borrow_mut() += 1;
        });

        node.set_visible(true);
        assert_eq!(*count.borrow(), 0);

        node.set_visible(false);
        node.set_visible(false);
        assert_eq!(*count.borrow(), 1);
        assert!(node.is_dirty());
    }

    #[test]
    fn test_enabled_changed_and_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut node = node();
        let seen = Rc::clone(&count);
        let subscription = node.subscribe(EventType::EnabledChanged, move |_: &ScreenObject, _: &ScreenObjectEvent| {
            *seen.borrow_mut() += 1;
        });

        node.set_enabled(false);
        assert!(node.unsubscribe(subscription));
        node.set_enabled(true);

        assert_eq!(*count.borrow(), 1);
        assert!(node.is_enabled());
    }

    #[test]
    fn test_context_snapshot() {
        let mut node = node();
        node.set_local_position(Point::new(4, 2));
        node.set_absolute_position(Point::new(5, 3));

        let context = node.context();
        assert_eq!(context.position, Point::new(4, 2));
        assert_eq!(context.absolute_position, Point::new(5, 3));
        assert!(context.is_visible);
    }
}
