//! Scene graph arena
//!
//! Every screen object lives in one [`SlotMap`] owned by the [`Scene`].
//! A node's `children` list names the nodes it owns; a node's `parent` is a
//! plain handle back up the tree. Because ownership sits in the arena rather
//! than in the links, the two directions never form an ownership cycle, and
//! destroying a node destroys the subtree its children list names.
//!
//! All mutation is synchronous. Change events fire after the derived state
//! (absolute positions) has been brought up to date.

use std::fmt;

use crate::components::{Component, ComponentError};
use crate::core::config::SceneConfig;
use crate::events::{EventType, ScreenObjectEvent, ValueChange};
use crate::foundation::collections::{ComponentId, NodeId, SlotMap, SubscriptionId};
use crate::foundation::math::Point;
use crate::input::{Keyboard, MouseState};

use super::children::ScreenObjectCollection;
use super::position::{provider_for, AbsolutePositionProvider};
use super::screen_object::ScreenObject;

/// Scene graph errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A node cannot be its own parent
    #[error("cannot set the parent of {0:?} to itself")]
    SelfParent(NodeId),

    /// The new parent is a descendant of the node being moved
    #[error("cannot parent {node:?} under its own descendant {parent:?}")]
    CycleDetected {
        /// Node being reparented
        node: NodeId,
        /// Requested parent
        parent: NodeId,
    },

    /// Handle does not name a live node
    #[error("screen object {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// Scene configuration failed validation
    #[error("invalid scene configuration: {0}")]
    InvalidConfig(String),

    /// Component collection error
    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// Owner of every screen object in a scene
pub struct Scene {
    nodes: SlotMap<NodeId, ScreenObject>,
    positioning: Box<dyn AbsolutePositionProvider>,
    config: SceneConfig,
    focused: Option<NodeId>,
}

impl Scene {
    /// Create an empty scene with default configuration
    pub fn new() -> Self {
        let config = SceneConfig::default();
        let positioning = provider_for(&config);
        Self::with_provider(config, positioning)
    }

    /// Create an empty scene; the position provider follows `config.positioning`
    ///
    /// Fails with [`SceneError::InvalidConfig`] when `config` does not validate.
    pub fn with_config(config: SceneConfig) -> Result<Self, SceneError> {
        config
            .validate()
            .map_err(|err| SceneError::InvalidConfig(err.to_string()))?;
        let positioning = provider_for(&config);
        Ok(Self::with_provider(config, positioning))
    }

    /// Create an empty scene with a custom absolute position provider
    ///
    /// `config` is used as given; only its node defaults apply here.
    pub fn with_provider(config: SceneConfig, positioning: Box<dyn AbsolutePositionProvider>) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            positioning,
            config,
            focused: None,
        }
    }

    /// Scene configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the scene holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` names a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> Option<&ScreenObject> {
        self.nodes.get(id)
    }

    /// Mutably borrow a node (flags, components, subscriptions)
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut ScreenObject> {
        self.nodes.get_mut(id)
    }

    /// Borrow a node or fail with [`SceneError::NodeNotFound`]
    pub fn get(&self, id: NodeId) -> Result<&ScreenObject, SceneError> {
        self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Mutably borrow a node or fail with [`SceneError::NodeNotFound`]
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut ScreenObject, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Create a detached node at the origin
    pub fn create_node(&mut self) -> NodeId {
        self.create_node_at(Point::zeros())
    }

    /// Create a detached node at `position`
    pub fn create_node_at(&mut self, position: Point) -> NodeId {
        let config = &self.config;
        let id = self.nodes.insert_with_key(|id| {
            let mut node = ScreenObject::new(id, config);
            node.set_local_position(position);
            node
        });
        self.refresh_absolute_position(id);
        log::debug!("Created screen object {id:?} at ({}, {})", position.x, position.y);
        id
    }

    /// Destroy a node and its whole subtree
    ///
    /// The node is detached from its parent first (raising `ParentChanged`),
    /// then every node in the subtree is dropped after its components have
    /// been removed one by one. Returns the destroyed handles, root first.
    pub fn destroy(&mut self, id: NodeId) -> Result<Vec<NodeId>, SceneError> {
        self.set_parent(id, None)?;

        let doomed = self.subtree(id);
        for node_id in doomed.iter().rev() {
            if let Some(mut node) = self.nodes.remove(*node_id) {
                node.components_mut().remove_all();
            }
        }
        if self.focused.is_some_and(|focused| doomed.contains(&focused)) {
            self.focused = None;
        }

        log::debug!("Destroyed {} screen object(s) rooted at {id:?}", doomed.len());
        Ok(doomed)
    }

    /// Parent of `id`
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, SceneError> {
        Ok(self.get(id)?.parent())
    }

    /// Children of `id` in draw order
    pub fn children(&self, id: NodeId) -> Result<&ScreenObjectCollection, SceneError> {
        Ok(self.get(id)?.children())
    }

    /// Attach `id` under `parent`, or detach it with `None`
    ///
    /// Fails before touching anything when `parent` is `id` itself, names a
    /// dead node, or is a descendant of `id`. Setting the current parent
    /// again is a silent no-op. Otherwise the node leaves its old parent's
    /// children before the link is reassigned, joins the new parent's
    /// children, has its absolute position (and its subtree's) recomputed,
    /// and finally raises `ParentChanged(old, new)`.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        let old_parent = self.get(id)?.parent();
        if parent == Some(id) {
            return Err(SceneError::SelfParent(id));
        }
        if let Some(new_parent) = parent {
            if !self.contains(new_parent) {
                return Err(SceneError::NodeNotFound(new_parent));
            }
        }
        if old_parent == parent {
            return Ok(());
        }
        if let Some(new_parent) = parent {
            if self.is_ancestor_of(id, new_parent) {
                log::warn!("Rejected reparenting {id:?} under its descendant {new_parent:?}");
                return Err(SceneError::CycleDetected { node: id, parent: new_parent });
            }
        }

        if let Some(old) = old_parent {
            self.nodes[id].set_parent_link(None);
            if let Some(old_node) = self.nodes.get_mut(old) {
                old_node.children_mut().remove(id);
            }
        }

        self.nodes[id].set_parent_link(parent);
        if let Some(new_parent) = parent {
            self.nodes[new_parent].children_mut().push(id);
        }

        log::debug!("Reparented {id:?}: {old_parent:?} -> {parent:?}");
        self.refresh_absolute_position(id);
        self.nodes[id].raise(ScreenObjectEvent::ParentChanged(ValueChange::new(old_parent, parent)));
        Ok(())
    }

    /// Attach `child` as the top-most child of `parent`
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.set_parent(child, Some(parent))
    }

    /// Detach `child` if it is a child of `parent`; returns whether it was
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool, SceneError> {
        if self.get(child)?.parent() != Some(parent) {
            return Ok(false);
        }
        self.set_parent(child, None)?;
        Ok(true)
    }

    /// Draw `child` after all of its siblings
    pub fn move_to_top(&mut self, parent: NodeId, child: NodeId) -> Result<bool, SceneError> {
        let moved = self.get_mut(parent)?.children_mut().move_to_top(child);
        if moved {
            self.mark_dirty(child);
        }
        Ok(moved)
    }

    /// Draw `child` before all of its siblings
    pub fn move_to_bottom(&mut self, parent: NodeId, child: NodeId) -> Result<bool, SceneError> {
        let moved = self.get_mut(parent)?.children_mut().move_to_bottom(child);
        if moved {
            self.mark_dirty(child);
        }
        Ok(moved)
    }

    /// Local position of `id`
    pub fn position(&self, id: NodeId) -> Result<Point, SceneError> {
        Ok(self.get(id)?.position())
    }

    /// Absolute position of `id`
    pub fn absolute_position(&self, id: NodeId) -> Result<Point, SceneError> {
        Ok(self.get(id)?.absolute_position())
    }

    /// Move `id`; recomputes absolute positions for the subtree, then raises
    /// `PositionChanged(old, new)`. Setting the current position is a no-op.
    pub fn set_position(&mut self, id: NodeId, position: Point) -> Result<(), SceneError> {
        let old_position = self.get(id)?.position();
        if old_position == position {
            return Ok(());
        }

        self.nodes[id].set_local_position(position);
        self.refresh_absolute_position(id);
        log::trace!("Moved {id:?} to ({}, {})", position.x, position.y);
        self.nodes[id].raise(ScreenObjectEvent::PositionChanged(ValueChange::new(old_position, position)));
        Ok(())
    }

    /// Show or hide `id`
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), SceneError> {
        self.get_mut(id)?.set_visible(visible);
        Ok(())
    }

    /// Enable or disable `id`
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<(), SceneError> {
        self.get_mut(id)?.set_enabled(enabled);
        Ok(())
    }

    /// Subscribe a closure to one of `id`'s change events
    pub fn subscribe(
        &mut self,
        id: NodeId,
        event_type: EventType,
        handler: impl FnMut(&ScreenObject, &ScreenObjectEvent) + 'static,
    ) -> Result<SubscriptionId, SceneError> {
        Ok(self.get_mut(id)?.subscribe(event_type, handler))
    }

    /// Remove a subscription from `id`
    pub fn unsubscribe(&mut self, id: NodeId, subscription: SubscriptionId) -> Result<bool, SceneError> {
        Ok(self.get_mut(id)?.unsubscribe(subscription))
    }

    /// Attach a component to `id`
    pub fn add_component(&mut self, id: NodeId, component: impl Component) -> Result<ComponentId, SceneError> {
        Ok(self.get_mut(id)?.components_mut().add(component))
    }

    /// Detach a component from `id` and hand it back
    pub fn remove_component(&mut self, id: NodeId, component: ComponentId) -> Result<Box<dyn Component>, SceneError> {
        Ok(self.get_mut(id)?.components_mut().remove(component)?)
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes.get(id).and_then(ScreenObject::parent), move |current| {
            self.nodes.get(*current).and_then(ScreenObject::parent)
        })
    }

    /// Every node below `id`, pre-order in draw order (`id` itself excluded)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut subtree = self.subtree(id);
        if !subtree.is_empty() {
            subtree.remove(0);
        }
        subtree
    }

    /// Whether `ancestor` is on the parent chain of `node`
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|current| current == ancestor)
    }

    /// Nodes without a parent
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent().is_none())
            .map(|(id, _)| id)
    }

    /// Node receiving [`dispatch_keyboard`](Self::dispatch_keyboard) input
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Give keyboard focus to `id`, or clear it with `None`
    pub fn set_focused(&mut self, id: Option<NodeId>) -> Result<(), SceneError> {
        if let Some(id) = id {
            self.get(id)?;
        }
        self.focused = id;
        Ok(())
    }

    /// Update pass: enabled nodes run their update view, then their children
    ///
    /// A disabled node skips its whole subtree.
    pub fn update(&mut self, root: NodeId, delta_time: f32) -> Result<(), SceneError> {
        self.get(root)?;
        self.update_node(root, delta_time);
        Ok(())
    }

    /// Draw pass: visible nodes run their draw view, then their children
    ///
    /// A hidden node skips its whole subtree. Drawn nodes are marked clean.
    pub fn draw(&mut self, root: NodeId, delta_time: f32) -> Result<(), SceneError> {
        self.get(root)?;
        self.draw_node(root, delta_time);
        Ok(())
    }

    /// Offer keyboard input to one node's keyboard view
    ///
    /// Returns `Ok(false)` without dispatching when the node has not opted
    /// into keyboard input, or when it or any ancestor is disabled.
    pub fn process_keyboard(&mut self, id: NodeId, keyboard: &Keyboard) -> Result<bool, SceneError> {
        if !self.get(id)?.use_keyboard() || !self.accepts_input(id, false) {
            return Ok(false);
        }
        let node = self.get_mut(id)?;
        let context = node.context();
        Ok(node.components_mut().dispatch_keyboard(&context, keyboard))
    }

    /// Offer mouse input to one node's mouse view
    ///
    /// Returns `Ok(false)` without dispatching when the node has not opted
    /// into mouse input, or when it or any ancestor is disabled or hidden.
    pub fn process_mouse(&mut self, id: NodeId, mouse: &MouseState) -> Result<bool, SceneError> {
        if !self.get(id)?.use_mouse() || !self.accepts_input(id, true) {
            return Ok(false);
        }
        let node = self.get_mut(id)?;
        let context = node.context();
        Ok(node.components_mut().dispatch_mouse(&context, mouse))
    }

    /// Offer keyboard input to the focused node
    pub fn dispatch_keyboard(&mut self, keyboard: &Keyboard) -> bool {
        match self.focused {
            Some(id) => self.process_keyboard(id, keyboard).unwrap_or(false),
            None => false,
        }
    }

    /// Offer mouse input to the visible, enabled subtree under `root`, top-most first
    ///
    /// Walks the reverse of draw order and stops at the first node that
    /// handles the input; returns that node. Hidden or disabled nodes take
    /// their whole subtree out of the walk.
    pub fn dispatch_mouse(&mut self, root: NodeId, mouse: &MouseState) -> Result<Option<NodeId>, SceneError> {
        self.get(root)?;
        let draw_order = self.interactive_subtree(root);
        for id in draw_order.into_iter().rev() {
            if self.process_mouse(id, mouse)? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    fn update_node(&mut self, id: NodeId, delta_time: f32) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if !node.is_enabled() {
            return;
        }
        let context = node.context();
        node.components_mut().update_all(&context, delta_time);

        let children: Vec<NodeId> = node.children().iter().collect();
        for child in children {
            self.update_node(child, delta_time);
        }
    }

    fn draw_node(&mut self, id: NodeId, delta_time: f32) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if !node.is_visible() {
            return;
        }
        let context = node.context();
        node.components_mut().draw_all(&context, delta_time);
        node.set_dirty(false);

        let children: Vec<NodeId> = node.children().iter().collect();
        for child in children {
            self.draw_node(child, delta_time);
        }
    }

    /// `id` and everything below it, pre-order
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            order.push(current);
            stack.extend(node.children().iter().rev());
        }
        order
    }

    /// Whether `id` and all of its ancestors are enabled (and visible, for mouse input)
    fn accepts_input(&self, id: NodeId, require_visible: bool) -> bool {
        std::iter::once(id).chain(self.ancestors(id)).all(|current| {
            self.nodes
                .get(current)
                .is_some_and(|node| node.is_enabled() && (!require_visible || node.is_visible()))
        })
    }

    /// Like [`subtree`](Self::subtree) but skipping hidden or disabled branches
    fn interactive_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if !node.is_visible() || !node.is_enabled() {
                continue;
            }
            order.push(current);
            stack.extend(node.children().iter().rev());
        }
        order
    }

    /// Recompute the absolute position of `id` and every descendant
    fn refresh_absolute_position(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            let parent_absolute = node
                .parent()
                .and_then(|parent| self.nodes.get(parent))
                .map(ScreenObject::absolute_position);
            let absolute = self.positioning.absolute_position(node.position(), parent_absolute);

            let node = &mut self.nodes[current];
            node.set_absolute_position(absolute);
            // Parents are always settled before their children are popped
            stack.extend(node.children().iter());
        }
    }

    fn mark_dirty(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.set_dirty(true);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("nodes", &self.nodes.len())
            .field("config", &self.config)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}
