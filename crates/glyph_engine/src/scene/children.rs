//! Ordered child list of a screen object
//!
//! A passive store: it never touches the children themselves. Attaching and
//! detaching go through [`Scene::set_parent`](crate::scene::Scene::set_parent),
//! which keeps this list and each child's parent link in agreement.
//!
//! Order is draw order: the first child is drawn first (bottom), the last
//! child is drawn last (top).

use crate::foundation::collections::NodeId;

/// Children of one screen object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenObjectCollection {
    items: Vec<NodeId>,
}

impl ScreenObjectCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when there are no children
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `child` is in this collection
    pub fn contains(&self, child: NodeId) -> bool {
        self.items.contains(&child)
    }

    /// Index of `child` in draw order
    pub fn index_of(&self, child: NodeId) -> Option<usize> {
        self.items.iter().position(|existing| *existing == child)
    }

    /// Child at `index`
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }

    /// Children in draw order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.items.iter().copied()
    }

    /// Children in draw order
    pub fn as_slice(&self) -> &[NodeId] {
        &self.items
    }

    /// `child` is drawn last
    pub fn is_top(&self, child: NodeId) -> bool {
        self.items.last() == Some(&child)
    }

    /// `child` is drawn first
    pub fn is_bottom(&self, child: NodeId) -> bool {
        self.items.first() == Some(&child)
    }

    pub(crate) fn push(&mut self, child: NodeId) {
        debug_assert!(!self.contains(child), "child {child:?} attached twice");
        self.items.push(child);
    }

    pub(crate) fn remove(&mut self, child: NodeId) -> bool {
        match self.index_of(child) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn move_to_top(&mut self, child: NodeId) -> bool {
        if !self.remove(child) {
            return false;
        }
        self.items.push(child);
        true
    }

    pub(crate) fn move_to_bottom(&mut self, child: NodeId) -> bool {
        if !self.remove(child) {
            return false;
        }
        self.items.insert(0, child);
        true
    }
}
