//! Change notification for screen objects
//!
//! Key principles:
//! - Typed payloads: every value-carrying event reports the old and new value
//! - Registration system: handlers subscribe to one event type and only see that type
//! - Synchronous delivery: handlers run inline, in registration order, during
//!   the mutating call
//!
//! A handler receives a shared borrow of the sender, never the scene, so it
//! can read the sender's already-updated derived state (absolute position,
//! parent) but cannot re-enter a mutator while the scene is half-way through
//! a change. Handlers that need to react with further mutations should
//! record what they saw and apply it after the call returns.

use crate::foundation::collections::{NodeId, SlotMap, SubscriptionId};
use crate::foundation::math::Point;
use crate::scene::ScreenObject;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// The node's parent changed
    ParentChanged,
    /// The node's local position changed
    PositionChanged,
    /// The node's visibility flag changed
    VisibleChanged,
    /// The node's enabled flag changed
    EnabledChanged,
}

/// Old/new value pair carried by change events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueChange<T> {
    /// Value before the change
    pub old: T,
    /// Value after the change
    pub new: T,
}

impl<T> ValueChange<T> {
    /// Create a new value change
    pub const fn new(old: T, new: T) -> Self {
        Self { old, new }
    }
}

/// Property change raised by a screen object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenObjectEvent {
    /// Parent handle changed; `None` means detached
    ParentChanged(ValueChange<Option<NodeId>>),
    /// Local position changed
    PositionChanged(ValueChange<Point>),
    /// Visibility toggled
    VisibleChanged,
    /// Enabled flag toggled
    EnabledChanged,
}

impl ScreenObjectEvent {
    /// The type tag handlers subscribe with
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::ParentChanged(_) => EventType::ParentChanged,
            Self::PositionChanged(_) => EventType::PositionChanged,
            Self::VisibleChanged => EventType::VisibleChanged,
            Self::EnabledChanged => EventType::EnabledChanged,
        }
    }
}

/// Event handler trait
///
/// Implemented for every `FnMut(&ScreenObject, &ScreenObjectEvent)` closure,
/// so a plain closure is usually all a caller needs.
pub trait EventHandler {
    /// Handle an event raised by `sender`
    fn on_event(&mut self, sender: &ScreenObject, event: &ScreenObjectEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&ScreenObject, &ScreenObjectEvent),
{
    fn on_event(&mut self, sender: &ScreenObject, event: &ScreenObjectEvent) {
        self(sender, event);
    }
}

struct Registration {
    event_type: EventType,
    handler: Box<dyn EventHandler>,
}

/// Per-object list of subscribed handlers
pub struct EventSystem {
    handlers: SlotMap<SubscriptionId, Registration>,
    // Slot order is not registration order once slots get reused
    order: Vec<SubscriptionId>,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            handlers: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Register a handler for a specific event type
    pub fn subscribe(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) -> SubscriptionId {
        let id = self.handlers.insert(Registration { event_type, handler });
        self.order.push(id);
        id
    }

    /// Remove a handler; returns `false` if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if self.handlers.remove(id).is_none() {
            return false;
        }
        self.order.retain(|existing| *existing != id);
        true
    }

    /// Number of handlers registered for `event_type`
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.handlers
            .values()
            .filter(|registration| registration.event_type == event_type)
            .count()
    }

    /// Deliver an event to every handler registered for its type, in registration order
    pub fn dispatch(&mut self, sender: &ScreenObject, event: &ScreenObjectEvent) {
        let event_type = event.event_type();
        for id in &self.order {
            if let Some(registration) = self.handlers.get_mut(*id) {
                if registration.event_type == event_type {
                    registration.handler.on_event(sender, event);
                }
            }
        }
    }

    /// Drop every handler
    pub fn clear(&mut self) {
        self.handlers.clear();
        self.order.clear();
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSystem")
            .field("handlers", &self.order.len())
            .finish()
    }
}
