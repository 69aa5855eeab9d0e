//! Component trait and capability flags
//!
//! A component is a unit of behavior attached to one screen object. Which
//! frame passes it takes part in is declared through [`Capabilities`]; the
//! owning registry files it into the matching dispatch views when it is
//! added.

use std::any::Any;

use bitflags::bitflags;

use crate::foundation::collections::NodeId;
use crate::foundation::math::Point;
use crate::input::{Keyboard, MouseState};

bitflags! {
    /// Frame passes a component participates in
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Runs during the update pass
        const UPDATE = 1 << 0;
        /// Runs during the draw pass
        const DRAW = 1 << 1;
        /// Receives mouse input
        const MOUSE = 1 << 2;
        /// Receives keyboard input
        const KEYBOARD = 1 << 3;
    }
}

/// Snapshot of the owning screen object handed to component callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeContext {
    /// The owning node
    pub id: NodeId,
    /// Local position
    pub position: Point,
    /// Derived absolute position
    pub absolute_position: Point,
    /// Visibility flag
    pub is_visible: bool,
    /// Enabled flag
    pub is_enabled: bool,
}

/// Upcast helper so `dyn Component` can be downcast to its concrete type
///
/// Blanket-implemented for every `'static` type; components never implement
/// it by hand.
pub trait AsAny: Any {
    /// `self` as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// `self` as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior attached to a screen object
///
/// Components are moved into a registry, so one instance belongs to exactly
/// one node at a time. Every callback has a no-op default; implement the
/// ones matching the declared [`Capabilities`].
pub trait Component: AsAny {
    /// Passes this component participates in
    ///
    /// Read once, when the component is added. Changing the answer later
    /// has no effect until the component is removed and added again.
    fn capabilities(&self) -> Capabilities;

    /// Dispatch priority within each view; lower runs first
    ///
    /// Read every time the views are re-sorted.
    fn sort_order(&self) -> i32 {
        0
    }

    /// Called after the component has been filed into its owner's views
    fn on_added(&mut self, _owner: NodeId) {}

    /// Called after the component has been taken out of its owner's views
    fn on_removed(&mut self, _owner: NodeId) {}

    /// Update pass
    fn update(&mut self, _host: &NodeContext, _delta_time: f32) {}

    /// Draw pass
    fn draw(&mut self, _host: &NodeContext, _delta_time: f32) {}

    /// Mouse input; return `true` when handled to stop further dispatch
    fn process_mouse(&mut self, _host: &NodeContext, _mouse: &MouseState) -> bool {
        false
    }

    /// Keyboard input; return `true` when handled to stop further dispatch
    fn process_keyboard(&mut self, _host: &NodeContext, _keyboard: &Keyboard) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blink {
        visible_frames: u32,
    }

    impl Component for Blink {
        fn capabilities(&self) -> Capabilities {
            Capabilities::UPDATE | Capabilities::DRAW
        }
    }

    #[test]
    fn test_downcast_through_trait_object() {
        let boxed: Box<dyn Component> = Box::new(Blink { visible_frames: 3 });

        let blink = boxed.as_ref().as_any().downcast_ref::<Blink>();
        assert_eq!(blink.map(|b| b.visible_frames), Some(3));
        assert!(boxed.as_ref().as_any().downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_default_sort_order_and_flags() {
        let blink = Blink { visible_frames: 0 };
        assert_eq!(blink.sort_order(), 0);
        assert!(blink.capabilities().contains(Capabilities::DRAW));
        assert!(!blink.capabilities().intersects(Capabilities::MOUSE | Capabilities::KEYBOARD));
    }
}
