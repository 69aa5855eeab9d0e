//! # Glyph Engine
//!
//! Scene graph core for character-cell surfaces and controls.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-owned screen objects with parent/child links
//!   and absolute positions kept in step with every move
//! - **Components**: Behavior attached to nodes, filtered into sorted
//!   update, draw, mouse and keyboard views
//! - **Change Events**: Synchronous, typed notifications for parent,
//!   position, visibility and enabled changes
//! - **Input Dispatch**: Keyboard to the focused node, mouse to the top-most
//!   visible node that handles it
//! - **Cells**: Glyph cells with saved state and lossless persisted records
//!
//! ## Quick Start
//!
//! ```rust
//! use glyph_engine::prelude::*;
//!
//! let mut scene = Scene::new();
//! let window = scene.create_node_at(Point::new(10, 5));
//! let label = scene.create_node_at(Point::new(2, 1));
//!
//! scene.add_child(window, label)?;
//! assert_eq!(scene.absolute_position(label)?, Point::new(12, 6));
//!
//! scene.set_position(window, Point::new(0, 0))?;
//! assert_eq!(scene.absolute_position(label)?, Point::new(2, 1));
//! # Ok::<(), SceneError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod events;
pub mod input;
pub mod components;
pub mod scene;
pub mod cell;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        cell::{Cell, CellDecorator, CellSerialized, Color, Mirror},
        components::{Capabilities, Component, ComponentError, ComponentRegistry, NodeContext},
        core::config::{ApplicationConfig, Config, PositioningMode, SceneConfig},
        events::{EventType, ScreenObjectEvent, ValueChange},
        foundation::{
            collections::{ComponentId, NodeId, SubscriptionId},
            math::{CellSize, Point, Rect},
            time::Timer,
        },
        input::{KeyCode, Keyboard, MouseButton, MouseState},
        scene::{Scene, SceneError, ScreenObject},
    };
}
