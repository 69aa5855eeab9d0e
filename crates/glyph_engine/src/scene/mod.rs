//! Scene graph
//!
//! A scene is an arena of [`ScreenObject`]s linked into trees. Each node has
//! a local position, an absolute position composed through its parent chain,
//! visibility and enabled flags, an ordered list of children, a component
//! registry and an event list.
//!
//! ## Architecture
//!
//! ```text
//! Scene (owns every node)
//!   ├── ScreenObject ── children ──> ScreenObject ...
//!   │     ├── ComponentRegistry (update / draw / mouse / keyboard / empty views)
//!   │     └── EventSystem (ParentChanged, PositionChanged, ...)
//!   └── AbsolutePositionProvider (cells or pixels)
//! ```
//!
//! Structural changes go through [`Scene`]:
//! - Reparenting keeps both sides of the parent/child relation in step
//! - Absolute positions of a moved subtree are refreshed before any event fires
//! - Cycles are rejected before anything is touched

mod children;
mod position;
mod scene_graph;
mod screen_object;


pub use children::ScreenObjectCollection;
pub use position::{provider_for, AbsolutePositionProvider, CellPositioning, PixelPositioning};
pub use scene_graph::{Scene, SceneError};
pub use screen_object::ScreenObject;
