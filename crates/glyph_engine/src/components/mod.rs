//! Component system
//!
//! Components extend screen objects with behavior. Each node owns a
//! [`ComponentRegistry`] that files components into per-capability views so
//! the frame passes only visit the components that asked for them.

pub mod component;
pub mod registry;

pub use component::{AsAny, Capabilities, Component, NodeContext};
pub use registry::{CollectionChange, ComponentError, ComponentRegistry};
