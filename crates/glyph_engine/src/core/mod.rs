//! # Core Engine Module
//!
//! Shared abstractions used by every subsystem.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for the scene and the host application

pub mod config;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    SceneConfig,
    PositioningMode,
    Config,
    ConfigError,
};
