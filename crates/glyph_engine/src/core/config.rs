//! # Unified Configuration System
//!
//! Configuration for the scene graph and for applications hosting it.
//!
//! ## Design Goals
//!
//! - **Serializable**: TOML and RON through the [`Config`] trait
//! - **Type Safe**: Strong typing with validation and defaults

use serde::{Serialize, Deserialize};

use crate::foundation::math::CellSize;

pub use crate::config::{Config, ConfigError};

/// How a node's local position maps to its absolute position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositioningMode {
    /// Positions are cell coordinates; absolute = local + parent absolute
    #[default]
    Cells,
    /// Positions are multiplied by the cell size before the parent offset is added
    Pixels,
}

/// # Scene Configuration
///
/// Controls how absolute positions are derived and which defaults new
/// screen objects start with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Positioning mode used by the absolute position provider
    pub positioning: PositioningMode,
    /// Font cell size in pixels, used by [`PositioningMode::Pixels`]
    pub cell_size: CellSize,
    /// Whether new nodes start visible
    pub default_visible: bool,
    /// Whether new nodes start enabled
    pub default_enabled: bool,
}

impl SceneConfig {
    /// Create a new scene configuration
    pub fn new() -> Self {
        Self {
            positioning: PositioningMode::Cells,
            cell_size: CellSize::default(),
            default_visible: true,
            default_enabled: true,
        }
    }

    /// Use pixel positioning with the given cell size
    pub fn with_pixel_positioning(mut self, cell_size: CellSize) -> Self {
        self.positioning = PositioningMode::Pixels;
        self.cell_size = cell_size;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size.width <= 0 || self.cell_size.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "cell size must be positive, got {}x{}",
                self.cell_size.width, self.cell_size.height
            )));
        }
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for SceneConfig {}

/// # Complete Application Configuration
///
/// Top-level configuration for a program hosting a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// `env_logger` filter string, e.g. `"info,glyph_engine=debug"`
    pub log_filter: String,
    /// Number of frames the host runs before exiting (0 = until told to stop)
    pub frame_limit: u64,
    /// Scene configuration
    pub scene: SceneConfig,
}

impl ApplicationConfig {
    /// Create a new application configuration with defaults
    pub fn new() -> Self {
        Self {
            log_filter: "info".to_string(),
            frame_limit: 0,
            scene: SceneConfig::default(),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scene.validate()
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_toml_uses_defaults() {
        let config = ApplicationConfig::from_toml_str(
            r#"
            log_filter = "debug"

            [scene]
            positioning = "pixels"
            cell_size = { width = 10, height = 20 }
            "#,
        )
        .unwrap();

        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.frame_limit, 0);
        assert_eq!(config.scene.positioning, PositioningMode::Pixels);
        assert_eq!(config.scene.cell_size, CellSize::new(10, 20));
        assert!(config.scene.default_visible);
    }

    #[test]
    fn test_parse_ron() {
        let config = SceneConfig::from_ron_str("(positioning: cells, default_enabled: false)").unwrap();
        assert_eq!(config.positioning, PositioningMode::Cells);
        assert!(!config.default_enabled);
    }

    #[test]
    fn test_zero_cell_size_is_invalid() {
        let mut config = SceneConfig::default();
        config.cell_size = CellSize::new(0, 16);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join(format!("glyph_engine_config_{}.toml", std::process::id()));
        let config = ApplicationConfig {
            frame_limit: 3,
            ..ApplicationConfig::default()
        };

        config.save_to_file(&path).unwrap();
        let loaded = ApplicationConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
