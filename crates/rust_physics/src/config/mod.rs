//! Configuration system
//!
//! [`Config`] loads and saves any serde type as TOML or RON, picked by file
//! extension. [`PhysicsConfig`] holds the kernel's tunable numeric policies.

use crate::foundation::math::Vec2;
pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Default separation below which gravity is not applied
pub const DEFAULT_MIN_GRAVITY_DISTANCE: f64 = 1e-6;

/// Axis-aligned world rectangle used for culling bodies that leave the play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl WorldBounds {
    /// Create bounds from two corners
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Whether `point` lies inside (edges inclusive)
    pub fn contains(&self, point: &Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Numeric policies of the simulation kernel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Centroid separation below which newtonian gravity is skipped
    pub min_gravity_distance: f64,

    /// Bodies whose kind is culled are removed once their centroid leaves these bounds
    pub world_bounds: Option<WorldBounds>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            min_gravity_distance: DEFAULT_MIN_GRAVITY_DISTANCE,
            world_bounds: None,
        }
    }
}

impl Config for PhysicsConfig {}
