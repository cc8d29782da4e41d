//! Tunable parameters, loadable from YAML

use crate::error::VelocityResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Parameters shared by the per-cell pipeline and the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityConfig {
    /// Time step applied to velocity when building duplicate states
    pub blend_factor: f64,
    /// Angle (degrees) separating forward from backward votes
    pub right_angle_degrees: f64,
    /// Vectors shorter than this are too degenerate for the angle test
    pub degenerate_tolerance: f64,
    /// Default log level for the CLI (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            blend_factor: 0.5,
            right_angle_degrees: 90.0,
            degenerate_tolerance: 1e-12,
            log_level: "info".to_string(),
        }
    }
}

impl VelocityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blend_factor(mut self, blend_factor: f64) -> Self {
        self.blend_factor = blend_factor;
        self
    }

    pub fn with_right_angle_degrees(mut self, degrees: f64) -> Self {
        self.right_angle_degrees = degrees;
        self
    }

    pub fn with_degenerate_tolerance(mut self, tolerance: f64) -> Self {
        self.degenerate_tolerance = tolerance;
        self
    }

    /// Parse a config from YAML; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> VelocityResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a config file
    pub fn from_path(path: &Path) -> VelocityResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Resolve the config: explicit path, then the user config file, then defaults
    pub fn load(path: Option<&Path>) -> VelocityResult<Self> {
        if let Some(path) = path {
            return Self::from_path(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading user config");
                Self::from_path(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `~/.config/veltree/config.yaml` on Linux; platform equivalent elsewhere
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("veltree").join("config.yaml"))
}
