//! Tracer and viewer configuration.
//!
//! Configuration is read from a JSON file. Every field is optional and falls
//! back to the defaults below, so `{}` is a valid configuration.

use std::path::{Path, PathBuf};

use glint_math::{Camera, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Colour returned by a ray once the recursion limit is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalColor {
    /// The scene's sky colour
    #[default]
    Sky,
    /// No energy
    Black,
}

/// Settings for the recursive shading engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Maximum ray recursion depth; rays at this depth return `terminal_color`
    pub max_recursion: u32,
    pub terminal_color: TerminalColor,
    /// Fraction of a light that still reaches a shadowed point (0 = hard shadow)
    pub shadow_factor: f32,
    /// Phong exponent for specular highlights on diffuse surfaces, none when unset
    pub shininess: Option<f32>,
    /// Offset along the normal applied to secondary ray origins
    pub bias: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            max_recursion: 6,
            terminal_color: TerminalColor::Sky,
            shadow_factor: 0.0,
            shininess: None,
            bias: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 50.0, -200.0),
            target: Vec3::new(0.0, 50.0, 0.0),
            up: Vec3::Y,
            fov_degrees: 51.52,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        Camera::new(self.position, self.target)
            .with_up(self.up)
            .with_fov_degrees(self.fov_degrees)
    }
}

/// Top-level configuration for the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    /// Number of row strips (and pool jobs) per trace
    pub job_count: u32,
    /// Worker thread count, rayon's default when unset
    pub worker_threads: Option<usize>,
    pub shading: ShadingConfig,
    pub camera: CameraConfig,
    /// Where completed images are written
    pub output: PathBuf,
    /// Poll cadence of the frame loop in milliseconds
    pub frame_interval_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            job_count: 64,
            worker_threads: None,
            shading: ShadingConfig::default(),
            camera: CameraConfig::default(),
            output: PathBuf::from("glint.png"),
            frame_interval_ms: 16,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
