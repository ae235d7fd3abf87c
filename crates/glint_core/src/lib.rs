//! Glint Core - scene model, scene loading, configuration and the output
//! texture contract for the glint CPU ray tracer.
//!
//! This crate provides:
//!
//! - **Scene model**: `Scene`, `Primitive`, `Shape`, `Material`, `Light`, `Mesh`
//! - **Scene loading**: JSON scene descriptions with OBJ mesh import
//! - **Configuration**: JSON viewer/tracer settings
//! - **Textures**: `TextureTarget` consumer contract and an `image`-backed implementation
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_scene;
//!
//! let scene = load_scene("scene.json")?;
//! println!("Loaded {} primitives, {} lights", scene.primitives.len(), scene.lights.len());
//! ```

pub mod config;
pub mod loader;
pub mod mesh;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use config::{CameraConfig, ConfigError, ShadingConfig, TerminalColor, ViewerConfig};
pub use loader::{load_scene, load_scene_from_str, LoadError};
pub use mesh::Mesh;
pub use scene::{AaBox, Color, Light, Material, MaterialKind, Plane, Primitive, Scene, Shape, Sphere};
pub use texture::{
    ImageTextures, TextureError, TextureHandle, TextureResult, TextureSource, TextureTarget,
};
