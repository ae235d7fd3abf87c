//! Declarative scene loading.
//!
//! Scenes are authored as JSON and turned into a [`Scene`] value the tracer
//! can snapshot. The description mirrors the scene model closely:
//!
//! ```json
//! {
//!   "sky_color": [0.2, 0.3, 0.4],
//!   "spheres": [{ "center": [0, 20, 0], "radius": 20, "reflective": true }],
//!   "planes": [{ "normal": [0, 1, 0], "point": [0, 0, 0] }],
//!   "boxes": [{ "min": [-10, 0, 40], "max": [10, 20, 60] }],
//!   "meshes": [{ "obj": "teapot.obj", "scale": 10, "translate": [40, 0, 0] }],
//!   "lights": [{ "position": [0, 200, -100], "color": [0.8, 0.8, 0.8] }]
//! }
//! ```
//!
//! Every primitive takes either a full `material` object or the
//! `reflective` shorthand (a perfect mirror). OBJ paths are resolved
//! relative to the scene file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glint_math::{Mat4, Vec3};
use serde::Deserialize;
use thiserror::Error;

use crate::mesh::Mesh;
use crate::scene::{Color, Light, Material, Scene};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene description error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("Mesh has no triangles: {0}")]
    EmptyMesh(String),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneDescription {
    #[serde(default)]
    sky_color: Color,
    #[serde(default)]
    spheres: Vec<SphereDescription>,
    #[serde(default)]
    planes: Vec<PlaneDescription>,
    #[serde(default)]
    boxes: Vec<BoxDescription>,
    #[serde(default)]
    meshes: Vec<MeshDescription>,
    #[serde(default)]
    lights: Vec<Light>,
}

/// Material fields shared by every primitive description.
#[derive(Debug, Default, Deserialize)]
struct Surface {
    #[serde(default)]
    material: Option<Material>,
    #[serde(default)]
    reflective: bool,
}

impl Surface {
    fn material(&self) -> Material {
        match self.material {
            Some(material) => material,
            None if self.reflective => Material::mirror(),
            None => Material::diffuse(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SphereDescription {
    center: Vec3,
    radius: f32,
    #[serde(flatten)]
    surface: Surface,
}

#[derive(Debug, Deserialize)]
struct PlaneDescription {
    normal: Vec3,
    point: Vec3,
    #[serde(flatten)]
    surface: Surface,
}

#[derive(Debug, Deserialize)]
struct BoxDescription {
    min: Vec3,
    max: Vec3,
    #[serde(flatten)]
    surface: Surface,
}

#[derive(Debug, Deserialize)]
struct MeshDescription {
    #[serde(default)]
    obj: Option<PathBuf>,
    #[serde(default)]
    triangles: Vec<[Vec3; 3]>,
    #[serde(default)]
    translate: Vec3,
    #[serde(default = "default_scale")]
    scale: f32,
    #[serde(flatten)]
    surface: Surface,
}

fn default_scale() -> f32 {
    1.0
}

impl MeshDescription {
    fn build(&self, base_dir: &Path) -> LoadResult<Mesh> {
        let mesh = match &self.obj {
            Some(obj) => Mesh::load_obj(base_dir.join(obj))?,
            None if self.triangles.is_empty() => {
                return Err(LoadError::EmptyMesh("inline mesh".to_string()))
            }
            None => Mesh::from_triangles(self.triangles.clone()),
        };

        if self.translate == Vec3::ZERO && self.scale == 1.0 {
            return Ok(mesh);
        }
        let matrix =
            Mat4::from_translation(self.translate) * Mat4::from_scale(Vec3::splat(self.scale));
        Ok(mesh.transformed(matrix))
    }
}

/// Load a scene description from a JSON file.
pub fn load_scene(path: impl AsRef<Path>) -> LoadResult<Scene> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let scene = load_scene_from_str(&text, base_dir)?;

    log::info!(
        "Loaded scene {}: {} spheres, {} planes, {} boxes, {} meshes ({} triangles), {} lights",
        path.display(),
        scene.sphere_count(),
        scene.plane_count(),
        scene.box_count(),
        scene.mesh_count(),
        scene.total_triangle_count(),
        scene.lights.len()
    );
    Ok(scene)
}

/// Parse a scene description. Relative OBJ paths resolve against `base_dir`.
pub fn load_scene_from_str(text: &str, base_dir: &Path) -> LoadResult<Scene> {
    let description: SceneDescription = serde_json::from_str(text)?;
    let mut scene = Scene::new(description.sky_color);

    for s in &description.spheres {
        scene.add_sphere(s.center, s.radius, s.surface.material());
    }
    for p in &description.planes {
        scene.add_plane(p.normal, p.point, p.surface.material());
    }
    for b in &description.boxes {
        scene.add_box(b.min, b.max, b.surface.material());
    }
    for m in &description.meshes {
        scene.add_mesh(Arc::new(m.build(base_dir)?), m.surface.material());
    }
    scene.lights = description.lights;

    Ok(scene)
}
