//! Scene model consumed by the tracer.
//!
//! A scene is a flat, ordered list of primitives plus point lights and a
//! background colour. It carries no behaviour beyond storage; the tracer
//! borrows an immutable snapshot of it for the duration of one trace.

use std::sync::Arc;

use glint_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;

/// Linear RGB colour, each channel nominally in [0, 1].
pub type Color = Vec3;

/// Refractive index used for perfect mirrors. Small enough that every ray
/// hitting the surface is past the critical angle, so it always reflects.
pub const MIRROR_REFRACTIVE_INDEX: f32 = 0.001;

/// How a surface responds to light.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Lit additively by every unoccluded light
    Diffuse,
    /// Splits into Fresnel-weighted reflection and refraction rays
    ReflectRefract,
}

/// Material descriptor carried by every primitive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub kind: MaterialKind,
    #[serde(default = "default_refractive_index")]
    pub refractive_index: f32,
}

fn default_refractive_index() -> f32 {
    1.0
}

impl Material {
    pub fn diffuse() -> Self {
        Self {
            kind: MaterialKind::Diffuse,
            refractive_index: 1.0,
        }
    }

    /// A dielectric with the given index of refraction (1.5 = glass).
    pub fn reflect_refract(refractive_index: f32) -> Self {
        Self {
            kind: MaterialKind::ReflectRefract,
            refractive_index,
        }
    }

    pub fn mirror() -> Self {
        Self::reflect_refract(MIRROR_REFRACTIVE_INDEX)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::diffuse()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

/// Infinite plane through `point`. `normal` is expected to be unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

/// Axis-aligned box given by its two extreme corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AaBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl AaBox {
    /// Build a box from any two opposite corners.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

/// Geometric shape of a primitive.
#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Box(AaBox),
    Mesh(Arc<Mesh>),
}

/// A shape with its material.
#[derive(Clone, Debug)]
pub struct Primitive {
    pub shape: Shape,
    pub material: Material,
}

/// Point light. No attenuation with distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
}

/// A complete scene: primitives, lights and the sky colour returned by
/// rays that hit nothing.
///
/// Cloning is cheap enough to snapshot before every trace; mesh geometry
/// is shared behind `Arc`.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
    pub lights: Vec<Light>,
    pub sky_color: Color,
}

impl Scene {
    /// Create an empty scene with the given sky colour.
    pub fn new(sky_color: Color) -> Self {
        Self {
            sky_color,
            ..Default::default()
        }
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: Material) {
        self.primitives.push(Primitive {
            shape: Shape::Sphere(Sphere { center, radius }),
            material,
        });
    }

    /// Add a plane. The normal is normalized here so intersection code can
    /// rely on it.
    pub fn add_plane(&mut self, normal: Vec3, point: Vec3, material: Material) {
        self.primitives.push(Primitive {
            shape: Shape::Plane(Plane {
                normal: normal.normalize_or_zero(),
                point,
            }),
            material,
        });
    }

    pub fn add_box(&mut self, a: Vec3, b: Vec3, material: Material) {
        self.primitives.push(Primitive {
            shape: Shape::Box(AaBox::from_corners(a, b)),
            material,
        });
    }

    pub fn add_mesh(&mut self, mesh: Arc<Mesh>, material: Material) {
        self.primitives.push(Primitive {
            shape: Shape::Mesh(mesh),
            material,
        });
    }

    pub fn add_light(&mut self, position: Vec3, color: Color) {
        self.lights.push(Light { position, color });
    }

    pub fn sphere_count(&self) -> usize {
        self.count_shapes(|shape| matches!(shape, Shape::Sphere(_)))
    }

    pub fn plane_count(&self) -> usize {
        self.count_shapes(|shape| matches!(shape, Shape::Plane(_)))
    }

    pub fn box_count(&self) -> usize {
        self.count_shapes(|shape| matches!(shape, Shape::Box(_)))
    }

    pub fn mesh_count(&self) -> usize {
        self.count_shapes(|shape| matches!(shape, Shape::Mesh(_)))
    }

    /// Get total triangle count across all meshes.
    pub fn total_triangle_count(&self) -> usize {
        self.primitives
            .iter()
            .map(|p| match &p.shape {
                Shape::Mesh(mesh) => mesh.triangle_count(),
                _ => 0,
            })
            .sum()
    }

    fn count_shapes(&self, predicate: impl Fn(&Shape) -> bool) -> usize {
        self.primitives.iter().filter(|p| predicate(&p.shape)).count()
    }
}
