//! Closest-hit and occlusion queries over a whole scene.

use glint_core::{Material, Primitive, Scene, Shape};
use glint_math::{Ray, Vec3};

use crate::aabox::intersect_box;
use crate::plane::intersect_plane;
use crate::sphere::intersect_sphere;
use crate::triangle::intersect_mesh;

/// Result of intersecting a ray with a single shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Ray parameter of the intersection
    pub distance: f32,
    /// Unit-length outward surface normal
    pub normal: Vec3,
}

/// Closest intersection of a ray with a scene.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub distance: f32,
    /// World-space point of intersection
    pub point: Vec3,
    /// Outward normal of the surface that was hit
    pub normal: Vec3,
    pub material: Material,
}

/// Intersect a ray with one primitive's shape.
pub fn intersect_primitive(ray: &Ray, primitive: &Primitive) -> Option<SurfaceHit> {
    match &primitive.shape {
        Shape::Sphere(sphere) => intersect_sphere(ray, sphere),
        Shape::Plane(plane) => intersect_plane(ray, plane),
        Shape::Box(aabox) => intersect_box(ray, aabox),
        Shape::Mesh(mesh) => intersect_mesh(ray, mesh),
    }
}

/// Find the nearest positive-distance hit among all primitives.
///
/// Primitives are visited in scene order and only a strictly closer hit
/// replaces the current one, so the earlier primitive wins a tie.
pub fn closest_hit(ray: &Ray, scene: &Scene) -> Option<Hit> {
    let mut closest: Option<(SurfaceHit, Material)> = None;

    for primitive in &scene.primitives {
        let Some(hit) = intersect_primitive(ray, primitive) else {
            continue;
        };
        if hit.distance <= 0.0 {
            continue;
        }
        if closest.map_or(true, |(c, _)| hit.distance < c.distance) {
            closest = Some((hit, primitive.material));
        }
    }

    closest.map(|(hit, material)| Hit {
        distance: hit.distance,
        point: ray.at(hit.distance),
        normal: hit.normal,
        material,
    })
}

/// True when anything blocks the ray before `max_distance`.
pub fn occluded(ray: &Ray, scene: &Scene, max_distance: f32) -> bool {
    scene.primitives.iter().any(|primitive| {
        intersect_primitive(ray, primitive)
            .is_some_and(|hit| hit.distance > 0.0 && hit.distance < max_distance)
    })
}
