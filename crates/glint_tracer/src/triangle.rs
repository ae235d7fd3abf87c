//! Ray-triangle and ray-mesh intersection.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use glint_core::Mesh;
use glint_math::{Interval, Ray, Vec3};

use crate::hittable::SurfaceHit;

/// Determinant threshold below which the ray is parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-7;

/// Added to every triangle hit distance to keep secondary rays off the surface.
const DISTANCE_BIAS: f32 = 1e-3;

/// Möller-Trumbore ray-triangle intersection.
///
/// The normal follows the winding: `normalize((v1 - v0) x (v2 - v0))`.
pub fn intersect_triangle(ray: &Ray, triangle: &[Vec3; 3]) -> Option<SurfaceHit> {
    let [v0, v1, v2] = *triangle;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t <= PARALLEL_EPSILON || !t.is_finite() {
        return None;
    }

    let normal = edge1.cross(edge2).normalize_or_zero();
    if normal == Vec3::ZERO {
        return None;
    }
    Some(SurfaceHit {
        distance: t + DISTANCE_BIAS,
        normal,
    })
}

/// Closest triangle of a mesh, after a bounding-box early-out.
pub fn intersect_mesh(ray: &Ray, mesh: &Mesh) -> Option<SurfaceHit> {
    if !mesh.bounds.hit(ray, Interval::POSITIVE) {
        return None;
    }

    let mut closest: Option<SurfaceHit> = None;
    for triangle in mesh.triangles() {
        if let Some(hit) = intersect_triangle(ray, triangle) {
            if closest.map_or(true, |c| hit.distance < c.distance) {
                closest = Some(hit);
            }
        }
    }
    closest
}
