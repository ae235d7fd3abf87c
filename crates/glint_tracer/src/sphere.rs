//! Ray-sphere intersection.

use glint_core::Sphere;
use glint_math::Ray;

use crate::hittable::SurfaceHit;

/// Analytic ray-sphere intersection.
///
/// Returns the nearer root, or the farther one when the ray starts inside the
/// sphere. Hits behind the ray origin are rejected.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> Option<SurfaceHit> {
    let a = ray.direction.length_squared();
    if a < f32::EPSILON || sphere.radius <= 0.0 {
        return None;
    }

    let oc = ray.origin - sphere.center;
    let half_b = oc.dot(ray.direction);
    let c = oc.length_squared() - sphere.radius * sphere.radius;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    let mut t = (-half_b - sqrtd) / a;
    if t < 0.0 {
        t = (-half_b + sqrtd) / a;
        if t < 0.0 {
            return None;
        }
    }
    if !t.is_finite() {
        return None;
    }

    let normal = (ray.at(t) - sphere.center).normalize_or_zero();
    if normal == glint_math::Vec3::ZERO {
        return None;
    }
    Some(SurfaceHit { distance: t, normal })
}
