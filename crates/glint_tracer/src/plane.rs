//! Ray-plane intersection.

use glint_core::Plane;
use glint_math::Ray;

use crate::hittable::SurfaceHit;

/// Rays this close to parallel with the plane never hit it.
const PARALLEL_EPSILON: f32 = 1e-4;

/// Hits farther away than this are ignored, so an infinite ground plane
/// gives way to the sky near the horizon.
pub const MAX_PLANE_DISTANCE: f32 = 10_000.0;

pub fn intersect_plane(ray: &Ray, plane: &Plane) -> Option<SurfaceHit> {
    let denom = plane.normal.dot(ray.direction);
    if denom.abs() <= PARALLEL_EPSILON {
        return None;
    }

    let t = (plane.point - ray.origin).dot(plane.normal) / denom;
    if (0.0..MAX_PLANE_DISTANCE).contains(&t) {
        Some(SurfaceHit {
            distance: t,
            normal: plane.normal,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::Vec3;

    fn ground() -> Plane {
        Plane {
            normal: Vec3::Y,
            point: Vec3::new(0.0, -2.0, 0.0),
        }
    }

    #[test]
    fn test_plane_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);
        let hit = intersect_plane(&ray, &ground()).unwrap();

        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_plane_hit_from_below_keeps_outward_normal() {
        let ray = Ray::new(Vec3::new(0.0, -5.0, 0.0), Vec3::Y);
        let hit = intersect_plane(&ray, &ground()).unwrap();

        assert!((hit.distance - 3.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(intersect_plane(&ray, &ground()).is_none());

        let nearly = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.00001, 0.0).normalize());
        assert!(intersect_plane(&nearly, &ground()).is_none());
    }

    #[test]
    fn test_plane_behind_and_far() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(intersect_plane(&ray, &ground()).is_none());

        let far = Ray::new(Vec3::new(0.0, 20_000.0, 0.0), Vec3::NEG_Y);
        assert!(intersect_plane(&far, &ground()).is_none());
    }
}
