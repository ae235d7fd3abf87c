//! Ray intersection with axis-aligned boxes.

use glint_core::AaBox;
use glint_math::{Ray, Vec3};

use crate::hittable::SurfaceHit;

/// Slab-method intersection returning the face normal.
///
/// When the ray starts inside the box the exit face is reported.
pub fn intersect_box(ray: &Ray, aabox: &AaBox) -> Option<SurfaceHit> {
    if ray.direction.length_squared() < f32::EPSILON {
        return None;
    }

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut near_axis = 0;
    let mut far_axis = 0;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];

        if direction.abs() < 1e-8 {
            // Parallel to this slab: must already be between its planes
            if origin < aabox.min[axis] || origin > aabox.max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction;
        let mut t0 = (aabox.min[axis] - origin) * inv;
        let mut t1 = (aabox.max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_near {
            t_near = t0;
            near_axis = axis;
        }
        if t1 < t_far {
            t_far = t1;
            far_axis = axis;
        }
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }

    let (distance, axis, exiting) = if t_near >= 0.0 {
        (t_near, near_axis, false)
    } else {
        (t_far, far_axis, true)
    };

    let sign = ray.direction[axis].signum();
    let mut normal = Vec3::ZERO;
    normal[axis] = if exiting { sign } else { -sign };

    Some(SurfaceHit { distance, normal })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> AaBox {
        AaBox::from_corners(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_box_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = intersect_box(&ray, &unit_box()).unwrap();

        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_box_side_face() {
        let ray = Ray::new(Vec3::new(-3.0, 0.5, 0.0), Vec3::X);
        let hit = intersect_box(&ray, &unit_box()).unwrap();

        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::NEG_X);
    }

    #[test]
    fn test_box_from_inside_reports_exit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let hit = intersect_box(&ray, &unit_box()).unwrap();

        assert!((hit.distance - 1.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_box_miss() {
        let beside = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(intersect_box(&beside, &unit_box()).is_none());

        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(intersect_box(&behind, &unit_box()).is_none());

        let zero = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(intersect_box(&zero, &unit_box()).is_none());
    }
}
