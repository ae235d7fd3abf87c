//! Glint math - glam re-exports plus the small geometric types shared by
//! the scene model and the tracer.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod camera;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use camera::Camera;
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
    }
}
