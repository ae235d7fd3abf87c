//! Pinhole projection from pixel coordinates to world-space primary rays.

use glint_math::{Camera, Mat4, Ray, Vec3};

/// Everything needed to build primary rays for one image.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    camera_to_world: Mat4,
    /// `tan(fov_y / 2)`
    scale: f32,
    aspect: f32,
    width: u32,
    height: u32,
}

impl Projection {
    pub fn new(camera_to_world: Mat4, fov_y: f32, width: u32, height: u32) -> Self {
        Self {
            camera_to_world,
            scale: (fov_y * 0.5).tan(),
            aspect: width as f32 / height.max(1) as f32,
            width,
            height,
        }
    }

    pub fn from_camera(camera: &Camera, width: u32, height: u32) -> Self {
        Self::new(camera.camera_to_world(), camera.fov_y, width, height)
    }

    /// Primary ray through the centre of pixel `(x, y)`. Row 0 is the top.
    pub fn primary_ray(&self, x: u32, y: u32) -> Ray {
        let ndc_x = (x as f32 + 0.5) / self.width as f32;
        let ndc_y = (y as f32 + 0.5) / self.height as f32;

        let screen_x = (2.0 * ndc_x - 1.0) * self.scale * self.aspect;
        let screen_y = (1.0 - 2.0 * ndc_y) * self.scale;

        let origin = self.camera_to_world.transform_point3(Vec3::ZERO);
        let direction = self
            .camera_to_world
            .transform_vector3(Vec3::new(screen_x, screen_y, -1.0))
            .normalize_or_zero();

        Ray::new(origin, direction)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
