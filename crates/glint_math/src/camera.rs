use glam::{Mat4, Vec3};

/// Look-at camera supplying the view transform and field of view.
///
/// The tracer only consumes `camera_to_world()` and `fov_y`; aspect ratio
/// comes from the image being traced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
}

impl Camera {
    /// Create a new camera looking from `position` at `target`.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y: 45.0_f32.to_radians(),
        }
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov_y = degrees.to_radians();
        self
    }

    /// Set the up vector.
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    /// Move the camera and retarget it in one step.
    pub fn look_at(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.position = position;
        self.target = target;
        self.up = up;
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the camera → world transform. Camera space looks down -Z with +Y up.
    pub fn camera_to_world(&self) -> Mat4 {
        self.view_matrix().inverse()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}
