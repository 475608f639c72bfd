use crate::{Mat4, Vec3};

/// Perspective camera (right-handed). Orientation is kept as a view
/// direction so moving the camera does not silently re-aim it.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    /// Unit view direction.
    pub forward: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    /// Camera at the origin looking down -Z.
    pub fn new_perspective(fov_y_rad: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    /// Re-aim at `target`. A target at the camera position keeps the old direction.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(dir) = (target - self.position).try_normalize() {
            self.forward = dir;
        }
    }

    /// Recompute the aspect ratio from viewport dimensions (clamped to 1px).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        // Looking straight along `up` would collapse the basis.
        let up = if self.forward.cross(self.up).length_squared() < 1e-12 {
            Vec3::Z
        } else {
            self.up
        };
        Mat4::look_to_rh(self.position, self.forward, up)
    }

    /// OpenGL-style clip space (z in [-1, 1]); the renderer remaps depth.
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_sets_aspect() {
        let mut cam = Camera::new_perspective(75f32.to_radians(), 1.0, 0.1, 1000.0);
        for (w, h) in [(1280, 720), (300, 900), (1, 1), (4096, 17)] {
            cam.set_viewport(w, h);
            assert!((cam.aspect - w as f32 / h as f32).abs() < 1e-6);
        }
        cam.set_viewport(0, 0);
        assert_eq!(cam.aspect, 1.0);
    }

    #[test]
    fn look_at_from_same_point_keeps_direction() {
        let mut cam = Camera::new_perspective(1.0, 1.0, 0.1, 10.0);
        cam.look_at(Vec3::ZERO);
        assert_eq!(cam.forward, Vec3::NEG_Z);

        cam.position = Vec3::new(0.0, 0.0, 5.0);
        cam.look_at(Vec3::new(5.0, 0.0, 5.0));
        assert!((cam.forward - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn proj_view_is_finite_when_looking_down() {
        let mut cam = Camera::new_perspective(1.0, 1.5, 0.1, 10.0);
        cam.position = Vec3::new(0.0, 3.0, 0.0);
        cam.look_at(Vec3::ZERO);
        let a = cam.proj_view().to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }
}
