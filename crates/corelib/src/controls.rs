//! Camera interaction: cursor parallax and damped orbit controls.

use std::f32::consts::{PI, TAU};

use crate::{Vec3, camera::Camera};

/// Cursor offset from viewport center, already divided by [`Parallax::divisor`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerOffset {
    pub x: f32,
    pub y: f32,
}

/// Camera x/y follow the pointer with exponential smoothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parallax {
    /// Fraction of the remaining distance covered each frame.
    pub factor: f32,
    /// Logical pixels per world unit of pointer offset.
    pub divisor: f32,
    pointer: PointerOffset,
}

impl Default for Parallax {
    fn default() -> Self {
        Self {
            factor: 0.05,
            divisor: 100.0,
            pointer: PointerOffset::default(),
        }
    }
}

impl Parallax {
    pub fn with_factor(factor: f32) -> Self {
        Self {
            factor,
            ..Self::default()
        }
    }

    /// `x`/`y` and `half_*` in logical pixels.
    pub fn pointer_moved(&mut self, x: f32, y: f32, half_width: f32, half_height: f32) {
        self.pointer = PointerOffset {
            x: (x - half_width) / self.divisor,
            y: (y - half_height) / self.divisor,
        };
    }

    #[inline]
    pub fn pointer(&self) -> PointerOffset {
        self.pointer
    }

    /// One smoothing step, then re-aim at `target`. Screen y grows down, so it is inverted.
    pub fn update(&self, camera: &mut Camera, target: Vec3) {
        camera.position.x += (self.pointer.x - camera.position.x) * self.factor;
        camera.position.y += (-self.pointer.y - camera.position.y) * self.factor;
        camera.look_at(target);
    }
}

/// Offset from target in spherical coordinates. `theta` is around +Y
/// (zero on +Z), `phi` is measured from +Y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius <= f32::EPSILON {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let s = self.phi.sin() * self.radius;
        Vec3::new(s * self.theta.sin(), self.phi.cos() * self.radius, s * self.theta.cos())
    }
}

/// Buttons the orbit controls react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

const PHI_EPS: f32 = 1e-6;

/// Rotate, dolly and pan a camera around a target with optional inertia.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    spherical: Spherical,
    delta: Spherical,
    pan_offset: Vec3,
    dolly_scale: f32,
    drag: Option<DragMode>,
    last_pointer: Option<(f32, f32)>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            spherical: Spherical::default(),
            delta: Spherical::default(),
            pan_offset: Vec3::ZERO,
            dolly_scale: 1.0,
            drag: None,
            last_pointer: None,
        }
    }
}

impl OrbitControls {
    pub fn new(camera: &Camera) -> Self {
        let mut controls = Self::default();
        controls.sync_from_camera(camera);
        controls
    }

    /// Re-read the orbit state after the camera was moved externally.
    pub fn sync_from_camera(&mut self, camera: &Camera) {
        self.spherical = Spherical::from_offset(camera.position - self.target);
    }

    pub fn begin_drag(&mut self, mode: DragMode) {
        self.drag = Some(mode);
        self.last_pointer = None;
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
        self.last_pointer = None;
    }

    #[inline]
    pub fn dragging(&self) -> Option<DragMode> {
        self.drag
    }

    /// Feed a pointer position (logical pixels); only acts while dragging.
    pub fn pointer_moved(&mut self, x: f32, y: f32, camera: &Camera, viewport_height: f32) {
        let Some(mode) = self.drag else {
            return;
        };
        let Some((lx, ly)) = self.last_pointer.replace((x, y)) else {
            return;
        };
        let (dx, dy) = (x - lx, y - ly);
        let h = viewport_height.max(1.0);
        match mode {
            DragMode::Rotate => {
                self.rotate_left(TAU * dx / h * self.rotate_speed);
                self.rotate_up(TAU * dy / h * self.rotate_speed);
            }
            DragMode::Pan => self.pan(dx, dy, camera, h),
        }
    }

    #[inline]
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    #[inline]
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }

    /// Wheel input; positive `steps` move closer.
    pub fn scroll(&mut self, steps: f32) {
        let scale = 0.95f32.powf(self.zoom_speed * steps.abs());
        if steps > 0.0 {
            self.dolly_scale *= scale;
        } else if steps < 0.0 {
            self.dolly_scale /= scale;
        }
    }

    /// Screen-space pan scaled so the content under the cursor tracks it.
    fn pan(&mut self, dx: f32, dy: f32, camera: &Camera, viewport_height: f32) {
        let distance = (camera.position - self.target).length();
        let world_per_px = 2.0 * distance * (camera.fov_y_rad * 0.5).tan() / viewport_height;
        let right = camera.forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(camera.forward).normalize_or_zero();
        self.pan_offset += (-dx * right + dy * up) * world_per_px * self.pan_speed;
    }

    /// Apply pending input to `camera`. Call once per frame.
    pub fn update(&mut self, camera: &mut Camera) {
        let step = if self.enable_damping { self.damping_factor } else { 1.0 };

        self.spherical.theta += self.delta.theta * step;
        self.spherical.phi += self.delta.phi * step;
        self.spherical.phi = self.spherical.phi.clamp(PHI_EPS, PI - PHI_EPS);
        self.spherical.radius = (self.spherical.radius * self.dolly_scale)
            .clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * step;

        // A camera sitting on the target has no direction to orbit along.
        if self.spherical.radius > f32::EPSILON {
            camera.position = self.target + self.spherical.to_offset();
        }
        camera.look_at(self.target);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.delta.theta *= decay;
            self.delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.dolly_scale = 1.0;
    }

    #[inline]
    pub fn spherical(&self) -> Spherical {
        self.spherical
    }
}
