//! Scene container: clear color, lights and at most one loaded model.

use asset::ModelData;

use crate::{CoreError, CoreResult, Vec3, bounds::Aabb, transform::Transform};

/// Linear RGB color.
pub type Rgb = [f32; 3];

pub const WHITE: Rgb = [1.0, 1.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Ambient {
        color: Rgb,
        intensity: f32,
    },
    /// Shines from `position` towards the origin.
    Directional {
        color: Rgb,
        intensity: f32,
        position: Vec3,
    },
}

/// The loaded model plus its root transform.
#[derive(Clone, Debug)]
pub struct Model {
    pub data: ModelData,
    pub transform: Transform,
    local_bounds: Aabb,
}

impl Model {
    pub fn new(data: ModelData) -> Self {
        let local_bounds = Aabb::from_points(data.world_positions());
        Self {
            data,
            transform: Transform::IDENTITY,
            local_bounds,
        }
    }

    /// Bounds before the root transform.
    #[inline]
    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }

    /// Bounds after the root transform.
    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds.transformed(&self.transform.matrix())
    }
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub clear_color: Rgb,
    lights: Vec<Light>,
    model: Option<Model>,
}

impl Scene {
    pub fn new(clear_color: Rgb) -> Self {
        Self {
            clear_color,
            lights: Vec::new(),
            model: None,
        }
    }

    /// White background, ambient light at 0.5 and a key light at (1,1,1).
    pub fn with_default_lighting() -> Self {
        let mut scene = Self::new(WHITE);
        scene.add_light(Light::Ambient {
            color: WHITE,
            intensity: 0.5,
        });
        scene.add_light(Light::Directional {
            color: WHITE,
            intensity: 0.8,
            position: Vec3::ONE,
        });
        scene
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Insert the model. A scene holds a single model for its whole lifetime.
    pub fn set_model(&mut self, model: Model) -> CoreResult<&mut Model> {
        if self.model.is_some() {
            return Err(CoreError::ModelAlreadyLoaded);
        }
        Ok(self.model.insert(model))
    }

    #[inline]
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    #[inline]
    pub fn model_mut(&mut self) -> Option<&mut Model> {
        self.model.as_mut()
    }

    #[inline]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }
}
