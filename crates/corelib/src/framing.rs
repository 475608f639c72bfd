//! Fitting a freshly loaded model into view.

use crate::{CoreError, CoreResult, Vec3, camera::Camera, scene::Model};

/// How the model and camera are arranged once the model arrives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FramingPolicy {
    /// Keep the model's size; put the camera at `diagonal * factor` on +Z.
    FitDepth { factor: f32 },
    /// Scale the model so its diagonal equals `size`; camera at `camera_depth` on +Z.
    Normalize { size: f32, camera_depth: f32 },
}

impl FramingPolicy {
    pub const FIT_DEPTH: Self = Self::FitDepth { factor: 0.5 };
    pub const NORMALIZE: Self = Self::Normalize {
        size: 2.0,
        camera_depth: 2.0,
    };
}

/// What [`frame_model`] measured and applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Framing {
    pub center: Vec3,
    pub diagonal: f32,
    pub scale: f32,
}

/// Recenter `model` on the origin and place the camera per `policy`.
/// Only the camera's z is touched.
pub fn frame_model(model: &mut Model, camera: &mut Camera, policy: FramingPolicy) -> CoreResult<Framing> {
    let bounds = model.world_bounds();
    let diagonal = bounds.diagonal();
    if !diagonal.is_finite() || diagonal <= f32::EPSILON {
        return Err(CoreError::EmptyBounds);
    }
    let center = bounds.center();

    let scale = match policy {
        FramingPolicy::FitDepth { factor } => {
            camera.position.z = diagonal * factor;
            1.0
        }
        FramingPolicy::Normalize { size, camera_depth } => {
            camera.position.z = camera_depth;
            size / diagonal
        }
    };

    // Scale is applied about the model origin, so the offset scales with it.
    let t = &mut model.transform;
    t.set_uniform_scale(t.scale.x * scale);
    t.translation = (t.translation - center) * scale;

    Ok(Framing {
        center,
        diagonal,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset::{MeshData, MeshVertex, ModelData, ModelMesh};
    use glam::Mat4;

    fn box_model(min: [f32; 3], max: [f32; 3]) -> Model {
        let v = |p: [f32; 3]| MeshVertex::new(p, [0.0, 0.0, 1.0]);
        Model::new(ModelData {
            name: None,
            meshes: vec![ModelMesh {
                name: None,
                mesh: MeshData::new(vec![v(min), v(max), v([min[0], max[1], min[2]])], vec![0, 1, 2]),
                transform: Mat4::IDENTITY,
                base_color: [1.0; 4],
            }],
        })
    }

    fn camera() -> Camera {
        Camera::new_perspective(75f32.to_radians(), 1.0, 0.1, 1000.0)
    }

    #[test]
    fn fit_depth_recenters_and_backs_off() {
        let mut model = box_model([10.0, 20.0, 30.0], [13.0, 24.0, 30.0]);
        let mut cam = camera();
        let f = frame_model(&mut model, &mut cam, FramingPolicy::FIT_DEPTH).expect("frame");

        assert!((f.diagonal - 5.0).abs() < 1e-5);
        assert_eq!(f.scale, 1.0);
        assert!(model.world_bounds().center().length() < 1e-5);
        assert!((cam.position.z - 2.5).abs() < 1e-5);
    }

    #[test]
    fn normalize_scales_to_target_diagonal() {
        let mut model = box_model([-7.0, 3.0, 1.0], [5.0, 8.0, 1.0]);
        let mut cam = camera();
        frame_model(&mut model, &mut cam, FramingPolicy::NORMALIZE).expect("frame");

        let b = model.world_bounds();
        assert!(b.center().length() < 1e-5);
        assert!((b.diagonal() - 2.0).abs() < 1e-5);
        assert_eq!(cam.position.z, 2.0);
    }

    #[test]
    fn degenerate_model_is_refused() {
        let mut model = box_model([1.0; 3], [1.0; 3]);
        let err = frame_model(&mut model, &mut camera(), FramingPolicy::NORMALIZE).unwrap_err();
        assert!(matches!(err, CoreError::EmptyBounds));
    }
}
