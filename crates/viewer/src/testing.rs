//! Fakes for driving a [`Viewer`](crate::Viewer) without a window or GPU.

use std::{convert::Infallible, path::Path};

use asset::{AssetLoadError, AssetLoader, LoadProgress, MeshData, MeshVertex, ModelData, ModelMesh};
use corelib::Mat4;

use crate::render::{Frame, SceneRenderer};

/// Records output size and counts render calls.
#[derive(Debug, Default)]
pub struct FakeRenderer {
    pub size: Option<(u32, u32)>,
    pub renders: u64,
}

impl SceneRenderer for FakeRenderer {
    type Error = Infallible;

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }

    fn render(&mut self, _frame: Frame<'_>) -> Result<(), Self::Error> {
        self.renders += 1;
        Ok(())
    }
}

/// Hands out a fixed model after replaying scripted `(loaded, total)` progress.
#[derive(Clone, Debug)]
pub struct StaticLoader {
    model: ModelData,
    progress: Vec<(u64, u64)>,
}

impl StaticLoader {
    pub fn new(model: ModelData) -> Self {
        Self {
            model,
            progress: Vec::new(),
        }
    }

    pub fn with_progress(mut self, steps: Vec<(u64, u64)>) -> Self {
        self.progress = steps;
        self
    }
}

impl AssetLoader for StaticLoader {
    fn load(
        &self,
        _path: &Path,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<ModelData, AssetLoadError> {
        for &(loaded, total) in &self.progress {
            progress(LoadProgress {
                loaded,
                total: Some(total),
            });
        }
        Ok(self.model.clone())
    }
}

/// Always fails as if the file were corrupt.
pub struct FailingLoader;

impl AssetLoader for FailingLoader {
    fn load(
        &self,
        path: &Path,
        _progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<ModelData, AssetLoadError> {
        Err(AssetLoadError::decode(path, "simulated decode error"))
    }
}

/// Single triangle whose bounds span `min..max`.
pub fn box_model(min: [f32; 3], max: [f32; 3]) -> ModelData {
    let v = |p: [f32; 3]| MeshVertex::new(p, [0.0, 0.0, 1.0]);
    ModelData {
        name: Some("box".into()),
        meshes: vec![ModelMesh {
            name: None,
            mesh: MeshData::new(vec![v(min), v(max), v([min[0], max[1], min[2]])], vec![0, 1, 2]),
            transform: Mat4::IDENTITY,
            base_color: [0.8, 0.8, 0.8, 1.0],
        }],
    }
}
