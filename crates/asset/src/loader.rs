//! Loader seam: the viewer asks an [`AssetLoader`] for a model and gets
//! progress callbacks followed by a single result.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::{error::AssetLoadError, gltf_model, model::ModelData};

/// Bytes fetched so far. `total` is `None` when the source size is unknown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl LoadProgress {
    /// Completion in percent, or `None` when the total is unknown or zero.
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some(self.loaded as f64 / total as f64 * 100.0),
            _ => None,
        }
    }
}

pub trait AssetLoader {
    /// Fetch and decode the model at `path`, reporting progress along the way.
    fn load(
        &self,
        path: &Path,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<ModelData, AssetLoadError>;
}

/// Default chunk size for progress reporting.
pub const READ_CHUNK: usize = 64 * 1024;

/// glTF 2.0 / GLB loader.
#[derive(Clone, Debug)]
pub struct GltfLoader {
    decoder_path: String,
    chunk_size: usize,
}

impl GltfLoader {
    pub fn new(decoder_path: impl Into<String>) -> Self {
        Self {
            decoder_path: decoder_path.into(),
            chunk_size: READ_CHUNK,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn decoder_path(&self) -> &str {
        &self.decoder_path
    }

    fn read_all(
        &self,
        path: &Path,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Vec<u8>, AssetLoadError> {
        let io_err = |source| AssetLoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).map_err(io_err)?;
        let total = file.metadata().ok().map(|m| m.len());

        let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
        let mut chunk = vec![0u8; self.chunk_size];
        loop {
            let n = file.read(&mut chunk).map_err(io_err)?;
            if n == 0 {
                break;
            }
            bytes.extend_from_slice(&chunk[..n]);
            progress(LoadProgress {
                loaded: bytes.len() as u64,
                total,
            });
        }
        Ok(bytes)
    }
}

impl AssetLoader for GltfLoader {
    fn load(
        &self,
        path: &Path,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<ModelData, AssetLoadError> {
        log::info!("Loading model {}", path.display());
        let bytes = self.read_all(path, progress)?;
        let base: PathBuf = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let model = gltf_model::decode(path, &base, &bytes, &self.decoder_path)?;
        log::info!(
            "Loaded {}: {} meshes, {} vertices, {} triangles",
            path.display(),
            model.meshes.len(),
            model.vertex_count(),
            model.triangle_count()
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_needs_known_total() {
        let p = LoadProgress {
            loaded: 25,
            total: Some(200),
        };
        assert_eq!(p.percent(), Some(12.5));
        assert_eq!(
            LoadProgress {
                loaded: 25,
                total: None
            }
            .percent(),
            None
        );
        assert_eq!(
            LoadProgress {
                loaded: 0,
                total: Some(0)
            }
            .percent(),
            None
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let loader = GltfLoader::new("decoders/");
        let err = loader
            .load(Path::new("definitely/not/here.glb"), &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, AssetLoadError::Io { .. }));
    }

    #[test]
    fn reports_progress_per_chunk() {
        let path = std::env::temp_dir().join(format!("asset-progress-{}.glb", std::process::id()));
        std::fs::write(&path, vec![0u8; 10]).expect("write temp file");

        let loader = GltfLoader::new("decoders/").with_chunk_size(4);
        let mut seen = Vec::new();
        // Zero bytes are not a valid glTF, but every chunk is reported before decoding.
        let result = loader.load(&path, &mut |p| seen.push(p.loaded));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(AssetLoadError::Decode { .. })));
        assert_eq!(seen, vec![4, 8, 10]);
    }
}
