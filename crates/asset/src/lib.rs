//! Asset loading: CPU mesh/model data and the glTF/GLB loader.

pub mod error;
pub mod gltf_model;
pub mod loader;
pub mod mesh;
pub mod model;

pub use error::AssetLoadError;
pub use loader::{AssetLoader, GltfLoader, LoadProgress};
pub use mesh::{MeshData, MeshVertex};
pub use model::{ModelData, ModelMesh};
