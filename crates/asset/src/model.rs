//! Decoded model: a flattened node hierarchy of meshes.

use glam::Mat4;

use crate::mesh::MeshData;

/// One drawable primitive with the world matrix of the node that owns it.
#[derive(Clone, Debug)]
pub struct ModelMesh {
    pub name: Option<String>,
    pub mesh: MeshData,
    /// Node-to-model matrix, accumulated from the scene root.
    pub transform: Mat4,
    /// Linear RGBA base color.
    pub base_color: [f32; 4],
}

#[derive(Clone, Debug, Default)]
pub struct ModelData {
    pub name: Option<String>,
    pub meshes: Vec<ModelMesh>,
}

impl ModelData {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.triangle_count()).sum()
    }

    /// All vertex positions in model space (node transforms applied).
    pub fn world_positions(&self) -> impl Iterator<Item = glam::Vec3> + '_ {
        self.meshes.iter().flat_map(|m| {
            m.mesh
                .positions()
                .map(move |p| m.transform.transform_point3(glam::Vec3::from(p)))
        })
    }
}
