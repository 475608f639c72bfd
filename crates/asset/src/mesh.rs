//! CPU-side mesh representation produced by loaders.

/// Vertex with position/normal. Values are in mesh-local space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if there is at least one triangle and every index is in range.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && self.indices.len() >= 3
            && self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    /// Smooth, area-weighted vertex normals. Used when the source has none.
    pub fn compute_normals(&mut self) {
        let mut acc = vec![glam::Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a >= acc.len() || b >= acc.len() || c >= acc.len() {
                continue;
            }
            let pa = glam::Vec3::from(self.vertices[a].position);
            let pb = glam::Vec3::from(self.vertices[b].position);
            let pc = glam::Vec3::from(self.vertices[c].position);
            // cross product length is twice the area
            let n = (pb - pa).cross(pc - pa);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        for (v, n) in self.vertices.iter_mut().zip(acc) {
            v.normal = n.try_normalize().unwrap_or(glam::Vec3::Z).to_array();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        MeshData::new(
            vec![
                MeshVertex::new([0.0, 0.0, 0.0], [0.0; 3]),
                MeshVertex::new([1.0, 0.0, 0.0], [0.0; 3]),
                MeshVertex::new([0.0, 1.0, 0.0], [0.0; 3]),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn mesh_data_validity() {
        assert!(triangle().is_valid());

        let mut broken = triangle();
        broken.indices = vec![0, 1, 7];
        assert!(!broken.is_valid());
        assert!(!MeshData::default().is_valid());
    }

    #[test]
    fn normals_follow_winding() {
        let mut mesh = triangle();
        mesh.compute_normals();
        for v in &mesh.vertices {
            assert!((v.normal[2] - 1.0).abs() < 1e-6);
        }
    }
}
