//! GPU-side copies of the loaded model's meshes.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::{
    BindGroup, BindGroupLayout, Buffer, BufferUsages, Device, Queue, VertexBufferLayout,
    VertexStepMode, util::DeviceExt,
};

use asset::ModelData;

/// Vertex: position + normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
    };
}

/// Per-mesh UBO (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct MeshUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    color: [f32; 4],
}

impl MeshUniform {
    fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
            color,
        }
    }
}

pub(crate) struct GpuMesh {
    vertex_buf: Buffer,
    index_buf: Buffer,
    index_count: u32,
    uniform_buf: Buffer,
    bind_group: BindGroup,
    node_transform: Mat4,
    color: [f32; 4],
}

impl GpuMesh {
    /// Refresh the model matrix for the current root transform.
    pub(crate) fn write_uniform(&self, queue: &Queue, root: Mat4) {
        let u = MeshUniform::new(root * self.node_transform, self.color);
        queue.write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&u));
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_bind_group(1, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.set_index_buffer(self.index_buf.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Upload every mesh of `model`.
pub(crate) fn upload_model(device: &Device, layout: &BindGroupLayout, model: &ModelData) -> Vec<GpuMesh> {
    model
        .meshes
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let vertices: Vec<Vertex> = m
                .mesh
                .vertices
                .iter()
                .map(|v| Vertex {
                    pos: v.position,
                    normal: v.normal,
                })
                .collect();

            let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Mesh{i} VB")),
                contents: bytemuck::cast_slice(&vertices),
                usage: BufferUsages::VERTEX,
            });
            let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Mesh{i} IB")),
                contents: bytemuck::cast_slice(&m.mesh.indices),
                usage: BufferUsages::INDEX,
            });
            let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Mesh{i} UBO")),
                contents: bytemuck::bytes_of(&MeshUniform::new(m.transform, m.base_color)),
                usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Mesh{i} BG")),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buf.as_entire_binding(),
                }],
            });

            GpuMesh {
                vertex_buf,
                index_buf,
                index_count: m.mesh.indices.len() as u32,
                uniform_buf,
                bind_group,
                node_transform: m.transform,
                color: m.base_color,
            }
        })
        .collect()
}
