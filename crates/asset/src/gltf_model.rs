//! glTF 2.0 / GLB decoding into [`ModelData`].
//! Walks the default scene and flattens node transforms into each mesh.

use std::path::Path;

use glam::Mat4;

use crate::{
    error::AssetLoadError,
    mesh::{MeshData, MeshVertex},
    model::{ModelData, ModelMesh},
};

/// Geometry compression extension we recognise but cannot decode.
pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// Decode an in-memory glTF or GLB. External buffers resolve against `base`.
pub fn decode(
    path: &Path,
    base: &Path,
    bytes: &[u8],
    decoder_path: &str,
) -> Result<ModelData, AssetLoadError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice_without_validation(bytes)
        .map_err(|e| AssetLoadError::decode(path, e))?;

    if document.extensions_required().any(|ext| ext == DRACO_EXTENSION) {
        return Err(AssetLoadError::UnsupportedCompression {
            path: path.to_path_buf(),
            extension: DRACO_EXTENSION.to_string(),
            decoder_path: decoder_path.to_string(),
        });
    }

    let document = gltf::Document::from_json(document.into_json())
        .map_err(|e| AssetLoadError::decode(path, e))?;
    let buffers = gltf::import_buffers(&document, Some(base), blob)
        .map_err(|e| AssetLoadError::decode(path, e))?;

    let mut model = ModelData {
        name: None,
        meshes: Vec::new(),
    };

    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            model.name = scene.name().map(str::to_owned);
            for node in scene.nodes() {
                visit_node(&node, Mat4::IDENTITY, &buffers, &mut model)?;
            }
        }
        None => {
            // No scene graph: take every mesh at the origin.
            for mesh in document.meshes() {
                push_mesh(&mesh, Mat4::IDENTITY, &buffers, &mut model)?;
            }
        }
    }

    if model.meshes.is_empty() {
        return Err(AssetLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(model)
}

fn visit_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut ModelData,
) -> Result<(), AssetLoadError> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        push_mesh(&mesh, world, buffers, out)?;
    }
    for child in node.children() {
        visit_node(&child, world, buffers, out)?;
    }
    Ok(())
}

fn push_mesh(
    mesh: &gltf::Mesh<'_>,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut ModelData,
) -> Result<(), AssetLoadError> {
    for prim in mesh.primitives() {
        if prim.mode() != gltf::mesh::Mode::Triangles {
            log::debug!(
                "Skipping primitive {} of mesh {:?}: mode {:?}",
                prim.index(),
                mesh.name(),
                prim.mode()
            );
            continue;
        }

        let reader = prim.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions: Vec<[f32; 3]> = positions.collect();
        let normals: Option<Vec<[f32; 3]>> = reader
            .read_normals()
            .map(|n| n.collect())
            .filter(|n: &Vec<[f32; 3]>| n.len() == positions.len());

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let has_normals = normals.is_some();
        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let n = normals.as_ref().map(|n| n[i]).unwrap_or([0.0; 3]);
                MeshVertex::new(p, n)
            })
            .collect();

        let mut data = MeshData::new(vertices, indices);
        if !data.is_valid() {
            log::warn!(
                "Skipping malformed primitive {} of mesh {:?}",
                prim.index(),
                mesh.name()
            );
            continue;
        }
        if !has_normals {
            data.compute_normals();
        }

        out.meshes.push(ModelMesh {
            name: mesh.name().map(str::to_owned),
            mesh: data,
            transform,
            base_color: prim.material().pbr_metallic_roughness().base_color_factor(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One triangle (0,0,0) (1,0,0) (0,1,0) under a translated parent node
    /// and a scaled child node.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "name": "root", "nodes": [0] } ],
        "nodes": [
            { "translation": [10.0, 0.0, 0.0], "children": [1] },
            { "mesh": 0, "scale": [2.0, 2.0, 2.0] }
        ],
        "meshes": [ { "name": "tri", "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1 } ] } ],
        "buffers": [ {
            "byteLength": 44,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
        } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    fn decode_str(src: &str) -> Result<ModelData, AssetLoadError> {
        decode(
            Path::new("test.gltf"),
            Path::new("."),
            src.as_bytes(),
            "https://example.invalid/draco/",
        )
    }

    #[test]
    fn flattens_node_transforms() {
        let model = decode_str(TRIANGLE_GLTF).expect("decode triangle");
        assert_eq!(model.name.as_deref(), Some("root"));
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.triangle_count(), 1);

        let max_x = model
            .world_positions()
            .map(|p| p.x)
            .fold(f32::NEG_INFINITY, f32::max);
        assert!((max_x - 12.0).abs() < 1e-5);

        // normals were synthesised from the winding
        let n = model.meshes[0].mesh.vertices[0].normal;
        assert!((n[2] - 1.0).abs() < 1e-5);
        assert_eq!(model.meshes[0].base_color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn garbage_is_decode_error() {
        let err = decode_str("this is not gltf").unwrap_err();
        assert!(matches!(err, AssetLoadError::Decode { .. }));
    }

    #[test]
    fn draco_is_reported_with_decoder_path() {
        let src = r#"{
            "asset": { "version": "2.0" },
            "extensionsUsed": ["KHR_draco_mesh_compression"],
            "extensionsRequired": ["KHR_draco_mesh_compression"]
        }"#;
        match decode_str(src) {
            Err(AssetLoadError::UnsupportedCompression { extension, decoder_path, .. }) => {
                assert_eq!(extension, DRACO_EXTENSION);
                assert_eq!(decoder_path, "https://example.invalid/draco/");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn document_without_meshes_is_empty() {
        let err = decode_str(r#"{ "asset": { "version": "2.0" } }"#).unwrap_err();
        assert!(matches!(err, AssetLoadError::Empty { .. }));
    }
}
