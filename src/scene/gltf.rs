//! glTF/GLB parsing into world-space triangles.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use glam::{Mat4, Vec3};
use gltf::buffer::Source;
use gltf::mesh::Mode;
use gltf::{Document, Gltf};

use super::{ModelGeometry, Triangle};
use crate::error::ViewerError;

/// Where the bytes of one glTF buffer come from.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferData {
    Ready(Vec<u8>),
    /// External file, already resolved against the model URL.
    Fetch(String),
}

pub fn parse(bytes: &[u8]) -> Result<Gltf, ViewerError> {
    Ok(Gltf::from_slice(bytes)?)
}

/// Resolves every buffer that can be resolved without a network round trip.
pub fn plan_buffers(gltf: &Gltf, base_url: &str) -> Result<Vec<BufferData>, ViewerError> {
    gltf.buffers()
        .map(|buffer| {
            let index = buffer.index();
            match buffer.source() {
                Source::Bin => gltf
                    .blob
                    .clone()
                    .map(BufferData::Ready)
                    .ok_or(ViewerError::MissingBlob(index)),
                Source::Uri(uri) if uri.starts_with("data:") => {
                    decode_data_uri(index, uri).map(BufferData::Ready)
                }
                Source::Uri(uri) => Ok(BufferData::Fetch(resolve_uri(base_url, uri))),
            }
        })
        .collect()
}

fn decode_data_uri(index: usize, uri: &str) -> Result<Vec<u8>, ViewerError> {
    let (_, payload) = uri
        .split_once(";base64,")
        .ok_or(ViewerError::DataUri { index })?;
    BASE64
        .decode(payload)
        .map_err(|source| ViewerError::Base64 { index, source })
}

/// Joins a relative buffer URI onto the directory of the model URL.
pub fn resolve_uri(base_url: &str, uri: &str) -> String {
    if uri.contains("://") || uri.starts_with('/') {
        return uri.to_string();
    }
    match base_url.rfind('/') {
        Some(i) => format!("{}{}", &base_url[..=i], uri),
        None => uri.to_string(),
    }
}

/// Walks the default scene (or the first one) and bakes every triangle
/// primitive into world space using the node hierarchy transforms.
pub fn collect_geometry(doc: &Document, buffers: &[Vec<u8>]) -> Result<ModelGeometry, ViewerError> {
    for buffer in doc.buffers() {
        let actual = buffers.get(buffer.index()).map_or(0, Vec::len);
        if actual < buffer.length() {
            return Err(ViewerError::ShortBuffer {
                index: buffer.index(),
                declared: buffer.length(),
                actual,
            });
        }
    }
    let mut out = ModelGeometry {
        triangles: Vec::new(),
        mesh_count: 0,
    };
    let Some(scene) = doc.default_scene().or_else(|| doc.scenes().next()) else {
        return Err(ViewerError::EmptyModel);
    };
    for node in scene.nodes() {
        visit(&node, Mat4::IDENTITY, buffers, &mut out);
    }
    if out.triangles.is_empty() {
        return Err(ViewerError::EmptyModel);
    }
    Ok(out)
}

fn visit(node: &gltf::Node, parent: Mat4, buffers: &[Vec<u8>], out: &mut ModelGeometry) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        let before = out.triangles.len();
        for prim in mesh.primitives() {
            append_primitive(&prim, &world, buffers, &mut out.triangles);
        }
        if out.triangles.len() > before {
            out.mesh_count += 1;
        }
    }
    for child in node.children() {
        visit(&child, world, buffers, out);
    }
}

fn append_primitive(
    prim: &gltf::Primitive,
    world: &Mat4,
    buffers: &[Vec<u8>],
    out: &mut Vec<Triangle>,
) {
    if prim.mode() != Mode::Triangles {
        tracing::debug!(mode = ?prim.mode(), "skipping non-triangle primitive");
        return;
    }
    let reader = prim.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
    let Some(positions) = reader.read_positions() else {
        return;
    };
    let positions: Vec<Vec3> = positions
        .map(|p| world.transform_point3(Vec3::from_array(p)))
        .collect();
    let indices: Vec<u32> = match reader.read_indices() {
        Some(ix) => ix.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let base = prim.material().pbr_metallic_roughness().base_color_factor();
    let color = [base[0], base[1], base[2]];
    for tri in indices.chunks_exact(3) {
        let fetch = |i: u32| positions.get(i as usize).copied();
        if let (Some(a), Some(b), Some(c)) = (fetch(tri[0]), fetch(tri[1]), fetch(tri[2])) {
            out.push(Triangle {
                vertices: [a, b, c],
                color,
            });
        }
    }
}
