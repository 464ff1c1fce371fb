//! Render-mesh geometry attached to a sprite's render data.
//!
//! Two historical layouts exist: a flat vertex/index list written by older
//! producers, and an interleaved vertex-data block with 16-bit submesh index
//! buffers written by newer ones.

use serde::{Deserialize, Serialize};

/// Size in bytes of one position record (three `f32`).
pub const POSITION_SIZE: u32 = 12;

/// Sprite render mesh in one of the two on-disk layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum MeshGeometry {
    /// Flat vertex positions with triangle indices into them.
    Legacy {
        vertices: Vec<[f32; 3]>,
        indices: Vec<u16>,
    },
    /// Interleaved vertex streams plus a raw little-endian index buffer.
    Modern {
        vertex_data: VertexData,
        sub_meshes: Vec<SubMesh>,
        index_buffer: Vec<u8>,
    },
}

impl Default for MeshGeometry {
    fn default() -> Self {
        MeshGeometry::Legacy {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }
}

impl MeshGeometry {
    /// Number of whole triangles the mesh declares.
    pub fn triangle_count(&self) -> usize {
        match self {
            MeshGeometry::Legacy { indices, .. } => indices.len() / 3,
            MeshGeometry::Modern { sub_meshes, .. } => sub_meshes
                .iter()
                .map(|s| (s.index_count / 3) as usize)
                .sum(),
        }
    }
}

/// Interleaved vertex block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VertexData {
    /// Shader channels; channel 0 is the vertex position.
    pub channels: Vec<ChannelInfo>,
    /// Streams the channels live in.
    pub streams: Vec<StreamInfo>,
    /// Raw vertex bytes.
    pub data: Vec<u8>,
}

/// Location of one shader channel inside a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub stream: u8,
    pub offset: u8,
    #[serde(default)]
    pub format: u8,
    #[serde(default)]
    pub dimension: u8,
}

/// One interleaved stream of the vertex block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamInfo {
    #[serde(default)]
    pub channel_mask: u32,
    pub offset: u32,
    pub stride: u32,
}

/// A contiguous run of indices and the vertices they address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubMesh {
    /// Byte offset of the first index in the index buffer.
    pub first_byte: u32,
    /// Number of 16-bit indices.
    pub index_count: u32,
    /// Base vertex; stored indices are absolute and must be rebased by it.
    pub first_vertex: u32,
    pub vertex_count: u32,
}
