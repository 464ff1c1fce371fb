//! Render-mesh triangulation.
//!
//! Decodes either mesh layout into flat 2D triangles in mesh-local space.
//! Only vertex positions are read and their Z component is dropped.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use spriteforge_spec::mesh::POSITION_SIZE;
use spriteforge_spec::{MeshGeometry, SubMesh, Vector2, VertexData};
use thiserror::Error;

/// Three corners in mesh-local space.
pub type Triangle = [Vector2; 3];

/// Errors from decoding a render mesh.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    /// A read ran past the end of the vertex or index buffer.
    #[error("{buffer} buffer ended early at byte {offset}")]
    UnexpectedEof { buffer: &'static str, offset: u64 },

    /// An index (after rebasing) does not address a decoded vertex.
    #[error("vertex index {index} out of range for {len} vertices")]
    IndexOutOfRange { index: i64, len: usize },

    /// The vertex data declares no position channel.
    #[error("vertex data has no position channel")]
    MissingChannel,

    /// The position channel refers to a stream that does not exist.
    #[error("position channel refers to missing stream {0}")]
    MissingStream(u8),

    /// The stream stride cannot hold a position record.
    #[error("stream stride {0} is smaller than a position record")]
    InvalidStride(u32),
}

/// Decode a render mesh into triangles.
pub fn triangulate(geometry: &MeshGeometry) -> Result<Vec<Triangle>, MeshError> {
    match geometry {
        MeshGeometry::Legacy { vertices, indices } => triangulate_legacy(vertices, indices),
        MeshGeometry::Modern {
            vertex_data,
            sub_meshes,
            index_buffer,
        } => triangulate_modern(vertex_data, sub_meshes, index_buffer),
    }
}

/// Flat layout: every group of three indices addresses `vertices` directly.
fn triangulate_legacy(vertices: &[[f32; 3]], indices: &[u16]) -> Result<Vec<Triangle>, MeshError> {
    let points: Vec<Vector2> = vertices.iter().map(|v| Vector2::new(v[0], v[1])).collect();

    indices
        .chunks_exact(3)
        .map(|tri| {
            Ok([
                lookup(&points, tri[0] as i64)?,
                lookup(&points, tri[1] as i64)?,
                lookup(&points, tri[2] as i64)?,
            ])
        })
        .collect()
}

/// Interleaved layout: positions come from channel 0, indices are 16-bit and
/// stored absolute, so each is rebased by the submesh's first vertex.
fn triangulate_modern(
    vertex_data: &VertexData,
    sub_meshes: &[SubMesh],
    index_buffer: &[u8],
) -> Result<Vec<Triangle>, MeshError> {
    let channel = vertex_data
        .channels
        .first()
        .ok_or(MeshError::MissingChannel)?;
    let stream = vertex_data
        .streams
        .get(channel.stream as usize)
        .ok_or(MeshError::MissingStream(channel.stream))?;
    if stream.stride < POSITION_SIZE {
        return Err(MeshError::InvalidStride(stream.stride));
    }
    let skip = (stream.stride - POSITION_SIZE) as u64;

    let mut vertex_reader = Cursor::new(vertex_data.data.as_slice());
    let mut index_reader = Cursor::new(index_buffer);
    let mut triangles = Vec::new();

    for sub in sub_meshes {
        let start = stream.offset as u64
            + sub.first_vertex as u64 * stream.stride as u64
            + channel.offset as u64;
        vertex_reader.set_position(start);

        // Bound the reservation by what the buffer can actually hold.
        let available = vertex_data.data.len() as u64 / stream.stride as u64 + 1;
        let mut vertices = Vec::with_capacity(available.min(sub.vertex_count as u64) as usize);
        for _ in 0..sub.vertex_count {
            let x = read_f32(&mut vertex_reader)?;
            let y = read_f32(&mut vertex_reader)?;
            let _z = read_f32(&mut vertex_reader)?;
            vertices.push(Vector2::new(x, y));
            let next = vertex_reader.position() + skip;
            vertex_reader.set_position(next);
        }

        index_reader.set_position(sub.first_byte as u64);
        let base = sub.first_vertex as i64;
        for _ in 0..sub.index_count / 3 {
            let a = read_index(&mut index_reader)? as i64 - base;
            let b = read_index(&mut index_reader)? as i64 - base;
            let c = read_index(&mut index_reader)? as i64 - base;
            triangles.push([
                lookup(&vertices, a)?,
                lookup(&vertices, b)?,
                lookup(&vertices, c)?,
            ]);
        }

        log::trace!(
            "decoded submesh: {} vertices from byte {}, {} indices from byte {}",
            sub.vertex_count,
            start,
            sub.index_count,
            sub.first_byte
        );
    }

    Ok(triangles)
}

fn lookup(vertices: &[Vector2], index: i64) -> Result<Vector2, MeshError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| vertices.get(i).copied())
        .ok_or(MeshError::IndexOutOfRange {
            index,
            len: vertices.len(),
        })
}

fn read_f32(reader: &mut Cursor<&[u8]>) -> Result<f32, MeshError> {
    let offset = reader.position();
    reader
        .read_f32::<LittleEndian>()
        .map_err(|_| MeshError::UnexpectedEof {
            buffer: "vertex",
            offset,
        })
}

fn read_index(reader: &mut Cursor<&[u8]>) -> Result<u16, MeshError> {
    let offset = reader.position();
    reader
        .read_u16::<LittleEndian>()
        .map_err(|_| MeshError::UnexpectedEof {
            buffer: "index",
            offset,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use pretty_assertions::assert_eq;
    use spriteforge_spec::{ChannelInfo, StreamInfo};

    fn v(x: f32, y: f32) -> Vector2 {
        Vector2::new(x, y)
    }

    /// Interleaved block: 8 header bytes, then records of position + 8 bytes
    /// of UV padding (stride 20).
    fn vertex_block(positions: &[[f32; 3]]) -> VertexData {
        let mut data = vec![0xAA; 8];
        for p in positions {
            for c in p {
                data.write_f32::<LittleEndian>(*c).unwrap();
            }
            data.extend_from_slice(&[0xEE; 8]);
        }
        VertexData {
            channels: vec![ChannelInfo {
                stream: 0,
                offset: 0,
                format: 0,
                dimension: 3,
            }],
            streams: vec![StreamInfo {
                channel_mask: 1,
                offset: 8,
                stride: 20,
            }],
            data,
        }
    }

    fn index_bytes(indices: &[u16]) -> Vec<u8> {
        let mut out = Vec::new();
        for i in indices {
            out.write_u16::<LittleEndian>(*i).unwrap();
        }
        out
    }

    #[test]
    fn test_legacy_triangles() {
        let mesh = MeshGeometry::Legacy {
            vertices: vec![
                [0.0, 0.0, 9.0],
                [1.0, 0.0, 9.0],
                [1.0, 1.0, 9.0],
                [0.0, 1.0, 9.0],
            ],
            indices: vec![0, 1, 2, 2, 3, 0, 1],
        };

        let tris = triangulate(&mesh).unwrap();
        assert_eq!(
            tris,
            vec![
                [v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0)],
                [v(1.0, 1.0), v(0.0, 1.0), v(0.0, 0.0)],
            ]
        );
    }

    #[test]
    fn test_legacy_index_out_of_range() {
        let mesh = MeshGeometry::Legacy {
            vertices: vec![[0.0; 3]; 2],
            indices: vec![0, 1, 2],
        };
        assert_eq!(
            triangulate(&mesh),
            Err(MeshError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_modern_rebases_submesh_indices() {
        let vertex_data = vertex_block(&[
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [5.0, 5.0, 1.0],
            [6.0, 5.0, 1.0],
            [5.0, 6.0, 1.0],
        ]);
        // Second submesh starts at vertex 3; its indices are stored absolute.
        let mut index_buffer = index_bytes(&[0, 1, 2]);
        index_buffer.extend(index_bytes(&[5, 4, 3]));

        let mesh = MeshGeometry::Modern {
            vertex_data,
            sub_meshes: vec![
                SubMesh {
                    first_byte: 0,
                    index_count: 3,
                    first_vertex: 0,
                    vertex_count: 3,
                },
                SubMesh {
                    first_byte: 6,
                    index_count: 3,
                    first_vertex: 3,
                    vertex_count: 3,
                },
            ],
            index_buffer,
        };

        let tris = triangulate(&mesh).unwrap();
        assert_eq!(
            tris,
            vec![
                [v(0.0, 0.0), v(2.0, 0.0), v(0.0, 2.0)],
                [v(5.0, 6.0), v(6.0, 5.0), v(5.0, 5.0)],
            ]
        );
    }

    #[test]
    fn test_modern_channel_offset() {
        // Position stored 4 bytes into each 16-byte record.
        let mut data = Vec::new();
        for p in [[1.0f32, 2.0, 0.0], [3.0, 4.0, 0.0], [5.0, 6.0, 0.0]] {
            data.write_u32::<LittleEndian>(0xDEADBEEF).unwrap();
            for c in p {
                data.write_f32::<LittleEndian>(c).unwrap();
            }
        }
        let mesh = MeshGeometry::Modern {
            vertex_data: VertexData {
                channels: vec![ChannelInfo {
                    stream: 0,
                    offset: 4,
                    ..Default::default()
                }],
                streams: vec![StreamInfo {
                    offset: 0,
                    stride: 16,
                    ..Default::default()
                }],
                data,
            },
            sub_meshes: vec![SubMesh {
                first_byte: 0,
                index_count: 3,
                first_vertex: 0,
                vertex_count: 3,
            }],
            index_buffer: index_bytes(&[2, 1, 0]),
        };

        assert_eq!(
            triangulate(&mesh).unwrap(),
            vec![[v(5.0, 6.0), v(3.0, 4.0), v(1.0, 2.0)]]
        );
    }

    #[test]
    fn test_modern_short_vertex_buffer() {
        let mut vertex_data = vertex_block(&[[0.0; 3], [1.0; 3]]);
        vertex_data.data.truncate(8 + 20 + 6);
        let mesh = MeshGeometry::Modern {
            vertex_data,
            sub_meshes: vec![SubMesh {
                first_byte: 0,
                index_count: 3,
                first_vertex: 0,
                vertex_count: 2,
            }],
            index_buffer: index_bytes(&[0, 1, 0]),
        };

        assert!(matches!(
            triangulate(&mesh),
            Err(MeshError::UnexpectedEof {
                buffer: "vertex",
                ..
            })
        ));
    }

    #[test]
    fn test_modern_short_index_buffer() {
        let mesh = MeshGeometry::Modern {
            vertex_data: vertex_block(&[[0.0; 3]; 3]),
            sub_meshes: vec![SubMesh {
                first_byte: 0,
                index_count: 3,
                first_vertex: 0,
                vertex_count: 3,
            }],
            index_buffer: index_bytes(&[0, 1]),
        };

        assert_eq!(
            triangulate(&mesh),
            Err(MeshError::UnexpectedEof {
                buffer: "index",
                offset: 4
            })
        );
    }

    #[test]
    fn test_modern_index_below_first_vertex() {
        let mesh = MeshGeometry::Modern {
            vertex_data: vertex_block(&[[0.0; 3]; 6]),
            sub_meshes: vec![SubMesh {
                first_byte: 0,
                index_count: 3,
                first_vertex: 3,
                vertex_count: 3,
            }],
            index_buffer: index_bytes(&[3, 4, 2]),
        };

        assert_eq!(
            triangulate(&mesh),
            Err(MeshError::IndexOutOfRange { index: -1, len: 3 })
        );
    }

    #[test]
    fn test_modern_missing_channel_and_stream() {
        let mut vertex_data = vertex_block(&[[0.0; 3]; 3]);
        vertex_data.streams.clear();
        let mesh = MeshGeometry::Modern {
            vertex_data: vertex_data.clone(),
            sub_meshes: vec![],
            index_buffer: vec![],
        };
        assert_eq!(triangulate(&mesh), Err(MeshError::MissingStream(0)));

        vertex_data.channels.clear();
        let mesh = MeshGeometry::Modern {
            vertex_data,
            sub_meshes: vec![],
            index_buffer: vec![],
        };
        assert_eq!(triangulate(&mesh), Err(MeshError::MissingChannel));
    }

    #[test]
    fn test_modern_rejects_tiny_stride() {
        let mut vertex_data = vertex_block(&[[0.0; 3]]);
        vertex_data.streams[0].stride = 8;
        let mesh = MeshGeometry::Modern {
            vertex_data,
            sub_meshes: vec![],
            index_buffer: vec![],
        };
        assert_eq!(triangulate(&mesh), Err(MeshError::InvalidStride(8)));
    }
}
