//! Packing unified arrays into a buffer and filling the [`Mesh`] record

use das_common::{BufferRef, Mesh, PackedBuffer};
use glam::{Vec2, Vec3};

use super::types::UnifiedMesh;
use crate::error::{Attribute, ConvertError};

/// Push `unified` into `buffer` (whose id is `buffer_id`) and describe it as a [`Mesh`].
///
/// Layout in the buffer: indices (u32), positions (f32x3), normals (f32x3),
/// then uvs (f32x2) when any source corner had one. Channels that are not
/// written keep the absent sentinel.
///
/// Every index is checked against the vertex count and the whole size is
/// reserved before the first push, so a failure leaves no mesh behind.
pub fn assemble_mesh(
    unified: &UnifiedMesh,
    buffer: &mut PackedBuffer,
    buffer_id: u32,
) -> Result<Mesh, ConvertError> {
    let vertex_count = unified.vertex_count();
    if let Some(&index) = unified.indices.iter().find(|&&i| i >= vertex_count) {
        return Err(ConvertError::IndexOutOfRange {
            attribute: Attribute::Vertex,
            index,
            len: vertex_count as usize,
        });
    }

    let vertices = unified.positions.len();
    let mut total = unified.indices.len() * size_of::<u32>() + 2 * vertices * size_of::<Vec3>();
    if unified.has_uvs {
        total += vertices * size_of::<Vec2>();
    }
    buffer.reserve(total)?;

    let mut mesh = Mesh {
        indices: BufferRef::new(buffer_id, buffer.push(&unified.indices)?),
        draw_count: unified.index_count(),
        vertex_count,
        positions: BufferRef::new(buffer_id, buffer.push(&unified.positions)?),
        normals: BufferRef::new(buffer_id, buffer.push(&unified.normals)?),
        ..Default::default()
    };
    if unified.has_uvs {
        mesh.uvs[0] = BufferRef::new(buffer_id, buffer.push(&unified.uvs)?);
    }

    Ok(mesh)
}
