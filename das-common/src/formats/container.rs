//! `.das` container layout.
//!
//! # Layout
//! ```text
//! magic           u64   0x0000000032736164
//! author          u16 length + bytes
//! comment         u16 length + bytes
//! vertices_count  u32
//! mesh_count      u32
//! animation_count u32
//! default_scene   u32
//! zlib_level      u8    (must be 0)
//! sections        u32 count + tagged records, in order:
//!                 buffers, meshes, mesh groups, nodes, scenes, skeleton joints,
//!                 skeletons, animations, animation channels, phong materials,
//!                 pbr materials
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::serialization::{ByteReader, ByteWriter, read_section, write_section};
use crate::error::FormatError;
use crate::model::{DAS_MAGIC, Header, Model};

fn write_header<W: Write>(w: &mut ByteWriter<W>, header: &Header) -> Result<(), FormatError> {
    if header.zlib_level != 0 {
        return Err(FormatError::UnsupportedCompression(header.zlib_level));
    }
    w.u64(header.magic())?;
    w.string(&header.author)?;
    w.string(&header.comment)?;
    w.u32(header.vertices_count)?;
    w.u32(header.mesh_count)?;
    w.u32(header.animation_count)?;
    w.u32(header.default_scene_index)?;
    w.u8(header.zlib_level)
}

/// Read and validate only the header of a container.
pub fn read_header<R: Read>(reader: R) -> Result<Header, FormatError> {
    read_header_from(&mut ByteReader::new(reader))
}

fn read_header_from<R: Read>(r: &mut ByteReader<R>) -> Result<Header, FormatError> {
    let magic = r.u64()?;
    if magic != DAS_MAGIC {
        return Err(FormatError::BadMagic(magic));
    }
    let mut header = Header::with_magic(magic);
    header.author = r.string()?;
    header.comment = r.string()?;
    header.vertices_count = r.u32()?;
    header.mesh_count = r.u32()?;
    header.animation_count = r.u32()?;
    header.default_scene_index = r.u32()?;
    header.zlib_level = r.u8()?;
    if header.zlib_level != 0 {
        return Err(FormatError::UnsupportedCompression(header.zlib_level));
    }
    Ok(header)
}

fn check_references(model: &Model) -> Result<(), FormatError> {
    match model.find_dangling_reference() {
        Some(span) => Err(FormatError::DanglingReference {
            field: span.field,
            buffer_id: span.reference.buffer_id,
            offset: span.reference.offset,
            len: span.byte_len,
        }),
        None => Ok(()),
    }
}

/// Serialize `model` to `writer`.
///
/// Fails without writing anything if a mesh references a buffer or offset the
/// model does not contain.
pub fn write_model<W: Write>(writer: W, model: &Model) -> Result<(), FormatError> {
    check_references(model)?;

    let mut w = ByteWriter::new(writer);
    write_header(&mut w, &model.header)?;
    write_section(&mut w, &model.buffers)?;
    write_section(&mut w, &model.meshes)?;
    write_section(&mut w, &model.mesh_groups)?;
    write_section(&mut w, &model.nodes)?;
    write_section(&mut w, &model.scenes)?;
    write_section(&mut w, &model.skeleton_joints)?;
    write_section(&mut w, &model.skeletons)?;
    write_section(&mut w, &model.animations)?;
    write_section(&mut w, &model.animation_channels)?;
    write_section(&mut w, &model.phong_materials)?;
    write_section(&mut w, &model.pbr_materials)?;

    w.into_inner().flush()?;
    Ok(())
}

/// Deserialize a model written by [`write_model`].
pub fn read_model<R: Read>(reader: R) -> Result<Model, FormatError> {
    let mut r = ByteReader::new(reader);
    let model = Model {
        header: read_header_from(&mut r)?,
        buffers: read_section(&mut r)?,
        meshes: read_section(&mut r)?,
        mesh_groups: read_section(&mut r)?,
        nodes: read_section(&mut r)?,
        scenes: read_section(&mut r)?,
        skeleton_joints: read_section(&mut r)?,
        skeletons: read_section(&mut r)?,
        animations: read_section(&mut r)?,
        animation_channels: read_section(&mut r)?,
        phong_materials: read_section(&mut r)?,
        pbr_materials: read_section(&mut r)?,
    };
    check_references(&model)?;

    tracing::debug!(
        "Read model: {} buffers, {} meshes, {} nodes",
        model.buffers.len(),
        model.meshes.len(),
        model.nodes.len()
    );
    Ok(model)
}

/// Write `model` to a file at `path`.
pub fn save_model(path: &Path, model: &Model) -> Result<(), FormatError> {
    check_references(model)?;
    let file = File::create(path)?;
    write_model(BufWriter::new(file), model)
}

/// Load a model from a file at `path`.
pub fn load_model(path: &Path) -> Result<Model, FormatError> {
    let file = File::open(path)?;
    read_model(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinString;
    use crate::structures::{BufferRef, Mesh};

    #[test]
    fn test_empty_model_roundtrip() {
        let mut model = Model::new();
        model.header.author = BinString::new("tester").unwrap();

        let mut bytes = Vec::new();
        write_model(&mut bytes, &model).unwrap();

        assert_eq!(&bytes[..8], &DAS_MAGIC.to_le_bytes());
        let parsed = read_model(bytes.as_slice()).unwrap();
        assert_eq!(parsed, model);
        assert_eq!(parsed.header.author.as_str(), "tester");
    }

    #[test]
    fn test_bad_magic_rejected() {
        let bytes = [0u8; 32];
        assert!(matches!(
            read_header(bytes.as_slice()),
            Err(FormatError::BadMagic(0))
        ));
    }

    #[test]
    fn test_compression_rejected() {
        let mut model = Model::new();
        model.header.zlib_level = 6;
        let mut bytes = Vec::new();
        assert!(matches!(
            write_model(&mut bytes, &model),
            Err(FormatError::UnsupportedCompression(6))
        ));
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_dangling_reference_not_written() {
        let mut model = Model::new();
        let mut mesh = Mesh::default();
        mesh.positions = BufferRef::new(0, 0);
        model.meshes.push(mesh);

        let mut bytes = Vec::new();
        assert!(matches!(
            write_model(&mut bytes, &model),
            Err(FormatError::DanglingReference {
                field: "positions",
                buffer_id: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_truncated_file() {
        let mut model = Model::new();
        let id = model.add_buffer();
        model.buffers[id as usize].push(&[1.0f32; 16]).unwrap();

        let mut bytes = Vec::new();
        write_model(&mut bytes, &model).unwrap();
        bytes.truncate(bytes.len() - 20);

        assert!(read_model(bytes.as_slice()).is_err());
    }

    #[test]
    fn test_array_overrunning_buffer_rejected() {
        let mut model = Model::new();
        let id = model.add_buffer();
        model.buffers[id as usize].push(&[0u32]).unwrap();

        let mut mesh = Mesh::default();
        mesh.indices = BufferRef::new(id, 0);
        mesh.draw_count = 6;
        model.meshes.push(mesh);

        let mut bytes = Vec::new();
        assert!(matches!(
            write_model(&mut bytes, &model),
            Err(FormatError::DanglingReference {
                field: "indices",
                buffer_id: 0,
                offset: 0,
                len: 24
            })
        ));
        assert!(bytes.is_empty());

        // Same model written without checks must not load
        model.meshes[0].draw_count = 1;
        write_model(&mut bytes, &model).unwrap();
        // header, buffer section (count, tag, length, 4 bytes), mesh count, tag, index ref
        let draw_count_offset = 29 + (4 + 1 + 4 + 4) + 4 + 1 + 8;
        assert_eq!(bytes[draw_count_offset], 1);
        bytes[draw_count_offset] = 6;
        assert!(matches!(
            read_model(bytes.as_slice()),
            Err(FormatError::DanglingReference {
                field: "indices",
                len: 24,
                ..
            })
        ));
    }
}
