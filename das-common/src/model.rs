//! The aggregate model: header, buffers and every record array.

use crate::BinString;
use crate::buffer::PackedBuffer;
use crate::structures::*;

/// Magic number at the start of every `.das` file ("das2" little-endian).
pub const DAS_MAGIC: u64 = 0x0000_0000_3273_6164;

/// File extension for model containers (without dot)
pub const DAS_EXT: &str = "das";

/// File header with summary counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    magic: u64,
    pub author: BinString,
    pub comment: BinString,
    pub vertices_count: u32,
    pub mesh_count: u32,
    pub animation_count: u32,
    pub default_scene_index: u32,
    pub zlib_level: u8,
}

impl Header {
    /// Header with the magic number set.
    pub fn new() -> Self {
        Self {
            magic: DAS_MAGIC,
            ..Default::default()
        }
    }

    pub(crate) fn with_magic(magic: u64) -> Self {
        Self {
            magic,
            ..Default::default()
        }
    }

    pub fn magic(&self) -> u64 {
        self.magic
    }

    pub fn is_valid(&self) -> bool {
        self.magic == DAS_MAGIC
    }
}

/// Everything stored in one `.das` file.
///
/// Records refer to each other by index into these vectors, and to vertex
/// data by (buffer id, offset) where the buffer id indexes `buffers`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub header: Header,
    pub buffers: Vec<PackedBuffer>,
    pub meshes: Vec<Mesh>,
    pub mesh_groups: Vec<MeshGroup>,
    pub nodes: Vec<Node>,
    pub scenes: Vec<Scene>,
    pub skeleton_joints: Vec<SkeletonJoint>,
    pub skeletons: Vec<Skeleton>,
    pub animations: Vec<Animation>,
    pub animation_channels: Vec<AnimationChannel>,
    pub phong_materials: Vec<MaterialPhong>,
    pub pbr_materials: Vec<MaterialPbr>,
}

impl Model {
    pub fn new() -> Self {
        Self {
            header: Header::new(),
            ..Default::default()
        }
    }

    /// Append an empty buffer and return its id. Ids increase from 0.
    pub fn add_buffer(&mut self) -> u32 {
        self.buffers.push(PackedBuffer::new());
        (self.buffers.len() - 1) as u32
    }

    pub fn buffer(&self, id: u32) -> Option<&PackedBuffer> {
        self.buffers.get(id as usize)
    }

    pub fn buffer_mut(&mut self, id: u32) -> Option<&mut PackedBuffer> {
        self.buffers.get_mut(id as usize)
    }

    /// First array of any mesh that is not fully inside an existing buffer.
    pub fn find_dangling_reference(&self) -> Option<BufferSpan> {
        self.meshes
            .iter()
            .flat_map(|mesh| mesh.buffer_spans())
            .find(|span| match self.buffer(span.reference.buffer_id) {
                Some(buffer) => span.end() > buffer.size() as u64,
                None => true,
            })
    }

    /// Recompute the header's summary counts from the records.
    pub fn update_header_counts(&mut self) {
        self.header.mesh_count = self.meshes.len() as u32;
        self.header.animation_count = self.animations.len() as u32;
        self.header.vertices_count = self.meshes.iter().map(|m| m.vertex_count).sum();
    }
}
