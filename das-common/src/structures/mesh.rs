use glam::{Vec2, Vec3, Vec4};

use super::{BufferRef, MAX_JOINT_CHANNELS, MAX_UV_CHANNELS, NO_ID};

const INDEX_SIZE: u64 = size_of::<u32>() as u64;
const WEIGHT_SIZE: u64 = size_of::<f32>() as u64;
const VEC2_SIZE: u64 = size_of::<Vec2>() as u64;
const VEC3_SIZE: u64 = size_of::<Vec3>() as u64;
const VEC4_SIZE: u64 = size_of::<Vec4>() as u64;

/// A referenced array: where it starts and how many bytes it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSpan {
    pub field: &'static str,
    pub reference: BufferRef,
    pub byte_len: u64,
}

impl BufferSpan {
    pub const fn new(field: &'static str, reference: BufferRef, byte_len: u64) -> Self {
        Self {
            field,
            reference,
            byte_len,
        }
    }

    /// Offset one past the last byte of the array.
    pub const fn end(&self) -> u64 {
        self.reference.offset as u64 + self.byte_len
    }
}

/// Material model a mesh is shaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum MaterialType {
    #[default]
    Unknown = 0,
    Phong = 1,
    Pbr = 2,
}

impl MaterialType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Phong),
            2 => Some(Self::Pbr),
            _ => None,
        }
    }
}

/// Blend-shape delta sharing the index topology of its owning [`Mesh`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MorphTarget {
    pub indices: BufferRef,
    pub positions: BufferRef,
    pub normals: BufferRef,
    pub uvs: [BufferRef; MAX_UV_CHANNELS],
    pub color_multiplier: BufferRef,
}

/// GPU-ready mesh: every attribute is a reference into a [`PackedBuffer`](crate::PackedBuffer).
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub indices: BufferRef,
    /// Number of indices to draw
    pub draw_count: u32,
    /// Number of entries in each vertex attribute array
    pub vertex_count: u32,
    pub positions: BufferRef,
    pub normals: BufferRef,
    pub uvs: [BufferRef; MAX_UV_CHANNELS],
    pub color_multiplier: BufferRef,
    pub joint_indices: [BufferRef; MAX_JOINT_CHANNELS],
    pub joint_weights: [BufferRef; MAX_JOINT_CHANNELS],
    pub material_type: MaterialType,
    pub material_id: u32,
    pub morph_targets: Vec<MorphTarget>,
    /// Alternative levels of detail, stored as given
    pub lods: Vec<Mesh>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            indices: BufferRef::NONE,
            draw_count: 0,
            vertex_count: 0,
            positions: BufferRef::NONE,
            normals: BufferRef::NONE,
            uvs: [BufferRef::NONE; MAX_UV_CHANNELS],
            color_multiplier: BufferRef::NONE,
            joint_indices: [BufferRef::NONE; MAX_JOINT_CHANNELS],
            joint_weights: [BufferRef::NONE; MAX_JOINT_CHANNELS],
            material_type: MaterialType::Unknown,
            material_id: NO_ID,
            morph_targets: Vec::new(),
            lods: Vec::new(),
        }
    }
}

impl Mesh {
    /// Number of UV channels in use (leading present channels).
    pub fn uv_channel_count(&self) -> usize {
        self.uvs.iter().take_while(|r| r.is_present()).count()
    }

    pub fn is_skinned(&self) -> bool {
        self.joint_indices[0].is_present() && self.joint_weights[0].is_present()
    }

    /// Every present array this mesh references, including its morph targets and LODs.
    ///
    /// Byte lengths follow the element layout: indices are `u32` per drawn
    /// index; positions and normals are `f32x3`, uvs `f32x2`, color
    /// multipliers `f32x4`, joint indices `u32` and joint weights `f32`, each
    /// per vertex. Morph targets share the owning mesh's counts.
    pub fn buffer_spans(&self) -> Vec<BufferSpan> {
        let draws = self.draw_count as u64;
        let vertices = self.vertex_count as u64;
        let mut spans = vec![
            BufferSpan::new("indices", self.indices, draws * INDEX_SIZE),
            BufferSpan::new("positions", self.positions, vertices * VEC3_SIZE),
            BufferSpan::new("normals", self.normals, vertices * VEC3_SIZE),
            BufferSpan::new("color_multiplier", self.color_multiplier, vertices * VEC4_SIZE),
        ];
        spans.extend(self.uvs.iter().map(|r| BufferSpan::new("uv", *r, vertices * VEC2_SIZE)));
        spans.extend(
            self.joint_indices
                .iter()
                .map(|r| BufferSpan::new("joint_indices", *r, vertices * INDEX_SIZE)),
        );
        spans.extend(
            self.joint_weights
                .iter()
                .map(|r| BufferSpan::new("joint_weights", *r, vertices * WEIGHT_SIZE)),
        );
        for target in &self.morph_targets {
            spans.extend([
                BufferSpan::new("morph_target.indices", target.indices, draws * INDEX_SIZE),
                BufferSpan::new("morph_target.positions", target.positions, vertices * VEC3_SIZE),
                BufferSpan::new("morph_target.normals", target.normals, vertices * VEC3_SIZE),
                BufferSpan::new(
                    "morph_target.color_multiplier",
                    target.color_multiplier,
                    vertices * VEC4_SIZE,
                ),
            ]);
            spans.extend(
                target
                    .uvs
                    .iter()
                    .map(|r| BufferSpan::new("morph_target.uv", *r, vertices * VEC2_SIZE)),
            );
        }
        for lod in &self.lods {
            spans.extend(lod.buffer_spans());
        }
        spans.retain(|span| span.reference.is_present());
        spans
    }
}
