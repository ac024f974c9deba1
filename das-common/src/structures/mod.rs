//! Plain records stored in a `.das` model.
//!
//! Cross-record relationships (node children, skeleton joints, mesh group
//! members) are indices into the flat arrays owned by [`Model`](crate::Model).
//! Optional references use [`NO_ID`].

mod animation;
mod material;
mod mesh;
mod scene;
mod skeleton;

pub use animation::*;
pub use material::*;
pub use mesh::*;
pub use scene::*;
pub use skeleton::*;

/// Sentinel id meaning "this channel or reference is absent".
///
/// Id 0 is a regular id; only this value marks absence.
pub const NO_ID: u32 = u32::MAX;

/// Number of UV channels a mesh can reference
pub const MAX_UV_CHANNELS: usize = 8;

/// Number of skinning joint index/weight channel pairs a mesh can reference
pub const MAX_JOINT_CHANNELS: usize = 8;

/// Tag byte written before each record for deserialization dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StructureIdentifier {
    Unknown = 0x00,
    Buffer = 0x01,
    Mesh = 0x02,
    MorphTarget = 0x03,
    MeshGroup = 0x04,
    Node = 0x05,
    Scene = 0x06,
    SkeletonJoint = 0x07,
    Skeleton = 0x08,
    Animation = 0x09,
    AnimationChannel = 0x0a,
    MaterialPhong = 0x0b,
    MaterialPbr = 0x0c,
}

impl StructureIdentifier {
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0x00 => Self::Unknown,
            0x01 => Self::Buffer,
            0x02 => Self::Mesh,
            0x03 => Self::MorphTarget,
            0x04 => Self::MeshGroup,
            0x05 => Self::Node,
            0x06 => Self::Scene,
            0x07 => Self::SkeletonJoint,
            0x08 => Self::Skeleton,
            0x09 => Self::Animation,
            0x0a => Self::AnimationChannel,
            0x0b => Self::MaterialPhong,
            0x0c => Self::MaterialPbr,
            _ => return None,
        })
    }
}

/// (buffer id, byte offset) pair locating one attribute array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRef {
    pub buffer_id: u32,
    pub offset: u32,
}

impl BufferRef {
    /// Reference for an absent channel
    pub const NONE: Self = Self {
        buffer_id: NO_ID,
        offset: 0,
    };

    pub const fn new(buffer_id: u32, offset: u32) -> Self {
        Self { buffer_id, offset }
    }

    #[inline]
    pub const fn is_present(&self) -> bool {
        self.buffer_id != NO_ID
    }
}

impl Default for BufferRef {
    fn default() -> Self {
        Self::NONE
    }
}
