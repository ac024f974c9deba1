use glam::{Mat4, Quat, Vec3};

use super::NO_ID;
use crate::BinString;

/// One joint of a skeleton; `children` are joint ids in the model's joint array.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonJoint {
    pub name: BinString,
    pub children: Vec<u32>,
    pub inverse_bind_pose: Mat4,
    pub rotation: Quat,
    pub translation: Vec3,
    pub scale: f32,
}

impl Default for SkeletonJoint {
    fn default() -> Self {
        Self {
            name: BinString::default(),
            children: Vec::new(),
            inverse_bind_pose: Mat4::IDENTITY,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub name: BinString,
    /// Parent node id, or [`NO_ID`]
    pub parent: u32,
    pub joints: Vec<u32>,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self {
            name: BinString::default(),
            parent: NO_ID,
            joints: Vec::new(),
        }
    }
}
