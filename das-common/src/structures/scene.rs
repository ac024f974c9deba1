use glam::{Mat4, Quat, Vec3};

use super::NO_ID;
use crate::BinString;

/// Named set of mesh ids drawn together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGroup {
    pub name: BinString,
    pub meshes: Vec<u32>,
}

/// Scene graph node. Children are node ids, not references.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: BinString,
    pub children: Vec<u32>,
    pub mesh_group_id: u32,
    pub skeleton_id: u32,
    pub custom_transform: Mat4,
    pub rotation: Quat,
    pub translation: Vec3,
    pub scale: f32,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            name: BinString::default(),
            children: Vec::new(),
            mesh_group_id: NO_ID,
            skeleton_id: NO_ID,
            custom_transform: Mat4::IDENTITY,
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

/// Root node ids of one scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub name: BinString,
    pub root_nodes: Vec<u32>,
}
