//! Input-side geometry as read from an OBJ file

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

/// One face corner: 0-based indices into the object's attribute arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Corner {
    pub position: u32,
    pub uv: Option<u32>,
    pub normal: Option<u32>,
}

impl Corner {
    pub const fn new(position: u32, uv: Option<u32>, normal: Option<u32>) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }
}

/// Polygon with any number of corners. Fewer than 3 is kept as read and
/// rejected during triangulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Face {
    pub corners: SmallVec<[Corner; 4]>,
}

impl Face {
    pub fn new(corners: impl IntoIterator<Item = Corner>) -> Self {
        Self {
            corners: corners.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub name: String,
    pub faces: Vec<Face>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
        }
    }
}

/// Parsed OBJ object: shared attribute arrays plus faces grouped by `o`/`g`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub groups: Vec<Group>,
}

impl Object {
    pub fn face_count(&self) -> usize {
        self.groups.iter().map(|g| g.faces.len()).sum()
    }
}
