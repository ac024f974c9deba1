//! Types shared by the conversion stages

use glam::{Vec2, Vec3};

use crate::obj::Corner;

/// Fan-triangulated face: three corners with their original indices.
pub type Triangle = [Corner; 3];

/// Deduplicated vertex arrays and the index buffer into them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedMesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    /// At least one source corner carried a texture coordinate
    pub has_uvs: bool,
}

impl UnifiedMesh {
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Non-fatal finding recorded during conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Zero-area triangle; skipped for normal smoothing, still drawn.
    DegenerateGeometry { group: String, triangle: usize },
}

/// Per-mesh conversion statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub name: String,
    pub face_count: usize,
    pub triangle_count: usize,
    pub vertex_count: u32,
    pub index_count: u32,
    /// Positions that received an averaged normal
    pub smoothed_positions: usize,
}

/// Output of the geometry stages for one group, ready for assembly.
#[derive(Debug, Clone, Default)]
pub struct GroupGeometry {
    pub unified: UnifiedMesh,
    pub stats: MeshStats,
    pub diagnostics: Vec<Diagnostic>,
}
