//! Vertex unification
//!
//! Every triangle corner is resolved to a concrete (position, uv, normal)
//! value. Structurally equal values share one output index; the first corner
//! seen in traversal order assigns it.

use std::hash::{Hash, Hasher};

use glam::{Vec2, Vec3};
use hashbrown::HashMap;

use super::smooth::{FALLBACK_NORMAL, SmoothedNormals};
use super::types::{Triangle, UnifiedMesh};
use crate::error::{Attribute, ConvertError};
use crate::obj::{Corner, Object};

/// Golden-ratio constant of the hash combine step
const HASH_PRIME: u64 = 0x9e37_79b9;

/// Canonical vertex value; equality is bitwise on every coordinate.
#[derive(Debug, Clone, Copy)]
pub struct UnifiedVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

#[inline]
fn hash_combine(seed: u64, value: f32) -> u64 {
    seed ^ (value.to_bits() as u64)
        .wrapping_add(HASH_PRIME)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

impl UnifiedVertex {
    pub const fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }

    fn bits(&self) -> [u32; 8] {
        [
            self.position.x.to_bits(),
            self.position.y.to_bits(),
            self.position.z.to_bits(),
            self.uv.x.to_bits(),
            self.uv.y.to_bits(),
            self.normal.x.to_bits(),
            self.normal.y.to_bits(),
            self.normal.z.to_bits(),
        ]
    }

    /// Order-sensitive combine of position, then normal, then uv components.
    pub fn combined_hash(&self) -> u64 {
        self.position
            .to_array()
            .into_iter()
            .chain(self.normal.to_array())
            .chain(self.uv.to_array())
            .fold(0, hash_combine)
    }
}

impl PartialEq for UnifiedVertex {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for UnifiedVertex {}

impl Hash for UnifiedVertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.combined_hash());
    }
}

/// Resolves corners against an object's attribute arrays.
pub struct CornerResolver<'a> {
    object: &'a Object,
    smoothed: &'a SmoothedNormals,
    /// Use smoothed normals even where the corner has its own
    force_smoothed: bool,
}

impl<'a> CornerResolver<'a> {
    pub fn new(object: &'a Object, smoothed: &'a SmoothedNormals, force_smoothed: bool) -> Self {
        Self {
            object,
            smoothed,
            force_smoothed,
        }
    }

    pub fn resolve(&self, corner: &Corner) -> Result<UnifiedVertex, ConvertError> {
        let position = lookup(&self.object.positions, corner.position, Attribute::Position)?;
        let uv = match corner.uv {
            Some(index) => lookup(&self.object.uvs, index, Attribute::Uv)?,
            None => Vec2::ZERO,
        };
        let normal = match corner.normal {
            Some(index) if !self.force_smoothed => {
                lookup(&self.object.normals, index, Attribute::Normal)?
            }
            _ => self
                .smoothed
                .get(corner.position)
                .unwrap_or(FALLBACK_NORMAL),
        };
        Ok(UnifiedVertex::new(position, uv, normal))
    }
}

fn lookup<T: Copy>(items: &[T], index: u32, attribute: Attribute) -> Result<T, ConvertError> {
    items
        .get(index as usize)
        .copied()
        .ok_or(ConvertError::IndexOutOfRange {
            attribute,
            index,
            len: items.len(),
        })
}

/// Deduplicates vertices and records the index of every pushed corner.
#[derive(Debug, Default)]
pub struct VertexUnifier {
    reindex: HashMap<UnifiedVertex, u32>,
    mesh: UnifiedMesh,
}

impl VertexUnifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(corners: usize) -> Self {
        Self {
            reindex: HashMap::with_capacity(corners),
            mesh: UnifiedMesh {
                indices: Vec::with_capacity(corners),
                ..Default::default()
            },
        }
    }

    /// Append one corner and return its output index.
    pub fn push(&mut self, vertex: UnifiedVertex) -> u32 {
        let mesh = &mut self.mesh;
        let index = *self.reindex.entry(vertex).or_insert_with(|| {
            let next = mesh.positions.len() as u32;
            mesh.positions.push(vertex.position);
            mesh.uvs.push(vertex.uv);
            mesh.normals.push(vertex.normal);
            next
        });
        mesh.indices.push(index);
        index
    }

    /// Resolve and push every corner of `triangles` in order.
    pub fn push_triangles(
        &mut self,
        triangles: &[Triangle],
        resolver: &CornerResolver<'_>,
    ) -> Result<(), ConvertError> {
        for corner in triangles.iter().flatten() {
            let vertex = resolver.resolve(corner)?;
            self.push(vertex);
            self.mesh.has_uvs |= corner.uv.is_some();
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> u32 {
        self.mesh.vertex_count()
    }

    pub fn finish(self) -> UnifiedMesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(p: [f32; 3], uv: [f32; 2], n: [f32; 3]) -> UnifiedVertex {
        UnifiedVertex::new(Vec3::from(p), Vec2::from(uv), Vec3::from(n))
    }

    #[test]
    fn test_equal_vertices_share_index() {
        let mut unifier = VertexUnifier::new();
        let a = vertex([0.0, 1.0, 2.0], [0.5, 0.5], [0.0, 0.0, 1.0]);
        let b = vertex([1.0, 1.0, 2.0], [0.5, 0.5], [0.0, 0.0, 1.0]);

        assert_eq!(unifier.push(a), 0);
        assert_eq!(unifier.push(b), 1);
        assert_eq!(unifier.push(a), 0);
        assert_eq!(unifier.vertex_count(), 2);

        let mesh = unifier.finish();
        assert_eq!(mesh.indices, vec![0, 1, 0]);
        assert_eq!(mesh.positions.len(), 2);
        assert_eq!(mesh.uvs.len(), 2);
        assert_eq!(mesh.normals.len(), 2);
    }

    #[test]
    fn test_no_false_merges() {
        let base = vertex([1.0, 2.0, 3.0], [0.25, 0.75], [0.0, 1.0, 0.0]);
        let variants = [
            vertex([1.0, 2.0, 3.0], [0.25, 0.5], [0.0, 1.0, 0.0]), // uv differs
            vertex([1.0, 2.0, 3.0], [0.25, 0.75], [1.0, 0.0, 0.0]), // normal differs
            vertex([1.0, 2.0, 3.5], [0.25, 0.75], [0.0, 1.0, 0.0]), // position differs
            vertex([1.0, 2.0, 3.0], [0.75, 0.25], [0.0, 1.0, 0.0]), // uv swapped
        ];

        let mut unifier = VertexUnifier::new();
        unifier.push(base);
        for (i, v) in variants.iter().enumerate() {
            assert_eq!(unifier.push(*v), i as u32 + 1);
        }
        assert_eq!(unifier.vertex_count(), 5);
    }

    #[test]
    fn test_signed_zero_is_distinct() {
        let a = vertex([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 1.0, 0.0]);
        let b = vertex([-0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_ne!(a, b);

        let mut unifier = VertexUnifier::new();
        unifier.push(a);
        assert_eq!(unifier.push(b), 1);
    }

    #[test]
    fn test_hash_is_deterministic_and_order_sensitive() {
        let a = vertex([1.0, 2.0, 3.0], [4.0, 5.0], [6.0, 7.0, 8.0]);
        assert_eq!(a.combined_hash(), a.combined_hash());
        let same = vertex([1.0, 2.0, 3.0], [4.0, 5.0], [6.0, 7.0, 8.0]);
        assert_eq!(a.combined_hash(), same.combined_hash());

        // Swapping components across or within sub-vectors changes the hash
        let swapped = vertex([6.0, 7.0, 8.0], [4.0, 5.0], [1.0, 2.0, 3.0]);
        let permuted = vertex([2.0, 1.0, 3.0], [4.0, 5.0], [6.0, 7.0, 8.0]);
        assert_ne!(a.combined_hash(), swapped.combined_hash());
        assert_ne!(a.combined_hash(), permuted.combined_hash());
    }

    #[test]
    fn test_hash_combine_first_step() {
        // A single zero component folds to the prime itself
        assert_eq!(hash_combine(0, 0.0), HASH_PRIME);
        assert_eq!(
            hash_combine(HASH_PRIME, 1.0),
            HASH_PRIME
                ^ (1.0f32.to_bits() as u64 + HASH_PRIME + (HASH_PRIME << 6) + (HASH_PRIME >> 2))
        );
    }

    #[test]
    fn test_empty_input() {
        let mesh = VertexUnifier::new().finish();
        assert!(mesh.indices.is_empty());
        assert!(mesh.positions.is_empty());
        assert!(!mesh.has_uvs);
    }

    #[test]
    fn test_resolver_prefers_source_normals() {
        let object = Object {
            positions: vec![Vec3::ZERO, Vec3::X],
            uvs: vec![Vec2::new(0.5, 0.5)],
            normals: vec![Vec3::NEG_Z],
            ..Default::default()
        };
        let smoothed = SmoothedNormals::default();
        let resolver = CornerResolver::new(&object, &smoothed, false);

        let v = resolver.resolve(&Corner::new(1, Some(0), Some(0))).unwrap();
        assert_eq!(v.position, Vec3::X);
        assert_eq!(v.uv, Vec2::new(0.5, 0.5));
        assert_eq!(v.normal, Vec3::NEG_Z);

        // No uv and no smoothed normal available
        let v = resolver.resolve(&Corner::new(0, None, None)).unwrap();
        assert_eq!(v.uv, Vec2::ZERO);
        assert_eq!(v.normal, FALLBACK_NORMAL);
    }

    #[test]
    fn test_resolver_index_errors() {
        let object = Object {
            positions: vec![Vec3::ZERO],
            ..Default::default()
        };
        let smoothed = SmoothedNormals::default();
        let resolver = CornerResolver::new(&object, &smoothed, false);

        assert!(matches!(
            resolver.resolve(&Corner::new(3, None, None)),
            Err(ConvertError::IndexOutOfRange {
                attribute: Attribute::Position,
                index: 3,
                len: 1
            })
        ));
        assert!(matches!(
            resolver.resolve(&Corner::new(0, Some(0), None)),
            Err(ConvertError::IndexOutOfRange {
                attribute: Attribute::Uv,
                ..
            })
        ));
        assert!(matches!(
            resolver.resolve(&Corner::new(0, None, Some(2))),
            Err(ConvertError::IndexOutOfRange {
                attribute: Attribute::Normal,
                ..
            })
        ));
    }
}
