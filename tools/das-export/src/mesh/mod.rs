//! Geometry pipeline: triangulate, smooth, unify, assemble

mod assemble;
mod smooth;
mod triangulate;
mod types;
mod unify;

pub use assemble::assemble_mesh;
pub use smooth::{FALLBACK_NORMAL, SmoothMode, SmoothedNormals, needs_smoothing, smooth_normals};
pub use triangulate::{triangulate_face, triangulate_group};
pub use types::{Diagnostic, GroupGeometry, MeshStats, Triangle, UnifiedMesh};
pub use unify::{CornerResolver, UnifiedVertex, VertexUnifier};

use crate::error::ConvertError;
use crate::obj::{Group, Object};

/// Run every stage before assembly for one group of `object`.
///
/// With `force_smooth` every corner gets an averaged normal, otherwise only
/// corners that came without one.
pub fn process_group(
    object: &Object,
    group: &Group,
    force_smooth: bool,
) -> Result<GroupGeometry, ConvertError> {
    let triangles = triangulate_group(group)?;

    let mode = if force_smooth {
        SmoothMode::All
    } else {
        SmoothMode::MissingOnly
    };
    let smoothed = if needs_smoothing(&triangles, mode) {
        smooth_normals(&triangles, &object.positions, mode)?
    } else {
        SmoothedNormals::default()
    };

    let resolver = CornerResolver::new(object, &smoothed, force_smooth);
    let mut unifier = VertexUnifier::with_capacity(triangles.len() * 3);
    unifier.push_triangles(&triangles, &resolver)?;
    let unified = unifier.finish();

    let diagnostics: Vec<Diagnostic> = smoothed
        .degenerate
        .iter()
        .map(|&triangle| {
            tracing::warn!(
                "Degenerate triangle {} in group '{}' skipped for normal smoothing",
                triangle,
                group.name
            );
            Diagnostic::DegenerateGeometry {
                group: group.name.clone(),
                triangle,
            }
        })
        .collect();

    let stats = MeshStats {
        name: group.name.clone(),
        face_count: group.faces.len(),
        triangle_count: triangles.len(),
        vertex_count: unified.vertex_count(),
        index_count: unified.index_count(),
        smoothed_positions: smoothed.len(),
    };

    tracing::debug!(
        "Group '{}': {} faces -> {} triangles, {} unique vertices",
        group.name,
        stats.face_count,
        stats.triangle_count,
        stats.vertex_count
    );

    Ok(GroupGeometry {
        unified,
        stats,
        diagnostics,
    })
}
