//! Averaged per-position normals
//!
//! Each triangle adds its unnormalized face normal (edge cross product) to
//! the running sum of its three positions, so larger triangles weigh more.
//! The sums are normalized once every triangle has been visited. Zero-area
//! triangles add nothing.

use glam::Vec3;
use hashbrown::{HashMap, HashSet};

use super::types::Triangle;
use crate::error::{Attribute, ConvertError};

/// Normal used when a position only touches degenerate triangles
pub const FALLBACK_NORMAL: Vec3 = Vec3::Y;

/// Which positions need an averaged normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothMode {
    /// Only positions used by a corner without a normal index
    MissingOnly,
    /// Every position, replacing source normals
    All,
}

/// Averaged normals keyed by position index.
#[derive(Debug, Clone, Default)]
pub struct SmoothedNormals {
    normals: HashMap<u32, Vec3>,
    /// Indices (into the triangle list) of zero-area triangles
    pub degenerate: Vec<usize>,
}

impl SmoothedNormals {
    pub fn get(&self, position: u32) -> Option<Vec3> {
        self.normals.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }
}

fn position(positions: &[Vec3], index: u32) -> Result<Vec3, ConvertError> {
    positions
        .get(index as usize)
        .copied()
        .ok_or(ConvertError::IndexOutOfRange {
            attribute: Attribute::Position,
            index,
            len: positions.len(),
        })
}

/// True when `mode` needs any smoothing work for these triangles.
pub fn needs_smoothing(triangles: &[Triangle], mode: SmoothMode) -> bool {
    match mode {
        SmoothMode::All => !triangles.is_empty(),
        SmoothMode::MissingOnly => triangles
            .iter()
            .flatten()
            .any(|corner| corner.normal.is_none()),
    }
}

/// Compute averaged normals for the positions selected by `mode`.
pub fn smooth_normals(
    triangles: &[Triangle],
    positions: &[Vec3],
    mode: SmoothMode,
) -> Result<SmoothedNormals, ConvertError> {
    let wanted: Option<HashSet<u32>> = match mode {
        SmoothMode::All => None,
        SmoothMode::MissingOnly => Some(
            triangles
                .iter()
                .flatten()
                .filter(|c| c.normal.is_none())
                .map(|c| c.position)
                .collect(),
        ),
    };
    let is_wanted = |index: u32| wanted.as_ref().is_none_or(|w| w.contains(&index));

    let mut sums: HashMap<u32, Vec3> = HashMap::new();
    let mut degenerate = Vec::new();

    for (triangle_index, triangle) in triangles.iter().enumerate() {
        let p0 = position(positions, triangle[0].position)?;
        let p1 = position(positions, triangle[1].position)?;
        let p2 = position(positions, triangle[2].position)?;

        let face_normal = (p1 - p0).cross(p2 - p0);
        let length_squared = face_normal.length_squared();
        let degenerate_triangle = !(length_squared > 0.0 && length_squared.is_finite());

        for corner in triangle {
            if !is_wanted(corner.position) {
                continue;
            }
            let sum = sums.entry(corner.position).or_insert(Vec3::ZERO);
            if !degenerate_triangle {
                *sum += face_normal;
            }
        }

        if degenerate_triangle {
            degenerate.push(triangle_index);
        }
    }

    let normals: HashMap<u32, Vec3> = sums
        .into_iter()
        .map(|(index, sum)| (index, sum.try_normalize().unwrap_or(FALLBACK_NORMAL)))
        .collect();

    tracing::debug!(
        "Smoothed {} normals over {} triangles ({} degenerate)",
        normals.len(),
        triangles.len(),
        degenerate.len()
    );

    Ok(SmoothedNormals {
        normals,
        degenerate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::Corner;

    fn tri(a: u32, b: u32, c: u32) -> Triangle {
        [
            Corner::new(a, None, None),
            Corner::new(b, None, None),
            Corner::new(c, None, None),
        ]
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_flat_quad_shared_diagonal() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let triangles = vec![tri(0, 1, 2), tri(0, 2, 3)];
        let smoothed = smooth_normals(&triangles, &positions, SmoothMode::All).unwrap();

        assert_eq!(smoothed.len(), 4);
        for i in 0..4 {
            assert!(approx(smoothed.get(i).unwrap(), Vec3::Z));
        }
        // Diagonal endpoints shared by both triangles agree
        assert_eq!(smoothed.get(0), smoothed.get(2));
    }

    #[test]
    fn test_corner_of_cube_averages() {
        // Three faces meeting at the origin, facing -x, -y, -z
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let triangles = vec![tri(0, 2, 1), tri(0, 3, 2), tri(0, 1, 3)];
        let smoothed = smooth_normals(&triangles, &positions, SmoothMode::All).unwrap();

        let expected = Vec3::new(-1.0, -1.0, -1.0).normalize();
        assert!(approx(smoothed.get(0).unwrap(), expected));
        for n in [smoothed.get(1), smoothed.get(2), smoothed.get(3)] {
            assert!((n.unwrap().length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_triangle_skipped() {
        let positions = vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::new(2.0, 0.0, 0.0),
        ];
        // Second triangle is collinear
        let triangles = vec![tri(0, 1, 2), tri(0, 1, 3)];
        let smoothed = smooth_normals(&triangles, &positions, SmoothMode::All).unwrap();

        assert_eq!(smoothed.degenerate, vec![1]);
        assert!(approx(smoothed.get(0).unwrap(), Vec3::Z));
        assert!(approx(smoothed.get(1).unwrap(), Vec3::Z));
        // Only touched by the degenerate triangle
        assert_eq!(smoothed.get(3), Some(FALLBACK_NORMAL));
    }

    #[test]
    fn test_missing_only_selects_positions() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let triangles = vec![[
            Corner::new(0, None, Some(0)),
            Corner::new(1, None, None),
            Corner::new(2, None, Some(0)),
        ]];

        assert!(needs_smoothing(&triangles, SmoothMode::MissingOnly));
        let smoothed = smooth_normals(&triangles, &positions, SmoothMode::MissingOnly).unwrap();
        assert_eq!(smoothed.len(), 1);
        assert!(smoothed.get(1).is_some());
        assert!(smoothed.get(0).is_none());
    }

    #[test]
    fn test_no_smoothing_needed_with_normals() {
        let triangles = vec![[
            Corner::new(0, None, Some(0)),
            Corner::new(1, None, Some(0)),
            Corner::new(2, None, Some(0)),
        ]];
        assert!(!needs_smoothing(&triangles, SmoothMode::MissingOnly));
        assert!(needs_smoothing(&triangles, SmoothMode::All));
        assert!(!needs_smoothing(&[], SmoothMode::All));
    }

    #[test]
    fn test_position_out_of_range() {
        let positions = vec![Vec3::ZERO, Vec3::X];
        let result = smooth_normals(&[tri(0, 1, 5)], &positions, SmoothMode::All);
        assert!(matches!(
            result,
            Err(ConvertError::IndexOutOfRange {
                attribute: Attribute::Position,
                index: 5,
                len: 2
            })
        ));
    }
}
