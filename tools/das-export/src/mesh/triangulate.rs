//! Fan triangulation of polygon faces
//!
//! Corner 0 is the pivot: a face with k corners becomes the k-2 triangles
//! (0, i, i+1). Corners keep their original indices. Planarity and convexity
//! are not checked, so concave or self-intersecting polygons produce
//! overlapping triangles.

use super::types::Triangle;
use crate::error::ConvertError;
use crate::obj::{Face, Group};

/// Triangles of one face, or `None` if it has fewer than 3 corners.
pub fn triangulate_face(face: &Face) -> Option<impl Iterator<Item = Triangle> + '_> {
    let corners = &face.corners;
    if corners.len() < 3 {
        return None;
    }
    Some((1..corners.len() - 1).map(move |i| [corners[0], corners[i], corners[i + 1]]))
}

/// Triangulate every face of `group` in order.
pub fn triangulate_group(group: &Group) -> Result<Vec<Triangle>, ConvertError> {
    let capacity = group
        .faces
        .iter()
        .map(|f| f.corners.len().saturating_sub(2))
        .sum();
    let mut triangles = Vec::with_capacity(capacity);

    for (index, face) in group.faces.iter().enumerate() {
        let fan = triangulate_face(face).ok_or_else(|| ConvertError::InvalidFace {
            group: group.name.clone(),
            face: index,
            corners: face.corners.len(),
        })?;
        triangles.extend(fan);
    }

    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::Corner;

    fn polygon(k: u32) -> Face {
        Face::new((0..k).map(|i| Corner::new(i, Some(i + 10), Some(i + 20))))
    }

    #[test]
    fn test_triangle_count() {
        for k in 3..12 {
            let count = triangulate_face(&polygon(k)).unwrap().count();
            assert_eq!(count, k as usize - 2);
        }
    }

    #[test]
    fn test_quad_fan_order() {
        let triangles: Vec<Triangle> = triangulate_face(&polygon(4)).unwrap().collect();
        let positions: Vec<[u32; 3]> = triangles
            .iter()
            .map(|t| [t[0].position, t[1].position, t[2].position])
            .collect();
        assert_eq!(positions, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_corners_preserved_and_covered() {
        let face = polygon(7);
        let triangles: Vec<Triangle> = triangulate_face(&face).unwrap().collect();

        for corner in &face.corners {
            assert!(triangles.iter().any(|t| t.contains(corner)));
        }
        // Every boundary edge (i, i+1) appears in some triangle
        for i in 0..face.corners.len() {
            let a = face.corners[i];
            let b = face.corners[(i + 1) % face.corners.len()];
            assert!(triangles.iter().any(|t| t.contains(&a) && t.contains(&b)));
        }
        // No new or altered corners
        for t in &triangles {
            for c in t {
                assert_eq!(c.uv, Some(c.position + 10));
                assert_eq!(c.normal, Some(c.position + 20));
            }
        }
    }

    #[test]
    fn test_short_faces_rejected() {
        for k in 0..3 {
            assert!(triangulate_face(&polygon(k)).is_none());
        }

        let mut group = crate::obj::Group::new("lid");
        group.faces.push(polygon(3));
        group.faces.push(polygon(2));
        match triangulate_group(&group) {
            Err(ConvertError::InvalidFace {
                group,
                face,
                corners,
            }) => {
                assert_eq!(group, "lid");
                assert_eq!(face, 1);
                assert_eq!(corners, 2);
            }
            other => panic!("expected InvalidFace, got {:?}", other),
        }
    }
}
