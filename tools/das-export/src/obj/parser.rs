//! OBJ text parsing

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::{Vec2, Vec3};

use super::types::{Corner, Face, Group, Object};
use crate::error::ObjError;

const DEFAULT_GROUP: &str = "default";

/// Load an OBJ file; the object is named after the file stem.
pub fn load_obj(input: &Path) -> Result<Object, ObjError> {
    let file = File::open(input)?;
    let name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_GROUP);
    parse_obj(BufReader::new(file), name)
}

/// Parse OBJ text into an [`Object`].
///
/// Handles `v`, `vt`, `vn`, `f`, `o` and `g`. Other statements (`s`,
/// `usemtl`, `mtllib`, `l`, `p`, ...) are skipped. Groups without faces are
/// dropped.
pub fn parse_obj<R: BufRead>(reader: R, name: &str) -> Result<Object, ObjError> {
    let mut object = Object {
        name: name.to_string(),
        ..Default::default()
    };
    let mut current = Group::new(DEFAULT_GROUP);

    for (line_index, line) in reader.lines().enumerate() {
        let line_number = line_index + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        let parts: Vec<&str> = parts.collect();
        let error = |message: String| ObjError::Parse {
            line: line_number,
            message,
        };

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&parts, 3).map_err(error)?;
                object.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                // v defaults to 0, w is ignored
                let [u, v] = parse_floats::<2>(&parts, 1).map_err(error)?;
                object.uvs.push(Vec2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&parts, 3).map_err(error)?;
                object.normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let corners = parts
                    .iter()
                    .map(|token| parse_corner(token, &object))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(error)?;
                current.faces.push(Face::new(corners));
            }
            "o" | "g" => {
                let group_name = if parts.is_empty() {
                    DEFAULT_GROUP.to_string()
                } else {
                    parts.join(" ")
                };
                let finished = std::mem::replace(&mut current, Group::new(group_name));
                if !finished.faces.is_empty() {
                    object.groups.push(finished);
                }
            }
            _ => {
                tracing::trace!("Skipping OBJ statement '{}' on line {}", keyword, line_number);
            }
        }
    }

    if !current.faces.is_empty() {
        object.groups.push(current);
    }

    tracing::debug!(
        "Parsed OBJ '{}': {} positions, {} uvs, {} normals, {} groups, {} faces",
        object.name,
        object.positions.len(),
        object.uvs.len(),
        object.normals.len(),
        object.groups.len(),
        object.face_count()
    );

    Ok(object)
}

/// Parse up to `N` floats, requiring at least `required`; missing ones are 0.
fn parse_floats<const N: usize>(parts: &[&str], required: usize) -> Result<[f32; N], String> {
    if parts.len() < required {
        return Err(format!(
            "expected at least {} values, found {}",
            required,
            parts.len()
        ));
    }
    let mut values = [0.0; N];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = part
            .parse()
            .map_err(|_| format!("invalid number '{}'", part))?;
    }
    Ok(values)
}

/// Parse a face corner: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_corner(token: &str, object: &Object) -> Result<Corner, String> {
    let mut parts = token.split('/');

    let position = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing position index in '{}'", token))?;
    let position = resolve_index(position, object.positions.len())?;

    let uv = match parts.next().filter(|s| !s.is_empty()) {
        Some(s) => Some(resolve_index(s, object.uvs.len())?),
        None => None,
    };
    let normal = match parts.next().filter(|s| !s.is_empty()) {
        Some(s) => Some(resolve_index(s, object.normals.len())?),
        None => None,
    };

    Ok(Corner::new(position, uv, normal))
}

/// OBJ indices are 1-based; negative indices count back from the last element read so far.
fn resolve_index(s: &str, len: usize) -> Result<u32, String> {
    let index: i64 = s
        .parse()
        .map_err(|_| format!("invalid index '{}'", s))?;
    let resolved = match index {
        0 => return Err("index 0 is not valid in OBJ".to_string()),
        i if i > 0 => i - 1,
        i => len as i64 + i,
    };
    u32::try_from(resolved).map_err(|_| format!("index {} out of range", index))
}
