//! Error types for OBJ reading and mesh conversion

use std::fmt;

use das_common::BufferError;

/// Attribute array an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Uv,
    Normal,
    /// Unified output vertex
    Vertex,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Attribute::Position => "position",
            Attribute::Uv => "uv",
            Attribute::Normal => "normal",
            Attribute::Vertex => "vertex",
        })
    }
}

/// Conversion failure. Aborts the mesh being converted; nothing is committed.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Face {face} in group '{group}' has {corners} corners, at least 3 required")]
    InvalidFace {
        group: String,
        face: usize,
        corners: usize,
    },

    #[error("{attribute} index {index} out of range ({len} available)")]
    IndexOutOfRange {
        attribute: Attribute,
        index: u32,
        len: usize,
    },

    #[error(transparent)]
    AllocationFailure(#[from] BufferError),
}

/// OBJ reading failure.
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
}
