//! Error types shared by the data model and the container format.

use crate::structures::StructureIdentifier;

/// Failure to grow a [`PackedBuffer`](crate::PackedBuffer).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Buffer allocation failed: {requested} bytes requested on top of {current}")]
    AllocationFailure { requested: usize, current: usize },
}

/// Error type for reading and writing `.das` containers.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad magic number: {0:#018x}")]
    BadMagic(u64),

    #[error("Expected {expected:?} record, found tag {found:#04x}")]
    UnexpectedStructure {
        expected: StructureIdentifier,
        found: u8,
    },

    #[error("Unexpected end of data")]
    UnexpectedEof,

    #[error("String of {0} bytes exceeds the 65535 byte limit")]
    StringTooLong(usize),

    #[error("String is not valid UTF-8")]
    InvalidUtf8,

    #[error("Invalid {kind} value: {value}")]
    InvalidEnum { kind: &'static str, value: u8 },

    #[error("Animation channel value does not match target {0:?}")]
    ChannelMismatch(crate::structures::AnimationTarget),

    #[error("Animation channel mixes plain and spline keyframes")]
    MixedKeyframes,

    #[error("Compressed payloads are not supported (zlib level {0})")]
    UnsupportedCompression(u8),

    #[error("{field} ({len} bytes at buffer {buffer_id}, offset {offset}) is out of bounds")]
    DanglingReference {
        field: &'static str,
        buffer_id: u32,
        offset: u32,
        len: u64,
    },

    #[error(transparent)]
    Buffer(#[from] BufferError),
}
