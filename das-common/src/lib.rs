//! Shared types for das2 model files
//!
//! This crate provides the data model shared between:
//! - `das-export` (OBJ conversion pipeline and CLI)
//! - any runtime that loads `.das` files
//!
//! # Modules
//!
//! - [`buffer`] - Append-only packed byte buffers
//! - [`structures`] - Mesh, scene, skeleton, animation and material records
//! - [`model`] - The aggregate [`Model`] and its [`Header`]
//! - [`formats`] - Container reader and writer

pub mod bin_string;
pub mod buffer;
pub mod error;
pub mod formats;
pub mod model;
pub mod structures;

pub use bin_string::BinString;
pub use buffer::PackedBuffer;
pub use error::{BufferError, FormatError};
pub use model::{DAS_EXT, DAS_MAGIC, Header, Model};

// Re-export commonly used structure items
pub use structures::{
    Animation, AnimationChannel, AnimationTarget, BufferRef, BufferSpan, ChannelValue,
    InterpolationType, MAX_JOINT_CHANNELS, MAX_UV_CHANNELS, MaterialPbr, MaterialPhong,
    MaterialType, Mesh, MeshGroup, MorphTarget, NO_ID, Node, Scene, Skeleton, SkeletonJoint,
    StructureIdentifier,
};

pub use formats::{load_model, read_model, save_model, write_model};
