//! das-export library
//!
//! Converts OBJ geometry into das2 models: fan triangulation, averaged
//! normals for corners that lack them, vertex deduplication, and packing of
//! the unified arrays into a shared buffer. Used by the `das-export` binary
//! and by tools that build models in memory.

pub mod convert;
pub mod error;
pub mod manifest;
pub mod mesh;
pub mod obj;

pub use convert::{
    ConversionReport, ConvertOptions, ConvertedModel, convert_obj, convert_obj_to_memory,
    convert_object,
};
pub use error::{Attribute, ConvertError, ObjError};
pub use mesh::{Diagnostic, MeshStats};
pub use obj::{load_obj, parse_obj};
