//! Binary container format for `.das` model files.
//!
//! All values are little-endian. Records are prefixed with their
//! [`StructureIdentifier`](crate::StructureIdentifier) tag byte.

mod container;
mod records;
mod serialization;

pub use container::{load_model, read_header, read_model, save_model, write_model};
pub use serialization::{ByteReader, ByteWriter, Record, read_section, write_section};
