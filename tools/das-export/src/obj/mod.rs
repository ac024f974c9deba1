//! Wavefront OBJ input

mod parser;
mod types;

pub use parser::{load_obj, parse_obj};
pub use types::{Corner, Face, Group, Object};
