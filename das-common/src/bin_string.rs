//! Length-prefixed string used for names and URIs in `.das` records.

use std::fmt;

use xxhash_rust::xxh3::xxh3_64;

use crate::error::FormatError;

/// Owned UTF-8 string of at most `u16::MAX` bytes, identified by its hash.
#[derive(Debug, Clone, Default)]
pub struct BinString {
    value: String,
    hash: u64,
}

impl BinString {
    pub const MAX_LEN: usize = u16::MAX as usize;

    pub fn new(value: impl Into<String>) -> Result<Self, FormatError> {
        let value = value.into();
        if value.len() > Self::MAX_LEN {
            return Err(FormatError::StringTooLong(value.len()));
        }
        let hash = if value.is_empty() {
            0
        } else {
            xxh3_64(value.as_bytes())
        };
        Ok(Self { value, hash })
    }

    /// Build from a name that is known to fit, truncating at a char boundary otherwise.
    pub fn truncated(value: &str) -> Self {
        let mut end = value.len().min(Self::MAX_LEN);
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        Self {
            value: value[..end].to_string(),
            hash: if end == 0 { 0 } else { xxh3_64(&value.as_bytes()[..end]) },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn len(&self) -> u16 {
        self.value.len() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for BinString {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for BinString {}

impl std::hash::Hash for BinString {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Display for BinString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
