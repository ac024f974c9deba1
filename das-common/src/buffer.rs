//! Append-only byte storage for vertex and index arrays.
//!
//! A [`PackedBuffer`] only ever grows. Every push returns the byte offset at
//! which its data begins, and that offset stays valid for the lifetime of the
//! buffer no matter how many pushes follow.

use bytemuck::Pod;

use crate::error::BufferError;

/// Append-only, write-once byte store referenced by (buffer id, offset) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedBuffer {
    data: Vec<u8>,
}

impl PackedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer from bytes previously produced by [`PackedBuffer::as_bytes`].
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, BufferError> {
        if data.len() > u32::MAX as usize {
            return Err(BufferError::AllocationFailure {
                requested: data.len(),
                current: 0,
            });
        }
        Ok(Self { data })
    }

    /// Append `items` and return the byte offset of the first appended byte.
    ///
    /// The returned offset equals [`size`](Self::size) before the call. On
    /// failure the buffer is left exactly as it was.
    pub fn push<T: Pod>(&mut self, items: &[T]) -> Result<u32, BufferError> {
        self.push_bytes(bytemuck::cast_slice(items))
    }

    /// Byte-level variant of [`push`](Self::push).
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<u32, BufferError> {
        let offset = self.data.len();
        self.reserve(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(offset as u32)
    }

    /// Make room for `additional` more bytes without changing the contents.
    ///
    /// Lets a caller that pushes several arrays fail before the first push.
    pub fn reserve(&mut self, additional: usize) -> Result<(), BufferError> {
        let current = self.data.len();
        let failure = BufferError::AllocationFailure {
            requested: additional,
            current,
        };

        // Offsets are stored as u32 in mesh records
        match current.checked_add(additional) {
            Some(end) if end <= u32::MAX as usize => {}
            _ => return Err(failure),
        }
        self.data.try_reserve(additional).map_err(|_| failure)
    }

    /// Total length in bytes.
    #[inline]
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes from `offset` to the end of the buffer.
    pub fn get(&self, offset: u32) -> Option<&[u8]> {
        self.data.get(offset as usize..)
    }

    /// Copy `count` elements of `T` starting at `offset`.
    ///
    /// Offsets carry no alignment guarantee, so the elements are copied out
    /// rather than borrowed.
    pub fn read<T: Pod>(&self, offset: u32, count: usize) -> Option<Vec<T>> {
        let len = count.checked_mul(std::mem::size_of::<T>())?;
        let start = offset as usize;
        let bytes = self.data.get(start..start.checked_add(len)?)?;
        Some(bytemuck::pod_collect_to_vec(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
