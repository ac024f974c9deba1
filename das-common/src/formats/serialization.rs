//! Little-endian primitives and the [`Record`] trait.
//!
//! Every record kind implements `Record` so the container writer and reader
//! can handle all of them through one tagged interface.

use std::io::{Read, Write};

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::BinString;
use crate::error::FormatError;
use crate::structures::{BufferRef, StructureIdentifier};

/// Little-endian writer for container primitives.
pub struct ByteWriter<W: Write> {
    inner: W,
}

impl<W: Write> ByteWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    pub fn u8(&mut self, v: u8) -> Result<(), FormatError> {
        self.bytes(&[v])
    }

    pub fn u16(&mut self, v: u16) -> Result<(), FormatError> {
        self.bytes(&v.to_le_bytes())
    }

    pub fn u32(&mut self, v: u32) -> Result<(), FormatError> {
        self.bytes(&v.to_le_bytes())
    }

    pub fn u64(&mut self, v: u64) -> Result<(), FormatError> {
        self.bytes(&v.to_le_bytes())
    }

    pub fn f32(&mut self, v: f32) -> Result<(), FormatError> {
        self.bytes(&v.to_le_bytes())
    }

    pub fn f32s(&mut self, values: &[f32]) -> Result<(), FormatError> {
        values.iter().try_for_each(|v| self.f32(*v))
    }

    pub fn vec3(&mut self, v: Vec3) -> Result<(), FormatError> {
        self.f32s(&v.to_array())
    }

    pub fn vec4(&mut self, v: Vec4) -> Result<(), FormatError> {
        self.f32s(&v.to_array())
    }

    pub fn quat(&mut self, q: Quat) -> Result<(), FormatError> {
        self.f32s(&q.to_array())
    }

    pub fn mat4(&mut self, m: &Mat4) -> Result<(), FormatError> {
        self.f32s(&m.to_cols_array())
    }

    pub fn string(&mut self, s: &BinString) -> Result<(), FormatError> {
        self.u16(s.len())?;
        self.bytes(s.as_str().as_bytes())
    }

    pub fn buffer_ref(&mut self, r: BufferRef) -> Result<(), FormatError> {
        self.u32(r.buffer_id)?;
        self.u32(r.offset)
    }

    pub fn ids(&mut self, ids: &[u32]) -> Result<(), FormatError> {
        self.u32(ids.len() as u32)?;
        ids.iter().try_for_each(|id| self.u32(*id))
    }

    pub fn tag(&mut self, id: StructureIdentifier) -> Result<(), FormatError> {
        self.u8(id as u8)
    }
}

/// Little-endian reader mirroring [`ByteWriter`].
pub struct ByteReader<R: Read> {
    inner: R,
}

impl<R: Read> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf).map_err(eof)?;
        Ok(buf)
    }

    pub fn bytes(&mut self, len: usize) -> Result<Vec<u8>, FormatError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| FormatError::UnexpectedEof)?;
        (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut buf)?;
        if buf.len() != len {
            return Err(FormatError::UnexpectedEof);
        }
        Ok(buf)
    }

    pub fn u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.array::<1>()?[0])
    }

    pub fn u16(&mut self) -> Result<u16, FormatError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    pub fn u32(&mut self) -> Result<u32, FormatError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub fn u64(&mut self) -> Result<u64, FormatError> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    pub fn f32(&mut self) -> Result<f32, FormatError> {
        Ok(f32::from_le_bytes(self.array()?))
    }

    pub fn f32s<const N: usize>(&mut self) -> Result<[f32; N], FormatError> {
        let mut out = [0.0; N];
        for v in &mut out {
            *v = self.f32()?;
        }
        Ok(out)
    }

    pub fn vec3(&mut self) -> Result<Vec3, FormatError> {
        Ok(Vec3::from_array(self.f32s()?))
    }

    pub fn vec4(&mut self) -> Result<Vec4, FormatError> {
        Ok(Vec4::from_array(self.f32s()?))
    }

    pub fn quat(&mut self) -> Result<Quat, FormatError> {
        Ok(Quat::from_array(self.f32s()?))
    }

    pub fn mat4(&mut self) -> Result<Mat4, FormatError> {
        Ok(Mat4::from_cols_array(&self.f32s()?))
    }

    pub fn string(&mut self) -> Result<BinString, FormatError> {
        let len = self.u16()? as usize;
        let bytes = self.bytes(len)?;
        let value = String::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8)?;
        BinString::new(value)
    }

    pub fn buffer_ref(&mut self) -> Result<BufferRef, FormatError> {
        Ok(BufferRef::new(self.u32()?, self.u32()?))
    }

    pub fn ids(&mut self) -> Result<Vec<u32>, FormatError> {
        let count = self.u32()?;
        (0..count).map(|_| self.u32()).collect()
    }

    /// Read a tag byte and check it matches `expected`.
    pub fn expect_tag(&mut self, expected: StructureIdentifier) -> Result<(), FormatError> {
        let found = self.u8()?;
        if found != expected as u8 {
            return Err(FormatError::UnexpectedStructure { expected, found });
        }
        Ok(())
    }
}

fn eof(err: std::io::Error) -> FormatError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        FormatError::UnexpectedEof
    } else {
        FormatError::Io(err)
    }
}

/// A record that is stored as a tag byte followed by its body.
pub trait Record: Sized {
    /// Tag byte written before the body.
    const IDENTIFIER: StructureIdentifier;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError>;

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError>;

    fn write_record<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.tag(Self::IDENTIFIER)?;
        self.write_body(w)
    }

    fn read_record<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        r.expect_tag(Self::IDENTIFIER)?;
        Self::read_body(r)
    }
}

/// Write `records` as a `u32` count followed by tagged records.
pub fn write_section<T: Record, W: Write>(
    w: &mut ByteWriter<W>,
    records: &[T],
) -> Result<(), FormatError> {
    w.u32(records.len() as u32)?;
    records.iter().try_for_each(|r| r.write_record(w))
}

/// Read a section written by [`write_section`].
pub fn read_section<T: Record, R: Read>(r: &mut ByteReader<R>) -> Result<Vec<T>, FormatError> {
    let count = r.u32()?;
    (0..count).map(|_| T::read_record(r)).collect()
}
