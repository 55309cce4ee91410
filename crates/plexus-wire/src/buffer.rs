//! Growable output buffer and checked input cursor.
//!
//! The configured capacity plays two roles, mirroring the allocator
//! contract the protocol was designed against: it is the initial size of
//! the backing storage and the upper bound on any single atomic write.
//! Output larger than the capacity is fine as long as every individual
//! write fits; the buffer grows in capacity-sized steps and the final
//! result contains every byte written. A single write that cannot fit
//! fails the whole encode with [`Error::BufferExhausted`].

use crate::error::Error;
use bytes::{Buf, Bytes, BytesMut};

/// Default capacity for per-call output buffers.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// A growable output buffer with a write cursor.
///
/// Owned exclusively by one encode call; never shared across concurrent
/// encodes.
#[derive(Debug)]
pub struct WireBuffer {
    out: BytesMut,
    capacity: usize,
}

impl WireBuffer {
    /// Create a buffer with the given capacity.
    ///
    /// `capacity` is both the initial allocation and the growth chunk; it
    /// bounds the largest single atomic write, not the total output.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one atomic write.
    pub fn write_atomic(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() > self.capacity {
            return Err(Error::BufferExhausted {
                required: bytes.len(),
                capacity: self.capacity,
            });
        }
        if self.out.len() + bytes.len() > self.out.capacity() {
            self.out.reserve(self.capacity);
        }
        self.out.extend_from_slice(bytes);
        Ok(())
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, v: u8) -> Result<(), Error> {
        self.write_atomic(&[v])
    }

    /// Write a big-endian i16.
    pub fn write_i16(&mut self, v: i16) -> Result<(), Error> {
        self.write_atomic(&v.to_be_bytes())
    }

    /// Write a big-endian u16.
    pub fn write_u16(&mut self, v: u16) -> Result<(), Error> {
        self.write_atomic(&v.to_be_bytes())
    }

    /// Write a big-endian i32.
    pub fn write_i32(&mut self, v: i32) -> Result<(), Error> {
        self.write_atomic(&v.to_be_bytes())
    }

    /// Write a big-endian u32.
    pub fn write_u32(&mut self, v: u32) -> Result<(), Error> {
        self.write_atomic(&v.to_be_bytes())
    }

    /// Write a big-endian i64.
    pub fn write_i64(&mut self, v: i64) -> Result<(), Error> {
        self.write_atomic(&v.to_be_bytes())
    }

    /// Write a big-endian u64.
    pub fn write_u64(&mut self, v: u64) -> Result<(), Error> {
        self.write_atomic(&v.to_be_bytes())
    }

    /// Write a big-endian f32.
    pub fn write_f32(&mut self, v: f32) -> Result<(), Error> {
        self.write_atomic(&v.to_be_bytes())
    }

    /// Write a big-endian f64.
    pub fn write_f64(&mut self, v: f64) -> Result<(), Error> {
        self.write_atomic(&v.to_be_bytes())
    }

    /// Write a length-prefixed UTF-8 string (u32 length, then bytes).
    ///
    /// The length and the payload are separate atomic writes, so a string
    /// is encodable whenever its byte length fits the capacity.
    pub fn write_str(&mut self, s: &str) -> Result<(), Error> {
        self.write_u32(s.len() as u32)?;
        self.write_atomic(s.as_bytes())
    }

    /// Total bytes written so far.
    pub fn readable_bytes(&self) -> usize {
        self.out.len()
    }

    /// Freeze into an immutable byte region.
    pub fn freeze(self) -> Bytes {
        self.out.freeze()
    }
}

/// A checked read cursor over an immutable byte region.
#[derive(Debug)]
pub struct WireReader {
    input: Bytes,
}

impl WireReader {
    /// Create a reader over the given bytes.
    pub fn new(input: Bytes) -> Self {
        Self { input }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.input.remaining()
    }

    fn check(&self, what: &str, needed: usize) -> Result<(), Error> {
        if self.input.remaining() < needed {
            return Err(Error::truncated(what, needed, self.input.remaining()));
        }
        Ok(())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.check("u8", 1)?;
        Ok(self.input.get_u8())
    }

    /// Read a single signed byte.
    pub fn read_i8(&mut self) -> Result<i8, Error> {
        self.check("i8", 1)?;
        Ok(self.input.get_i8())
    }

    /// Read a big-endian i16.
    pub fn read_i16(&mut self) -> Result<i16, Error> {
        self.check("i16", 2)?;
        Ok(self.input.get_i16())
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.check("u16", 2)?;
        Ok(self.input.get_u16())
    }

    /// Read a big-endian i32.
    pub fn read_i32(&mut self) -> Result<i32, Error> {
        self.check("i32", 4)?;
        Ok(self.input.get_i32())
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.check("u32", 4)?;
        Ok(self.input.get_u32())
    }

    /// Read a big-endian i64.
    pub fn read_i64(&mut self) -> Result<i64, Error> {
        self.check("i64", 8)?;
        Ok(self.input.get_i64())
    }

    /// Read a big-endian u64.
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        self.check("u64", 8)?;
        Ok(self.input.get_u64())
    }

    /// Read a big-endian f32.
    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.check("f32", 4)?;
        Ok(self.input.get_f32())
    }

    /// Read a big-endian f64.
    pub fn read_f64(&mut self) -> Result<f64, Error> {
        self.check("f64", 8)?;
        Ok(self.input.get_f64())
    }

    /// Read exactly `n` bytes.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, Error> {
        self.check("bytes", n)?;
        let mut out = vec![0u8; n];
        self.input.copy_to_slice(&mut out);
        Ok(out)
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> Result<String, Error> {
        let len = self.read_u32()? as usize;
        let raw = self.read_exact(len)?;
        String::from_utf8(raw)
            .map_err(|e| Error::MalformedStream(format!("invalid UTF-8 in string: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_scalars() {
        let mut buf = WireBuffer::with_capacity(64);
        buf.write_u8(7).unwrap();
        buf.write_i16(-2).unwrap();
        buf.write_u32(1000).unwrap();
        buf.write_i64(i64::MIN).unwrap();
        buf.write_f64(1.25).unwrap();
        buf.write_str("hello").unwrap();

        let mut reader = WireReader::new(buf.freeze());
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert_eq!(reader.read_i16().unwrap(), -2);
        assert_eq!(reader.read_u32().unwrap(), 1000);
        assert_eq!(reader.read_i64().unwrap(), i64::MIN);
        assert_eq!(reader.read_f64().unwrap(), 1.25);
        assert_eq!(reader.read_str().unwrap(), "hello");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_single_write_exceeding_capacity_fails() {
        let mut buf = WireBuffer::with_capacity(1);
        assert!(buf.write_u8(1).is_ok());

        let err = buf.write_u32(5).unwrap_err();
        match err {
            Error::BufferExhausted { required, capacity } => {
                assert_eq!(required, 4);
                assert_eq!(capacity, 1);
            }
            other => panic!("expected BufferExhausted, got {other:?}"),
        }
    }

    #[test]
    fn test_growth_keeps_all_bytes() {
        // Capacity smaller than the total output but larger than any
        // single write: the buffer must grow and keep everything.
        let mut buf = WireBuffer::with_capacity(8);
        for i in 0..100u32 {
            buf.write_u32(i).unwrap();
        }
        assert_eq!(buf.readable_bytes(), 400);

        let mut reader = WireReader::new(buf.freeze());
        for i in 0..100u32 {
            assert_eq!(reader.read_u32().unwrap(), i);
        }
    }

    #[test]
    fn test_truncated_reads_fail() {
        let mut buf = WireBuffer::with_capacity(16);
        buf.write_u16(300).unwrap();

        let mut reader = WireReader::new(buf.freeze());
        assert!(reader.read_u32().is_err());

        let mut reader = WireReader::new(Bytes::from_static(&[0, 0, 0, 9, b'a']));
        let err = reader.read_str().unwrap_err();
        assert!(matches!(err, Error::MalformedStream(_)));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut buf = WireBuffer::with_capacity(16);
        buf.write_u32(2).unwrap();
        buf.write_atomic(&[0xff, 0xfe]).unwrap();

        let mut reader = WireReader::new(buf.freeze());
        assert!(matches!(
            reader.read_str().unwrap_err(),
            Error::MalformedStream(_)
        ));
    }
}
