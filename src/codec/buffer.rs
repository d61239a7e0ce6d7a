//! Primitive readers and writers for packed records
//!
//! Counts and lengths use Bitcoin's CompactSize varint (1, 3, 5 or 9
//! bytes). Decoding only accepts the minimal encoding of each value so a
//! record has exactly one byte representation.

use super::CodecError;
use bytes::{Buf, BufMut, BytesMut};

// =============================================================================
// Writer
// =============================================================================

/// Append-only builder of a packed record
#[derive(Debug, Default)]
pub struct RecordWriter {
    buf: BytesMut,
}

impl RecordWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn put_u32_be(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    pub fn put_u32_le(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    pub fn put_i32_le(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    pub fn put_i64_be(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    pub fn put_compact_size(&mut self, value: u64) {
        match value {
            0..=0xfc => self.buf.put_u8(value as u8),
            0xfd..=0xffff => {
                self.buf.put_u8(0xfd);
                self.buf.put_u16_le(value as u16);
            }
            0x10000..=0xffff_ffff => {
                self.buf.put_u8(0xfe);
                self.buf.put_u32_le(value as u32);
            }
            _ => {
                self.buf.put_u8(0xff);
                self.buf.put_u64_le(value);
            }
        }
    }

    /// Length-prefixed byte string
    pub fn put_var_bytes(&mut self, bytes: &[u8]) {
        self.put_compact_size(bytes.len() as u64);
        self.buf.put_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

// =============================================================================
// Reader
// =============================================================================

/// Cursor over a packed record
///
/// Every read checks the remaining length first; nothing is allocated for
/// a length that the input cannot back.
#[derive(Debug)]
pub struct RecordReader<'a> {
    buf: &'a [u8],
    max_field_len: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(buf: &'a [u8], max_field_len: usize) -> Self {
        Self { buf, max_field_len }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn need(&self, n: usize, field: &str) -> Result<(), CodecError> {
        if self.buf.remaining() < n {
            return Err(CodecError::corrupt(format!(
                "truncated {}: need {} bytes, {} left",
                field,
                n,
                self.buf.remaining()
            )));
        }
        Ok(())
    }

    pub fn read_u8(&mut self, field: &str) -> Result<u8, CodecError> {
        self.need(1, field)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_u32_be(&mut self, field: &str) -> Result<u32, CodecError> {
        self.need(4, field)?;
        Ok(self.buf.get_u32())
    }

    pub fn read_u32_le(&mut self, field: &str) -> Result<u32, CodecError> {
        self.need(4, field)?;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_i32_le(&mut self, field: &str) -> Result<i32, CodecError> {
        self.need(4, field)?;
        Ok(self.buf.get_i32_le())
    }

    pub fn read_i64_be(&mut self, field: &str) -> Result<i64, CodecError> {
        self.need(8, field)?;
        Ok(self.buf.get_i64())
    }

    pub fn read_array<const N: usize>(&mut self, field: &str) -> Result<[u8; N], CodecError> {
        self.need(N, field)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    pub fn read_compact_size(&mut self, field: &str) -> Result<u64, CodecError> {
        let (value, min) = match self.read_u8(field)? {
            0xff => {
                self.need(8, field)?;
                (self.buf.get_u64_le(), 0x1_0000_0000)
            }
            0xfe => {
                self.need(4, field)?;
                (self.buf.get_u32_le() as u64, 0x10000)
            }
            0xfd => {
                self.need(2, field)?;
                (self.buf.get_u16_le() as u64, 0xfd)
            }
            b => return Ok(b as u64),
        };
        if value < min {
            return Err(CodecError::corrupt(format!(
                "non-canonical varint for {}",
                field
            )));
        }
        Ok(value)
    }

    /// Element count of a list whose items encode to at least
    /// `min_item_len` bytes each
    pub fn read_count(&mut self, field: &str, min_item_len: usize) -> Result<usize, CodecError> {
        let count = self.read_compact_size(field)?;
        let needed = count.checked_mul(min_item_len.max(1) as u64);
        if needed.map_or(true, |n| n > self.buf.remaining() as u64) {
            return Err(CodecError::corrupt(format!(
                "{} count {} exceeds remaining {} bytes",
                field,
                count,
                self.buf.remaining()
            )));
        }
        Ok(count as usize)
    }

    /// Length-prefixed byte string
    pub fn read_var_bytes(&mut self, field: &str) -> Result<Vec<u8>, CodecError> {
        let len = self.read_compact_size(field)?;
        if len > self.max_field_len as u64 {
            return Err(CodecError::corrupt(format!(
                "{} length {} exceeds limit {}",
                field, len, self.max_field_len
            )));
        }
        let len = len as usize;
        self.need(len, field)?;
        let out = self.buf[..len].to_vec();
        self.buf.advance(len);
        Ok(out)
    }

    /// Fail unless every byte has been consumed
    pub fn finish(self) -> Result<(), CodecError> {
        match self.buf.remaining() {
            0 => Ok(()),
            n => Err(CodecError::corrupt(format!("{} trailing bytes", n))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1_000;

    fn compact(value: u64) -> Vec<u8> {
        let mut w = RecordWriter::default();
        w.put_compact_size(value);
        w.into_bytes()
    }

    #[test]
    fn test_compact_size_widths() {
        assert_eq!(compact(0), vec![0x00]);
        assert_eq!(compact(0xfc), vec![0xfc]);
        assert_eq!(compact(0xfd), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(compact(0x10000), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(compact(u64::MAX).len(), 9);
    }

    #[test]
    fn test_compact_size_read_back() {
        for value in [0u64, 1, 0xfc, 0xfd, 0xffff, 0x10000, 0xffff_ffff, 0x1_0000_0000, u64::MAX] {
            let bytes = compact(value);
            let mut r = RecordReader::new(&bytes, LIMIT);
            assert_eq!(r.read_compact_size("v").unwrap(), value);
            r.finish().unwrap();
        }
    }

    #[test]
    fn test_non_canonical_compact_size() {
        // 5 encoded in three bytes
        let bytes = [0xfd, 0x05, 0x00];
        let mut r = RecordReader::new(&bytes, LIMIT);
        assert!(matches!(r.read_compact_size("v"), Err(CodecError::CorruptRecord(_))));
    }

    #[test]
    fn test_truncated_reads() {
        let mut r = RecordReader::new(&[0x01, 0x02, 0x03], LIMIT);
        assert!(matches!(r.read_u32_be("height"), Err(CodecError::CorruptRecord(_))));

        let mut r = RecordReader::new(&[0xfe, 0x01], LIMIT);
        assert!(matches!(r.read_compact_size("len"), Err(CodecError::CorruptRecord(_))));
    }

    #[test]
    fn test_var_bytes_limits() {
        // declared length larger than the input
        let mut r = RecordReader::new(&[0x05, 0xaa], LIMIT);
        assert!(matches!(r.read_var_bytes("script"), Err(CodecError::CorruptRecord(_))));

        // declared length over the configured bound, rejected before reading
        let mut w = RecordWriter::default();
        w.put_compact_size(u64::MAX);
        let bytes = w.into_bytes();
        let mut r = RecordReader::new(&bytes, LIMIT);
        let err = r.read_var_bytes("script").unwrap_err();
        assert!(err.to_string().contains("exceeds limit"));
    }

    #[test]
    fn test_count_bounded_by_input() {
        let mut w = RecordWriter::default();
        w.put_compact_size(1_000_000);
        let bytes = w.into_bytes();
        let mut r = RecordReader::new(&bytes, LIMIT);
        assert!(matches!(r.read_count("vin", 1), Err(CodecError::CorruptRecord(_))));
    }

    #[test]
    fn test_count_scaled_by_item_size() {
        // 3 items of at least 4 bytes need 12 bytes
        let mut bytes = vec![0x03];
        bytes.extend_from_slice(&[0u8; 11]);
        let mut r = RecordReader::new(&bytes, LIMIT);
        assert!(matches!(r.read_count("items", 4), Err(CodecError::CorruptRecord(_))));

        bytes.push(0);
        let mut r = RecordReader::new(&bytes, LIMIT);
        assert_eq!(r.read_count("items", 4).unwrap(), 3);

        // overflowing product is rejected, not wrapped
        let mut w = RecordWriter::default();
        w.put_compact_size(u64::MAX);
        let bytes = w.into_bytes();
        let mut r = RecordReader::new(&bytes, LIMIT);
        assert!(matches!(r.read_count("items", 2), Err(CodecError::CorruptRecord(_))));
    }

    #[test]
    fn test_finish_rejects_trailing_bytes() {
        let mut r = RecordReader::new(&[0x07, 0x00], LIMIT);
        assert_eq!(r.read_u8("flags").unwrap(), 7);
        assert!(matches!(r.finish(), Err(CodecError::CorruptRecord(_))));
    }

    #[test]
    fn test_fixed_width_round_trip() {
        let mut w = RecordWriter::with_capacity(32);
        w.put_u32_be(105509);
        w.put_i64_be(-1);
        w.put_i32_le(-2);
        w.put_u32_le(0xdeadbeef);
        w.put_var_bytes(b"abc");
        assert_eq!(w.len(), 4 + 8 + 4 + 4 + 4);
        let bytes = w.into_bytes();
        assert_eq!(&bytes[..4], &[0x00, 0x01, 0x9c, 0x25]);

        let mut r = RecordReader::new(&bytes, LIMIT);
        assert_eq!(r.read_u32_be("a").unwrap(), 105509);
        assert_eq!(r.read_i64_be("b").unwrap(), -1);
        assert_eq!(r.read_i32_le("c").unwrap(), -2);
        assert_eq!(r.read_u32_le("d").unwrap(), 0xdeadbeef);
        assert_eq!(r.read_var_bytes("e").unwrap(), b"abc".to_vec());
        r.finish().unwrap();
    }
}
