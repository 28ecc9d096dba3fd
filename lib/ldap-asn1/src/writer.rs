/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use thiserror::Error;

use super::{BerInteger, BerLength, tag};

#[derive(Debug, PartialEq, Eq, Error)]
pub enum BerEncodeError {
    #[error("buffer overflow: need {need} bytes, {left} left")]
    BufferOverflow { need: usize, left: usize },
}

/// An exact-capacity BER emitter. Writing past the capacity fixed at
/// construction is an error, never a reallocation.
pub struct BerWriter {
    buf: Vec<u8>,
    capacity: usize,
}

impl BerWriter {
    pub fn new(capacity: usize) -> Self {
        BerWriter {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn check(&self, need: usize) -> Result<(), BerEncodeError> {
        let left = self.capacity - self.buf.len();
        if need > left {
            Err(BerEncodeError::BufferOverflow { need, left })
        } else {
            Ok(())
        }
    }

    pub fn put_u8(&mut self, v: u8) -> Result<(), BerEncodeError> {
        self.check(1)?;
        self.buf.push(v);
        Ok(())
    }

    pub fn put_slice(&mut self, v: &[u8]) -> Result<(), BerEncodeError> {
        self.check(v.len())?;
        self.buf.extend_from_slice(v);
        Ok(())
    }

    /// Write the identifier octet and minimal definite-form length octets
    pub fn put_tag_length(&mut self, tag: u8, value_len: usize) -> Result<(), BerEncodeError> {
        self.check(1 + BerLength::size_of(value_len))?;
        self.buf.push(tag);
        if value_len < 0x80 {
            self.buf.push(value_len as u8);
        } else {
            let count = BerLength::size_of(value_len) - 1;
            self.buf.push(0x80 | count as u8);
            let b = value_len.to_be_bytes();
            self.buf.extend_from_slice(&b[b.len() - count..]);
        }
        Ok(())
    }

    pub fn put_primitive(&mut self, tag: u8, value: &[u8]) -> Result<(), BerEncodeError> {
        self.put_tag_length(tag, value.len())?;
        self.put_slice(value)
    }

    pub fn put_octet_string(&mut self, value: &[u8]) -> Result<(), BerEncodeError> {
        self.put_primitive(tag::OCTET_STRING, value)
    }

    pub fn put_integer(&mut self, value: i64) -> Result<(), BerEncodeError> {
        self.put_int_value(tag::INTEGER, value)
    }

    pub fn put_enumerated(&mut self, value: i64) -> Result<(), BerEncodeError> {
        self.put_int_value(tag::ENUMERATED, value)
    }

    fn put_int_value(&mut self, tag: u8, value: i64) -> Result<(), BerEncodeError> {
        let count = BerInteger::size_of(value);
        self.put_tag_length(tag, count)?;
        let b = value.to_be_bytes();
        self.put_slice(&b[8 - count..])
    }

    /// Write the value octets of an integer without an identifier, as
    /// needed for primitive APPLICATION-tagged integers
    pub fn put_integer_value(&mut self, value: i64) -> Result<(), BerEncodeError> {
        let count = BerInteger::size_of(value);
        let b = value.to_be_bytes();
        self.put_slice(&b[8 - count..])
    }

    pub fn put_boolean(&mut self, value: bool) -> Result<(), BerEncodeError> {
        self.put_tag_length(tag::BOOLEAN, 1)?;
        self.put_u8(if value { 0xff } else { 0x00 })
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_capacity() {
        let mut w = BerWriter::new(2);
        w.put_tag_length(0x30, 0).unwrap();
        let e = w.put_u8(0).unwrap_err();
        assert_eq!(e, BerEncodeError::BufferOverflow { need: 1, left: 0 });
    }

    #[test]
    fn long_form_length() {
        let mut w = BerWriter::new(4 + 200);
        w.put_tag_length(0x30, 200).unwrap();
        w.put_slice(&[0u8; 200]).unwrap();
        let buf = w.finish();
        assert_eq!(&buf[..3], &[0x30, 0x81, 0xc8]);

        let mut w = BerWriter::new(4);
        w.put_tag_length(0x04, 0x100).unwrap();
        assert_eq!(w.finish(), &[0x04, 0x82, 0x01, 0x00]);
    }

    #[test]
    fn integers() {
        let mut w = BerWriter::new(16);
        w.put_integer(0).unwrap();
        w.put_integer(128).unwrap();
        w.put_integer(-2).unwrap();
        w.put_enumerated(0x22).unwrap();
        assert_eq!(
            w.finish(),
            &[0x02, 0x01, 0x00, 0x02, 0x02, 0x00, 0x80, 0x02, 0x01, 0xfe, 0x0a, 0x01, 0x22]
        );
    }

    #[test]
    fn booleans() {
        let mut w = BerWriter::new(6);
        w.put_boolean(true).unwrap();
        w.put_boolean(false).unwrap();
        assert_eq!(w.finish(), &[0x01, 0x01, 0xff, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn octet_strings() {
        let mut w = BerWriter::new(8);
        w.put_octet_string(b"abc").unwrap();
        w.put_primitive(0x80, b"x").unwrap();
        assert_eq!(w.finish(), &[0x04, 0x03, b'a', b'b', b'c', 0x80, 0x01, b'x']);
    }
}
