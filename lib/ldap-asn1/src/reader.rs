/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use thiserror::Error;

use super::{BerLength, BerLengthParseError, tag};

#[derive(Debug, PartialEq, Eq, Error)]
pub enum BerReadError {
    #[error("truncated element")]
    Truncated,
    #[error("unexpected tag {found:#04x}, expected {expected:#04x}")]
    UnexpectedTag { expected: u8, found: u8 },
    #[error("indefinite length")]
    IndefiniteLength,
    #[error("invalid length")]
    InvalidLength,
    #[error("invalid integer value")]
    InvalidInteger,
    #[error("invalid boolean value")]
    InvalidBoolean,
    #[error("trailing data")]
    TrailingData,
}

impl From<BerLengthParseError> for BerReadError {
    fn from(value: BerLengthParseError) -> Self {
        match value {
            // a short element inside a framed PDU means corruption,
            // not a streaming condition
            BerLengthParseError::NeedMoreData(_) => BerReadError::Truncated,
            BerLengthParseError::TooLargeValue => BerReadError::InvalidLength,
        }
    }
}

/// One decoded BER element, value borrowed from the input
#[derive(Debug, Clone, Copy)]
pub struct Tlv<'a> {
    pub tag: u8,
    pub value: &'a [u8],
}

/// A cursor over the value bytes of one framed BER construct
pub struct BerReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> BerReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BerReader { data, offset: 0 }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    #[inline]
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    pub fn read_tlv(&mut self) -> Result<Tlv<'a>, BerReadError> {
        let left = &self.data[self.offset..];
        if left.is_empty() {
            return Err(BerReadError::Truncated);
        }
        let tag = left[0];

        let length = BerLength::parse(&left[1..])?;
        if length.indefinite() {
            return Err(BerReadError::IndefiniteLength);
        }
        let value_len =
            usize::try_from(length.value()).map_err(|_| BerReadError::InvalidLength)?;

        let value_offset = 1 + length.encoded_len();
        // a hostile length claim near u64::MAX must not overflow the
        // bounds arithmetic
        let Some(end) = value_offset.checked_add(value_len) else {
            return Err(BerReadError::Truncated);
        };
        let Some(value) = left.get(value_offset..end) else {
            return Err(BerReadError::Truncated);
        };
        self.offset += end;
        Ok(Tlv { tag, value })
    }

    pub fn expect_tlv(&mut self, expected: u8) -> Result<&'a [u8], BerReadError> {
        let tlv = self.read_tlv()?;
        if tlv.tag != expected {
            return Err(BerReadError::UnexpectedTag {
                expected,
                found: tlv.tag,
            });
        }
        Ok(tlv.value)
    }

    /// Read a SEQUENCE element and return a nested reader over its value
    pub fn expect_sequence(&mut self) -> Result<BerReader<'a>, BerReadError> {
        let value = self.expect_tlv(tag::SEQUENCE)?;
        Ok(BerReader::new(value))
    }

    pub fn read_integer(&mut self) -> Result<i64, BerReadError> {
        let value = self.expect_tlv(tag::INTEGER)?;
        Self::int_value(value)
    }

    pub fn read_enumerated(&mut self) -> Result<i64, BerReadError> {
        let value = self.expect_tlv(tag::ENUMERATED)?;
        Self::int_value(value)
    }

    pub fn read_boolean(&mut self) -> Result<bool, BerReadError> {
        let value = self.expect_tlv(tag::BOOLEAN)?;
        if value.len() != 1 {
            return Err(BerReadError::InvalidBoolean);
        }
        Ok(value[0] != 0)
    }

    pub fn expect_end(&self) -> Result<(), BerReadError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(BerReadError::TrailingData)
        }
    }

    fn int_value(b: &[u8]) -> Result<i64, BerReadError> {
        if b.is_empty() || b.len() > 8 {
            return Err(BerReadError::InvalidInteger);
        }
        let mut value = if b[0] & 0x80 != 0 { -1i64 } else { 0 };
        for v in b {
            value = (value << 8) | i64::from(*v);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_tlv() {
        let mut r = BerReader::new(&[0x04, 0x02, b'h', b'i', 0x01, 0x01, 0xff]);
        let tlv = r.read_tlv().unwrap();
        assert_eq!(tlv.tag, 0x04);
        assert_eq!(tlv.value, b"hi");
        assert!(r.read_boolean().unwrap());
        r.expect_end().unwrap();
    }

    #[test]
    fn truncated_value() {
        let mut r = BerReader::new(&[0x04, 0x05, b'h', b'i']);
        assert_eq!(r.read_tlv().unwrap_err(), BerReadError::Truncated);
    }

    #[test]
    fn huge_length_claim() {
        let mut r = BerReader::new(&[
            0x04, 0x88, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        ]);
        assert_eq!(r.read_tlv().unwrap_err(), BerReadError::Truncated);
    }

    #[test]
    fn indefinite_rejected() {
        let mut r = BerReader::new(&[0x30, 0x80, 0x00, 0x00]);
        assert_eq!(r.read_tlv().unwrap_err(), BerReadError::IndefiniteLength);
    }

    #[test]
    fn nested_sequence() {
        let mut r = BerReader::new(&[0x30, 0x06, 0x02, 0x01, 0x05, 0x02, 0x01, 0x06]);
        let mut seq = r.expect_sequence().unwrap();
        assert_eq!(seq.read_integer().unwrap(), 5);
        assert_eq!(seq.read_integer().unwrap(), 6);
        seq.expect_end().unwrap();
        r.expect_end().unwrap();
    }

    #[test]
    fn unexpected_tag() {
        let mut r = BerReader::new(&[0x04, 0x00]);
        let e = r.read_integer().unwrap_err();
        assert_eq!(
            e,
            BerReadError::UnexpectedTag {
                expected: 0x02,
                found: 0x04
            }
        );
    }

    #[test]
    fn integer_values() {
        let mut r = BerReader::new(&[0x02, 0x01, 0xfe]);
        assert_eq!(r.read_integer().unwrap(), -2);
        let mut r = BerReader::new(&[0x02, 0x02, 0x00, 0x80]);
        assert_eq!(r.read_integer().unwrap(), 128);
        let mut r = BerReader::new(&[0x02, 0x00]);
        assert_eq!(r.read_integer().unwrap_err(), BerReadError::InvalidInteger);
    }

    #[test]
    fn boolean_values() {
        let mut r = BerReader::new(&[0x01, 0x01, 0x00]);
        assert!(!r.read_boolean().unwrap());
        let mut r = BerReader::new(&[0x01, 0x02, 0x00, 0x00]);
        assert_eq!(r.read_boolean().unwrap_err(), BerReadError::InvalidBoolean);
    }

    #[test]
    fn walk_captured_pdu() {
        use hex_literal::hex;

        // an LDAPv3 anonymous simple bind
        let data = hex!("30 0c 02 01 01 60 07 02 01 03 04 00 80 00");
        let mut r = BerReader::new(&data);
        let mut msg = r.expect_sequence().unwrap();
        r.expect_end().unwrap();
        assert_eq!(msg.read_integer().unwrap(), 1);
        let op = msg.read_tlv().unwrap();
        assert_eq!(op.tag, 0x60);
        msg.expect_end().unwrap();

        let mut bind = BerReader::new(op.value);
        assert_eq!(bind.read_integer().unwrap(), 3);
        assert_eq!(bind.expect_tlv(tag::OCTET_STRING).unwrap(), b"");
        assert_eq!(bind.expect_tlv(0x80).unwrap(), b"");
        bind.expect_end().unwrap();
    }

    #[test]
    fn trailing_data() {
        let r = BerReader::new(&[0x00]);
        assert_eq!(r.expect_end().unwrap_err(), BerReadError::TrailingData);
    }
}
