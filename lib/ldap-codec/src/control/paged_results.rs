/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::any::Any;

use ldap_asn1::{BerEncodeError, BerInteger, BerReader, BerWriter, tag, tlv_size};

use super::{ControlValue, ControlValueError};

/// RFC 2696 Simple Paged Results
pub const PAGED_RESULTS_OID: &str = "1.2.840.113556.1.4.319";

/// realSearchControlValue ::= SEQUENCE { size INTEGER, cookie OCTET STRING }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResultsControl {
    pub size: u32,
    pub cookie: Vec<u8>,
}

impl PagedResultsControl {
    pub fn new(size: u32, cookie: Vec<u8>) -> Self {
        PagedResultsControl { size, cookie }
    }

    pub fn parse(value: Option<&[u8]>) -> Result<Self, ControlValueError> {
        let data = value.ok_or(ControlValueError::MissingValue)?;
        let mut r = BerReader::new(data);
        let mut seq = r.expect_sequence()?;
        let size = seq.read_integer()?;
        let size =
            u32::try_from(size).map_err(|_| ControlValueError::InvalidField("size"))?;
        let cookie = seq.expect_tlv(tag::OCTET_STRING)?.to_vec();
        seq.expect_end()?;
        r.expect_end()?;
        Ok(PagedResultsControl { size, cookie })
    }

    fn write_value(&self, w: &mut BerWriter, seq_len: usize) -> Result<(), BerEncodeError> {
        w.put_tag_length(tag::SEQUENCE, seq_len)?;
        w.put_integer(i64::from(self.size))?;
        w.put_octet_string(&self.cookie)
    }
}

impl ControlValue for PagedResultsControl {
    fn oid(&self) -> &str {
        PAGED_RESULTS_OID
    }

    fn encoded_value(&self) -> Option<Vec<u8>> {
        let size_len = BerInteger::size_of(i64::from(self.size));
        let seq_len = tlv_size(size_len) + tlv_size(self.cookie.len());
        let mut w = BerWriter::new(tlv_size(seq_len));
        self.write_value(&mut w, seq_len)
            .expect("paged results length plan out of sync");
        Some(w.finish())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(super) fn parse_boxed(
    value: Option<&[u8]>,
) -> Result<Box<dyn ControlValue>, ControlValueError> {
    Ok(Box::new(PagedResultsControl::parse(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let c = PagedResultsControl::new(100, b"cookie".to_vec());
        let value = c.encoded_value().unwrap();
        assert_eq!(
            value,
            [0x30, 0x0b, 0x02, 0x01, 0x64, 0x04, 0x06, b'c', b'o', b'o', b'k', b'i', b'e']
        );
        let parsed = PagedResultsControl::parse(Some(&value)).unwrap();
        assert_eq!(parsed, c);
    }

    #[test]
    fn empty_cookie() {
        let c = PagedResultsControl::new(500, Vec::new());
        let value = c.encoded_value().unwrap();
        assert_eq!(value, [0x30, 0x06, 0x02, 0x02, 0x01, 0xf4, 0x04, 0x00]);
        assert_eq!(PagedResultsControl::parse(Some(&value)).unwrap(), c);
    }

    #[test]
    fn long_form_value() {
        let c = PagedResultsControl::new(1000, vec![0xab; 200]);
        let value = c.encoded_value().unwrap();
        assert_eq!(value.len(), 210);
        assert_eq!(&value[..3], [0x30, 0x81, 0xcf]);
        assert_eq!(PagedResultsControl::parse(Some(&value)).unwrap(), c);
    }

    #[test]
    fn missing_value() {
        assert_eq!(
            PagedResultsControl::parse(None).unwrap_err(),
            ControlValueError::MissingValue
        );
    }

    #[test]
    fn to_control() {
        let c = PagedResultsControl::new(10, Vec::new()).to_control(true);
        assert_eq!(c.oid, PAGED_RESULTS_OID);
        assert!(c.critical);
        assert!(c.value.is_some());
    }
}
