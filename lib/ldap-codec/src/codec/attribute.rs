/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use ldap_asn1::{BerEncodeError, BerReader, BerWriter, tag, tlv_size};

use super::{FatalDecodeError, OpDecodeError, RequestDecodeError, utf8_field};
use crate::message::Attribute;
use crate::oid::validate_attribute_description;

/// Cached lengths for one PartialAttribute:
/// SEQUENCE { type OCTET STRING, vals SET OF OCTET STRING }
pub(crate) struct AttributePlan<'a> {
    attr: &'a Attribute,
    vals_len: usize,
    value_len: usize,
}

impl<'a> AttributePlan<'a> {
    pub(crate) fn new(attr: &'a Attribute) -> Self {
        let vals_len = attr.values.iter().map(|v| tlv_size(v.len())).sum();
        let value_len = tlv_size(attr.attr_type.len()) + tlv_size(vals_len);
        AttributePlan {
            attr,
            vals_len,
            value_len,
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    #[inline]
    pub(crate) fn tlv_len(&self) -> usize {
        tlv_size(self.value_len)
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_tag_length(tag::SEQUENCE, self.value_len)?;
        w.put_octet_string(self.attr.attr_type.as_bytes())?;
        w.put_tag_length(tag::SET, self.vals_len)?;
        for v in &self.attr.values {
            w.put_octet_string(v)?;
        }
        Ok(())
    }
}

/// Decode one PartialAttribute SEQUENCE. Request-side callers pass
/// `validate` to syntax-check the attribute description; entry
/// decoding preserves server content and only enforces UTF-8.
pub(crate) fn decode_attribute(
    r: &mut BerReader,
    validate: bool,
) -> Result<Attribute, OpDecodeError> {
    let mut seq = r.expect_sequence()?;
    let attr_type = utf8_field(seq.expect_tlv(tag::OCTET_STRING)?, "attribute type")
        .map_err(OpDecodeError::Fatal)?;
    if validate {
        validate_attribute_description(&attr_type)
            .map_err(RequestDecodeError::MalformedAttributeDescription)?;
    }
    let mut vals = BerReader::new(seq.expect_tlv(tag::SET)?);
    let mut values = Vec::new();
    while !vals.is_empty() {
        values.push(vals.expect_tlv(tag::OCTET_STRING)?.to_vec());
    }
    seq.expect_end().map_err(FatalDecodeError::InvalidElement)?;
    Ok(Attribute { attr_type, values })
}
