/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use ldap_asn1::{BerEncodeError, BerReader, BerWriter, tag, tlv_size};

use super::{FatalDecodeError, OpDecodeError, RequestDecodeError, decode_request_dn, utf8_field};
use crate::message::{AttributeValueAssertion, CompareRequest, ProtocolOp};
use crate::oid::validate_attribute_description;

pub(crate) struct CompareRequestPlan<'a> {
    req: &'a CompareRequest,
    ava_len: usize,
    value_len: usize,
}

impl<'a> CompareRequestPlan<'a> {
    pub(crate) fn new(req: &'a CompareRequest) -> Self {
        let ava_len =
            tlv_size(req.ava.attribute_desc.len()) + tlv_size(req.ava.assertion_value.len());
        let value_len = tlv_size(req.entry.len()) + tlv_size(ava_len);
        CompareRequestPlan {
            req,
            ava_len,
            value_len,
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_octet_string(self.req.entry.as_bytes())?;
        w.put_tag_length(tag::SEQUENCE, self.ava_len)?;
        w.put_octet_string(self.req.ava.attribute_desc.as_bytes())?;
        w.put_octet_string(&self.req.ava.assertion_value)
    }
}

pub(crate) fn decode_request(data: &[u8]) -> Result<ProtocolOp, OpDecodeError> {
    let mut r = BerReader::new(data);

    let entry = decode_request_dn(&mut r, RequestDecodeError::MalformedDn)?;

    let mut ava = r.expect_sequence()?;
    let attribute_desc = utf8_field(ava.expect_tlv(tag::OCTET_STRING)?, "attribute description")
        .map_err(OpDecodeError::Fatal)?;
    validate_attribute_description(&attribute_desc)
        .map_err(RequestDecodeError::MalformedAttributeDescription)?;
    let assertion_value = ava.expect_tlv(tag::OCTET_STRING)?.to_vec();
    ava.expect_end().map_err(FatalDecodeError::InvalidElement)?;
    r.expect_end().map_err(FatalDecodeError::InvalidElement)?;

    Ok(ProtocolOp::CompareRequest(CompareRequest {
        entry,
        ava: AttributeValueAssertion {
            attribute_desc,
            assertion_value,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let req = CompareRequest {
            entry: "cn=anna,ou=users,ou=system".to_string(),
            ava: AttributeValueAssertion::new("mail", "anna@example.com"),
        };
        let plan = CompareRequestPlan::new(&req);
        let mut w = BerWriter::new(plan.value_len());
        plan.encode(&mut w).unwrap();
        let buf = w.finish();
        assert_eq!(buf.len(), plan.value_len());
        match decode_request(&buf).unwrap() {
            ProtocolOp::CompareRequest(decoded) => assert_eq!(decoded, req),
            op => panic!("unexpected op {op:?}"),
        }
    }

    #[test]
    fn bad_attribute_classified() {
        let req = CompareRequest {
            entry: "cn=a".to_string(),
            ava: AttributeValueAssertion::new("1.02.3", "x"),
        };
        let plan = CompareRequestPlan::new(&req);
        let mut w = BerWriter::new(plan.value_len());
        plan.encode(&mut w).unwrap();
        match decode_request(&w.finish()).unwrap_err() {
            OpDecodeError::Request(RequestDecodeError::MalformedAttributeDescription(_)) => {}
            e => panic!("unexpected error {e:?}"),
        }
    }
}
