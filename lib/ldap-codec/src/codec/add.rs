/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use ldap_asn1::{BerEncodeError, BerReader, BerWriter, tag, tlv_size};

use super::attribute::{AttributePlan, decode_attribute};
use super::{FatalDecodeError, OpDecodeError, RequestDecodeError, decode_request_dn};
use crate::message::{AddRequest, ProtocolOp};

pub(crate) struct AddRequestPlan<'a> {
    req: &'a AddRequest,
    attrs: Vec<AttributePlan<'a>>,
    attrs_len: usize,
    value_len: usize,
}

impl<'a> AddRequestPlan<'a> {
    pub(crate) fn new(req: &'a AddRequest) -> Self {
        let attrs: Vec<AttributePlan<'a>> =
            req.attributes.iter().map(AttributePlan::new).collect();
        let attrs_len = attrs.iter().map(AttributePlan::tlv_len).sum();
        // the entry DN is mandatory, a zero-length OCTET STRING when empty
        let value_len = tlv_size(req.entry.len()) + tlv_size(attrs_len);
        AddRequestPlan {
            req,
            attrs,
            attrs_len,
            value_len,
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_octet_string(self.req.entry.as_bytes())?;
        w.put_tag_length(tag::SEQUENCE, self.attrs_len)?;
        for attr in &self.attrs {
            attr.encode(w)?;
        }
        Ok(())
    }
}

pub(crate) fn decode_request(data: &[u8]) -> Result<ProtocolOp, OpDecodeError> {
    let mut r = BerReader::new(data);

    let entry = decode_request_dn(&mut r, RequestDecodeError::MalformedDn)?;

    let mut list = BerReader::new(r.expect_tlv(tag::SEQUENCE)?);
    let mut attributes = Vec::new();
    while !list.is_empty() {
        attributes.push(decode_attribute(&mut list, true)?);
    }
    r.expect_end().map_err(FatalDecodeError::InvalidElement)?;

    if attributes.is_empty() {
        return Err(RequestDecodeError::EmptyAttributeList.into());
    }

    Ok(ProtocolOp::AddRequest(AddRequest { entry, attributes }))
}
