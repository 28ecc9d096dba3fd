/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use ldap_asn1::{BerEncodeError, BerReader, BerWriter, tag, tlv_size};

use super::{FatalDecodeError, OpDecodeError, RequestDecodeError, decode_request_dn};
use crate::dn;
use crate::message::{ModifyDnRequest, ProtocolOp};

const NEW_SUPERIOR_TAG: u8 = tag::context(0);

pub(crate) struct ModifyDnRequestPlan<'a> {
    req: &'a ModifyDnRequest,
    value_len: usize,
}

impl<'a> ModifyDnRequestPlan<'a> {
    pub(crate) fn new(req: &'a ModifyDnRequest) -> Self {
        // deleteoldrdn has no DEFAULT shortcut applied, always encoded
        let value_len = tlv_size(req.entry.len())
            + tlv_size(req.new_rdn.len())
            + 3
            + req.new_superior.as_ref().map_or(0, |s| tlv_size(s.len()));
        ModifyDnRequestPlan { req, value_len }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_octet_string(self.req.entry.as_bytes())?;
        w.put_octet_string(self.req.new_rdn.as_bytes())?;
        w.put_boolean(self.req.delete_old_rdn)?;
        if let Some(superior) = &self.req.new_superior {
            w.put_primitive(NEW_SUPERIOR_TAG, superior.as_bytes())?;
        }
        Ok(())
    }
}

pub(crate) fn decode_request(data: &[u8]) -> Result<ProtocolOp, OpDecodeError> {
    let mut r = BerReader::new(data);

    let entry = decode_request_dn(&mut r, RequestDecodeError::MalformedDn)?;

    let new_rdn_bytes = r.expect_tlv(tag::OCTET_STRING)?;
    let new_rdn = std::str::from_utf8(new_rdn_bytes)
        .map_err(|_| RequestDecodeError::MalformedRdn(dn::DnSyntaxError::InvalidUtf8))?;
    dn::validate_rdn(new_rdn).map_err(RequestDecodeError::MalformedRdn)?;

    let delete_old_rdn = r.read_boolean()?;

    let mut new_superior = None;
    if r.peek_tag() == Some(NEW_SUPERIOR_TAG) {
        let b = r.expect_tlv(NEW_SUPERIOR_TAG)?;
        let superior = std::str::from_utf8(b)
            .map_err(|_| RequestDecodeError::MalformedSuperiorDn(dn::DnSyntaxError::InvalidUtf8))?;
        dn::validate_dn(superior).map_err(RequestDecodeError::MalformedSuperiorDn)?;
        new_superior = Some(superior.to_string());
    }
    r.expect_end().map_err(FatalDecodeError::InvalidElement)?;

    Ok(ProtocolOp::ModifyDnRequest(ModifyDnRequest {
        entry,
        new_rdn: new_rdn.to_string(),
        delete_old_rdn,
        new_superior,
    }))
}
