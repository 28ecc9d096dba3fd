/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! DelRequest is a primitive APPLICATION 10 element: the operation
//! value is the entry DN itself, with no inner TLV.

use ldap_asn1::{BerEncodeError, BerWriter};

use super::{OpDecodeError, RequestDecodeError};
use crate::dn;
use crate::message::{DeleteRequest, ProtocolOp};

pub(crate) struct DeleteRequestPlan<'a> {
    req: &'a DeleteRequest,
}

impl<'a> DeleteRequestPlan<'a> {
    pub(crate) fn new(req: &'a DeleteRequest) -> Self {
        DeleteRequestPlan { req }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.req.name.len()
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_slice(self.req.name.as_bytes())
    }
}

pub(crate) fn decode_request(data: &[u8]) -> Result<ProtocolOp, OpDecodeError> {
    let name = std::str::from_utf8(data)
        .map_err(|_| RequestDecodeError::MalformedDn(dn::DnSyntaxError::InvalidUtf8))?;
    dn::validate_dn(name).map_err(RequestDecodeError::MalformedDn)?;
    Ok(ProtocolOp::DeleteRequest(DeleteRequest {
        name: name.to_string(),
    }))
}
