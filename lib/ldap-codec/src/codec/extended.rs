/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use ldap_asn1::{BerEncodeError, BerReader, BerWriter, tag, tlv_size};

use super::result::{ResultPlan, decode_ldap_result};
use super::{FatalDecodeError, OpDecodeError, RequestDecodeError, utf8_field};
use crate::extended::ExtendedOperationRegistry;
use crate::message::{ExtendedRequest, ExtendedResponse, IntermediateResponse, ProtocolOp};
use crate::oid::{OidSyntaxError, validate_numeric_oid};

const REQUEST_NAME_TAG: u8 = tag::context(0);
const REQUEST_VALUE_TAG: u8 = tag::context(1);
const RESPONSE_NAME_TAG: u8 = tag::context(10);
const RESPONSE_VALUE_TAG: u8 = tag::context(11);
const INTERMEDIATE_NAME_TAG: u8 = tag::context(0);
const INTERMEDIATE_VALUE_TAG: u8 = tag::context(1);

pub(crate) struct ExtendedRequestPlan<'a> {
    req: &'a ExtendedRequest,
    value_len: usize,
}

impl<'a> ExtendedRequestPlan<'a> {
    pub(crate) fn new(req: &'a ExtendedRequest) -> Self {
        // a present-but-empty requestValue still gets its own TLV
        let value_len = tlv_size(req.name.len())
            + req.value.as_ref().map_or(0, |v| tlv_size(v.len()));
        ExtendedRequestPlan { req, value_len }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_primitive(REQUEST_NAME_TAG, self.req.name.as_bytes())?;
        if let Some(value) = &self.req.value {
            w.put_primitive(REQUEST_VALUE_TAG, value)?;
        }
        Ok(())
    }
}

pub(crate) struct ExtendedResponsePlan<'a> {
    rsp: &'a ExtendedResponse,
    result: ResultPlan<'a>,
    value_len: usize,
}

impl<'a> ExtendedResponsePlan<'a> {
    pub(crate) fn new(rsp: &'a ExtendedResponse) -> Self {
        let result = ResultPlan::new(&rsp.result);
        let value_len = result.value_len()
            + rsp.name.as_ref().map_or(0, |n| tlv_size(n.len()))
            + rsp.value.as_ref().map_or(0, |v| tlv_size(v.len()));
        ExtendedResponsePlan {
            rsp,
            result,
            value_len,
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        self.result.encode(w)?;
        if let Some(name) = &self.rsp.name {
            w.put_primitive(RESPONSE_NAME_TAG, name.as_bytes())?;
        }
        if let Some(value) = &self.rsp.value {
            w.put_primitive(RESPONSE_VALUE_TAG, value)?;
        }
        Ok(())
    }
}

pub(crate) struct IntermediateResponsePlan<'a> {
    rsp: &'a IntermediateResponse,
    value_len: usize,
}

impl<'a> IntermediateResponsePlan<'a> {
    pub(crate) fn new(rsp: &'a IntermediateResponse) -> Self {
        let value_len = rsp.name.as_ref().map_or(0, |n| tlv_size(n.len()))
            + rsp.value.as_ref().map_or(0, |v| tlv_size(v.len()));
        IntermediateResponsePlan { rsp, value_len }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        if let Some(name) = &self.rsp.name {
            w.put_primitive(INTERMEDIATE_NAME_TAG, name.as_bytes())?;
        }
        if let Some(value) = &self.rsp.value {
            w.put_primitive(INTERMEDIATE_VALUE_TAG, value)?;
        }
        Ok(())
    }
}

pub(crate) fn decode_request(
    data: &[u8],
    registry: &ExtendedOperationRegistry,
) -> Result<ProtocolOp, OpDecodeError> {
    let mut r = BerReader::new(data);

    let name_bytes = r.expect_tlv(REQUEST_NAME_TAG)?;
    let name = std::str::from_utf8(name_bytes)
        .map_err(|_| RequestDecodeError::MalformedRequestName(OidSyntaxError::InvalidUtf8))?;
    validate_numeric_oid(name).map_err(RequestDecodeError::MalformedRequestName)?;

    let mut value = None;
    if r.peek_tag() == Some(REQUEST_VALUE_TAG) {
        value = Some(r.expect_tlv(REQUEST_VALUE_TAG)?.to_vec());
    }
    r.expect_end().map_err(FatalDecodeError::InvalidElement)?;

    let req = ExtendedRequest {
        name: name.to_string(),
        value,
    };
    if let Some(Err(e)) = registry.parse_request(&req) {
        return Err(RequestDecodeError::InvalidExtendedRequestValue(e).into());
    }

    Ok(ProtocolOp::ExtendedRequest(req))
}

pub(crate) fn decode_response(data: &[u8]) -> Result<ProtocolOp, FatalDecodeError> {
    let mut r = BerReader::new(data);
    let result = decode_ldap_result(&mut r)?;

    let mut name = None;
    if r.peek_tag() == Some(RESPONSE_NAME_TAG) {
        name = Some(utf8_field(
            r.expect_tlv(RESPONSE_NAME_TAG)?,
            "responseName",
        )?);
    }
    let mut value = None;
    if r.peek_tag() == Some(RESPONSE_VALUE_TAG) {
        value = Some(r.expect_tlv(RESPONSE_VALUE_TAG)?.to_vec());
    }
    r.expect_end().map_err(FatalDecodeError::InvalidElement)?;

    Ok(ProtocolOp::ExtendedResponse(ExtendedResponse {
        result,
        name,
        value,
    }))
}

pub(crate) fn decode_intermediate(data: &[u8]) -> Result<ProtocolOp, FatalDecodeError> {
    let mut r = BerReader::new(data);

    let mut name = None;
    if r.peek_tag() == Some(INTERMEDIATE_NAME_TAG) {
        name = Some(utf8_field(
            r.expect_tlv(INTERMEDIATE_NAME_TAG)?,
            "responseName",
        )?);
    }
    let mut value = None;
    if r.peek_tag() == Some(INTERMEDIATE_VALUE_TAG) {
        value = Some(r.expect_tlv(INTERMEDIATE_VALUE_TAG)?.to_vec());
    }
    r.expect_end().map_err(FatalDecodeError::InvalidElement)?;

    Ok(ProtocolOp::IntermediateResponse(IntermediateResponse {
        name,
        value,
    }))
}
