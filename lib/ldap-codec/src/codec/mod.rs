/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! LDAPMessage framing, operation dispatch and the decode
//! error-recovery protocol.

use ldap_asn1::{BerLength, BerLengthParseError, BerReadError, BerReader, tag};

use crate::control::ControlRegistry;
use crate::dn::{self, DnSyntaxError};
use crate::extended::ExtendedOperationRegistry;
use crate::message::{ExtendedResponse, LdapMessage, LdapResult, ProtocolOp};
use crate::RegistryError;

mod error;
pub use error::{EncodeError, FatalDecodeError, MessageDecodeError, RequestDecodeError};
pub(crate) use error::OpDecodeError;

mod result;
mod attribute;
mod control;
mod filter;

mod bind;
mod search;
mod modify;
mod add;
mod delete;
mod modify_dn;
mod compare;
mod abandon;
mod extended;

mod encode;
pub use encode::MessageEncoder;

/// APPLICATION class identifier octets of the protocolOp CHOICE
pub(crate) mod op_tag {
    pub(crate) const BIND_REQUEST: u8 = 0x60;
    pub(crate) const BIND_RESPONSE: u8 = 0x61;
    pub(crate) const UNBIND_REQUEST: u8 = 0x42;
    pub(crate) const SEARCH_REQUEST: u8 = 0x63;
    pub(crate) const SEARCH_RESULT_ENTRY: u8 = 0x64;
    pub(crate) const SEARCH_RESULT_DONE: u8 = 0x65;
    pub(crate) const SEARCH_RESULT_REFERENCE: u8 = 0x73;
    pub(crate) const MODIFY_REQUEST: u8 = 0x66;
    pub(crate) const MODIFY_RESPONSE: u8 = 0x67;
    pub(crate) const ADD_REQUEST: u8 = 0x68;
    pub(crate) const ADD_RESPONSE: u8 = 0x69;
    pub(crate) const DEL_REQUEST: u8 = 0x4a;
    pub(crate) const DEL_RESPONSE: u8 = 0x6b;
    pub(crate) const MODIFY_DN_REQUEST: u8 = 0x6c;
    pub(crate) const MODIFY_DN_RESPONSE: u8 = 0x6d;
    pub(crate) const COMPARE_REQUEST: u8 = 0x6e;
    pub(crate) const COMPARE_RESPONSE: u8 = 0x6f;
    pub(crate) const ABANDON_REQUEST: u8 = 0x50;
    pub(crate) const EXTENDED_REQUEST: u8 = 0x77;
    pub(crate) const EXTENDED_RESPONSE: u8 = 0x78;
    pub(crate) const INTERMEDIATE_RESPONSE: u8 = 0x79;
}

/// The largest MessageID RFC 4511 allows (maxInt)
const MAX_MESSAGE_ID: i64 = 0x7fff_ffff;

const DEFAULT_MAX_PDU_SIZE: usize = 8 * 1024 * 1024;
const DEFAULT_MAX_FILTER_DEPTH: usize = 32;

pub(crate) fn utf8_field(b: &[u8], field: &'static str) -> Result<String, FatalDecodeError> {
    std::str::from_utf8(b)
        .map(str::to_string)
        .map_err(|_| FatalDecodeError::InvalidUtf8(field))
}

/// Read a request DN field, classifying syntax failures with `wrap`
pub(crate) fn decode_request_dn(
    r: &mut BerReader,
    wrap: fn(DnSyntaxError) -> RequestDecodeError,
) -> Result<String, OpDecodeError> {
    let b = r.expect_tlv(tag::OCTET_STRING)?;
    let s = std::str::from_utf8(b).map_err(|_| wrap(DnSyntaxError::InvalidUtf8))?;
    dn::validate_dn(s).map_err(wrap)?;
    Ok(s.to_string())
}

/// A decoded message together with the number of input bytes its PDU
/// occupied, so the caller can advance its read buffer
#[derive(Debug, PartialEq, Eq)]
pub struct DecodedMessage {
    message: LdapMessage,
    encoded_size: usize,
}

impl DecodedMessage {
    #[inline]
    pub fn message(&self) -> &LdapMessage {
        &self.message
    }

    #[inline]
    pub fn into_message(self) -> LdapMessage {
        self.message
    }

    #[inline]
    pub fn encoded_size(&self) -> usize {
        self.encoded_size
    }
}

/// Stateless codec configuration: registries plus decode limits.
/// Build once at startup, then share across connections.
pub struct LdapCodec {
    controls: ControlRegistry,
    extended_ops: ExtendedOperationRegistry,
    max_pdu_size: usize,
    max_filter_depth: usize,
}

impl Default for LdapCodec {
    fn default() -> Self {
        LdapCodec {
            controls: ControlRegistry::new(),
            extended_ops: ExtendedOperationRegistry::new(),
            max_pdu_size: DEFAULT_MAX_PDU_SIZE,
            max_filter_depth: DEFAULT_MAX_FILTER_DEPTH,
        }
    }
}

impl LdapCodec {
    pub fn new() -> Self {
        LdapCodec::default()
    }

    /// A codec with the builtin control and extended operation
    /// handlers registered
    pub fn with_builtin() -> Result<Self, RegistryError> {
        let mut codec = LdapCodec::default();
        crate::control::register_builtin(&mut codec.controls)?;
        crate::extended::register_builtin(&mut codec.extended_ops)?;
        Ok(codec)
    }

    #[inline]
    pub fn controls(&self) -> &ControlRegistry {
        &self.controls
    }

    #[inline]
    pub fn controls_mut(&mut self) -> &mut ControlRegistry {
        &mut self.controls
    }

    #[inline]
    pub fn extended_ops(&self) -> &ExtendedOperationRegistry {
        &self.extended_ops
    }

    #[inline]
    pub fn extended_ops_mut(&mut self) -> &mut ExtendedOperationRegistry {
        &mut self.extended_ops
    }

    #[inline]
    pub fn max_pdu_size(&self) -> usize {
        self.max_pdu_size
    }

    pub fn set_max_pdu_size(&mut self, size: usize) {
        self.max_pdu_size = size;
    }

    #[inline]
    pub fn max_filter_depth(&self) -> usize {
        self.max_filter_depth
    }

    pub fn set_max_filter_depth(&mut self, depth: usize) {
        self.max_filter_depth = depth;
    }

    pub fn encode_message(&self, message: &LdapMessage) -> Result<Vec<u8>, EncodeError> {
        MessageEncoder::new(message).to_bytes()
    }

    /// Decode one LDAPMessage from the head of `data`.
    ///
    /// The three outcomes map to caller actions: `NeedMoreData` means
    /// read and retry, `Fatal` means abort or resynchronize the
    /// stream, `Recoverable` means send the attached response, skip
    /// `pdu_len` input bytes and continue.
    pub fn decode_message(&self, data: &[u8]) -> Result<DecodedMessage, MessageDecodeError> {
        if data.is_empty() {
            return Err(MessageDecodeError::NeedMoreData(2));
        }
        if data[0] != tag::SEQUENCE {
            return Err(FatalDecodeError::InvalidBerType.into());
        }

        let length = BerLength::parse(&data[1..]).map_err(|e| match e {
            BerLengthParseError::NeedMoreData(n) => MessageDecodeError::NeedMoreData(n),
            BerLengthParseError::TooLargeValue => FatalDecodeError::InvalidMessageLength.into(),
        })?;
        if length.indefinite() {
            return Err(FatalDecodeError::InvalidElement(BerReadError::IndefiniteLength).into());
        }
        let value_len = usize::try_from(length.value())
            .map_err(|_| FatalDecodeError::InvalidMessageLength)?;
        let header_len = 1 + length.encoded_len();
        let pdu_len = header_len
            .checked_add(value_len)
            .ok_or(FatalDecodeError::InvalidMessageLength)?;
        if pdu_len > self.max_pdu_size {
            return Err(FatalDecodeError::InvalidMessageLength.into());
        }
        if data.len() < pdu_len {
            return Err(MessageDecodeError::NeedMoreData(pdu_len - data.len()));
        }
        if value_len == 0 {
            return Err(FatalDecodeError::EmptyPdu.into());
        }

        let mut r = BerReader::new(&data[header_len..pdu_len]);

        let id = r
            .read_integer()
            .map_err(FatalDecodeError::InvalidElement)?;
        if !(0..=MAX_MESSAGE_ID).contains(&id) {
            return Err(FatalDecodeError::InvalidMessageId.into());
        }
        let message_id = id as u32;

        let op_tlv = r.read_tlv().map_err(FatalDecodeError::InvalidElement)?;

        let mut controls = indexmap::IndexMap::new();
        if r.peek_tag() == Some(control::CONTROLS_TAG) {
            let b = r
                .expect_tlv(control::CONTROLS_TAG)
                .map_err(FatalDecodeError::InvalidElement)?;
            controls = control::decode_controls(b)?;
        }
        r.expect_end().map_err(FatalDecodeError::InvalidElement)?;

        // a registered control with a corrupt value cannot be
        // classified to a per-operation result code
        for c in controls.values() {
            if let Some(Err(reason)) = self.controls.parse_control(c) {
                return Err(FatalDecodeError::InvalidControlValue {
                    oid: c.oid.clone(),
                    reason,
                }
                .into());
            }
        }

        let op = match self.decode_op(op_tlv.tag, op_tlv.value) {
            Ok(op) => op,
            Err(OpDecodeError::Fatal(e)) => return Err(e.into()),
            Err(OpDecodeError::Request(reason)) => {
                let response = synthesize_response(op_tlv.tag, message_id, &reason)
                    .ok_or(FatalDecodeError::UnknownOperationTag(op_tlv.tag))?;
                return Err(MessageDecodeError::Recoverable {
                    pdu_len,
                    response: Box::new(response),
                    reason,
                });
            }
        };

        Ok(DecodedMessage {
            message: LdapMessage::with_controls(message_id, op, controls),
            encoded_size: pdu_len,
        })
    }

    fn decode_op(&self, op_tag: u8, value: &[u8]) -> Result<ProtocolOp, OpDecodeError> {
        match op_tag {
            op_tag::BIND_REQUEST => bind::decode_request(value),
            op_tag::BIND_RESPONSE => bind::decode_response(value).map_err(OpDecodeError::Fatal),
            op_tag::UNBIND_REQUEST => {
                if value.is_empty() {
                    Ok(ProtocolOp::UnbindRequest)
                } else {
                    Err(FatalDecodeError::InvalidElement(BerReadError::TrailingData).into())
                }
            }
            op_tag::SEARCH_REQUEST => search::decode_request(value, self.max_filter_depth),
            op_tag::SEARCH_RESULT_ENTRY => {
                search::decode_entry(value).map_err(OpDecodeError::Fatal)
            }
            op_tag::SEARCH_RESULT_REFERENCE => {
                search::decode_reference(value).map_err(OpDecodeError::Fatal)
            }
            op_tag::SEARCH_RESULT_DONE => {
                decode_result_op(value).map(ProtocolOp::SearchResultDone)
            }
            op_tag::MODIFY_REQUEST => modify::decode_request(value),
            op_tag::MODIFY_RESPONSE => decode_result_op(value).map(ProtocolOp::ModifyResponse),
            op_tag::ADD_REQUEST => add::decode_request(value),
            op_tag::ADD_RESPONSE => decode_result_op(value).map(ProtocolOp::AddResponse),
            op_tag::DEL_REQUEST => delete::decode_request(value),
            op_tag::DEL_RESPONSE => decode_result_op(value).map(ProtocolOp::DeleteResponse),
            op_tag::MODIFY_DN_REQUEST => modify_dn::decode_request(value),
            op_tag::MODIFY_DN_RESPONSE => {
                decode_result_op(value).map(ProtocolOp::ModifyDnResponse)
            }
            op_tag::COMPARE_REQUEST => compare::decode_request(value),
            op_tag::COMPARE_RESPONSE => decode_result_op(value).map(ProtocolOp::CompareResponse),
            op_tag::ABANDON_REQUEST => abandon::decode_request(value),
            op_tag::EXTENDED_REQUEST => extended::decode_request(value, &self.extended_ops),
            op_tag::EXTENDED_RESPONSE => {
                extended::decode_response(value).map_err(OpDecodeError::Fatal)
            }
            op_tag::INTERMEDIATE_RESPONSE => {
                extended::decode_intermediate(value).map_err(OpDecodeError::Fatal)
            }
            t => Err(FatalDecodeError::UnknownOperationTag(t).into()),
        }
    }
}

fn decode_result_op(value: &[u8]) -> Result<LdapResult, OpDecodeError> {
    let mut r = BerReader::new(value);
    let result = result::decode_ldap_result(&mut r).map_err(OpDecodeError::Fatal)?;
    r.expect_end().map_err(FatalDecodeError::InvalidElement)?;
    Ok(result)
}

/// Build the protocol-correct error response for a semantically
/// invalid request. None for operations with no response type.
fn synthesize_response(
    request_tag: u8,
    message_id: u32,
    reason: &RequestDecodeError,
) -> Option<LdapMessage> {
    let result = error_result(reason);
    let op = match request_tag {
        op_tag::BIND_REQUEST => ProtocolOp::BindResponse(crate::message::BindResponse {
            result,
            server_sasl_creds: None,
        }),
        op_tag::SEARCH_REQUEST => ProtocolOp::SearchResultDone(result),
        op_tag::MODIFY_REQUEST => ProtocolOp::ModifyResponse(result),
        op_tag::ADD_REQUEST => ProtocolOp::AddResponse(result),
        op_tag::DEL_REQUEST => ProtocolOp::DeleteResponse(result),
        op_tag::MODIFY_DN_REQUEST => ProtocolOp::ModifyDnResponse(result),
        op_tag::COMPARE_REQUEST => ProtocolOp::CompareResponse(result),
        op_tag::EXTENDED_REQUEST => ProtocolOp::ExtendedResponse(ExtendedResponse {
            result,
            name: None,
            value: None,
        }),
        _ => return None,
    };
    Some(LdapMessage::new(message_id, op))
}

fn error_result(reason: &RequestDecodeError) -> LdapResult {
    LdapResult::new(reason.result_code()).with_diagnostic_message(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{DeleteRequest, ResultCode};

    fn encode(message: &LdapMessage) -> Vec<u8> {
        MessageEncoder::new(message).to_bytes().unwrap()
    }

    #[test]
    fn need_more_data_counts() {
        let codec = LdapCodec::new();
        assert_eq!(
            codec.decode_message(&[]).unwrap_err(),
            MessageDecodeError::NeedMoreData(2)
        );
        // tag only, no length octet yet
        assert_eq!(
            codec.decode_message(&[0x30]).unwrap_err(),
            MessageDecodeError::NeedMoreData(1)
        );
        // claims 5 value bytes, has 2
        assert_eq!(
            codec
                .decode_message(&[0x30, 0x05, 0x02, 0x01])
                .unwrap_err(),
            MessageDecodeError::NeedMoreData(3)
        );
    }

    #[test]
    fn empty_pdu_fatal() {
        let codec = LdapCodec::new();
        assert_eq!(
            codec.decode_message(&[0x30, 0x00]).unwrap_err(),
            MessageDecodeError::Fatal(FatalDecodeError::EmptyPdu)
        );
    }

    #[test]
    fn non_sequence_outer_tag_fatal() {
        let codec = LdapCodec::new();
        assert_eq!(
            codec.decode_message(&[0x04, 0x00]).unwrap_err(),
            MessageDecodeError::Fatal(FatalDecodeError::InvalidBerType)
        );
    }

    #[test]
    fn oversized_envelope_fatal() {
        let mut codec = LdapCodec::new();
        codec.set_max_pdu_size(16);
        assert_eq!(
            codec.decode_message(&[0x30, 0x7f, 0x02]).unwrap_err(),
            MessageDecodeError::Fatal(FatalDecodeError::InvalidMessageLength)
        );
    }

    #[test]
    fn unknown_operation_tag_fatal() {
        let codec = LdapCodec::new();
        let data = [0x30, 0x05, 0x02, 0x01, 0x01, 0x7f, 0x00];
        assert_eq!(
            codec.decode_message(&data).unwrap_err(),
            MessageDecodeError::Fatal(FatalDecodeError::UnknownOperationTag(0x7f))
        );
    }

    #[test]
    fn negative_message_id_fatal() {
        let codec = LdapCodec::new();
        let data = [0x30, 0x05, 0x02, 0x01, 0xff, 0x42, 0x00];
        assert_eq!(
            codec.decode_message(&data).unwrap_err(),
            MessageDecodeError::Fatal(FatalDecodeError::InvalidMessageId)
        );
    }

    #[test]
    fn trailing_bytes_fatal() {
        let codec = LdapCodec::new();
        let data = [0x30, 0x06, 0x02, 0x01, 0x01, 0x42, 0x00, 0x00];
        assert_eq!(
            codec.decode_message(&data).unwrap_err(),
            MessageDecodeError::Fatal(FatalDecodeError::InvalidElement(
                ldap_asn1::BerReadError::TrailingData
            ))
        );
    }

    #[test]
    fn unbind_round_trip() {
        let codec = LdapCodec::new();
        let msg = LdapMessage::new(7, ProtocolOp::UnbindRequest);
        let buf = encode(&msg);
        let decoded = codec.decode_message(&buf).unwrap();
        assert_eq!(decoded.encoded_size(), buf.len());
        assert_eq!(decoded.message(), &msg);
    }

    #[test]
    fn recoverable_bad_dn() {
        let codec = LdapCodec::new();
        let msg = LdapMessage::new(
            1,
            ProtocolOp::DeleteRequest(DeleteRequest {
                name: "cn=x".to_string(),
            }),
        );
        let mut buf = encode(&msg);
        buf[7] = b':'; // cn:x
        match codec.decode_message(&buf).unwrap_err() {
            MessageDecodeError::Recoverable {
                pdu_len,
                response,
                reason,
            } => {
                assert_eq!(pdu_len, buf.len());
                assert_eq!(response.message_id(), 1);
                match response.op() {
                    ProtocolOp::DeleteResponse(result) => {
                        assert_eq!(result.result_code, ResultCode::INVALID_DN_SYNTAX);
                        assert!(!result.diagnostic_message.is_empty());
                    }
                    op => panic!("unexpected response op {op:?}"),
                }
                assert!(matches!(reason, RequestDecodeError::MalformedDn(_)));
            }
            e => panic!("unexpected error {e:?}"),
        }
    }
}
