/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use thiserror::Error;

use ldap_asn1::{BerEncodeError, BerReadError};

use crate::control::ControlValueError;
use crate::dn::DnSyntaxError;
use crate::extended::ExtendedValueError;
use crate::message::{LdapMessage, ResultCode};
use crate::oid::OidSyntaxError;

/// Encode failures are length-plan bugs, never recoverable conditions
#[derive(Debug, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("buffer overflow: {0}")]
    BufferOverflow(#[from] BerEncodeError),
}

/// A decode failure no response can be constructed for. The caller
/// must abort or resynchronize the connection byte stream.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum FatalDecodeError {
    #[error("empty pdu")]
    EmptyPdu,
    #[error("invalid message ber type")]
    InvalidBerType,
    #[error("invalid message length value")]
    InvalidMessageLength,
    #[error("invalid message id")]
    InvalidMessageId,
    #[error("unknown protocol op tag {0:#04x}")]
    UnknownOperationTag(u8),
    #[error("unknown filter tag {0:#04x}")]
    UnknownFilterTag(u8),
    #[error("invalid element: {0}")]
    InvalidElement(#[from] BerReadError),
    #[error("invalid utf-8 in {0}")]
    InvalidUtf8(&'static str),
    #[error("invalid value for control {oid}: {reason}")]
    InvalidControlValue {
        oid: String,
        reason: ControlValueError,
    },
}

/// A classified semantic failure inside a well-formed request
/// envelope, mapped to the result code of the synthesized response
#[derive(Debug, PartialEq, Eq, Error)]
pub enum RequestDecodeError {
    #[error("malformed dn: {0}")]
    MalformedDn(DnSyntaxError),
    #[error("malformed relative dn: {0}")]
    MalformedRdn(DnSyntaxError),
    #[error("malformed superior dn: {0}")]
    MalformedSuperiorDn(DnSyntaxError),
    #[error("empty attribute list")]
    EmptyAttributeList,
    #[error("malformed attribute description: {0}")]
    MalformedAttributeDescription(OidSyntaxError),
    #[error("unsupported bind version {0}")]
    UnsupportedBindVersion(i64),
    #[error("unknown bind authentication choice {0:#04x}")]
    UnknownAuthChoice(u8),
    #[error("invalid {0} value {1}")]
    InvalidFieldValue(&'static str, i64),
    #[error("malformed request name: {0}")]
    MalformedRequestName(OidSyntaxError),
    #[error("invalid extended request value: {0}")]
    InvalidExtendedRequestValue(ExtendedValueError),
    #[error("filter nested too deeply")]
    FilterTooDeep,
}

impl RequestDecodeError {
    /// The resultCode the synthesized error response carries
    pub fn result_code(&self) -> ResultCode {
        match self {
            RequestDecodeError::MalformedDn(_)
            | RequestDecodeError::MalformedRdn(_)
            | RequestDecodeError::MalformedSuperiorDn(_) => ResultCode::INVALID_DN_SYNTAX,
            RequestDecodeError::EmptyAttributeList => ResultCode::NAMING_VIOLATION,
            RequestDecodeError::MalformedAttributeDescription(_) => {
                ResultCode::INVALID_ATTRIBUTE_SYNTAX
            }
            RequestDecodeError::UnknownAuthChoice(_) => ResultCode::AUTH_METHOD_NOT_SUPPORTED,
            RequestDecodeError::UnsupportedBindVersion(_)
            | RequestDecodeError::InvalidFieldValue(_, _)
            | RequestDecodeError::MalformedRequestName(_)
            | RequestDecodeError::InvalidExtendedRequestValue(_)
            | RequestDecodeError::FilterTooDeep => ResultCode::PROTOCOL_ERROR,
        }
    }
}

/// The three-way decode taxonomy callers depend on: read more bytes,
/// abort the stream, or reply with the attached response and continue
#[derive(Debug, PartialEq, Eq, Error)]
pub enum MessageDecodeError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error("fatal: {0}")]
    Fatal(#[from] FatalDecodeError),
    #[error("recoverable: {reason}")]
    Recoverable {
        /// Size of the malformed PDU, to skip in the input stream
        pdu_len: usize,
        /// The protocol-correct error response to send to the peer
        response: Box<LdapMessage>,
        reason: RequestDecodeError,
    },
}

/// Internal result shape of the per-operation decoders
#[derive(Debug)]
pub(crate) enum OpDecodeError {
    Fatal(FatalDecodeError),
    Request(RequestDecodeError),
}

impl From<FatalDecodeError> for OpDecodeError {
    fn from(value: FatalDecodeError) -> Self {
        OpDecodeError::Fatal(value)
    }
}

impl From<BerReadError> for OpDecodeError {
    fn from(value: BerReadError) -> Self {
        OpDecodeError::Fatal(FatalDecodeError::InvalidElement(value))
    }
}

impl From<RequestDecodeError> for OpDecodeError {
    fn from(value: RequestDecodeError) -> Self {
        OpDecodeError::Request(value)
    }
}
