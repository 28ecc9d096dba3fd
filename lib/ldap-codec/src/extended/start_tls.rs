/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::any::Any;

use super::{
    ExtendedOperationHandler, ExtendedRequestValue, ExtendedResponseValue, ExtendedValueError,
};

/// RFC 4511 §4.14 StartTLS
pub const START_TLS_OID: &str = "1.3.6.1.4.1.1466.20037";

/// Neither the request nor the response carries a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartTls;

impl StartTls {
    pub fn parse(value: Option<&[u8]>) -> Result<Self, ExtendedValueError> {
        if value.is_some() {
            return Err(ExtendedValueError::UnexpectedValue);
        }
        Ok(StartTls)
    }
}

impl ExtendedRequestValue for StartTls {
    fn oid(&self) -> &str {
        START_TLS_OID
    }

    fn encoded_value(&self) -> Option<Vec<u8>> {
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ExtendedResponseValue for StartTls {
    fn oid(&self) -> &str {
        START_TLS_OID
    }

    fn encoded_value(&self) -> Option<Vec<u8>> {
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(super) fn handler() -> ExtendedOperationHandler {
    ExtendedOperationHandler {
        parse_request: |value| Ok(Box::new(StartTls::parse(value)?)),
        parse_response: |value| Ok(Box::new(StartTls::parse(value)?)),
    }
}
