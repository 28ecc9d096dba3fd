/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::any::Any;

use super::{
    ExtendedOperationHandler, ExtendedRequestValue, ExtendedResponseValue, ExtendedValueError,
};

/// RFC 4532 "Who am I?"
pub const WHO_AM_I_OID: &str = "1.3.6.1.4.1.4203.1.11.3";

/// The request carries no value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WhoAmI;

impl WhoAmI {
    pub fn parse(value: Option<&[u8]>) -> Result<Self, ExtendedValueError> {
        if value.is_some() {
            return Err(ExtendedValueError::UnexpectedValue);
        }
        Ok(WhoAmI)
    }
}

impl ExtendedRequestValue for WhoAmI {
    fn oid(&self) -> &str {
        WHO_AM_I_OID
    }

    fn encoded_value(&self) -> Option<Vec<u8>> {
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The response value is the authorization identity, empty but
/// present for an anonymous association.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhoAmIResponse {
    pub authz_id: Vec<u8>,
}

impl WhoAmIResponse {
    pub fn new(authz_id: impl Into<Vec<u8>>) -> Self {
        WhoAmIResponse {
            authz_id: authz_id.into(),
        }
    }

    pub fn parse(value: Option<&[u8]>) -> Result<Self, ExtendedValueError> {
        Ok(WhoAmIResponse {
            authz_id: value.unwrap_or_default().to_vec(),
        })
    }
}

impl ExtendedResponseValue for WhoAmIResponse {
    fn oid(&self) -> &str {
        WHO_AM_I_OID
    }

    fn encoded_value(&self) -> Option<Vec<u8>> {
        Some(self.authz_id.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(super) fn handler() -> ExtendedOperationHandler {
    ExtendedOperationHandler {
        parse_request: |value| Ok(Box::new(WhoAmI::parse(value)?)),
        parse_response: |value| Ok(Box::new(WhoAmIResponse::parse(value)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_no_value() {
        WhoAmI::parse(None).unwrap();
        assert_eq!(
            WhoAmI::parse(Some(b"u:anna")).unwrap_err(),
            ExtendedValueError::UnexpectedValue
        );
    }

    #[test]
    fn response_values() {
        let v = WhoAmIResponse::parse(Some(b"dn:cn=anna,dc=example,dc=com")).unwrap();
        assert_eq!(v.authz_id, b"dn:cn=anna,dc=example,dc=com");

        // anonymous: empty but present
        let v = WhoAmIResponse::parse(Some(b"")).unwrap();
        assert!(v.authz_id.is_empty());
        assert_eq!(v.encoded_value(), Some(Vec::new()));
    }
}
