/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! OID-keyed extended operation registry and the builtin operations.
//!
//! An extended operation registers one handler carrying both decode
//! directions; the decorate directions are the trait methods. OIDs
//! with no handler stay opaque byte payloads on the message.

use std::any::Any;
use std::fmt;

use ahash::AHashMap;
use ldap_asn1::BerReadError;
use thiserror::Error;

use crate::RegistryError;
use crate::message::{ExtendedRequest, ExtendedResponse, LdapResult};

mod start_tls;
pub use start_tls::{START_TLS_OID, StartTls};

mod who_am_i;
pub use who_am_i::{WHO_AM_I_OID, WhoAmI, WhoAmIResponse};

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ExtendedValueError {
    #[error("missing value")]
    MissingValue,
    #[error("unexpected value")]
    UnexpectedValue,
    #[error("invalid value: {0}")]
    InvalidValue(#[from] BerReadError),
}

pub trait ExtendedRequestValue: fmt::Debug {
    fn oid(&self) -> &str;

    fn encoded_value(&self) -> Option<Vec<u8>>;

    fn as_any(&self) -> &dyn Any;

    fn to_request(&self) -> ExtendedRequest {
        ExtendedRequest {
            name: self.oid().to_string(),
            value: self.encoded_value(),
        }
    }
}

pub trait ExtendedResponseValue: fmt::Debug {
    fn oid(&self) -> &str;

    fn encoded_value(&self) -> Option<Vec<u8>>;

    fn as_any(&self) -> &dyn Any;

    fn to_response(&self, result: LdapResult) -> ExtendedResponse {
        ExtendedResponse {
            result,
            name: Some(self.oid().to_string()),
            value: self.encoded_value(),
        }
    }
}

pub type ExtendedRequestParser =
    fn(Option<&[u8]>) -> Result<Box<dyn ExtendedRequestValue>, ExtendedValueError>;
pub type ExtendedResponseParser =
    fn(Option<&[u8]>) -> Result<Box<dyn ExtendedResponseValue>, ExtendedValueError>;

#[derive(Clone, Copy)]
pub struct ExtendedOperationHandler {
    pub parse_request: ExtendedRequestParser,
    pub parse_response: ExtendedResponseParser,
}

#[derive(Default)]
pub struct ExtendedOperationRegistry {
    map: AHashMap<String, ExtendedOperationHandler>,
}

impl ExtendedOperationRegistry {
    pub fn new() -> Self {
        ExtendedOperationRegistry::default()
    }

    /// Register a handler for one operation OID. Duplicate
    /// registration is rejected.
    pub fn register(
        &mut self,
        oid: impl Into<String>,
        handler: ExtendedOperationHandler,
    ) -> Result<(), RegistryError> {
        let oid = oid.into();
        if self.map.contains_key(&oid) {
            return Err(RegistryError::Duplicate(oid));
        }
        self.map.insert(oid, handler);
        Ok(())
    }

    #[inline]
    pub fn contains(&self, oid: &str) -> bool {
        self.map.contains_key(oid)
    }

    #[inline]
    pub fn get(&self, oid: &str) -> Option<&ExtendedOperationHandler> {
        self.map.get(oid)
    }

    pub fn parse_request(
        &self,
        request: &ExtendedRequest,
    ) -> Option<Result<Box<dyn ExtendedRequestValue>, ExtendedValueError>> {
        self.get(&request.name)
            .map(|h| (h.parse_request)(request.value.as_deref()))
    }

    pub fn parse_response(
        &self,
        response: &ExtendedResponse,
    ) -> Option<Result<Box<dyn ExtendedResponseValue>, ExtendedValueError>> {
        let name = response.name.as_deref()?;
        self.get(name)
            .map(|h| (h.parse_response)(response.value.as_deref()))
    }
}

/// Register the extended operations shipped with this crate
pub fn register_builtin(registry: &mut ExtendedOperationRegistry) -> Result<(), RegistryError> {
    registry.register(START_TLS_OID, start_tls::handler())?;
    registry.register(WHO_AM_I_OID, who_am_i::handler())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_rejected() {
        let mut r = ExtendedOperationRegistry::new();
        register_builtin(&mut r).unwrap();
        let e = r.register(START_TLS_OID, start_tls::handler()).unwrap_err();
        assert_eq!(e, RegistryError::Duplicate(START_TLS_OID.to_string()));
    }

    #[test]
    fn unknown_oid_miss() {
        let r = ExtendedOperationRegistry::new();
        assert!(r.get("1.2.3.4").is_none());
        let req = ExtendedRequest {
            name: "1.2.3.4".to_string(),
            value: None,
        };
        assert!(r.parse_request(&req).is_none());
    }
}
