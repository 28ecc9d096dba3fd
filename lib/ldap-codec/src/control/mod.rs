/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! OID-keyed control registry and the builtin typed controls.
//!
//! Unrecognized OIDs never go through here: they stay opaque on the
//! message and round-trip unchanged. Registration happens once at
//! startup; lookup afterwards is read-only and safe to share.

use std::any::Any;
use std::fmt;

use ahash::AHashMap;
use ldap_asn1::BerReadError;
use thiserror::Error;

use crate::RegistryError;
use crate::message::Control;

mod paged_results;
pub use paged_results::{PAGED_RESULTS_OID, PagedResultsControl};

mod manage_dsa_it;
pub use manage_dsa_it::{MANAGE_DSA_IT_OID, ManageDsaIt};

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ControlValueError {
    #[error("missing control value")]
    MissingValue,
    #[error("unexpected control value")]
    UnexpectedValue,
    #[error("invalid control value: {0}")]
    InvalidValue(#[from] BerReadError),
    #[error("invalid control field: {0}")]
    InvalidField(&'static str),
}

/// A typed control value that can be turned back into a wire control
pub trait ControlValue: fmt::Debug {
    fn oid(&self) -> &str;

    /// The BER-encoded controlValue octets, None when the control
    /// carries no value
    fn encoded_value(&self) -> Option<Vec<u8>>;

    fn as_any(&self) -> &dyn Any;

    fn to_control(&self, critical: bool) -> Control {
        let mut c = Control::new(self.oid()).with_criticality(critical);
        if let Some(value) = self.encoded_value() {
            c = c.with_value(value);
        }
        c
    }
}

pub type ControlValueParser =
    fn(Option<&[u8]>) -> Result<Box<dyn ControlValue>, ControlValueError>;

#[derive(Default)]
pub struct ControlRegistry {
    map: AHashMap<String, ControlValueParser>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        ControlRegistry::default()
    }

    /// Register a parser for one control OID. Duplicate registration
    /// is rejected so plugin wiring bugs surface at startup.
    pub fn register(
        &mut self,
        oid: impl Into<String>,
        parser: ControlValueParser,
    ) -> Result<(), RegistryError> {
        let oid = oid.into();
        if self.map.contains_key(&oid) {
            return Err(RegistryError::Duplicate(oid));
        }
        self.map.insert(oid, parser);
        Ok(())
    }

    #[inline]
    pub fn contains(&self, oid: &str) -> bool {
        self.map.contains_key(oid)
    }

    #[inline]
    pub fn get(&self, oid: &str) -> Option<ControlValueParser> {
        self.map.get(oid).copied()
    }

    /// Resolve a decoded control to its typed value, None if the OID
    /// has no registered parser
    pub fn parse_control(
        &self,
        control: &Control,
    ) -> Option<Result<Box<dyn ControlValue>, ControlValueError>> {
        self.get(&control.oid).map(|parse| parse(control.value_bytes()))
    }
}

/// Register the controls shipped with this crate
pub fn register_builtin(registry: &mut ControlRegistry) -> Result<(), RegistryError> {
    registry.register(PAGED_RESULTS_OID, paged_results::parse_boxed)?;
    registry.register(MANAGE_DSA_IT_OID, manage_dsa_it::parse_boxed)?;
    Ok(())
}
