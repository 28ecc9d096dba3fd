/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

/// An LDAP control as attached to a message.
///
/// The value stays opaque at this layer; typed interpretation goes
/// through the OID-keyed control registry. An empty present value is
/// normalized to absent, which is also how it goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub oid: String,
    pub critical: bool,
    pub value: Option<Vec<u8>>,
}

impl Control {
    pub fn new(oid: impl Into<String>) -> Self {
        Control {
            oid: oid.into(),
            critical: false,
            value: None,
        }
    }

    pub fn with_criticality(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub fn with_value(mut self, value: Vec<u8>) -> Self {
        self.value = if value.is_empty() { None } else { Some(value) };
        self
    }

    #[inline]
    pub fn value_bytes(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }
}
