/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::fmt;

/// An RFC 4511 §4.1.9 resultCode value.
///
/// Unknown numeric codes are preserved so that responses from servers
/// speaking newer extensions still round-trip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResultCode(u32);

macro_rules! def_const_code {
    ($name:ident, $value:literal) => {
        pub const $name: ResultCode = ResultCode($value);
    };
}

impl ResultCode {
    def_const_code!(SUCCESS, 0);
    def_const_code!(OPERATIONS_ERROR, 1);
    def_const_code!(PROTOCOL_ERROR, 2);
    def_const_code!(TIME_LIMIT_EXCEEDED, 3);
    def_const_code!(SIZE_LIMIT_EXCEEDED, 4);
    def_const_code!(COMPARE_FALSE, 5);
    def_const_code!(COMPARE_TRUE, 6);
    def_const_code!(AUTH_METHOD_NOT_SUPPORTED, 7);
    def_const_code!(STRONGER_AUTH_REQUIRED, 8);
    def_const_code!(REFERRAL, 10);
    def_const_code!(ADMIN_LIMIT_EXCEEDED, 11);
    def_const_code!(UNAVAILABLE_CRITICAL_EXTENSION, 12);
    def_const_code!(CONFIDENTIALITY_REQUIRED, 13);
    def_const_code!(SASL_BIND_IN_PROGRESS, 14);
    def_const_code!(NO_SUCH_ATTRIBUTE, 16);
    def_const_code!(UNDEFINED_ATTRIBUTE_TYPE, 17);
    def_const_code!(INAPPROPRIATE_MATCHING, 18);
    def_const_code!(CONSTRAINT_VIOLATION, 19);
    def_const_code!(ATTRIBUTE_OR_VALUE_EXISTS, 20);
    def_const_code!(INVALID_ATTRIBUTE_SYNTAX, 21);
    def_const_code!(NO_SUCH_OBJECT, 32);
    def_const_code!(ALIAS_PROBLEM, 33);
    def_const_code!(INVALID_DN_SYNTAX, 34);
    def_const_code!(ALIAS_DEREFERENCING_PROBLEM, 36);
    def_const_code!(INAPPROPRIATE_AUTHENTICATION, 48);
    def_const_code!(INVALID_CREDENTIALS, 49);
    def_const_code!(INSUFFICIENT_ACCESS_RIGHTS, 50);
    def_const_code!(BUSY, 51);
    def_const_code!(UNAVAILABLE, 52);
    def_const_code!(UNWILLING_TO_PERFORM, 53);
    def_const_code!(LOOP_DETECT, 54);
    def_const_code!(NAMING_VIOLATION, 64);
    def_const_code!(OBJECT_CLASS_VIOLATION, 65);
    def_const_code!(NOT_ALLOWED_ON_NON_LEAF, 66);
    def_const_code!(NOT_ALLOWED_ON_RDN, 67);
    def_const_code!(ENTRY_ALREADY_EXISTS, 68);
    def_const_code!(OBJECT_CLASS_MODS_PROHIBITED, 69);
    def_const_code!(AFFECTS_MULTIPLE_DSAS, 71);
    def_const_code!(OTHER, 80);
    // RFC 3909
    def_const_code!(CANCELED, 118);
    def_const_code!(NO_SUCH_OPERATION, 119);
    def_const_code!(TOO_LATE, 120);
    def_const_code!(CANNOT_CANCEL, 121);

    #[inline]
    pub const fn new(code: u32) -> Self {
        ResultCode(code)
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        *self == ResultCode::SUCCESS
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The LDAPResult envelope embedded in every response operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapResult {
    pub result_code: ResultCode,
    pub matched_dn: String,
    pub diagnostic_message: String,
    /// Ordered LDAP URLs, empty means absent on the wire
    pub referral: Vec<String>,
}

impl LdapResult {
    pub fn new(result_code: ResultCode) -> Self {
        LdapResult {
            result_code,
            matched_dn: String::new(),
            diagnostic_message: String::new(),
            referral: Vec::new(),
        }
    }

    pub fn success() -> Self {
        LdapResult::new(ResultCode::SUCCESS)
    }

    pub fn with_diagnostic_message(mut self, message: impl Into<String>) -> Self {
        self.diagnostic_message = message.into();
        self
    }

    pub fn with_matched_dn(mut self, dn: impl Into<String>) -> Self {
        self.matched_dn = dn.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_values() {
        assert_eq!(ResultCode::SUCCESS.value(), 0);
        assert_eq!(ResultCode::INVALID_DN_SYNTAX.value(), 34);
        assert_eq!(ResultCode::NAMING_VIOLATION.value(), 64);
        assert!(ResultCode::SUCCESS.is_success());
        assert!(!ResultCode::OTHER.is_success());
        assert_eq!(ResultCode::new(34), ResultCode::INVALID_DN_SYNTAX);
    }

    #[test]
    fn build_result() {
        let r = LdapResult::new(ResultCode::NO_SUCH_OBJECT)
            .with_matched_dn("ou=system")
            .with_diagnostic_message("not here");
        assert_eq!(r.matched_dn, "ou=system");
        assert_eq!(r.diagnostic_message, "not here");
        assert!(r.referral.is_empty());
    }
}
