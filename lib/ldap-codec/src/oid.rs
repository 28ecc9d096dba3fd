/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Numeric OID and attribute description syntax validation.

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum OidSyntaxError {
    #[error("invalid utf-8")]
    InvalidUtf8,
    #[error("empty oid")]
    Empty,
    #[error("too few arcs")]
    TooFewArcs,
    #[error("empty arc")]
    EmptyArc,
    #[error("invalid arc char {0:?}")]
    InvalidArcChar(char),
    #[error("leading zero in arc")]
    LeadingZero,
    #[error("invalid first arc")]
    InvalidFirstArc,
    #[error("empty descriptor")]
    EmptyDescr,
    #[error("invalid descriptor char {0:?}")]
    InvalidDescrChar(char),
    #[error("empty attribute option")]
    EmptyOption,
}

/// Validate a dotted-decimal OID (RFC 4512 numericoid)
pub fn validate_numeric_oid(s: &str) -> Result<(), OidSyntaxError> {
    if s.is_empty() {
        return Err(OidSyntaxError::Empty);
    }
    let mut arcs = 0;
    for (i, arc) in s.split('.').enumerate() {
        if arc.is_empty() {
            return Err(OidSyntaxError::EmptyArc);
        }
        if let Some(c) = arc.chars().find(|c| !c.is_ascii_digit()) {
            return Err(OidSyntaxError::InvalidArcChar(c));
        }
        if arc.len() > 1 && arc.starts_with('0') {
            return Err(OidSyntaxError::LeadingZero);
        }
        if i == 0 && !matches!(arc, "0" | "1" | "2") {
            return Err(OidSyntaxError::InvalidFirstArc);
        }
        arcs += 1;
    }
    if arcs < 2 {
        return Err(OidSyntaxError::TooFewArcs);
    }
    Ok(())
}

/// Validate an attribute description: numericoid or descr, with
/// optional `;option` suffixes (RFC 4512 §2.5)
pub fn validate_attribute_description(s: &str) -> Result<(), OidSyntaxError> {
    let mut parts = s.split(';');
    let base = parts.next().unwrap_or_default();
    if base.is_empty() {
        return Err(OidSyntaxError::Empty);
    }
    if base.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        validate_numeric_oid(base)?;
    } else {
        validate_descr(base)?;
    }
    for opt in parts {
        if opt.is_empty() {
            return Err(OidSyntaxError::EmptyOption);
        }
        if let Some(c) = opt.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
            return Err(OidSyntaxError::InvalidDescrChar(c));
        }
    }
    Ok(())
}

fn validate_descr(s: &str) -> Result<(), OidSyntaxError> {
    let mut chars = s.chars();
    match chars.next() {
        None => return Err(OidSyntaxError::EmptyDescr),
        Some(c) if !c.is_ascii_alphabetic() => return Err(OidSyntaxError::InvalidDescrChar(c)),
        Some(_) => {}
    }
    if let Some(c) = chars.find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
        return Err(OidSyntaxError::InvalidDescrChar(c));
    }
    Ok(())
}
