/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! RFC 4514 distinguished name syntax validation.
//!
//! This checks the string representation only; no schema knowledge.
//! The empty DN is valid (it names the root DSE), an empty RDN is not.

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum DnSyntaxError {
    #[error("invalid utf-8")]
    InvalidUtf8,
    #[error("empty rdn")]
    EmptyRdn,
    #[error("invalid attribute type char {0:?}")]
    InvalidAttributeType(char),
    #[error("empty attribute type")]
    EmptyAttributeType,
    #[error("missing '=' in rdn")]
    MissingEquals,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("unterminated escape sequence")]
    UnterminatedEscape,
    #[error("invalid hex string value")]
    InvalidHexString,
    #[error("unescaped special char {0:?} in value")]
    UnescapedSpecial(char),
}

/// Validate a DN taken from the wire as raw bytes
pub fn validate_dn_bytes(data: &[u8]) -> Result<(), DnSyntaxError> {
    let s = std::str::from_utf8(data).map_err(|_| DnSyntaxError::InvalidUtf8)?;
    validate_dn(s)
}

pub fn validate_dn(s: &str) -> Result<(), DnSyntaxError> {
    if s.is_empty() {
        return Ok(());
    }
    for rdn in split_unescaped(s, ',') {
        validate_rdn(rdn)?;
    }
    Ok(())
}

pub fn validate_rdn(s: &str) -> Result<(), DnSyntaxError> {
    if s.is_empty() {
        return Err(DnSyntaxError::EmptyRdn);
    }
    for atv in split_unescaped(s, '+') {
        validate_atv(atv)?;
    }
    Ok(())
}

fn validate_atv(s: &str) -> Result<(), DnSyntaxError> {
    let Some(eq) = find_unescaped(s, '=') else {
        return Err(DnSyntaxError::MissingEquals);
    };
    validate_attribute_type(s[..eq].trim())?;
    validate_value(&s[eq + 1..])
}

fn validate_attribute_type(s: &str) -> Result<(), DnSyntaxError> {
    if s.is_empty() {
        return Err(DnSyntaxError::EmptyAttributeType);
    }
    let mut chars = s.chars();
    let first = chars.next().unwrap();
    if first.is_ascii_digit() {
        // numericoid form
        for c in s.chars() {
            if !c.is_ascii_digit() && c != '.' {
                return Err(DnSyntaxError::InvalidAttributeType(c));
            }
        }
        return Ok(());
    }
    if !first.is_ascii_alphabetic() {
        return Err(DnSyntaxError::InvalidAttributeType(first));
    }
    for c in chars {
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(DnSyntaxError::InvalidAttributeType(c));
        }
    }
    Ok(())
}

fn validate_value(s: &str) -> Result<(), DnSyntaxError> {
    if let Some(hex) = s.strip_prefix('#') {
        if hex.is_empty() || hex.len() % 2 != 0 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DnSyntaxError::InvalidHexString);
        }
        return Ok(());
    }
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                None => return Err(DnSyntaxError::UnterminatedEscape),
                Some(e) => {
                    if e.is_ascii_hexdigit() {
                        match chars.next() {
                            Some(h) if h.is_ascii_hexdigit() => {}
                            _ => return Err(DnSyntaxError::InvalidEscape),
                        }
                    } else if !matches!(
                        e,
                        ' ' | '"' | '#' | '+' | ',' | ';' | '<' | '=' | '>' | '\\'
                    ) {
                        return Err(DnSyntaxError::InvalidEscape);
                    }
                }
            },
            '"' | ';' | '<' | '>' => return Err(DnSyntaxError::UnescapedSpecial(c)),
            '\0' => return Err(DnSyntaxError::UnescapedSpecial(c)),
            _ => {}
        }
    }
    Ok(())
}

/// Split on a separator char, honoring backslash escapes
fn split_unescaped(s: &str, sep: char) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == sep {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts.into_iter()
}

fn find_unescaped(s: &str, target: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == target {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_dns() {
        validate_dn("").unwrap();
        validate_dn("cn=test").unwrap();
        validate_dn("cn=testModify,ou=users,ou=system").unwrap();
        validate_dn("cn=Doe\\, John,ou=users").unwrap();
        validate_dn("cn=x+sn=y,dc=example,dc=com").unwrap();
        validate_dn("2.5.4.3=numeric,dc=com").unwrap();
        validate_dn("cn=#04024869").unwrap();
        validate_dn("cn=\\e4\\b8\\ad,dc=com").unwrap();
    }

    #[test]
    fn colon_is_not_equals() {
        let e = validate_dn("cn:testModify,ou=users,ou=system").unwrap_err();
        assert_eq!(e, DnSyntaxError::MissingEquals);
    }

    #[test]
    fn invalid_dns() {
        assert_eq!(validate_dn("cn=a,,cn=b").unwrap_err(), DnSyntaxError::EmptyRdn);
        assert_eq!(validate_dn("cn=a,").unwrap_err(), DnSyntaxError::EmptyRdn);
        assert_eq!(
            validate_dn("=value").unwrap_err(),
            DnSyntaxError::EmptyAttributeType
        );
        assert_eq!(
            validate_dn("c^n=x").unwrap_err(),
            DnSyntaxError::InvalidAttributeType('^')
        );
        assert_eq!(
            validate_dn("cn=x\\").unwrap_err(),
            DnSyntaxError::UnterminatedEscape
        );
        assert_eq!(
            validate_dn("cn=x\\q").unwrap_err(),
            DnSyntaxError::InvalidEscape
        );
        assert_eq!(
            validate_dn("cn=x\\4z").unwrap_err(),
            DnSyntaxError::InvalidEscape
        );
        assert_eq!(
            validate_dn("cn=#123").unwrap_err(),
            DnSyntaxError::InvalidHexString
        );
        assert_eq!(
            validate_dn("cn=a\"b").unwrap_err(),
            DnSyntaxError::UnescapedSpecial('"')
        );
    }

    #[test]
    fn empty_rdn_rejected() {
        assert_eq!(validate_rdn("").unwrap_err(), DnSyntaxError::EmptyRdn);
        validate_rdn("cn=x").unwrap();
    }

    #[test]
    fn dn_bytes() {
        validate_dn_bytes(b"cn=test").unwrap();
        assert_eq!(
            validate_dn_bytes(&[0x63, 0x6e, 0x3d, 0xff, 0xfe]).unwrap_err(),
            DnSyntaxError::InvalidUtf8
        );
    }
}
