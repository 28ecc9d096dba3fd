/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! ASN.1 BER identifier octet constants and helpers.

pub const BOOLEAN: u8 = 0x01;
pub const INTEGER: u8 = 0x02;
pub const OCTET_STRING: u8 = 0x04;
pub const ENUMERATED: u8 = 0x0a;
pub const SEQUENCE: u8 = 0x30;
pub const SET: u8 = 0x31;

pub const CLASS_CONTEXT: u8 = 0x80;
pub const CLASS_APPLICATION: u8 = 0x40;
pub const CONSTRUCTED: u8 = 0x20;

/// Context-specific primitive tag, e.g. `[0]` => 0x80
#[inline]
pub const fn context(n: u8) -> u8 {
    CLASS_CONTEXT | n
}

/// Context-specific constructed tag, e.g. `[0]` => 0xa0
#[inline]
pub const fn context_constructed(n: u8) -> u8 {
    CLASS_CONTEXT | CONSTRUCTED | n
}

#[inline]
pub const fn is_constructed(tag: u8) -> bool {
    tag & CONSTRUCTED != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_tags() {
        assert_eq!(context(0), 0x80);
        assert_eq!(context(7), 0x87);
        assert_eq!(context_constructed(0), 0xa0);
        assert_eq!(context_constructed(3), 0xa3);
        assert!(is_constructed(SEQUENCE));
        assert!(!is_constructed(OCTET_STRING));
    }
}
