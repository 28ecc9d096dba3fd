/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use thiserror::Error;

use super::{BerLength, BerLengthParseError, tag};

#[derive(Debug, PartialEq, Eq, Error)]
pub enum BerIntegerParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error("invalid ber type")]
    InvalidType,
    #[error("invalid ber length")]
    TooLargeLength,
    #[error("indefinite length")]
    IndefiniteLength,
    #[error("invalid value bytes")]
    InvalidValueBytes,
}

impl From<BerLengthParseError> for BerIntegerParseError {
    fn from(value: BerLengthParseError) -> Self {
        match value {
            BerLengthParseError::NeedMoreData(n) => BerIntegerParseError::NeedMoreData(n),
            BerLengthParseError::TooLargeValue => BerIntegerParseError::TooLargeLength,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BerInteger {
    value: i64,
    encoded_len: usize,
}

impl BerInteger {
    pub fn parse(data: &[u8]) -> Result<BerInteger, BerIntegerParseError> {
        Self::parse_with_identifier(data, tag::INTEGER)
    }

    pub fn parse_enumerated_value(data: &[u8]) -> Result<BerInteger, BerIntegerParseError> {
        Self::parse_with_identifier(data, tag::ENUMERATED)
    }

    fn parse_with_identifier(data: &[u8], identifier: u8) -> Result<Self, BerIntegerParseError> {
        if data.is_empty() {
            return Err(BerIntegerParseError::NeedMoreData(1));
        }
        if data[0] != identifier {
            return Err(BerIntegerParseError::InvalidType);
        }

        let length = BerLength::parse(&data[1..])?;
        if length.indefinite() {
            return Err(BerIntegerParseError::IndefiniteLength);
        }
        let count = length.value();
        if count == 0 || count > 8 {
            return Err(BerIntegerParseError::InvalidValueBytes);
        }
        let count = count as usize;

        let offset = 1 + length.encoded_len();
        let left = &data[offset..];
        if left.len() < count {
            return Err(BerIntegerParseError::NeedMoreData(count - left.len()));
        }

        Ok(BerInteger {
            value: Self::from_be_value(&left[..count]),
            encoded_len: offset + count,
        })
    }

    /// Two's complement big-endian decode, 1..=8 value octets
    fn from_be_value(b: &[u8]) -> i64 {
        let mut value = if b[0] & 0x80 != 0 { -1i64 } else { 0 };
        for v in b {
            value = (value << 8) | i64::from(*v);
        }
        value
    }

    /// The number of value octets needed to encode `value` in minimal
    /// two's complement form
    pub fn size_of(value: i64) -> usize {
        let mut count = 8;
        while count > 1 {
            let top = value >> ((count - 1) * 8 - 1);
            if top != 0 && top != -1 {
                break;
            }
            count -= 1;
        }
        count
    }

    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.encoded_len
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }
}
