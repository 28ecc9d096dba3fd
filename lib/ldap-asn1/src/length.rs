/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum BerLengthParseError {
    #[error("need {0} bytes more data")]
    NeedMoreData(usize),
    #[error("too large value")]
    TooLargeValue,
}

#[derive(Debug)]
pub struct BerLength {
    value: u64,
    encoded_len: usize,
    indefinite: bool,
}

impl BerLength {
    /// Try to parse a BER length value from the buffer
    pub fn parse(data: &[u8]) -> Result<Self, BerLengthParseError> {
        if data.is_empty() {
            return Err(BerLengthParseError::NeedMoreData(1));
        }

        if data[0] & 0x80 == 0 {
            return Ok(BerLength {
                value: data[0] as u64,
                encoded_len: 1,
                indefinite: false,
            });
        }

        let count = (data[0] & 0x7F) as usize;
        if count == 0 {
            return Ok(BerLength {
                value: 0,
                encoded_len: 1,
                indefinite: true,
            });
        }
        if count > 8 {
            return Err(BerLengthParseError::TooLargeValue);
        }
        if data.len() < 1 + count {
            return Err(BerLengthParseError::NeedMoreData(1 + count - data.len()));
        }

        let mut b = [0u8; 8];
        b[8 - count..].copy_from_slice(&data[1..=count]);
        Ok(BerLength {
            value: u64::from_be_bytes(b),
            encoded_len: 1 + count,
            indefinite: false,
        })
    }

    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.encoded_len
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    #[inline]
    pub fn indefinite(&self) -> bool {
        self.indefinite
    }

    /// The number of length octets needed to encode `value_len` in
    /// minimal definite form
    pub fn size_of(value_len: usize) -> usize {
        if value_len < 0x80 {
            1
        } else {
            let bits = usize::BITS - value_len.leading_zeros();
            1 + bits.div_ceil(8) as usize
        }
    }
}

/// Full TLV size of an element whose value takes `value_len` bytes
#[inline]
pub fn tlv_size(value_len: usize) -> usize {
    1 + BerLength::size_of(value_len) + value_len
}
