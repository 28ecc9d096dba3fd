/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

pub mod tag;

mod length;
pub use length::{BerLength, BerLengthParseError, tlv_size};

mod integer;
pub use integer::{BerInteger, BerIntegerParseError};

mod reader;
pub use reader::{BerReadError, BerReader, Tlv};

mod writer;
pub use writer::{BerEncodeError, BerWriter};
