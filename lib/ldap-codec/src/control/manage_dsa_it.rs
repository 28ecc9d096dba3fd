/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::any::Any;

use super::{ControlValue, ControlValueError};

/// RFC 3296 ManageDsaIT
pub const MANAGE_DSA_IT_OID: &str = "2.16.840.1.113730.3.4.2";

/// The control carries no value; a present value is a protocol defect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManageDsaIt;

impl ManageDsaIt {
    pub fn parse(value: Option<&[u8]>) -> Result<Self, ControlValueError> {
        if value.is_some() {
            return Err(ControlValueError::UnexpectedValue);
        }
        Ok(ManageDsaIt)
    }
}

impl ControlValue for ManageDsaIt {
    fn oid(&self) -> &str {
        MANAGE_DSA_IT_OID
    }

    fn encoded_value(&self) -> Option<Vec<u8>> {
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(super) fn parse_boxed(
    value: Option<&[u8]>,
) -> Result<Box<dyn ControlValue>, ControlValueError> {
    Ok(Box::new(ManageDsaIt::parse(value)?))
}
