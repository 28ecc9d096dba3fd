/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! AbandonRequest is a primitive APPLICATION 16 element: the operation
//! value is the MessageID integer content octets themselves.

use ldap_asn1::{BerEncodeError, BerInteger, BerWriter};

use super::{FatalDecodeError, OpDecodeError};
use crate::message::{AbandonRequest, ProtocolOp};

pub(crate) struct AbandonRequestPlan<'a> {
    req: &'a AbandonRequest,
    value_len: usize,
}

impl<'a> AbandonRequestPlan<'a> {
    pub(crate) fn new(req: &'a AbandonRequest) -> Self {
        AbandonRequestPlan {
            req,
            value_len: BerInteger::size_of(req.message_id as i64),
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_integer_value(i64::from(self.req.message_id))
    }
}

pub(crate) fn decode_request(data: &[u8]) -> Result<ProtocolOp, OpDecodeError> {
    // there is no response type for Abandon, so nothing here is recoverable
    if data.is_empty() || data.len() > 8 {
        return Err(FatalDecodeError::InvalidMessageId.into());
    }
    let mut value: i64 = if data[0] & 0x80 != 0 { -1 } else { 0 };
    for b in data {
        value = (value << 8) | i64::from(*b);
    }
    let message_id =
        u32::try_from(value).map_err(|_| OpDecodeError::Fatal(FatalDecodeError::InvalidMessageId))?;
    Ok(ProtocolOp::AbandonRequest(AbandonRequest { message_id }))
}
