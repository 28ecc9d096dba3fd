/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Two-phase LDAPMessage emission: `MessageEncoder::new` walks the
//! message once and caches every constructed length, then the encode
//! pass writes into an exact-capacity buffer. A buffer overflow there
//! is a length-plan bug, not an input condition.

use ldap_asn1::{BerEncodeError, BerInteger, BerWriter, tag, tlv_size};

use super::abandon::AbandonRequestPlan;
use super::add::AddRequestPlan;
use super::bind::{BindRequestPlan, BindResponsePlan};
use super::compare::CompareRequestPlan;
use super::control::ControlsPlan;
use super::delete::DeleteRequestPlan;
use super::extended::{ExtendedRequestPlan, ExtendedResponsePlan, IntermediateResponsePlan};
use super::modify::ModifyRequestPlan;
use super::modify_dn::ModifyDnRequestPlan;
use super::result::ResultPlan;
use super::search::{SearchEntryPlan, SearchReferencePlan, SearchRequestPlan};
use super::{EncodeError, op_tag};
use crate::message::{LdapMessage, ProtocolOp};

enum OpPlan<'a> {
    BindRequest(BindRequestPlan<'a>),
    BindResponse(BindResponsePlan<'a>),
    Unbind,
    SearchRequest(SearchRequestPlan<'a>),
    SearchEntry(SearchEntryPlan<'a>),
    SearchReference(SearchReferencePlan<'a>),
    Modify(ModifyRequestPlan<'a>),
    Add(AddRequestPlan<'a>),
    Delete(DeleteRequestPlan<'a>),
    ModifyDn(ModifyDnRequestPlan<'a>),
    Compare(CompareRequestPlan<'a>),
    Abandon(AbandonRequestPlan<'a>),
    ExtendedRequest(ExtendedRequestPlan<'a>),
    ExtendedResponse(ExtendedResponsePlan<'a>),
    Intermediate(IntermediateResponsePlan<'a>),
    /// SearchResultDone, ModifyResponse, AddResponse, DelResponse,
    /// ModifyDNResponse and CompareResponse differ only in tag
    Result(u8, ResultPlan<'a>),
}

impl<'a> OpPlan<'a> {
    fn new(op: &'a ProtocolOp) -> Self {
        match op {
            ProtocolOp::BindRequest(req) => OpPlan::BindRequest(BindRequestPlan::new(req)),
            ProtocolOp::BindResponse(rsp) => OpPlan::BindResponse(BindResponsePlan::new(rsp)),
            ProtocolOp::UnbindRequest => OpPlan::Unbind,
            ProtocolOp::SearchRequest(req) => OpPlan::SearchRequest(SearchRequestPlan::new(req)),
            ProtocolOp::SearchResultEntry(entry) => {
                OpPlan::SearchEntry(SearchEntryPlan::new(entry))
            }
            ProtocolOp::SearchResultReference(reference) => {
                OpPlan::SearchReference(SearchReferencePlan::new(reference))
            }
            ProtocolOp::SearchResultDone(result) => {
                OpPlan::Result(op_tag::SEARCH_RESULT_DONE, ResultPlan::new(result))
            }
            ProtocolOp::ModifyRequest(req) => OpPlan::Modify(ModifyRequestPlan::new(req)),
            ProtocolOp::ModifyResponse(result) => {
                OpPlan::Result(op_tag::MODIFY_RESPONSE, ResultPlan::new(result))
            }
            ProtocolOp::AddRequest(req) => OpPlan::Add(AddRequestPlan::new(req)),
            ProtocolOp::AddResponse(result) => {
                OpPlan::Result(op_tag::ADD_RESPONSE, ResultPlan::new(result))
            }
            ProtocolOp::DeleteRequest(req) => OpPlan::Delete(DeleteRequestPlan::new(req)),
            ProtocolOp::DeleteResponse(result) => {
                OpPlan::Result(op_tag::DEL_RESPONSE, ResultPlan::new(result))
            }
            ProtocolOp::ModifyDnRequest(req) => OpPlan::ModifyDn(ModifyDnRequestPlan::new(req)),
            ProtocolOp::ModifyDnResponse(result) => {
                OpPlan::Result(op_tag::MODIFY_DN_RESPONSE, ResultPlan::new(result))
            }
            ProtocolOp::CompareRequest(req) => OpPlan::Compare(CompareRequestPlan::new(req)),
            ProtocolOp::CompareResponse(result) => {
                OpPlan::Result(op_tag::COMPARE_RESPONSE, ResultPlan::new(result))
            }
            ProtocolOp::AbandonRequest(req) => OpPlan::Abandon(AbandonRequestPlan::new(req)),
            ProtocolOp::ExtendedRequest(req) => {
                OpPlan::ExtendedRequest(ExtendedRequestPlan::new(req))
            }
            ProtocolOp::ExtendedResponse(rsp) => {
                OpPlan::ExtendedResponse(ExtendedResponsePlan::new(rsp))
            }
            ProtocolOp::IntermediateResponse(rsp) => {
                OpPlan::Intermediate(IntermediateResponsePlan::new(rsp))
            }
        }
    }

    fn tag(&self) -> u8 {
        match self {
            OpPlan::BindRequest(_) => op_tag::BIND_REQUEST,
            OpPlan::BindResponse(_) => op_tag::BIND_RESPONSE,
            OpPlan::Unbind => op_tag::UNBIND_REQUEST,
            OpPlan::SearchRequest(_) => op_tag::SEARCH_REQUEST,
            OpPlan::SearchEntry(_) => op_tag::SEARCH_RESULT_ENTRY,
            OpPlan::SearchReference(_) => op_tag::SEARCH_RESULT_REFERENCE,
            OpPlan::Modify(_) => op_tag::MODIFY_REQUEST,
            OpPlan::Add(_) => op_tag::ADD_REQUEST,
            OpPlan::Delete(_) => op_tag::DEL_REQUEST,
            OpPlan::ModifyDn(_) => op_tag::MODIFY_DN_REQUEST,
            OpPlan::Compare(_) => op_tag::COMPARE_REQUEST,
            OpPlan::Abandon(_) => op_tag::ABANDON_REQUEST,
            OpPlan::ExtendedRequest(_) => op_tag::EXTENDED_REQUEST,
            OpPlan::ExtendedResponse(_) => op_tag::EXTENDED_RESPONSE,
            OpPlan::Intermediate(_) => op_tag::INTERMEDIATE_RESPONSE,
            OpPlan::Result(tag, _) => *tag,
        }
    }

    fn value_len(&self) -> usize {
        match self {
            OpPlan::BindRequest(p) => p.value_len(),
            OpPlan::BindResponse(p) => p.value_len(),
            OpPlan::Unbind => 0,
            OpPlan::SearchRequest(p) => p.value_len(),
            OpPlan::SearchEntry(p) => p.value_len(),
            OpPlan::SearchReference(p) => p.value_len(),
            OpPlan::Modify(p) => p.value_len(),
            OpPlan::Add(p) => p.value_len(),
            OpPlan::Delete(p) => p.value_len(),
            OpPlan::ModifyDn(p) => p.value_len(),
            OpPlan::Compare(p) => p.value_len(),
            OpPlan::Abandon(p) => p.value_len(),
            OpPlan::ExtendedRequest(p) => p.value_len(),
            OpPlan::ExtendedResponse(p) => p.value_len(),
            OpPlan::Intermediate(p) => p.value_len(),
            OpPlan::Result(_, p) => p.value_len(),
        }
    }

    #[inline]
    fn tlv_len(&self) -> usize {
        tlv_size(self.value_len())
    }

    fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_tag_length(self.tag(), self.value_len())?;
        match self {
            OpPlan::BindRequest(p) => p.encode(w),
            OpPlan::BindResponse(p) => p.encode(w),
            OpPlan::Unbind => Ok(()),
            OpPlan::SearchRequest(p) => p.encode(w),
            OpPlan::SearchEntry(p) => p.encode(w),
            OpPlan::SearchReference(p) => p.encode(w),
            OpPlan::Modify(p) => p.encode(w),
            OpPlan::Add(p) => p.encode(w),
            OpPlan::Delete(p) => p.encode(w),
            OpPlan::ModifyDn(p) => p.encode(w),
            OpPlan::Compare(p) => p.encode(w),
            OpPlan::Abandon(p) => p.encode(w),
            OpPlan::ExtendedRequest(p) => p.encode(w),
            OpPlan::ExtendedResponse(p) => p.encode(w),
            OpPlan::Intermediate(p) => p.encode(w),
            OpPlan::Result(_, p) => p.encode(w),
        }
    }
}

pub struct MessageEncoder<'a> {
    message: &'a LdapMessage,
    id_len: usize,
    op: OpPlan<'a>,
    controls: Option<ControlsPlan>,
    message_len: usize,
}

impl<'a> MessageEncoder<'a> {
    pub fn new(message: &'a LdapMessage) -> Self {
        let id_len = BerInteger::size_of(i64::from(message.message_id()));
        let op = OpPlan::new(message.op());
        let controls = ControlsPlan::new(message.controls());
        let message_len = tlv_size(id_len)
            + op.tlv_len()
            + controls.as_ref().map_or(0, |c| tlv_size(c.value_len()));
        MessageEncoder {
            message,
            id_len,
            op,
            controls,
            message_len,
        }
    }

    /// Full on-wire size of the LDAPMessage, envelope included
    #[inline]
    pub fn encoded_len(&self) -> usize {
        tlv_size(self.message_len)
    }

    pub fn encode_into(&self, w: &mut BerWriter) -> Result<(), EncodeError> {
        w.put_tag_length(tag::SEQUENCE, self.message_len)?;
        w.put_tag_length(tag::INTEGER, self.id_len)?;
        w.put_integer_value(i64::from(self.message.message_id()))?;
        self.op.encode(w)?;
        if let Some(controls) = &self.controls {
            controls.encode(self.message.controls(), w)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut w = BerWriter::new(self.encoded_len());
        self.encode_into(&mut w)?;
        Ok(w.finish())
    }
}
