/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use ldap_asn1::{BerEncodeError, BerInteger, BerReader, BerWriter, tag, tlv_size};

use super::attribute::{AttributePlan, decode_attribute};
use super::filter::{PlannedFilter, decode_filter};
use super::{FatalDecodeError, OpDecodeError, RequestDecodeError, decode_request_dn, utf8_field};
use crate::message::{
    DerefAliases, ProtocolOp, SearchRequest, SearchResultEntry, SearchResultReference, SearchScope,
};

pub(crate) struct SearchRequestPlan<'a> {
    req: &'a SearchRequest,
    size_limit_len: usize,
    time_limit_len: usize,
    filter: PlannedFilter<'a>,
    attrs_len: usize,
    value_len: usize,
}

impl<'a> SearchRequestPlan<'a> {
    pub(crate) fn new(req: &'a SearchRequest) -> Self {
        let size_limit_len = BerInteger::size_of(i64::from(req.size_limit));
        let time_limit_len = BerInteger::size_of(i64::from(req.time_limit));
        let filter = PlannedFilter::new(&req.filter);
        let attrs_len = req.attributes.iter().map(|a| tlv_size(a.len())).sum();
        let value_len = tlv_size(req.base_object.len())
            + 3 // scope ENUMERATED
            + 3 // derefAliases ENUMERATED
            + tlv_size(size_limit_len)
            + tlv_size(time_limit_len)
            + 3 // typesOnly BOOLEAN
            + filter.tlv_len()
            + tlv_size(attrs_len);
        SearchRequestPlan {
            req,
            size_limit_len,
            time_limit_len,
            filter,
            attrs_len,
            value_len,
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_octet_string(self.req.base_object.as_bytes())?;
        w.put_enumerated(self.req.scope as i64)?;
        w.put_enumerated(self.req.deref_aliases as i64)?;
        w.put_tag_length(tag::INTEGER, self.size_limit_len)?;
        w.put_integer_value(i64::from(self.req.size_limit))?;
        w.put_tag_length(tag::INTEGER, self.time_limit_len)?;
        w.put_integer_value(i64::from(self.req.time_limit))?;
        w.put_boolean(self.req.types_only)?;
        self.filter.encode(w)?;
        w.put_tag_length(tag::SEQUENCE, self.attrs_len)?;
        for attr in &self.req.attributes {
            w.put_octet_string(attr.as_bytes())?;
        }
        Ok(())
    }
}

pub(crate) struct SearchEntryPlan<'a> {
    entry: &'a SearchResultEntry,
    attrs: Vec<AttributePlan<'a>>,
    attrs_len: usize,
    value_len: usize,
}

impl<'a> SearchEntryPlan<'a> {
    pub(crate) fn new(entry: &'a SearchResultEntry) -> Self {
        let attrs: Vec<AttributePlan<'a>> =
            entry.attributes.iter().map(AttributePlan::new).collect();
        let attrs_len = attrs.iter().map(AttributePlan::tlv_len).sum();
        let value_len = tlv_size(entry.object_name.len()) + tlv_size(attrs_len);
        SearchEntryPlan {
            entry,
            attrs,
            attrs_len,
            value_len,
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_octet_string(self.entry.object_name.as_bytes())?;
        w.put_tag_length(tag::SEQUENCE, self.attrs_len)?;
        for attr in &self.attrs {
            attr.encode(w)?;
        }
        Ok(())
    }
}

pub(crate) struct SearchReferencePlan<'a> {
    reference: &'a SearchResultReference,
    value_len: usize,
}

impl<'a> SearchReferencePlan<'a> {
    pub(crate) fn new(reference: &'a SearchResultReference) -> Self {
        let value_len = reference.uris.iter().map(|u| tlv_size(u.len())).sum();
        SearchReferencePlan {
            reference,
            value_len,
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        for uri in &self.reference.uris {
            w.put_octet_string(uri.as_bytes())?;
        }
        Ok(())
    }
}

pub(crate) fn decode_request(
    data: &[u8],
    max_filter_depth: usize,
) -> Result<ProtocolOp, OpDecodeError> {
    let mut r = BerReader::new(data);

    let base_object = decode_request_dn(&mut r, RequestDecodeError::MalformedDn)?;

    let scope = match r.read_enumerated()? {
        0 => SearchScope::BaseObject,
        1 => SearchScope::SingleLevel,
        2 => SearchScope::WholeSubtree,
        v => return Err(RequestDecodeError::InvalidFieldValue("scope", v).into()),
    };
    let deref_aliases = match r.read_enumerated()? {
        0 => DerefAliases::NeverDerefAliases,
        1 => DerefAliases::DerefInSearching,
        2 => DerefAliases::DerefFindingBaseObj,
        3 => DerefAliases::DerefAlways,
        v => return Err(RequestDecodeError::InvalidFieldValue("derefAliases", v).into()),
    };

    let size_limit = read_limit(&mut r, "sizeLimit")?;
    let time_limit = read_limit(&mut r, "timeLimit")?;
    let types_only = r.read_boolean()?;

    let filter = decode_filter(&mut r, max_filter_depth)?;

    let mut attrs = BerReader::new(r.expect_tlv(tag::SEQUENCE)?);
    let mut attributes = Vec::new();
    while !attrs.is_empty() {
        // attribute selectors allow "*" and "1.1", keep them as-is
        attributes.push(
            utf8_field(attrs.expect_tlv(tag::OCTET_STRING)?, "attribute selector")
                .map_err(OpDecodeError::Fatal)?,
        );
    }
    r.expect_end().map_err(FatalDecodeError::InvalidElement)?;

    Ok(ProtocolOp::SearchRequest(SearchRequest {
        base_object,
        scope,
        deref_aliases,
        size_limit,
        time_limit,
        types_only,
        filter,
        attributes,
    }))
}

fn read_limit(r: &mut BerReader, field: &'static str) -> Result<u32, OpDecodeError> {
    let v = r.read_integer()?;
    u32::try_from(v).map_err(|_| RequestDecodeError::InvalidFieldValue(field, v).into())
}

pub(crate) fn decode_entry(data: &[u8]) -> Result<ProtocolOp, FatalDecodeError> {
    let mut r = BerReader::new(data);
    let object_name = utf8_field(r.expect_tlv(tag::OCTET_STRING)?, "objectName")?;
    let mut attrs = BerReader::new(r.expect_tlv(tag::SEQUENCE)?);
    let mut attributes = Vec::new();
    while !attrs.is_empty() {
        match decode_attribute(&mut attrs, false) {
            Ok(attr) => attributes.push(attr),
            Err(OpDecodeError::Fatal(e)) => return Err(e),
            // entry decoding does not validate, Request errors cannot occur
            Err(OpDecodeError::Request(_)) => unreachable!(),
        }
    }
    r.expect_end()?;
    Ok(ProtocolOp::SearchResultEntry(SearchResultEntry {
        object_name,
        attributes,
    }))
}

pub(crate) fn decode_reference(data: &[u8]) -> Result<ProtocolOp, FatalDecodeError> {
    let mut r = BerReader::new(data);
    let mut uris = Vec::new();
    while !r.is_empty() {
        uris.push(utf8_field(
            r.expect_tlv(tag::OCTET_STRING)?,
            "reference uri",
        )?);
    }
    Ok(ProtocolOp::SearchResultReference(SearchResultReference {
        uris,
    }))
}
