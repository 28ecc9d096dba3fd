/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Wire layout of the RFC 4511 §4.5.1 search filter CHOICE.

use ldap_asn1::{BerEncodeError, BerReadError, BerReader, BerWriter, tag, tlv_size};

use super::{FatalDecodeError, OpDecodeError, RequestDecodeError, utf8_field};
use crate::message::{
    AttributeValueAssertion, ExtensibleMatchFilter, Filter, SubstringsFilter,
};
use crate::oid::validate_attribute_description;

const AND_TAG: u8 = tag::context_constructed(0);
const OR_TAG: u8 = tag::context_constructed(1);
const NOT_TAG: u8 = tag::context_constructed(2);
const EQUALITY_TAG: u8 = tag::context_constructed(3);
const SUBSTRINGS_TAG: u8 = tag::context_constructed(4);
const GREATER_OR_EQUAL_TAG: u8 = tag::context_constructed(5);
const LESS_OR_EQUAL_TAG: u8 = tag::context_constructed(6);
const PRESENT_TAG: u8 = tag::context(7);
const APPROX_TAG: u8 = tag::context_constructed(8);
const EXTENSIBLE_TAG: u8 = tag::context_constructed(9);

const SUB_INITIAL_TAG: u8 = tag::context(0);
const SUB_ANY_TAG: u8 = tag::context(1);
const SUB_FINAL_TAG: u8 = tag::context(2);

const MATCHING_RULE_TAG: u8 = tag::context(1);
const MATCH_TYPE_TAG: u8 = tag::context(2);
const MATCH_VALUE_TAG: u8 = tag::context(3);
const DN_ATTRIBUTES_TAG: u8 = tag::context(4);

/// The filter tree with every constructed length cached, mirroring
/// the borrowed [`Filter`]
pub(crate) enum PlannedFilter<'a> {
    Set {
        tag: u8,
        items: Vec<PlannedFilter<'a>>,
        value_len: usize,
    },
    Not {
        inner: Box<PlannedFilter<'a>>,
        value_len: usize,
    },
    Ava {
        tag: u8,
        ava: &'a AttributeValueAssertion,
        value_len: usize,
    },
    Substrings {
        f: &'a SubstringsFilter,
        subs_len: usize,
        value_len: usize,
    },
    Present {
        attr: &'a str,
    },
    Extensible {
        f: &'a ExtensibleMatchFilter,
        value_len: usize,
    },
}

impl<'a> PlannedFilter<'a> {
    pub(crate) fn new(filter: &'a Filter) -> Self {
        match filter {
            Filter::And(set) => Self::new_set(AND_TAG, set),
            Filter::Or(set) => Self::new_set(OR_TAG, set),
            Filter::Not(inner) => {
                let inner = Box::new(PlannedFilter::new(inner));
                let value_len = inner.tlv_len();
                PlannedFilter::Not { inner, value_len }
            }
            Filter::EqualityMatch(ava) => Self::new_ava(EQUALITY_TAG, ava),
            Filter::GreaterOrEqual(ava) => Self::new_ava(GREATER_OR_EQUAL_TAG, ava),
            Filter::LessOrEqual(ava) => Self::new_ava(LESS_OR_EQUAL_TAG, ava),
            Filter::ApproxMatch(ava) => Self::new_ava(APPROX_TAG, ava),
            Filter::Substrings(f) => {
                let mut subs_len = f.initial.as_ref().map_or(0, |v| tlv_size(v.len()));
                subs_len += f.any.iter().map(|v| tlv_size(v.len())).sum::<usize>();
                subs_len += f.last.as_ref().map_or(0, |v| tlv_size(v.len()));
                let value_len = tlv_size(f.attr_type.len()) + tlv_size(subs_len);
                PlannedFilter::Substrings {
                    f,
                    subs_len,
                    value_len,
                }
            }
            Filter::Present(attr) => PlannedFilter::Present { attr },
            Filter::ExtensibleMatch(f) => {
                let mut value_len = f.matching_rule.as_ref().map_or(0, |s| tlv_size(s.len()));
                value_len += f.attr_type.as_ref().map_or(0, |s| tlv_size(s.len()));
                value_len += tlv_size(f.match_value.len());
                // dnAttributes has a DEFAULT but is always encoded outbound
                value_len += 3;
                PlannedFilter::Extensible { f, value_len }
            }
        }
    }

    fn new_set(tag: u8, set: &'a [Filter]) -> Self {
        let items: Vec<PlannedFilter<'a>> = set.iter().map(PlannedFilter::new).collect();
        let value_len = items.iter().map(PlannedFilter::tlv_len).sum();
        PlannedFilter::Set {
            tag,
            items,
            value_len,
        }
    }

    fn new_ava(tag: u8, ava: &'a AttributeValueAssertion) -> Self {
        let value_len = tlv_size(ava.attribute_desc.len()) + tlv_size(ava.assertion_value.len());
        PlannedFilter::Ava {
            tag,
            ava,
            value_len,
        }
    }

    pub(crate) fn value_len(&self) -> usize {
        match self {
            PlannedFilter::Set { value_len, .. }
            | PlannedFilter::Not { value_len, .. }
            | PlannedFilter::Ava { value_len, .. }
            | PlannedFilter::Substrings { value_len, .. }
            | PlannedFilter::Extensible { value_len, .. } => *value_len,
            PlannedFilter::Present { attr } => attr.len(),
        }
    }

    #[inline]
    pub(crate) fn tlv_len(&self) -> usize {
        tlv_size(self.value_len())
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        match self {
            PlannedFilter::Set {
                tag,
                items,
                value_len,
            } => {
                w.put_tag_length(*tag, *value_len)?;
                for item in items {
                    item.encode(w)?;
                }
                Ok(())
            }
            PlannedFilter::Not { inner, value_len } => {
                w.put_tag_length(NOT_TAG, *value_len)?;
                inner.encode(w)
            }
            PlannedFilter::Ava {
                tag,
                ava,
                value_len,
            } => {
                w.put_tag_length(*tag, *value_len)?;
                w.put_octet_string(ava.attribute_desc.as_bytes())?;
                w.put_octet_string(&ava.assertion_value)
            }
            PlannedFilter::Substrings {
                f,
                subs_len,
                value_len,
            } => {
                w.put_tag_length(SUBSTRINGS_TAG, *value_len)?;
                w.put_octet_string(f.attr_type.as_bytes())?;
                w.put_tag_length(tag::SEQUENCE, *subs_len)?;
                if let Some(v) = &f.initial {
                    w.put_primitive(SUB_INITIAL_TAG, v)?;
                }
                for v in &f.any {
                    w.put_primitive(SUB_ANY_TAG, v)?;
                }
                if let Some(v) = &f.last {
                    w.put_primitive(SUB_FINAL_TAG, v)?;
                }
                Ok(())
            }
            PlannedFilter::Present { attr } => w.put_primitive(PRESENT_TAG, attr.as_bytes()),
            PlannedFilter::Extensible { f, value_len } => {
                w.put_tag_length(EXTENSIBLE_TAG, *value_len)?;
                if let Some(rule) = &f.matching_rule {
                    w.put_primitive(MATCHING_RULE_TAG, rule.as_bytes())?;
                }
                if let Some(attr) = &f.attr_type {
                    w.put_primitive(MATCH_TYPE_TAG, attr.as_bytes())?;
                }
                w.put_primitive(MATCH_VALUE_TAG, &f.match_value)?;
                w.put_tag_length(DN_ATTRIBUTES_TAG, 1)?;
                w.put_u8(if f.dn_attributes { 0xff } else { 0x00 })
            }
        }
    }
}

pub(crate) fn decode_filter(r: &mut BerReader, max_depth: usize) -> Result<Filter, OpDecodeError> {
    decode_at_depth(r, 1, max_depth)
}

fn decode_at_depth(
    r: &mut BerReader,
    depth: usize,
    max_depth: usize,
) -> Result<Filter, OpDecodeError> {
    if depth > max_depth {
        return Err(RequestDecodeError::FilterTooDeep.into());
    }
    let tlv = r.read_tlv()?;
    let mut inner = BerReader::new(tlv.value);
    let filter = match tlv.tag {
        AND_TAG | OR_TAG => {
            let mut items = Vec::new();
            while !inner.is_empty() {
                items.push(decode_at_depth(&mut inner, depth + 1, max_depth)?);
            }
            if tlv.tag == AND_TAG {
                Filter::And(items)
            } else {
                Filter::Or(items)
            }
        }
        NOT_TAG => {
            let item = decode_at_depth(&mut inner, depth + 1, max_depth)?;
            Filter::Not(Box::new(item))
        }
        EQUALITY_TAG => Filter::EqualityMatch(decode_ava(&mut inner)?),
        GREATER_OR_EQUAL_TAG => Filter::GreaterOrEqual(decode_ava(&mut inner)?),
        LESS_OR_EQUAL_TAG => Filter::LessOrEqual(decode_ava(&mut inner)?),
        APPROX_TAG => Filter::ApproxMatch(decode_ava(&mut inner)?),
        SUBSTRINGS_TAG => {
            let attr_type = decode_attr_desc(&mut inner)?;
            let mut subs = BerReader::new(inner.expect_tlv(tag::SEQUENCE)?);
            let mut initial = None;
            let mut any = Vec::new();
            let mut last = None;
            while !subs.is_empty() {
                let sub = subs.read_tlv().map_err(FatalDecodeError::InvalidElement)?;
                match sub.tag {
                    SUB_INITIAL_TAG if initial.is_none() && any.is_empty() && last.is_none() => {
                        initial = Some(sub.value.to_vec())
                    }
                    SUB_ANY_TAG if last.is_none() => any.push(sub.value.to_vec()),
                    SUB_FINAL_TAG if last.is_none() => last = Some(sub.value.to_vec()),
                    t => return Err(FatalDecodeError::UnknownFilterTag(t).into()),
                }
            }
            Filter::Substrings(SubstringsFilter {
                attr_type,
                initial,
                any,
                last,
            })
        }
        PRESENT_TAG => {
            let attr = utf8_field(tlv.value, "filter attribute")
                .map_err(OpDecodeError::Fatal)?;
            validate_attribute_description(&attr)
                .map_err(RequestDecodeError::MalformedAttributeDescription)?;
            return Ok(Filter::Present(attr));
        }
        EXTENSIBLE_TAG => {
            let mut matching_rule = None;
            if inner.peek_tag() == Some(MATCHING_RULE_TAG) {
                matching_rule = Some(utf8_field(
                    inner.expect_tlv(MATCHING_RULE_TAG)?,
                    "matching rule",
                )?);
            }
            let mut attr_type = None;
            if inner.peek_tag() == Some(MATCH_TYPE_TAG) {
                let attr = utf8_field(inner.expect_tlv(MATCH_TYPE_TAG)?, "filter attribute")?;
                validate_attribute_description(&attr)
                    .map_err(RequestDecodeError::MalformedAttributeDescription)?;
                attr_type = Some(attr);
            }
            let match_value = inner.expect_tlv(MATCH_VALUE_TAG)?.to_vec();
            // dnAttributes DEFAULT FALSE, absence is conformant
            let mut dn_attributes = false;
            if inner.peek_tag() == Some(DN_ATTRIBUTES_TAG) {
                let v = inner.expect_tlv(DN_ATTRIBUTES_TAG)?;
                if v.len() != 1 {
                    return Err(BerReadError::InvalidBoolean.into());
                }
                dn_attributes = v[0] != 0;
            }
            Filter::ExtensibleMatch(ExtensibleMatchFilter {
                matching_rule,
                attr_type,
                match_value,
                dn_attributes,
            })
        }
        t => return Err(FatalDecodeError::UnknownFilterTag(t).into()),
    };
    inner.expect_end().map_err(FatalDecodeError::InvalidElement)?;
    Ok(filter)
}

fn decode_attr_desc(r: &mut BerReader) -> Result<String, OpDecodeError> {
    let attr = utf8_field(r.expect_tlv(tag::OCTET_STRING)?, "filter attribute")
        .map_err(OpDecodeError::Fatal)?;
    validate_attribute_description(&attr)
        .map_err(RequestDecodeError::MalformedAttributeDescription)?;
    Ok(attr)
}

fn decode_ava(r: &mut BerReader) -> Result<AttributeValueAssertion, OpDecodeError> {
    let attribute_desc = decode_attr_desc(r)?;
    let assertion_value = r.expect_tlv(tag::OCTET_STRING)?.to_vec();
    Ok(AttributeValueAssertion {
        attribute_desc,
        assertion_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(filter: &Filter) -> Filter {
        let plan = PlannedFilter::new(filter);
        let mut w = BerWriter::new(plan.tlv_len());
        plan.encode(&mut w).unwrap();
        let buf = w.finish();
        assert_eq!(buf.len(), plan.tlv_len());
        let mut r = BerReader::new(&buf);
        let decoded = decode_filter(&mut r, 32).unwrap();
        r.expect_end().unwrap();
        decoded
    }

    #[test]
    fn present() {
        let f = Filter::present("objectClass");
        let plan = PlannedFilter::new(&f);
        let mut w = BerWriter::new(plan.tlv_len());
        plan.encode(&mut w).unwrap();
        assert_eq!(
            w.finish(),
            [
                0x87, 0x0b, b'o', b'b', b'j', b'e', b'c', b't', b'C', b'l', b'a', b's', b's'
            ]
        );
        assert_eq!(round_trip(&f), f);
    }

    #[test]
    fn equality() {
        let f = Filter::equality("uid", "anna");
        assert_eq!(round_trip(&f), f);
    }

    #[test]
    fn nested_sets() {
        let f = Filter::And(vec![
            Filter::equality("objectClass", "person"),
            Filter::Or(vec![
                Filter::equality("uid", "anna"),
                Filter::Not(Box::new(Filter::present("badAttr"))),
            ]),
        ]);
        assert_eq!(round_trip(&f), f);
    }

    #[test]
    fn substrings() {
        let f = Filter::Substrings(SubstringsFilter {
            attr_type: "cn".to_string(),
            initial: Some(b"an".to_vec()),
            any: vec![b"n".to_vec()],
            last: None,
        });
        assert_eq!(round_trip(&f), f);
    }

    #[test]
    fn extensible_match() {
        let f = Filter::ExtensibleMatch(ExtensibleMatchFilter {
            matching_rule: Some("caseIgnoreMatch".to_string()),
            attr_type: Some("cn".to_string()),
            match_value: b"anna".to_vec(),
            dn_attributes: false,
        });
        assert_eq!(round_trip(&f), f);
    }

    #[test]
    fn dn_attributes_absent_means_false() {
        // extensibleMatch { matchValue [3] "x" } only
        let data = [0xa9, 0x03, 0x83, 0x01, b'x'];
        let mut r = BerReader::new(&data);
        match decode_filter(&mut r, 32).unwrap() {
            Filter::ExtensibleMatch(f) => {
                assert!(!f.dn_attributes);
                assert_eq!(f.match_value, b"x");
            }
            f => panic!("unexpected filter {f:?}"),
        }
    }

    #[test]
    fn depth_cap_classified() {
        let mut f = Filter::present("a");
        for _ in 0..5 {
            f = Filter::Not(Box::new(f));
        }
        let plan = PlannedFilter::new(&f);
        let mut w = BerWriter::new(plan.tlv_len());
        plan.encode(&mut w).unwrap();
        let buf = w.finish();

        let mut r = BerReader::new(&buf);
        assert_eq!(decode_filter(&mut r, 32).unwrap(), f);

        let mut r = BerReader::new(&buf);
        match decode_filter(&mut r, 3).unwrap_err() {
            OpDecodeError::Request(RequestDecodeError::FilterTooDeep) => {}
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn unknown_tag_fatal() {
        let data = [0xaa, 0x00];
        let mut r = BerReader::new(&data);
        match decode_filter(&mut r, 32).unwrap_err() {
            OpDecodeError::Fatal(FatalDecodeError::UnknownFilterTag(0xaa)) => {}
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn empty_and_set() {
        // RFC 4526 absolute true filter
        let f = Filter::And(Vec::new());
        assert_eq!(round_trip(&f), f);
    }
}
