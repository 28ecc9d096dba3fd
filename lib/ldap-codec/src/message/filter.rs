/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

/// An attribute description paired with an assertion value, as used by
/// equality/ordering/approx filters and CompareRequest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValueAssertion {
    pub attribute_desc: String,
    pub assertion_value: Vec<u8>,
}

impl AttributeValueAssertion {
    pub fn new(attribute_desc: impl Into<String>, assertion_value: impl Into<Vec<u8>>) -> Self {
        AttributeValueAssertion {
            attribute_desc: attribute_desc.into(),
            assertion_value: assertion_value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringsFilter {
    pub attr_type: String,
    pub initial: Option<Vec<u8>>,
    pub any: Vec<Vec<u8>>,
    pub last: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensibleMatchFilter {
    pub matching_rule: Option<String>,
    pub attr_type: Option<String>,
    pub match_value: Vec<u8>,
    pub dn_attributes: bool,
}

/// The RFC 4511 §4.5.1 search filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    EqualityMatch(AttributeValueAssertion),
    Substrings(SubstringsFilter),
    GreaterOrEqual(AttributeValueAssertion),
    LessOrEqual(AttributeValueAssertion),
    Present(String),
    ApproxMatch(AttributeValueAssertion),
    ExtensibleMatch(ExtensibleMatchFilter),
}

impl Filter {
    pub fn present(attr: impl Into<String>) -> Self {
        Filter::Present(attr.into())
    }

    pub fn equality(attr: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Filter::EqualityMatch(AttributeValueAssertion::new(attr, value))
    }

    /// Maximum nesting depth of this filter tree
    pub fn depth(&self) -> usize {
        match self {
            Filter::And(set) | Filter::Or(set) => {
                1 + set.iter().map(Filter::depth).max().unwrap_or(0)
            }
            Filter::Not(inner) => 1 + inner.depth(),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth() {
        assert_eq!(Filter::present("objectClass").depth(), 1);
        let f = Filter::And(vec![
            Filter::equality("cn", "x"),
            Filter::Not(Box::new(Filter::present("uid"))),
        ]);
        assert_eq!(f.depth(), 3);
        assert_eq!(Filter::And(Vec::new()).depth(), 1);
    }
}
