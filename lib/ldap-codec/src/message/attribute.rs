/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

/// A PartialAttribute: one attribute description with its values.
///
/// Shared by AddRequest, ModifyRequest changes and SearchResultEntry.
/// Values are opaque byte strings and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub attr_type: String,
    pub values: Vec<Vec<u8>>,
}

impl Attribute {
    pub fn new(attr_type: impl Into<String>) -> Self {
        Attribute {
            attr_type: attr_type.into(),
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.values.push(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build() {
        let a = Attribute::new("cn").with_value("test").with_value(b"x".to_vec());
        assert_eq!(a.attr_type, "cn");
        assert_eq!(a.values.len(), 2);
        assert_eq!(a.values[0], b"test");
    }
}
