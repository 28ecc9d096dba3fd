/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use ldap_asn1::{BerEncodeError, BerReader, BerWriter, tag, tlv_size};

use super::attribute::{AttributePlan, decode_attribute};
use super::{FatalDecodeError, OpDecodeError, RequestDecodeError, decode_request_dn};
use crate::message::{Modification, ModifyOperation, ModifyRequest, ProtocolOp};

pub(crate) struct ModifyRequestPlan<'a> {
    req: &'a ModifyRequest,
    changes: Vec<ChangePlan<'a>>,
    changes_len: usize,
    value_len: usize,
}

struct ChangePlan<'a> {
    change: &'a Modification,
    attr: AttributePlan<'a>,
    value_len: usize,
}

impl<'a> ChangePlan<'a> {
    fn new(change: &'a Modification) -> Self {
        let attr = AttributePlan::new(&change.attribute);
        // operation ENUMERATED is always one value octet
        let value_len = 3 + attr.tlv_len();
        ChangePlan {
            change,
            attr,
            value_len,
        }
    }

    fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_tag_length(tag::SEQUENCE, self.value_len)?;
        w.put_enumerated(self.change.operation as i64)?;
        self.attr.encode(w)
    }
}

impl<'a> ModifyRequestPlan<'a> {
    pub(crate) fn new(req: &'a ModifyRequest) -> Self {
        let changes: Vec<ChangePlan<'a>> = req.changes.iter().map(ChangePlan::new).collect();
        let changes_len = changes.iter().map(|c| tlv_size(c.value_len)).sum();
        let value_len = tlv_size(req.object.len()) + tlv_size(changes_len);
        ModifyRequestPlan {
            req,
            changes,
            changes_len,
            value_len,
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_octet_string(self.req.object.as_bytes())?;
        w.put_tag_length(tag::SEQUENCE, self.changes_len)?;
        for change in &self.changes {
            change.encode(w)?;
        }
        Ok(())
    }
}

pub(crate) fn decode_request(data: &[u8]) -> Result<ProtocolOp, OpDecodeError> {
    let mut r = BerReader::new(data);

    let object = decode_request_dn(&mut r, RequestDecodeError::MalformedDn)?;

    let mut list = BerReader::new(r.expect_tlv(tag::SEQUENCE)?);
    let mut changes = Vec::new();
    while !list.is_empty() {
        let mut change = list.expect_sequence()?;
        let operation = match change.read_enumerated()? {
            0 => ModifyOperation::Add,
            1 => ModifyOperation::Delete,
            2 => ModifyOperation::Replace,
            v => return Err(RequestDecodeError::InvalidFieldValue("modify operation", v).into()),
        };
        let attribute = decode_attribute(&mut change, true)?;
        change
            .expect_end()
            .map_err(FatalDecodeError::InvalidElement)?;
        changes.push(Modification {
            operation,
            attribute,
        });
    }
    r.expect_end().map_err(FatalDecodeError::InvalidElement)?;

    Ok(ProtocolOp::ModifyRequest(ModifyRequest { object, changes }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Attribute;

    #[test]
    fn round_trip() {
        let req = ModifyRequest {
            object: "cn=anna,ou=users,ou=system".to_string(),
            changes: vec![
                Modification {
                    operation: ModifyOperation::Replace,
                    attribute: Attribute::new("mail").with_value("anna@example.com"),
                },
                Modification {
                    operation: ModifyOperation::Delete,
                    attribute: Attribute::new("description"),
                },
            ],
        };
        let plan = ModifyRequestPlan::new(&req);
        let mut w = BerWriter::new(plan.value_len());
        plan.encode(&mut w).unwrap();
        let buf = w.finish();
        assert_eq!(buf.len(), plan.value_len());
        match decode_request(&buf).unwrap() {
            ProtocolOp::ModifyRequest(decoded) => assert_eq!(decoded, req),
            op => panic!("unexpected op {op:?}"),
        }
    }

    #[test]
    fn bad_operation_classified() {
        let req = ModifyRequest {
            object: String::new(),
            changes: vec![Modification {
                operation: ModifyOperation::Add,
                attribute: Attribute::new("cn"),
            }],
        };
        let plan = ModifyRequestPlan::new(&req);
        let mut w = BerWriter::new(plan.value_len());
        plan.encode(&mut w).unwrap();
        let mut buf = w.finish();
        buf[8] = 0x05; // operation value octet
        match decode_request(&buf).unwrap_err() {
            OpDecodeError::Request(RequestDecodeError::InvalidFieldValue(
                "modify operation",
                5,
            )) => {}
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn bad_object_dn_classified() {
        // object "x" without '='
        let data = [0x04, 0x01, b'x', 0x30, 0x00];
        match decode_request(&data).unwrap_err() {
            OpDecodeError::Request(RequestDecodeError::MalformedDn(_)) => {}
            e => panic!("unexpected error {e:?}"),
        }
    }
}
