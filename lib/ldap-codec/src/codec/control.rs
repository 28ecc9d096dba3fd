/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Wire layout of the `controls [0]` block of an LDAPMessage.
//!
//! The block is present only when the control map is non-empty. Per
//! control: `SEQUENCE { controlType OCTET STRING, criticality BOOLEAN
//! only-if-true, controlValue OCTET STRING only-if-nonempty }`. A
//! false criticality and an empty value are never emitted, so decoding
//! normalizes both to the same in-memory shape.

use indexmap::IndexMap;
use ldap_asn1::{BerEncodeError, BerReader, BerWriter, tag, tlv_size};

use super::{FatalDecodeError, utf8_field};
use crate::message::Control;

pub(crate) const CONTROLS_TAG: u8 = tag::context_constructed(0);

pub(crate) struct ControlsPlan {
    entry_lens: Vec<usize>,
    value_len: usize,
}

impl ControlsPlan {
    /// None when the map is empty: an empty controls block is omitted
    /// entirely, not encoded as a zero-length construct
    pub(crate) fn new(controls: &IndexMap<String, Control>) -> Option<Self> {
        if controls.is_empty() {
            return None;
        }
        let entry_lens: Vec<usize> = controls.values().map(control_value_len).collect();
        let value_len = entry_lens.iter().map(|len| tlv_size(*len)).sum();
        Some(ControlsPlan {
            entry_lens,
            value_len,
        })
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(
        &self,
        controls: &IndexMap<String, Control>,
        w: &mut BerWriter,
    ) -> Result<(), BerEncodeError> {
        w.put_tag_length(CONTROLS_TAG, self.value_len)?;
        for (control, entry_len) in controls.values().zip(self.entry_lens.iter()) {
            w.put_tag_length(tag::SEQUENCE, *entry_len)?;
            w.put_octet_string(control.oid.as_bytes())?;
            if control.critical {
                w.put_boolean(true)?;
            }
            match control.value_bytes() {
                Some(value) if !value.is_empty() => w.put_octet_string(value)?,
                _ => {}
            }
        }
        Ok(())
    }
}

fn control_value_len(control: &Control) -> usize {
    let mut len = tlv_size(control.oid.len());
    if control.critical {
        len += 3;
    }
    match control.value_bytes() {
        Some(value) if !value.is_empty() => len += tlv_size(value.len()),
        _ => {}
    }
    len
}

pub(crate) fn decode_controls(
    data: &[u8],
) -> Result<IndexMap<String, Control>, FatalDecodeError> {
    let mut controls = IndexMap::new();
    let mut r = BerReader::new(data);
    while !r.is_empty() {
        let mut seq = r.expect_sequence()?;
        let oid = utf8_field(seq.expect_tlv(tag::OCTET_STRING)?, "control oid")?;

        let mut critical = false;
        if seq.peek_tag() == Some(tag::BOOLEAN) {
            critical = seq.read_boolean()?;
        }

        let mut value = None;
        if seq.peek_tag() == Some(tag::OCTET_STRING) {
            let v = seq.expect_tlv(tag::OCTET_STRING)?;
            if !v.is_empty() {
                value = Some(v.to_vec());
            }
        }
        seq.expect_end()?;

        controls.insert(
            oid.clone(),
            Control {
                oid,
                critical,
                value,
            },
        );
    }
    Ok(controls)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(controls: &IndexMap<String, Control>) -> Vec<u8> {
        let plan = ControlsPlan::new(controls).unwrap();
        let mut w = BerWriter::new(tlv_size(plan.value_len()));
        plan.encode(controls, &mut w).unwrap();
        w.finish()
    }

    fn map_of(controls: Vec<Control>) -> IndexMap<String, Control> {
        controls
            .into_iter()
            .map(|c| (c.oid.clone(), c))
            .collect()
    }

    #[test]
    fn empty_map_omitted() {
        assert!(ControlsPlan::new(&IndexMap::new()).is_none());
    }

    #[test]
    fn criticality_only_if_true() {
        let non_critical = encode(&map_of(vec![Control::new("1.2.3.4")]));
        assert_eq!(
            non_critical,
            [
                0xa0, 0x0b, 0x30, 0x09, 0x04, 0x07, b'1', b'.', b'2', b'.', b'3', b'.', b'4'
            ]
        );

        let critical = encode(&map_of(vec![Control::new("1.2.3.4").with_criticality(true)]));
        // exactly the 3-byte BOOLEAN TLV longer
        assert_eq!(critical.len(), non_critical.len() + 3);
    }

    #[test]
    fn decode_normalizes_explicit_false() {
        // SEQUENCE { "1.2.3.4", BOOLEAN FALSE }
        let data = [
            0x30, 0x0c, 0x04, 0x07, b'1', b'.', b'2', b'.', b'3', b'.', b'4', 0x01, 0x01, 0x00,
        ];
        let controls = decode_controls(&data).unwrap();
        let c = controls.get("1.2.3.4").unwrap();
        assert!(!c.critical);

        // and re-encoding drops the boolean
        let bytes = encode(&controls);
        assert!(!bytes.windows(2).any(|w| w == [0x01, 0x01]));
    }

    #[test]
    fn decode_normalizes_empty_value() {
        // SEQUENCE { "1.2.3.4", OCTET STRING "" }
        let data = [
            0x30, 0x0b, 0x04, 0x07, b'1', b'.', b'2', b'.', b'3', b'.', b'4', 0x04, 0x00,
        ];
        let controls = decode_controls(&data).unwrap();
        assert_eq!(controls.get("1.2.3.4").unwrap().value, None);
    }

    #[test]
    fn value_round_trip() {
        let control = Control::new("1.2.840.113556.1.4.319").with_value(vec![0x30, 0x02, 0x02, 0x00]);
        let map = map_of(vec![control.clone()]);
        let bytes = encode(&map);
        let decoded = decode_controls(&bytes[2..]).unwrap();
        assert_eq!(decoded.get(control.oid.as_str()), Some(&control));
    }
}
