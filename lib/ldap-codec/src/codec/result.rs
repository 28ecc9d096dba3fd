/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use ldap_asn1::{BerEncodeError, BerInteger, BerReadError, BerReader, BerWriter, tag, tlv_size};

use super::FatalDecodeError;
use super::utf8_field;
use crate::message::{LdapResult, ResultCode};

const REFERRAL_TAG: u8 = tag::context_constructed(3);

/// Cached lengths for the COMPONENTS OF LDAPResult block
pub(crate) struct ResultPlan<'a> {
    result: &'a LdapResult,
    code_len: usize,
    referral_len: Option<usize>,
    value_len: usize,
}

impl<'a> ResultPlan<'a> {
    pub(crate) fn new(result: &'a LdapResult) -> Self {
        let code_len = BerInteger::size_of(i64::from(result.result_code.value()));
        let referral_len = if result.referral.is_empty() {
            None
        } else {
            Some(result.referral.iter().map(|u| tlv_size(u.len())).sum())
        };
        let value_len = tlv_size(code_len)
            + tlv_size(result.matched_dn.len())
            + tlv_size(result.diagnostic_message.len())
            + referral_len.map_or(0, tlv_size);
        ResultPlan {
            result,
            code_len,
            referral_len,
            value_len,
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        debug_assert_eq!(
            self.code_len,
            BerInteger::size_of(i64::from(self.result.result_code.value()))
        );
        w.put_enumerated(i64::from(self.result.result_code.value()))?;
        w.put_octet_string(self.result.matched_dn.as_bytes())?;
        w.put_octet_string(self.result.diagnostic_message.as_bytes())?;
        if let Some(referral_len) = self.referral_len {
            w.put_tag_length(REFERRAL_TAG, referral_len)?;
            for uri in &self.result.referral {
                w.put_octet_string(uri.as_bytes())?;
            }
        }
        Ok(())
    }
}

/// Decode the leading LDAPResult components of a response operation.
/// Response content is preserved as received, only UTF-8 is enforced.
pub(crate) fn decode_ldap_result(r: &mut BerReader) -> Result<LdapResult, FatalDecodeError> {
    let code = r.read_enumerated()?;
    let code = u32::try_from(code)
        .map_err(|_| FatalDecodeError::InvalidElement(BerReadError::InvalidInteger))?;
    let matched_dn = utf8_field(r.expect_tlv(tag::OCTET_STRING)?, "matchedDN")?;
    let diagnostic_message = utf8_field(r.expect_tlv(tag::OCTET_STRING)?, "diagnosticMessage")?;

    let mut referral = Vec::new();
    if r.peek_tag() == Some(REFERRAL_TAG) {
        let mut uris = BerReader::new(r.expect_tlv(REFERRAL_TAG)?);
        while !uris.is_empty() {
            referral.push(utf8_field(
                uris.expect_tlv(tag::OCTET_STRING)?,
                "referral uri",
            )?);
        }
    }

    Ok(LdapResult {
        result_code: ResultCode::new(code),
        matched_dn,
        diagnostic_message,
        referral,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(result: &LdapResult) -> LdapResult {
        let plan = ResultPlan::new(result);
        let mut w = BerWriter::new(plan.value_len());
        plan.encode(&mut w).unwrap();
        let buf = w.finish();
        assert_eq!(buf.len(), plan.value_len());
        let mut r = BerReader::new(&buf);
        let decoded = decode_ldap_result(&mut r).unwrap();
        r.expect_end().unwrap();
        decoded
    }

    #[test]
    fn success_minimal() {
        let result = LdapResult::success();
        let plan = ResultPlan::new(&result);
        let mut w = BerWriter::new(plan.value_len());
        plan.encode(&mut w).unwrap();
        assert_eq!(w.finish(), [0x0a, 0x01, 0x00, 0x04, 0x00, 0x04, 0x00]);
    }

    #[test]
    fn with_referral() {
        let mut result = LdapResult::new(ResultCode::REFERRAL);
        result.referral.push("ldap://other.example.com/".to_string());
        assert_eq!(round_trip(&result), result);
    }

    #[test]
    fn error_fields() {
        let result = LdapResult::new(ResultCode::NO_SUCH_OBJECT)
            .with_matched_dn("ou=system")
            .with_diagnostic_message("entry not found");
        assert_eq!(round_trip(&result), result);
    }

    #[test]
    fn unknown_code_preserved() {
        let result = LdapResult::new(ResultCode::new(4096));
        assert_eq!(round_trip(&result), result);
    }

    #[test]
    fn empty_referral_omitted() {
        let result = LdapResult::success();
        let plan = ResultPlan::new(&result);
        let mut w = BerWriter::new(plan.value_len());
        plan.encode(&mut w).unwrap();
        assert!(!w.finish().contains(&REFERRAL_TAG));
    }
}
