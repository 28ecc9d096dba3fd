/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use ldap_asn1::{BerEncodeError, BerInteger, BerReader, BerWriter, tag, tlv_size};

use super::result::{ResultPlan, decode_ldap_result};
use super::{FatalDecodeError, OpDecodeError, RequestDecodeError, decode_request_dn, utf8_field};
use crate::message::{BindAuthentication, BindRequest, BindResponse, ProtocolOp};

const SIMPLE_AUTH_TAG: u8 = tag::context(0);
const SASL_AUTH_TAG: u8 = tag::context_constructed(3);
const SERVER_SASL_CREDS_TAG: u8 = tag::context(7);

pub(crate) struct BindRequestPlan<'a> {
    req: &'a BindRequest,
    version_len: usize,
    sasl_value_len: usize,
    value_len: usize,
}

impl<'a> BindRequestPlan<'a> {
    pub(crate) fn new(req: &'a BindRequest) -> Self {
        let version_len = BerInteger::size_of(i64::from(req.version));
        let mut sasl_value_len = 0;
        let auth_len = match &req.authentication {
            BindAuthentication::Simple(password) => tlv_size(password.len()),
            BindAuthentication::Sasl {
                mechanism,
                credentials,
            } => {
                sasl_value_len = tlv_size(mechanism.len())
                    + credentials.as_ref().map_or(0, |c| tlv_size(c.len()));
                tlv_size(sasl_value_len)
            }
        };
        let value_len = tlv_size(version_len) + tlv_size(req.name.len()) + auth_len;
        BindRequestPlan {
            req,
            version_len,
            sasl_value_len,
            value_len,
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        w.put_tag_length(tag::INTEGER, self.version_len)?;
        w.put_integer_value(i64::from(self.req.version))?;
        w.put_octet_string(self.req.name.as_bytes())?;
        match &self.req.authentication {
            BindAuthentication::Simple(password) => w.put_primitive(SIMPLE_AUTH_TAG, password),
            BindAuthentication::Sasl {
                mechanism,
                credentials,
            } => {
                w.put_tag_length(SASL_AUTH_TAG, self.sasl_value_len)?;
                w.put_octet_string(mechanism.as_bytes())?;
                if let Some(credentials) = credentials {
                    w.put_octet_string(credentials)?;
                }
                Ok(())
            }
        }
    }
}

pub(crate) struct BindResponsePlan<'a> {
    rsp: &'a BindResponse,
    result: ResultPlan<'a>,
    value_len: usize,
}

impl<'a> BindResponsePlan<'a> {
    pub(crate) fn new(rsp: &'a BindResponse) -> Self {
        let result = ResultPlan::new(&rsp.result);
        let value_len = result.value_len()
            + rsp.server_sasl_creds.as_ref().map_or(0, |c| tlv_size(c.len()));
        BindResponsePlan {
            rsp,
            result,
            value_len,
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    pub(crate) fn encode(&self, w: &mut BerWriter) -> Result<(), BerEncodeError> {
        self.result.encode(w)?;
        if let Some(creds) = &self.rsp.server_sasl_creds {
            w.put_primitive(SERVER_SASL_CREDS_TAG, creds)?;
        }
        Ok(())
    }
}

pub(crate) fn decode_request(data: &[u8]) -> Result<ProtocolOp, OpDecodeError> {
    let mut r = BerReader::new(data);

    let version = r.read_integer()?;
    if !(1..=127).contains(&version) {
        return Err(RequestDecodeError::UnsupportedBindVersion(version).into());
    }

    let name = decode_request_dn(&mut r, RequestDecodeError::MalformedDn)?;

    let auth = r.read_tlv()?;
    let authentication = match auth.tag {
        SIMPLE_AUTH_TAG => BindAuthentication::Simple(auth.value.to_vec()),
        SASL_AUTH_TAG => {
            let mut sasl = BerReader::new(auth.value);
            let mechanism = utf8_field(sasl.expect_tlv(tag::OCTET_STRING)?, "sasl mechanism")
                .map_err(OpDecodeError::Fatal)?;
            let credentials = if sasl.is_empty() {
                None
            } else {
                Some(sasl.expect_tlv(tag::OCTET_STRING)?.to_vec())
            };
            sasl.expect_end().map_err(FatalDecodeError::InvalidElement)?;
            BindAuthentication::Sasl {
                mechanism,
                credentials,
            }
        }
        t => return Err(RequestDecodeError::UnknownAuthChoice(t).into()),
    };
    r.expect_end().map_err(FatalDecodeError::InvalidElement)?;

    Ok(ProtocolOp::BindRequest(BindRequest {
        version: version as u8,
        name,
        authentication,
    }))
}

pub(crate) fn decode_response(data: &[u8]) -> Result<ProtocolOp, FatalDecodeError> {
    let mut r = BerReader::new(data);
    let result = decode_ldap_result(&mut r)?;
    let server_sasl_creds = if r.peek_tag() == Some(SERVER_SASL_CREDS_TAG) {
        Some(r.expect_tlv(SERVER_SASL_CREDS_TAG)?.to_vec())
    } else {
        None
    };
    r.expect_end()?;
    Ok(ProtocolOp::BindResponse(BindResponse {
        result,
        server_sasl_creds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::LdapResult;

    #[test]
    fn simple_bind_bytes() {
        let req = BindRequest {
            version: 3,
            name: "cn=admin".to_string(),
            authentication: BindAuthentication::Simple(b"secret".to_vec()),
        };
        let plan = BindRequestPlan::new(&req);
        let mut w = BerWriter::new(plan.value_len());
        plan.encode(&mut w).unwrap();
        let buf = w.finish();
        assert_eq!(buf.len(), plan.value_len());
        assert_eq!(&buf[..3], &[0x02, 0x01, 0x03]);
        assert_eq!(buf[3], 0x04);
        assert_eq!(buf[13], SIMPLE_AUTH_TAG);

        match decode_request(&buf).unwrap() {
            ProtocolOp::BindRequest(decoded) => assert_eq!(decoded, req),
            op => panic!("unexpected op {op:?}"),
        }
    }

    #[test]
    fn sasl_bind_round_trip() {
        let req = BindRequest {
            version: 3,
            name: String::new(),
            authentication: BindAuthentication::Sasl {
                mechanism: "EXTERNAL".to_string(),
                credentials: None,
            },
        };
        let plan = BindRequestPlan::new(&req);
        let mut w = BerWriter::new(plan.value_len());
        plan.encode(&mut w).unwrap();
        match decode_request(&w.finish()).unwrap() {
            ProtocolOp::BindRequest(decoded) => assert_eq!(decoded, req),
            op => panic!("unexpected op {op:?}"),
        }
    }

    #[test]
    fn version_out_of_range() {
        // version 0
        let data = [0x02, 0x01, 0x00, 0x04, 0x00, 0x80, 0x00];
        match decode_request(&data).unwrap_err() {
            OpDecodeError::Request(RequestDecodeError::UnsupportedBindVersion(0)) => {}
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn unknown_auth_choice() {
        // krbv42 [1] from obsolete LDAPv2
        let data = [0x02, 0x01, 0x03, 0x04, 0x00, 0x81, 0x00];
        match decode_request(&data).unwrap_err() {
            OpDecodeError::Request(RequestDecodeError::UnknownAuthChoice(0x81)) => {}
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn bad_dn_classified() {
        let mut data = vec![0x02, 0x01, 0x03, 0x04, 0x08];
        data.extend_from_slice(b"cn:admin");
        data.extend_from_slice(&[0x80, 0x00]);
        match decode_request(&data).unwrap_err() {
            OpDecodeError::Request(RequestDecodeError::MalformedDn(_)) => {}
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn response_with_sasl_creds() {
        let rsp = BindResponse {
            result: LdapResult::success(),
            server_sasl_creds: Some(b"challenge".to_vec()),
        };
        let plan = BindResponsePlan::new(&rsp);
        let mut w = BerWriter::new(plan.value_len());
        plan.encode(&mut w).unwrap();
        match decode_response(&w.finish()).unwrap() {
            ProtocolOp::BindResponse(decoded) => assert_eq!(decoded, rsp),
            op => panic!("unexpected op {op:?}"),
        }
    }

    #[test]
    fn response_creds_absent_not_empty() {
        let rsp = BindResponse {
            result: LdapResult::success(),
            server_sasl_creds: None,
        };
        let plan = BindResponsePlan::new(&rsp);
        let mut w = BerWriter::new(plan.value_len());
        plan.encode(&mut w).unwrap();
        let buf = w.finish();
        assert_eq!(buf, [0x0a, 0x01, 0x00, 0x04, 0x00, 0x04, 0x00]);
    }
}
