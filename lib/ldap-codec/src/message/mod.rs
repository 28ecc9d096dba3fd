/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Plain data holders for the LDAP protocol operations.

use ahash::AHashMap;
use indexmap::IndexMap;

mod result;
pub use result::{LdapResult, ResultCode};

mod control;
pub use control::Control;

mod attribute;
pub use attribute::Attribute;

mod filter;
pub use filter::{AttributeValueAssertion, ExtensibleMatchFilter, Filter, SubstringsFilter};

/// One LDAP PDU: message ID, protocol operation and attached controls.
///
/// The scratch storage is transient per-message state for callers and
/// is never serialized; it is excluded from equality.
#[derive(Debug, Default)]
pub struct LdapMessage {
    message_id: u32,
    op: ProtocolOp,
    controls: IndexMap<String, Control>,
    scratch: AHashMap<String, String>,
}

impl LdapMessage {
    pub fn new(message_id: u32, op: ProtocolOp) -> Self {
        LdapMessage {
            message_id,
            op,
            controls: IndexMap::new(),
            scratch: AHashMap::new(),
        }
    }

    #[inline]
    pub fn message_id(&self) -> u32 {
        self.message_id
    }

    #[inline]
    pub fn op(&self) -> &ProtocolOp {
        &self.op
    }

    #[inline]
    pub fn into_op(self) -> ProtocolOp {
        self.op
    }

    #[inline]
    pub fn controls(&self) -> &IndexMap<String, Control> {
        &self.controls
    }

    /// Attach a control, replacing any control with the same OID
    pub fn add_control(&mut self, control: Control) -> Option<Control> {
        self.controls.insert(control.oid.clone(), control)
    }

    pub fn get_control(&self, oid: &str) -> Option<&Control> {
        self.controls.get(oid)
    }

    pub fn remove_control(&mut self, oid: &str) -> Option<Control> {
        self.controls.shift_remove(oid)
    }

    pub fn set_scratch(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.scratch.insert(key.into(), value.into());
    }

    pub fn get_scratch(&self, key: &str) -> Option<&str> {
        self.scratch.get(key).map(|v| v.as_str())
    }

    pub(crate) fn with_controls(
        message_id: u32,
        op: ProtocolOp,
        controls: IndexMap<String, Control>,
    ) -> Self {
        LdapMessage {
            message_id,
            op,
            controls,
            scratch: AHashMap::new(),
        }
    }
}

impl PartialEq for LdapMessage {
    fn eq(&self, other: &Self) -> bool {
        // scratch storage is transient, not part of message identity;
        // IndexMap equality is order independent
        self.message_id == other.message_id
            && self.op == other.op
            && self.controls == other.controls
    }
}

impl Eq for LdapMessage {}

/// The protocolOp CHOICE of an LDAPMessage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolOp {
    BindRequest(BindRequest),
    BindResponse(BindResponse),
    UnbindRequest,
    SearchRequest(SearchRequest),
    SearchResultEntry(SearchResultEntry),
    SearchResultDone(LdapResult),
    SearchResultReference(SearchResultReference),
    ModifyRequest(ModifyRequest),
    ModifyResponse(LdapResult),
    AddRequest(AddRequest),
    AddResponse(LdapResult),
    DeleteRequest(DeleteRequest),
    DeleteResponse(LdapResult),
    ModifyDnRequest(ModifyDnRequest),
    ModifyDnResponse(LdapResult),
    CompareRequest(CompareRequest),
    CompareResponse(LdapResult),
    AbandonRequest(AbandonRequest),
    ExtendedRequest(ExtendedRequest),
    ExtendedResponse(ExtendedResponse),
    IntermediateResponse(IntermediateResponse),
}

impl Default for ProtocolOp {
    fn default() -> Self {
        ProtocolOp::UnbindRequest
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindRequest {
    pub version: u8,
    pub name: String,
    pub authentication: BindAuthentication,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindAuthentication {
    Simple(Vec<u8>),
    Sasl {
        mechanism: String,
        credentials: Option<Vec<u8>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindResponse {
    pub result: LdapResult,
    pub server_sasl_creds: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    BaseObject = 0,
    SingleLevel = 1,
    WholeSubtree = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerefAliases {
    NeverDerefAliases = 0,
    DerefInSearching = 1,
    DerefFindingBaseObj = 2,
    DerefAlways = 3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub base_object: String,
    pub scope: SearchScope,
    pub deref_aliases: DerefAliases,
    pub size_limit: u32,
    pub time_limit: u32,
    pub types_only: bool,
    pub filter: Filter,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultEntry {
    pub object_name: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultReference {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyOperation {
    Add = 0,
    Delete = 1,
    Replace = 2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub operation: ModifyOperation,
    pub attribute: Attribute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyRequest {
    pub object: String,
    pub changes: Vec<Modification>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    pub entry: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyDnRequest {
    pub entry: String,
    pub new_rdn: String,
    pub delete_old_rdn: bool,
    pub new_superior: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRequest {
    pub entry: String,
    pub ava: AttributeValueAssertion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbandonRequest {
    pub message_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedRequest {
    pub name: String,
    /// `Some(vec![])` is a present zero-length value, distinct from absent
    pub value: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedResponse {
    pub result: LdapResult,
    pub name: Option<String>,
    pub value: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateResponse {
    pub name: Option<String>,
    pub value: Option<Vec<u8>>,
}
