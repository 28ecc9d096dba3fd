/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! RFC 4511 LDAP message model and BER wire codec.
//!
//! The codec performs no I/O and no logging. Encoding is a strict
//! two-pass protocol: [`MessageEncoder`] computes and caches every
//! aggregate length up front, then emits into a buffer allocated to
//! exactly that size. Decoding either yields a message, asks for more
//! bytes, fails fatally, or fails recoverably with a synthesized
//! protocol-correct error response attached.

pub mod dn;
pub mod oid;

pub mod message;
pub use message::{Control, LdapMessage, LdapResult, ProtocolOp, ResultCode};

mod codec;
pub use codec::{
    DecodedMessage, EncodeError, FatalDecodeError, LdapCodec, MessageDecodeError, MessageEncoder,
    RequestDecodeError,
};

pub mod control;
pub use control::{ControlRegistry, ControlValue, ControlValueError};

pub mod extended;
pub use extended::{
    ExtendedOperationHandler, ExtendedOperationRegistry, ExtendedRequestValue,
    ExtendedResponseValue, ExtendedValueError,
};

mod registry;
pub use registry::RegistryError;
