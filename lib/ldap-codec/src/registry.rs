/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate registration for oid {0}")]
    Duplicate(String),
}
