// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Errors reported by gateway directories

use thiserror::Error;

/// The reasons why a directory lookup may fail. A network that the gateway does not know about
/// is not an error at this level: lookups signal it with `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("No such edge gateway: '{0}'")]
    NoSuchGateway(String),
    #[error("Directory backend failure: {0}")]
    Backend(String),
    #[error("Invalid directory inventory: {0}")]
    BadInventory(String),
}
