// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Type for NAT configuration generation failures.
//! Any failure aborts the generation of the whole document: there is no partial output.
//! Rule positions (`index`) are zero-based positions in the intent's rule list.

use directory::DirectoryError;
use thiserror::Error;

/// The reasons why we may fail to generate a NAT service configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NatConfigError {
    #[error("Gateway '{gateway}' has no interface on network '{network_id}'")]
    UnknownNetwork { gateway: String, network_id: String },
    #[error("Rule {index}: unsupported rule type '{value}', expected SNAT or DNAT")]
    UnsupportedRuleType { index: usize, value: String },
    #[error("Rule {index}: missing mandatory field '{field}'")]
    MissingField { index: usize, field: &'static str },
    #[error("Rule {index}: unsupported protocol '{value}'")]
    UnsupportedProtocol { index: usize, value: String },
    #[error("Rule {index}: field '{field}' is not allowed in SNAT rules")]
    ExtraneousField { index: usize, field: &'static str },
    #[error("Rule {index}: no identifier left, range ends at {max}")]
    IdRangeExhausted { index: usize, max: u64 },
    #[error("Invalid identifier range [{min}, {max}]")]
    InvalidIdRange { min: u64, max: u64 },
    #[error("Failed to parse {what}: {reason}")]
    Parse { what: &'static str, reason: String },
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl NatConfigError {
    /// Position of the offending rule, for errors tied to a single rule intent
    #[must_use]
    pub fn rule_index(&self) -> Option<usize> {
        match self {
            Self::UnsupportedRuleType { index, .. }
            | Self::MissingField { index, .. }
            | Self::UnsupportedProtocol { index, .. }
            | Self::ExtraneousField { index, .. }
            | Self::IdRangeExhausted { index, .. } => Some(*index),
            Self::UnknownNetwork { .. }
            | Self::InvalidIdRange { .. }
            | Self::Parse { .. }
            | Self::Directory(_) => None,
        }
    }
}

/// Result-like type for NAT configuration generation
pub type NatConfigResult<T> = Result<T, NatConfigError>;
