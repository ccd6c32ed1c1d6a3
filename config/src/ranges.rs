// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Rule identifier ranges.
//!
//! The provider numbers the rules of all edge gateway services in a single identifier space,
//! carved into one block per service. Identifiers we allocate for NAT rules must come from the
//! NAT block.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{NatConfigError, NatConfigResult};

/// An inclusive range of rule identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    pub min: u64,
    pub max: u64,
}

impl IdRange {
    pub const NAT_SERVICE: IdRange = IdRange {
        min: 65537,
        max: 131_072,
    };

    pub fn new(min: u64, max: u64) -> NatConfigResult<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        (self.min..=self.max).contains(&id)
    }

    pub fn validate(&self) -> NatConfigResult<()> {
        if self.min > self.max {
            return Err(NatConfigError::InvalidIdRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Identifier ranges per service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRanges {
    #[serde(default = "nat_service_default")]
    pub nat_service: IdRange,
}

fn nat_service_default() -> IdRange {
    IdRange::NAT_SERVICE
}

impl Default for IdRanges {
    fn default() -> Self {
        Self {
            nat_service: IdRange::NAT_SERVICE,
        }
    }
}

impl IdRanges {
    /// Load identifier ranges from YAML. Services not mentioned keep their default range.
    pub fn from_yaml(yaml: &str) -> NatConfigResult<Self> {
        let ranges: Self = serde_yaml_ng::from_str(yaml).map_err(|e| NatConfigError::Parse {
            what: "identifier ranges",
            reason: e.to_string(),
        })?;
        ranges.validate()?;
        debug!("Loaded identifier ranges: {ranges:?}");
        Ok(ranges)
    }

    pub fn validate(&self) -> NatConfigResult<()> {
        self.nat_service.validate()
    }
}
