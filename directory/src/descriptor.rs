// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Gateway interface descriptor

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Reference to the network a gateway interface is attached to, as the provider reports it.
/// All fields are opaque and get copied verbatim into generated rules.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    #[serde(rename = "type")]
    pub kind: String, /* media type of the referenced object */
    pub name: String, /* name of the network */
    pub href: String, /* reference handle (URL) */
}

impl InterfaceDescriptor {
    #[must_use]
    pub fn new(kind: &str, name: &str, href: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            name: name.to_owned(),
            href: href.to_owned(),
        }
    }
}

impl Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.href)
    }
}
