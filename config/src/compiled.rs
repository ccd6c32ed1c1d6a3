// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Generated NAT service configuration, shaped the way the provider's NAT API expects it.
//! Serialization yields the provider's key names (`IsEnabled`, `NatRule`, `GatewayNatRule`...).

use directory::InterfaceDescriptor;
use serde::Serialize;

use crate::intent::{Protocol, RuleType};

/// Translation fields of a generated SNAT rule
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnatGatewayRule {
    pub interface: InterfaceDescriptor,
    pub original_ip: String,
    pub translated_ip: String,
}

/// Translation fields of a generated DNAT rule
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DnatGatewayRule {
    pub interface: InterfaceDescriptor,
    pub original_ip: String,
    pub translated_ip: String,
    pub original_port: String,
    pub translated_port: String,
    pub protocol: Protocol,
}

/// The `GatewayNatRule` block of a rule
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GatewayNatRule {
    Snat(SnatGatewayRule),
    Dnat(DnatGatewayRule),
}

impl GatewayNatRule {
    #[must_use]
    pub fn interface(&self) -> &InterfaceDescriptor {
        match self {
            GatewayNatRule::Snat(rule) => &rule.interface,
            GatewayNatRule::Dnat(rule) => &rule.interface,
        }
    }
    #[must_use]
    pub fn original_ip(&self) -> &str {
        match self {
            GatewayNatRule::Snat(rule) => &rule.original_ip,
            GatewayNatRule::Dnat(rule) => &rule.original_ip,
        }
    }
    #[must_use]
    pub fn translated_ip(&self) -> &str {
        match self {
            GatewayNatRule::Snat(rule) => &rule.translated_ip,
            GatewayNatRule::Dnat(rule) => &rule.translated_ip,
        }
    }
    /// Protocol of the rule. SNAT rules have none.
    #[must_use]
    pub fn protocol(&self) -> Option<Protocol> {
        match self {
            GatewayNatRule::Snat(_) => None,
            GatewayNatRule::Dnat(rule) => Some(rule.protocol),
        }
    }
}

/// A generated NAT rule
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompiledNatRule {
    pub id: String,
    pub is_enabled: String,
    pub rule_type: RuleType,
    pub gateway_nat_rule: GatewayNatRule,
}

/// A generated NAT service configuration. Rules are in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompiledNatService {
    pub is_enabled: String,
    pub nat_rule: Vec<CompiledNatRule>,
}

impl CompiledNatService {
    /// Number of rules in the service
    #[must_use]
    pub fn len(&self) -> usize {
        self.nat_rule.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nat_rule.is_empty()
    }
    /// Iterate over the rules, in declaration order
    pub fn rules(&self) -> impl Iterator<Item = &CompiledNatRule> {
        self.nat_rule.iter()
    }
    /// Render as YAML, e.g. for hand-off to a serializer of the provider's wire format
    pub fn to_yaml(&self) -> Result<String, serde_yaml_ng::Error> {
        serde_yaml_ng::to_string(self)
    }
}
