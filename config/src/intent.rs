// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! NAT service intent: the user-authored, provider-agnostic description of NAT rules.
//!
//! Intents arrive loosely typed ([`RawNatRule`]), the way they are written in YAML. Each raw rule
//! is turned into a [`NatRuleIntent`], whose [`Translation`] has a distinct shape for source and
//! destination NAT, before any configuration is generated.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};
use tracing::warn;

use crate::{NatConfigError, NatConfigResult};

/// Boolean flag as written by users: either a boolean or a string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}
impl Flag {
    /// Render the flag as the provider expects it. Strings are carried verbatim.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Flag::Bool(value) => value.to_string(),
            Flag::Text(text) => text.clone(),
        }
    }
}
impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag::Bool(value)
    }
}
impl From<&str> for Flag {
    fn from(value: &str) -> Self {
        Flag::Text(value.to_owned())
    }
}

/// A scalar value (identifier, port) that users may write as a number or a string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(u64),
    Signed(i64),
    Text(String),
}
impl Scalar {
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Scalar::Number(value) => value.to_string(),
            Scalar::Signed(value) => value.to_string(),
            Scalar::Text(text) => text.clone(),
        }
    }
    fn is_empty(&self) -> bool {
        matches!(self, Scalar::Text(text) if text.is_empty())
    }
}
impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Number(value)
    }
}
impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_owned())
    }
}

/// Kind of NAT rule
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum RuleType {
    Snat,
    Dnat,
}

/// Transport protocol matched by a DNAT rule
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
    TcpUdp,
    Icmp,
    Any,
}

/// A NAT rule as declared by the user. Nothing is checked at this stage.
#[derive(Builder, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[builder(default, setter(into, strip_option))]
pub struct RawNatRule {
    pub id: Option<Scalar>,
    pub enabled: Option<Flag>,
    pub rule_type: Option<String>,
    pub network_id: Option<String>,
    pub original_ip: Option<String>,
    pub translated_ip: Option<String>,
    pub original_port: Option<Scalar>,
    pub translated_port: Option<Scalar>,
    pub protocol: Option<String>,
}

/// The NAT service as declared by the user
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct NatServiceIntent {
    #[serde(default)]
    pub enabled: Option<Flag>,
    #[serde(default)]
    pub nat_rules: Vec<RawNatRule>,
}

impl NatServiceIntent {
    #[must_use]
    pub fn new(rules: Vec<RawNatRule>) -> Self {
        Self {
            enabled: None,
            nat_rules: rules,
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: impl Into<Flag>) -> Self {
        self.enabled = Some(enabled.into());
        self
    }

    pub fn from_yaml(yaml: &str) -> NatConfigResult<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| NatConfigError::Parse {
            what: "NAT service intent",
            reason: e.to_string(),
        })
    }
}

/// Address translation of a source NAT rule. Has no ports nor protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnatTranslation {
    pub original_ip: String,
    pub translated_ip: String,
}

/// Address and port translation of a destination NAT rule
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DnatTranslation {
    pub original_ip: String,
    pub translated_ip: String,
    pub original_port: String,
    pub translated_port: String,
    pub protocol: Protocol,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Translation {
    Snat(SnatTranslation),
    Dnat(DnatTranslation),
}

/// A checked NAT rule intent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NatRuleIntent {
    pub id: Option<String>,      /* caller-supplied identifier, if any */
    pub enabled: Option<String>, /* rendered flag, if any */
    pub network_id: String,      /* edge network the rule binds to */
    pub translation: Translation,
}

fn required<'a, T>(
    index: usize,
    field: &'static str,
    value: Option<&'a T>,
) -> NatConfigResult<&'a T> {
    value.ok_or(NatConfigError::MissingField { index, field })
}

impl NatRuleIntent {
    /// Check the raw rule at position `index`. With `strict`, SNAT rules carrying DNAT-only
    /// fields are rejected instead of having those fields dropped.
    pub fn from_raw(index: usize, raw: &RawNatRule, strict: bool) -> NatConfigResult<Self> {
        let rule_type = required(index, "rule_type", raw.rule_type.as_ref())?;
        let rule_type =
            RuleType::from_str(rule_type).map_err(|_| NatConfigError::UnsupportedRuleType {
                index,
                value: rule_type.clone(),
            })?;
        let network_id = required(index, "network_id", raw.network_id.as_ref())?.clone();
        let original_ip = required(index, "original_ip", raw.original_ip.as_ref())?.clone();
        let translated_ip = required(index, "translated_ip", raw.translated_ip.as_ref())?.clone();

        let translation = match rule_type {
            RuleType::Snat => {
                Self::check_snat_extras(index, raw, strict)?;
                Translation::Snat(SnatTranslation {
                    original_ip,
                    translated_ip,
                })
            }
            RuleType::Dnat => {
                let original_port =
                    required(index, "original_port", raw.original_port.as_ref())?.render();
                let translated_port =
                    required(index, "translated_port", raw.translated_port.as_ref())?.render();
                let protocol = match &raw.protocol {
                    Some(value) => Protocol::from_str(value).map_err(|_| {
                        NatConfigError::UnsupportedProtocol {
                            index,
                            value: value.clone(),
                        }
                    })?,
                    None => Protocol::default(),
                };
                Translation::Dnat(DnatTranslation {
                    original_ip,
                    translated_ip,
                    original_port,
                    translated_port,
                    protocol,
                })
            }
        };

        Ok(Self {
            id: raw.id.as_ref().filter(|id| !id.is_empty()).map(Scalar::render),
            enabled: raw.enabled.as_ref().map(Flag::render),
            network_id,
            translation,
        })
    }

    fn check_snat_extras(index: usize, raw: &RawNatRule, strict: bool) -> NatConfigResult<()> {
        let extras = [
            ("protocol", raw.protocol.is_some()),
            ("original_port", raw.original_port.is_some()),
            ("translated_port", raw.translated_port.is_some()),
        ];
        for (field, _) in extras.into_iter().filter(|(_, present)| *present) {
            if strict {
                return Err(NatConfigError::ExtraneousField { index, field });
            }
            warn!("Rule {index}: ignoring field '{field}' in SNAT rule");
        }
        Ok(())
    }

    #[must_use]
    pub fn rule_type(&self) -> RuleType {
        match self.translation {
            Translation::Snat(_) => RuleType::Snat,
            Translation::Dnat(_) => RuleType::Dnat,
        }
    }
}
