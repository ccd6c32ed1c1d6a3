// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Generation of the NAT service configuration from a [`NatServiceIntent`].
//!
//! Generation is a pure, full re-generation of the document: it does not look at what the
//! gateway currently has configured. It runs in two phases. First all rule intents are checked,
//! without any directory interaction. Then, in declaration order, identifiers are allocated to
//! the rules that lack one and the interface of every rule is resolved. Any failure aborts the
//! whole generation.

use derive_builder::Builder;
use directory::GatewayDirectory;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::compiled::{
    CompiledNatRule, CompiledNatService, DnatGatewayRule, GatewayNatRule, SnatGatewayRule,
};
use crate::intent::{NatRuleIntent, NatServiceIntent, Translation};
use crate::ranges::{IdRange, IdRanges};
use crate::resolver::InterfaceCache;
use crate::{NatConfigError, NatConfigResult};

/// Value of `IsEnabled` when the intent does not say
pub const DEFAULT_ENABLED: &str = "true";

/// Settings of a [`NatCompiler`]
#[derive(Builder, Clone, Debug, Default, PartialEq, Eq)]
#[builder(default)]
pub struct CompilerSettings {
    /// Identifier ranges; NAT rules get their identifiers from `nat_service`
    pub id_ranges: IdRanges,
    /// Reject SNAT rules that carry a protocol or ports, instead of ignoring those
    pub strict_snat: bool,
}

/// Hands out consecutive identifiers from a range
#[derive(Debug)]
struct IdAllocator {
    range: IdRange,
    next: Option<u64>,
}
impl IdAllocator {
    fn new(range: IdRange) -> Self {
        Self {
            range,
            next: Some(range.min),
        }
    }
    fn allocate(&mut self, index: usize) -> NatConfigResult<u64> {
        let id = self
            .next
            .filter(|id| self.range.contains(*id))
            .ok_or(NatConfigError::IdRangeExhausted {
                index,
                max: self.range.max,
            })?;
        self.next = id.checked_add(1);
        Ok(id)
    }
}

/// Generator of NAT service configurations
#[derive(Debug)]
pub struct NatCompiler<D: GatewayDirectory> {
    directory: D,
    settings: CompilerSettings,
}

impl<D: GatewayDirectory> NatCompiler<D> {
    /// Build a compiler that resolves interfaces with `directory`
    pub fn new(directory: D, settings: CompilerSettings) -> NatConfigResult<Self> {
        settings.id_ranges.validate()?;
        Ok(Self {
            directory,
            settings,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// Generate the NAT service configuration of gateway `gateway` from `intent`
    pub fn compile(
        &self,
        gateway: &str,
        intent: &NatServiceIntent,
    ) -> NatConfigResult<CompiledNatService> {
        debug!(
            "Generating NAT config for gateway '{gateway}' ({} rules)...",
            intent.nat_rules.len()
        );

        let rules = intent
            .nat_rules
            .iter()
            .enumerate()
            .map(|(index, raw)| NatRuleIntent::from_raw(index, raw, self.settings.strict_snat))
            .collect::<NatConfigResult<Vec<_>>>()?;

        let mut cache = InterfaceCache::new(&self.directory, gateway);
        let mut ids = IdAllocator::new(self.settings.id_ranges.nat_service);
        let mut seen = HashSet::with_capacity(rules.len());

        let mut nat_rule = Vec::with_capacity(rules.len());
        for (index, rule) in rules.into_iter().enumerate() {
            let rule_type = rule.rule_type();
            let id = match rule.id {
                Some(id) => id,
                None => ids.allocate(index)?.to_string(),
            };
            if !seen.insert(id.clone()) {
                warn!("Rule {index}: identifier {id} is used by more than one rule");
            }
            let interface = cache.resolve(&rule.network_id)?.clone();

            let gateway_nat_rule = match rule.translation {
                Translation::Snat(snat) => GatewayNatRule::Snat(SnatGatewayRule {
                    interface,
                    original_ip: snat.original_ip,
                    translated_ip: snat.translated_ip,
                }),
                Translation::Dnat(dnat) => GatewayNatRule::Dnat(DnatGatewayRule {
                    interface,
                    original_ip: dnat.original_ip,
                    translated_ip: dnat.translated_ip,
                    original_port: dnat.original_port,
                    translated_port: dnat.translated_port,
                    protocol: dnat.protocol,
                }),
            };

            nat_rule.push(CompiledNatRule {
                id,
                is_enabled: rule.enabled.unwrap_or_else(|| DEFAULT_ENABLED.to_owned()),
                rule_type,
                gateway_nat_rule,
            });
        }

        let service = CompiledNatService {
            is_enabled: intent
                .enabled
                .as_ref()
                .map_or_else(|| DEFAULT_ENABLED.to_owned(), |flag| flag.render()),
            nat_rule,
        };
        info!(
            "Generated NAT config for gateway '{gateway}': {} rules over {} networks",
            service.len(),
            cache.len()
        );
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{Protocol, RawNatRuleBuilder, RuleType};
    use directory::testing::{
        CountingDirectory, TEST_GATEWAY, TEST_NETWORK, TEST_NETWORK_2, sample_directory,
        sample_interface, sample_interface_2,
    };
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn snat(network: &str, original: &str, translated: &str) -> RawNatRuleBuilder {
        let mut builder = RawNatRuleBuilder::default();
        builder
            .rule_type("SNAT")
            .network_id(network)
            .original_ip(original)
            .translated_ip(translated);
        builder
    }

    fn dnat(network: &str, port: &str) -> RawNatRuleBuilder {
        let mut builder = RawNatRuleBuilder::default();
        builder
            .rule_type("DNAT")
            .network_id(network)
            .original_ip("192.0.2.2")
            .translated_ip("10.10.20.20")
            .original_port(port)
            .translated_port(port);
        builder
    }

    fn compiler(dir: &CountingDirectory) -> NatCompiler<&CountingDirectory> {
        NatCompiler::new(dir, CompilerSettings::default()).unwrap()
    }

    #[test]
    fn test_id_allocator() {
        let mut ids = IdAllocator::new(IdRange::new(10, 12).unwrap());
        assert_eq!(ids.allocate(0), Ok(10));
        assert_eq!(ids.allocate(1), Ok(11));
        assert_eq!(ids.allocate(2), Ok(12));
        assert_eq!(
            ids.allocate(3),
            Err(NatConfigError::IdRangeExhausted { index: 3, max: 12 })
        );

        let mut ids = IdAllocator::new(IdRange::new(u64::MAX, u64::MAX).unwrap());
        assert_eq!(ids.allocate(0), Ok(u64::MAX));
        assert!(ids.allocate(1).is_err());
    }

    #[test]
    fn test_explicit_ids_do_not_consume_counter() {
        let dir = CountingDirectory::new(sample_directory());
        let intent = NatServiceIntent::new(vec![
            snat(TEST_NETWORK, "192.0.2.1", "10.0.0.1").build().unwrap(),
            snat(TEST_NETWORK, "192.0.2.2", "10.0.0.2")
                .id("999")
                .build()
                .unwrap(),
            dnat(TEST_NETWORK, "22").build().unwrap(),
            dnat(TEST_NETWORK, "80").id(5u64).build().unwrap(),
            snat(TEST_NETWORK, "192.0.2.3", "10.0.0.3").build().unwrap(),
        ]);
        let service = compiler(&dir).compile(TEST_GATEWAY, &intent).unwrap();
        let ids: Vec<_> = service.rules().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["65537", "999", "65538", "5", "65539"]);
    }

    #[test]
    fn test_custom_base() {
        let dir = CountingDirectory::new(sample_directory());
        let settings = CompilerSettingsBuilder::default()
            .id_ranges(IdRanges {
                nat_service: IdRange::new(1000, 1001).unwrap(),
            })
            .build()
            .unwrap();
        let compiler = NatCompiler::new(&dir, settings).unwrap();

        let two = NatServiceIntent::new(vec![
            snat(TEST_NETWORK, "192.0.2.1", "10.0.0.1").build().unwrap(),
            snat(TEST_NETWORK, "192.0.2.2", "10.0.0.2").build().unwrap(),
        ]);
        let service = compiler.compile(TEST_GATEWAY, &two).unwrap();
        assert_eq!(service.nat_rule[0].id, "1000");
        assert_eq!(service.nat_rule[1].id, "1001");

        let mut three = two.clone();
        three
            .nat_rules
            .push(snat(TEST_NETWORK, "192.0.2.3", "10.0.0.3").build().unwrap());
        assert_eq!(
            compiler.compile(TEST_GATEWAY, &three),
            Err(NatConfigError::IdRangeExhausted {
                index: 2,
                max: 1001
            })
        );
    }

    #[test]
    fn test_invalid_settings() {
        let dir = sample_directory();
        let settings = CompilerSettings {
            id_ranges: IdRanges {
                nat_service: IdRange { min: 5, max: 1 },
            },
            strict_snat: false,
        };
        assert!(matches!(
            NatCompiler::new(&dir, settings),
            Err(NatConfigError::InvalidIdRange { min: 5, max: 1 })
        ));
    }

    #[test]
    fn test_networks_resolved_independently() {
        let dir = CountingDirectory::new(sample_directory());
        let intent = NatServiceIntent::new(vec![
            dnat(TEST_NETWORK, "22").build().unwrap(),
            dnat(TEST_NETWORK_2, "22").build().unwrap(),
            snat(TEST_NETWORK, "192.0.2.1", "10.0.0.1").build().unwrap(),
            snat(TEST_NETWORK_2, "192.0.2.1", "10.0.0.1").build().unwrap(),
        ]);
        let service = compiler(&dir).compile(TEST_GATEWAY, &intent).unwrap();
        let interfaces: Vec<_> = service
            .rules()
            .map(|r| r.gateway_nat_rule.interface().clone())
            .collect();
        assert_eq!(
            interfaces,
            [
                sample_interface(),
                sample_interface_2(),
                sample_interface(),
                sample_interface_2()
            ]
        );
        assert_eq!(dir.gateway_lookups(), 1);
        assert_eq!(dir.interface_lookups(TEST_NETWORK), 1);
        assert_eq!(dir.interface_lookups(TEST_NETWORK_2), 1);
    }

    #[test]
    fn test_invalid_intent_skips_directory() {
        let dir = CountingDirectory::new(sample_directory());
        let mut bad = dnat(TEST_NETWORK, "22").build().unwrap();
        bad.original_port = None;
        let intent = NatServiceIntent::new(vec![dnat(TEST_NETWORK, "80").build().unwrap(), bad]);
        assert_eq!(
            compiler(&dir).compile(TEST_GATEWAY, &intent),
            Err(NatConfigError::MissingField {
                index: 1,
                field: "original_port"
            })
        );
        assert_eq!(dir.gateway_lookups(), 0);
        assert_eq!(dir.total_interface_lookups(), 0);
    }

    #[test]
    fn test_strict_snat() {
        let dir = CountingDirectory::new(sample_directory());
        let intent = NatServiceIntent::new(vec![
            snat(TEST_NETWORK, "192.0.2.1", "10.0.0.1")
                .protocol("tcp")
                .build()
                .unwrap(),
        ]);

        let lenient = compiler(&dir).compile(TEST_GATEWAY, &intent).unwrap();
        assert_eq!(lenient.nat_rule[0].rule_type, RuleType::Snat);
        assert_eq!(lenient.nat_rule[0].gateway_nat_rule.protocol(), None);

        let settings = CompilerSettingsBuilder::default()
            .strict_snat(true)
            .build()
            .unwrap();
        let strict = NatCompiler::new(&dir, settings).unwrap();
        assert!(strict.settings().strict_snat);
        assert_eq!(
            strict.compile(TEST_GATEWAY, &intent),
            Err(NatConfigError::ExtraneousField {
                index: 0,
                field: "protocol"
            })
        );
    }

    #[test]
    #[traced_test]
    fn test_duplicate_ids_are_reported() {
        let dir = CountingDirectory::new(sample_directory());
        let intent = NatServiceIntent::new(vec![
            dnat(TEST_NETWORK, "22").build().unwrap(),
            dnat(TEST_NETWORK, "80").id("65537").build().unwrap(),
        ]);
        let service = compiler(&dir).compile(TEST_GATEWAY, &intent).unwrap();
        assert_eq!(service.nat_rule[0].id, "65537");
        assert_eq!(service.nat_rule[1].id, "65537");
        assert_eq!(
            service.nat_rule[1].gateway_nat_rule.protocol(),
            Some(Protocol::Tcp)
        );
        assert!(logs_contain("identifier 65537 is used by more than one rule"));
    }

    #[test]
    fn test_empty_intent() {
        let dir = CountingDirectory::new(sample_directory());
        let service = compiler(&dir)
            .compile(TEST_GATEWAY, &NatServiceIntent::default().with_enabled(false))
            .unwrap();
        assert!(service.is_empty());
        assert_eq!(service.is_enabled, "false");
        assert_eq!(dir.gateway_lookups(), 0);
    }
}
