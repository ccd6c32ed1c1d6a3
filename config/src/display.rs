// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Display of generated NAT configurations

use std::fmt::Display;

use crate::compiled::{CompiledNatRule, CompiledNatService, GatewayNatRule};

fn fmt_heading(f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    writeln!(
        f,
        " {:>8} {:>5} {:>8} {:<16} {:<24} {:<24} {:<8}",
        "Id", "Type", "Enabled", "Interface", "Original", "Translated", "Protocol"
    )
}

impl Display for CompiledNatRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (original, translated, protocol) = match &self.gateway_nat_rule {
            GatewayNatRule::Snat(rule) => (
                rule.original_ip.clone(),
                rule.translated_ip.clone(),
                "-".to_owned(),
            ),
            GatewayNatRule::Dnat(rule) => (
                format!("{}:{}", rule.original_ip, rule.original_port),
                format!("{}:{}", rule.translated_ip, rule.translated_port),
                rule.protocol.to_string(),
            ),
        };
        writeln!(
            f,
            " {:>8} {:>5} {:>8} {:<16} {:<24} {:<24} {:<8}",
            self.id,
            self.rule_type.as_ref(),
            self.is_enabled,
            self.gateway_nat_rule.interface().name,
            original,
            translated,
            protocol
        )
    }
}

impl Display for CompiledNatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            " ━━━━━━━━━ NAT service (enabled: {}, {} rules) ━━━━━━━━━",
            self.is_enabled,
            self.len()
        )?;
        if self.is_empty() {
            return Ok(());
        }
        fmt_heading(f)?;
        for rule in self.rules() {
            rule.fmt(f)?;
        }
        Ok(())
    }
}
