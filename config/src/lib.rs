// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! NAT configuration generator for edge gateways.
//!
//! Users describe NAT rules with a simple, provider-agnostic intent ([`NatServiceIntent`]): a
//! list of SNAT and DNAT rules with their addresses, ports, protocol and enablement. This crate
//! turns such an intent into the fully populated NAT service document ([`CompiledNatService`])
//! that the provider's NAT API expects: defaults are injected, identifiers are allocated to
//! rules lacking one, every rule gets the interface of the network it binds to, and rules keep
//! their declaration order.
//!
//! Interfaces are obtained through a [`directory::GatewayDirectory`]. Talking to the provider
//! and serializing the document into its wire format are left to the caller.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::missing_errors_doc)]

pub mod compiled;
pub mod compiler;
pub mod display;
pub mod errors;
pub mod intent;
pub mod ranges;
pub mod resolver;

pub use compiled::{CompiledNatRule, CompiledNatService, GatewayNatRule}; // re-export
pub use compiler::{CompilerSettings, CompilerSettingsBuilder, NatCompiler}; // re-export
pub use errors::{NatConfigError, NatConfigResult}; // re-export
pub use intent::{NatServiceIntent, Protocol, RawNatRule, RawNatRuleBuilder, RuleType}; // re-export
pub use ranges::{IdRange, IdRanges}; // re-export
pub use resolver::InterfaceCache; // re-export
