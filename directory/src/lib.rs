// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Gateway directory: the narrow contract through which the NAT configuration generator learns
//! about the network interfaces of an edge gateway.
//!
//! The provider API offers far more than this; the generator only ever needs to turn a gateway
//! name into a handle, and a network identifier on that gateway into an [`InterfaceDescriptor`].
//! [`GatewayDirectory`] captures exactly that. [`StaticDirectory`] is an in-memory implementation
//! for hosts that already hold the inventory (or load it from YAML).

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]

pub mod descriptor;
pub mod errors;
pub mod inventory;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use descriptor::InterfaceDescriptor; // re-export
pub use errors::DirectoryError; // re-export
pub use inventory::{GatewayHandle, StaticDirectory}; // re-export

/// Lookup service mapping network identifiers of an edge gateway to interface descriptors.
///
/// Implementations own transport, authentication, retries and timeouts. Whatever error they
/// return is handed to the caller as-is.
pub trait GatewayDirectory {
    /// Handle to a gateway, as returned by [`GatewayDirectory::gateway_by_name`]
    type Gateway;

    /// Look up a gateway by its name (identity).
    fn gateway_by_name(&self, name: &str) -> Result<Self::Gateway, DirectoryError>;

    /// Look up the interface of `gateway` attached to the network `network_id`.
    /// `Ok(None)` means the gateway has no such interface.
    fn interface_by_network(
        &self,
        gateway: &Self::Gateway,
        network_id: &str,
    ) -> Result<Option<InterfaceDescriptor>, DirectoryError>;
}

impl<T: GatewayDirectory + ?Sized> GatewayDirectory for &T {
    type Gateway = T::Gateway;

    fn gateway_by_name(&self, name: &str) -> Result<Self::Gateway, DirectoryError> {
        (**self).gateway_by_name(name)
    }
    fn interface_by_network(
        &self,
        gateway: &Self::Gateway,
        network_id: &str,
    ) -> Result<Option<InterfaceDescriptor>, DirectoryError> {
        (**self).interface_by_network(gateway, network_id)
    }
}
