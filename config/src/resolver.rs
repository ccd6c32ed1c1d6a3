// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Interface resolution with per-generation memoization.
//!
//! Many rules usually bind to the same few networks. An [`InterfaceCache`] makes sure that the
//! directory is queried at most once per distinct network identifier during one generation.
//! A cache serves a single gateway and must not outlive the generation it was built for.

use directory::{GatewayDirectory, InterfaceDescriptor};
use ordermap::OrderMap;
use ordermap::map::Entry;
use tracing::{debug, trace};

use crate::{NatConfigError, NatConfigResult};

pub struct InterfaceCache<'a, D: GatewayDirectory> {
    directory: &'a D,
    gateway_name: String,
    gateway: Option<D::Gateway>, /* looked up on first resolution */
    interfaces: OrderMap<String, InterfaceDescriptor>,
}

impl<'a, D: GatewayDirectory> InterfaceCache<'a, D> {
    #[must_use]
    pub fn new(directory: &'a D, gateway_name: &str) -> Self {
        Self {
            directory,
            gateway_name: gateway_name.to_owned(),
            gateway: None,
            interfaces: OrderMap::new(),
        }
    }

    /// Name of the gateway this cache resolves interfaces for
    #[must_use]
    pub fn gateway_name(&self) -> &str {
        &self.gateway_name
    }

    /// Resolve the interface of the gateway attached to `network_id`.
    ///
    /// # Errors
    ///
    /// Fails with [`NatConfigError::UnknownNetwork`] if the gateway has no such interface, or
    /// with the error of the directory if the lookup itself fails.
    pub fn resolve(&mut self, network_id: &str) -> NatConfigResult<&InterfaceDescriptor> {
        match self.interfaces.entry(network_id.to_owned()) {
            Entry::Occupied(entry) => {
                trace!("Interface for network {network_id} found in cache");
                Ok(&*entry.into_mut())
            }
            Entry::Vacant(entry) => {
                if self.gateway.is_none() {
                    debug!("Looking up edge gateway '{}'...", self.gateway_name);
                    self.gateway = Some(self.directory.gateway_by_name(&self.gateway_name)?);
                }
                let gateway = self.gateway.as_ref().unwrap_or_else(|| unreachable!());

                debug!(
                    "Looking up interface for network {network_id} on gateway '{}'...",
                    self.gateway_name
                );
                let descriptor = self
                    .directory
                    .interface_by_network(gateway, network_id)?
                    .ok_or_else(|| NatConfigError::UnknownNetwork {
                        gateway: self.gateway_name.clone(),
                        network_id: network_id.to_owned(),
                    })?;
                Ok(&*entry.insert(descriptor))
            }
        }
    }

    /// Number of networks resolved so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}
