// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Test doubles for [`GatewayDirectory`] consumers

use ordermap::OrderMap;
use std::cell::{Cell, RefCell};

use crate::{
    DirectoryError, GatewayDirectory, GatewayHandle, InterfaceDescriptor, StaticDirectory,
};

pub const TEST_GATEWAY: &str = "1111111-7b54-43dd-9eb1-631dd337e5a7";
pub const TEST_NETWORK: &str = "2ad93597-7b54-43dd-9eb1-631dd337e5a7";
pub const TEST_NETWORK_2: &str = "3bd93597-8c65-54ee-0fc2-742ee448f6b8";

/// The descriptor that [`sample_directory`] returns for [`TEST_NETWORK`]
#[must_use]
pub fn sample_interface() -> InterfaceDescriptor {
    InterfaceDescriptor::new(
        "application/vnd.vmware.admin.network+xml",
        "ane012345",
        &format!("https://vmware.api.net/api/admin/network/{TEST_NETWORK}"),
    )
}

/// The descriptor that [`sample_directory`] returns for [`TEST_NETWORK_2`]
#[must_use]
pub fn sample_interface_2() -> InterfaceDescriptor {
    InterfaceDescriptor::new(
        "application/vnd.vmware.admin.network+xml",
        "ane067890",
        &format!("https://vmware.api.net/api/admin/network/{TEST_NETWORK_2}"),
    )
}

/// A directory with a single gateway, [`TEST_GATEWAY`], attached to two networks
#[must_use]
pub fn sample_directory() -> StaticDirectory {
    let mut dir = StaticDirectory::new();
    dir.add_interface(TEST_GATEWAY, TEST_NETWORK, sample_interface());
    dir.add_interface(TEST_GATEWAY, TEST_NETWORK_2, sample_interface_2());
    dir
}

/// A [`StaticDirectory`] wrapper that records every lookup it serves
#[derive(Debug, Default)]
pub struct CountingDirectory {
    inner: StaticDirectory,
    gateway_lookups: Cell<usize>,
    interface_lookups: RefCell<OrderMap<String, usize>>,
    failure: Option<String>,
}

impl CountingDirectory {
    #[must_use]
    pub fn new(inner: StaticDirectory) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// Make every interface lookup fail with [`DirectoryError::Backend`]
    #[must_use]
    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_owned());
        self
    }

    /// Number of gateway lookups served so far
    #[must_use]
    pub fn gateway_lookups(&self) -> usize {
        self.gateway_lookups.get()
    }

    /// Number of interface lookups served so far for `network_id`
    #[must_use]
    pub fn interface_lookups(&self, network_id: &str) -> usize {
        self.interface_lookups
            .borrow()
            .get(network_id)
            .copied()
            .unwrap_or(0)
    }

    /// Number of interface lookups served so far, all networks included
    #[must_use]
    pub fn total_interface_lookups(&self) -> usize {
        self.interface_lookups.borrow().values().sum()
    }
}

impl GatewayDirectory for CountingDirectory {
    type Gateway = GatewayHandle;

    fn gateway_by_name(&self, name: &str) -> Result<GatewayHandle, DirectoryError> {
        self.gateway_lookups.set(self.gateway_lookups.get() + 1);
        self.inner.gateway_by_name(name)
    }

    fn interface_by_network(
        &self,
        gateway: &GatewayHandle,
        network_id: &str,
    ) -> Result<Option<InterfaceDescriptor>, DirectoryError> {
        *self
            .interface_lookups
            .borrow_mut()
            .entry(network_id.to_owned())
            .or_insert(0) += 1;
        if let Some(reason) = &self.failure {
            return Err(DirectoryError::Backend(reason.clone()));
        }
        self.inner.interface_by_network(gateway, network_id)
    }
}
