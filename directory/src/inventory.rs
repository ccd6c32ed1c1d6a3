// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! In-memory gateway directory

use ordermap::OrderMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{DirectoryError, GatewayDirectory, InterfaceDescriptor};

/// Interfaces of one gateway, keyed by network identifier
pub type GatewayInterfaces = OrderMap<String, InterfaceDescriptor>;

/// Handle to a gateway known to a [`StaticDirectory`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayHandle {
    pub name: String,
}

/// A [`GatewayDirectory`] over an inventory held in memory.
///
/// The YAML form maps gateway names to their interfaces, keyed by network identifier:
///
/// ```yaml
/// gateways:
///   edge-1:
///     2ad93597-7b54-43dd-9eb1-631dd337e5a7:
///       type: application/vnd.vmware.admin.network+xml
///       name: ane012345
///       href: https://vmware.api.net/api/admin/network/2ad93597-7b54-43dd-9eb1-631dd337e5a7
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticDirectory {
    #[serde(default)]
    gateways: OrderMap<String, GatewayInterfaces>,
}

impl StaticDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an inventory from its YAML representation
    pub fn from_yaml(yaml: &str) -> Result<Self, DirectoryError> {
        let directory: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| DirectoryError::BadInventory(e.to_string()))?;
        debug!("Loaded directory with {} gateways", directory.len());
        Ok(directory)
    }

    /// Register a gateway with no interfaces. Registering a known gateway is a no-op.
    pub fn add_gateway(&mut self, gateway: &str) {
        self.gateways.entry(gateway.to_owned()).or_default();
    }

    /// Attach an interface to a gateway, registering the gateway if needed.
    /// Returns the descriptor previously stored for that network, if any.
    pub fn add_interface(
        &mut self,
        gateway: &str,
        network_id: &str,
        descriptor: InterfaceDescriptor,
    ) -> Option<InterfaceDescriptor> {
        self.gateways
            .entry(gateway.to_owned())
            .or_default()
            .insert(network_id.to_owned(), descriptor)
    }

    /// Number of gateways in the inventory
    #[must_use]
    pub fn len(&self) -> usize {
        self.gateways.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }
}

impl GatewayDirectory for StaticDirectory {
    type Gateway = GatewayHandle;

    fn gateway_by_name(&self, name: &str) -> Result<GatewayHandle, DirectoryError> {
        if self.gateways.contains_key(name) {
            Ok(GatewayHandle {
                name: name.to_owned(),
            })
        } else {
            Err(DirectoryError::NoSuchGateway(name.to_owned()))
        }
    }

    fn interface_by_network(
        &self,
        gateway: &GatewayHandle,
        network_id: &str,
    ) -> Result<Option<InterfaceDescriptor>, DirectoryError> {
        let interfaces = self
            .gateways
            .get(gateway.name.as_str())
            .ok_or_else(|| DirectoryError::NoSuchGateway(gateway.name.clone()))?;
        Ok(interfaces.get(network_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    const INVENTORY: &str = r"
gateways:
  edge-1:
    net-a:
      type: application/vnd.vmware.admin.network+xml
      name: ane012345
      href: https://vmware.api.net/api/admin/network/net-a
    net-b:
      type: application/vnd.vmware.admin.network+xml
      name: ane067890
      href: https://vmware.api.net/api/admin/network/net-b
  edge-2: {}
";

    #[test]
    #[traced_test]
    fn test_load_inventory() {
        let dir = StaticDirectory::from_yaml(INVENTORY).unwrap();
        assert_eq!(dir.len(), 2);
        assert!(logs_contain("Loaded directory with 2 gateways"));

        let gw = dir.gateway_by_name("edge-1").unwrap();
        let iface = dir.interface_by_network(&gw, "net-b").unwrap().unwrap();
        assert_eq!(iface.name, "ane067890");
        assert_eq!(iface.href, "https://vmware.api.net/api/admin/network/net-b");

        let gw2 = dir.gateway_by_name("edge-2").unwrap();
        assert_eq!(dir.interface_by_network(&gw2, "net-a").unwrap(), None);
    }

    #[test]
    fn test_unknown_gateway() {
        let dir = StaticDirectory::from_yaml(INVENTORY).unwrap();
        assert_eq!(
            dir.gateway_by_name("edge-9"),
            Err(DirectoryError::NoSuchGateway("edge-9".to_owned()))
        );
    }

    #[test]
    fn test_bad_inventory() {
        let err = StaticDirectory::from_yaml("gateways: [1, 2]").unwrap_err();
        assert!(matches!(err, DirectoryError::BadInventory(_)));
    }

    #[test]
    fn test_add_interface() {
        let mut dir = StaticDirectory::new();
        assert!(dir.is_empty());
        let first = InterfaceDescriptor::new("t", "n1", "h1");
        let second = InterfaceDescriptor::new("t", "n2", "h2");
        assert_eq!(dir.add_interface("gw", "net", first.clone()), None);
        assert_eq!(dir.add_interface("gw", "net", second.clone()), Some(first));
        dir.add_gateway("gw");

        let gw = dir.gateway_by_name("gw").unwrap();
        assert_eq!(dir.interface_by_network(&gw, "net").unwrap(), Some(second));
        assert_eq!(dir.len(), 1);
    }
}
