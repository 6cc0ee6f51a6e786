//! Host interface to hypervisor NIC attribute mapping
//!
//! Each host interface must carry a `net<N>` identifier, which is the NIC slot
//! name Proxmox uses in guest configs. The mapper keys the result by that
//! identifier.

use crate::validation::validate_identifier;
use proxbridge_common::{Error, NetworkInterface, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Compute-side attributes derived from one host interface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterfaceAttrs {
    pub id: String,
    pub ip: Option<String>,
    pub ip6: Option<String>,
}

impl InterfaceAttrs {
    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Map host interfaces to NIC attributes keyed by identifier.
///
/// Fails on the first interface, in position order, whose identifier is
/// missing, malformed or already used by an earlier interface.
pub fn map_interfaces(interfaces: &[NetworkInterface]) -> Result<BTreeMap<String, InterfaceAttrs>> {
    let mut mapped = BTreeMap::new();
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();

    for (index, nic) in interfaces.iter().enumerate() {
        validate_identifier(index, &nic.identifier)?;

        if let Some(first) = seen.insert(nic.identifier.as_str(), index) {
            return Err(Error::Validation(format!(
                "Duplicate identifier interface[{}]. Must be unique, {} is used by interface[{}]",
                index, nic.identifier, first
            )));
        }

        debug!(identifier = %nic.identifier, index, "Mapped host interface");

        mapped.insert(
            nic.identifier.clone(),
            InterfaceAttrs {
                id: nic.identifier.clone(),
                ip: nic.ip.clone(),
                ip6: nic.ip6.clone(),
            },
        );
    }

    Ok(mapped)
}
