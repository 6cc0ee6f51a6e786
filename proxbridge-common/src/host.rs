///! Host records handed over by the management console

use crate::ComputeAttributes;
use serde::{Deserialize, Serialize};

/// Network interface of a host
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkInterface {
    pub identifier: String,   // net0, net1, ...
    pub ip: Option<String>,
    pub ip6: Option<String>,
    pub mac: Option<String>,
    pub primary: bool,
}

impl NetworkInterface {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_ip6(mut self, ip6: impl Into<String>) -> Self {
        self.ip6 = Some(ip6.into());
        self
    }

    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }
}

/// Operating system assigned to a host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatingSystem {
    pub name: String,
    pub family: String,   // Debian, Redhat, Windows, Solaris, ...
}

impl OperatingSystem {
    pub fn new(name: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family: family.into(),
        }
    }
}

/// Host as known by the management console
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostRecord {
    pub name: String,
    #[serde(default)]
    pub operating_system: Option<OperatingSystem>,
    #[serde(default)]
    pub interfaces: Vec<NetworkInterface>,
    #[serde(default)]
    pub compute_attributes: ComputeAttributes,
    #[serde(default)]
    pub owner: Option<String>,
}

impl HostRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn os_family(&self) -> Option<&str> {
        self.operating_system.as_ref().map(|os| os.family.as_str())
    }

    /// True when any interface carries the given MAC address
    pub fn has_mac(&self, mac: &str) -> bool {
        self.interfaces
            .iter()
            .filter_map(|nic| nic.mac.as_deref())
            .any(|m| m.eq_ignore_ascii_case(mac))
    }
}
