//! Common types and utilities shared between proxbridge-core and proxbridge-cli

pub mod host;

pub use host::{HostRecord, NetworkInterface, OperatingSystem};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Proxmox guest type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComputeType {
    #[default]
    Qemu,  // QEMU/KVM virtual machine
    Lxc,   // LXC container
}

impl ComputeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qemu => "qemu",
            Self::Lxc => "lxc",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Lxc)
    }
}

impl std::fmt::Display for ComputeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComputeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "qemu" => Ok(Self::Qemu),
            "lxc" => Ok(Self::Lxc),
            other => Err(Error::InvalidConfig(format!("Unknown compute type: {}", other))),
        }
    }
}

/// Per-NIC compute attributes, as entered on the host's compute profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NicAttributes {
    pub id: String,                 // net0, net1, ...
    pub model: Option<String>,      // qemu only: virtio, e1000, rtl8139
    pub macaddr: Option<String>,
    pub bridge: Option<String>,
    pub tag: Option<String>,        // VLAN tag
    pub rate: Option<String>,       // MB/s
    pub queues: Option<String>,     // qemu only
    pub firewall: Option<String>,   // "1" enables the guest firewall
    pub link_down: Option<String>,  // qemu only
    pub name: Option<String>,       // lxc only: interface name inside the container
    pub ip: Option<String>,
    pub ip6: Option<String>,
    pub gw: Option<String>,
    pub gw6: Option<String>,
}

/// Compute attributes attached to a host record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComputeAttributes {
    #[serde(rename = "type", default)]
    pub compute_type: ComputeType,
    #[serde(default)]
    pub node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmid: Option<String>,
    #[serde(default = "default_templated")]
    pub templated: String,
    #[serde(default)]
    pub config_attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub interfaces_attributes: BTreeMap<String, NicAttributes>,
}

fn default_templated() -> String {
    "0".to_string()
}

impl Default for ComputeAttributes {
    fn default() -> Self {
        Self::new(ComputeType::default(), String::new())
    }
}

impl ComputeAttributes {
    pub fn new(compute_type: ComputeType, node: impl Into<String>) -> Self {
        Self {
            compute_type,
            node: node.into(),
            vmid: None,
            templated: default_templated(),
            config_attributes: BTreeMap::new(),
            interfaces_attributes: BTreeMap::new(),
        }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_interface(mut self, key: impl Into<String>, nic: NicAttributes) -> Self {
        self.interfaces_attributes.insert(key.into(), nic);
        self
    }

    /// Config attribute value, `None` when absent or empty
    pub fn config(&self, key: &str) -> Option<&str> {
        self.config_attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Current configuration of a remote guest, as reported by the hypervisor
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct VmConfig(BTreeMap<String, String>);

impl VmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Apply an update payload on top of this config
    pub fn apply(&mut self, diff: &AttributeDiff) {
        for (key, value) in diff.iter() {
            self.0.insert(key.to_string(), value.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VmConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Changed configuration attributes, ready to be sent as an update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AttributeDiff(BTreeMap<String, String>);

impl AttributeDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeDiff {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Proxbridge error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Virtual machine not found: {0}")]
    VmNotFound(String),

    #[error("Invalid proxmox vm uuid: {0}")]
    InvalidUuid(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("System error: {0}")]
    System(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
