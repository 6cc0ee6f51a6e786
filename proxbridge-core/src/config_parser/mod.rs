///! Guest config parsers
///! Turn console compute attributes into Proxmox config keys, per guest type

pub mod lxc;
pub mod qemu;

pub use lxc::ContainerParser;
pub use qemu::QemuParser;

use proxbridge_common::{ComputeAttributes, ComputeType};
use std::collections::BTreeMap;

/// Attributes that describe the guest to the console but are not part of
/// the Proxmox config.
pub const CONSOLE_KEYS: &[&str] = &[
    "vmid",
    "node",
    "type",
    "templated",
    "image_id",
    "provision_method",
];

/// Normalizes compute attributes into Proxmox config key space
pub trait ConfigParser: Send + Sync {
    /// Guest type this parser handles
    fn compute_type(&self) -> ComputeType;

    /// Parse requested attributes into config keys and values
    fn parse(&self, attrs: &ComputeAttributes) -> BTreeMap<String, String>;

    /// True when `key` is a config attribute of this guest type
    fn is_known_key(&self, key: &str) -> bool;
}

/// Parser for a guest type
pub fn parser_for(compute_type: ComputeType) -> &'static dyn ConfigParser {
    match compute_type {
        ComputeType::Qemu => &QemuParser,
        ComputeType::Lxc => &ContainerParser,
    }
}

/// `vmid` plus every non-empty config attribute not listed in `composed`
pub(crate) fn base_attributes(attrs: &ComputeAttributes, composed: &[&str]) -> BTreeMap<String, String> {
    let mut parsed = BTreeMap::new();

    if let Some(vmid) = attrs.vmid.as_deref().filter(|v| !v.is_empty()) {
        parsed.insert("vmid".to_string(), vmid.to_string());
    }

    for (key, value) in &attrs.config_attributes {
        if value.is_empty()
            || composed.contains(&key.as_str())
            || CONSOLE_KEYS.contains(&key.as_str())
        {
            continue;
        }
        parsed.insert(key.clone(), value.clone());
    }

    parsed
}

pub(crate) fn is_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}

/// Append `,key=value` when value is non-empty
pub(crate) fn push_option(out: &mut String, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        out.push(',');
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
}

/// Volume id on a storage, `<storage>:<kind>/<file>`, unless `file` already is one
pub(crate) fn volume_id(storage: Option<&str>, kind: &str, file: &str) -> String {
    match storage.filter(|s| !s.is_empty()) {
        Some(storage) if !file.contains(':') => format!("{}:{}/{}", storage, kind, file),
        _ => file.to_string(),
    }
}
