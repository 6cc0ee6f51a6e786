///! Compute attribute checks and defaults applied before a guest is built

use crate::config::DefaultsConfig;
use crate::interfaces::InterfaceAttrs;
use crate::ostype;
use proxbridge_common::{ComputeAttributes, ComputeType, NicAttributes, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Check the host's OS family against the requested qemu `ostype`.
///
/// Containers and guests without an `ostype` are not checked, and neither
/// are hosts without an operating system.
pub fn validate(os_family: Option<&str>, attrs: &ComputeAttributes) -> Result<()> {
    if attrs.compute_type != ComputeType::Qemu {
        return Ok(());
    }

    let (Some(family), Some(ostype)) = (os_family, attrs.config("ostype")) else {
        return Ok(());
    };

    ostype::check_consistency(family, ostype)
}

/// Default the container hostname to the host name.
///
/// Returns true when the hostname was filled in.
pub fn fill_container_defaults(host_name: &str, attrs: &mut ComputeAttributes) -> bool {
    if attrs.compute_type != ComputeType::Lxc || attrs.config("hostname").is_some() {
        return false;
    }

    debug!(hostname = host_name, "Defaulting container hostname");
    attrs
        .config_attributes
        .insert("hostname".to_string(), host_name.to_string());
    true
}

/// Copy mapped host addresses onto the NIC compute attributes.
///
/// NICs are matched by id; host interfaces without a compute NIC get a new
/// entry built from the defaults.
pub fn merge_interfaces(
    attrs: &mut ComputeAttributes,
    mapped: &BTreeMap<String, InterfaceAttrs>,
    defaults: &DefaultsConfig,
) {
    for (id, host_nic) in mapped {
        let existing = attrs
            .interfaces_attributes
            .values_mut()
            .find(|nic| &nic.id == id);

        match existing {
            Some(nic) => {
                if host_nic.ip.is_some() {
                    nic.ip = host_nic.ip.clone();
                }
                if host_nic.ip6.is_some() {
                    nic.ip6 = host_nic.ip6.clone();
                }
            }
            None => {
                let key = next_index(&attrs.interfaces_attributes);
                let model = match attrs.compute_type {
                    ComputeType::Qemu => Some(defaults.nic_model.clone()),
                    ComputeType::Lxc => None,
                };
                attrs.interfaces_attributes.insert(
                    key,
                    NicAttributes {
                        id: id.clone(),
                        model,
                        bridge: Some(defaults.bridge.clone()),
                        ip: host_nic.ip.clone(),
                        ip6: host_nic.ip6.clone(),
                        ..Default::default()
                    },
                );
            }
        }
    }
}

// Nested attribute keys are "0", "1", ...
fn next_index(nics: &BTreeMap<String, NicAttributes>) -> String {
    let next = nics
        .keys()
        .filter_map(|k| k.parse::<usize>().ok())
        .max()
        .map_or(0, |max| max + 1);
    next.to_string()
}
