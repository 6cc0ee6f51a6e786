///! LXC container config parsing

use super::{base_attributes, is_enabled, push_option, volume_id, ConfigParser};
use crate::validation::is_identifier;
use proxbridge_common::{ComputeAttributes, ComputeType, NicAttributes};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Plain container config attributes
const CONFIG_KEYS: &[&str] = &[
    "arch", "cmode", "console", "cores", "cpulimit", "cpuunits", "description",
    "features", "hookscript", "hostname", "memory", "nameserver", "onboot",
    "ostype", "protection", "rootfs", "searchdomain", "startup", "swap", "tags",
    "timezone", "tty", "unprivileged",
];

static INDEXED_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(net|mp|unused|dev)[0-9]+$").unwrap()
});

/// Console attributes composed into `ostemplate`
const OSTEMPLATE_KEYS: &[&str] = &["ostemplate_storage", "ostemplate_file"];

/// Parser for LXC containers
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerParser;

impl ConfigParser for ContainerParser {
    fn compute_type(&self) -> ComputeType {
        ComputeType::Lxc
    }

    fn parse(&self, attrs: &ComputeAttributes) -> BTreeMap<String, String> {
        let mut parsed = base_attributes(attrs, OSTEMPLATE_KEYS);

        if let Some(file) = attrs.config("ostemplate_file") {
            parsed.insert(
                "ostemplate".to_string(),
                volume_id(attrs.config("ostemplate_storage"), "vztmpl", file),
            );
        }

        for nic in attrs.interfaces_attributes.values() {
            if is_identifier(&nic.id) {
                parsed.insert(nic.id.clone(), render_nic(nic));
            }
        }

        parsed
    }

    // `ostemplate` is only accepted on creation and never shows up in a config
    fn is_known_key(&self, key: &str) -> bool {
        CONFIG_KEYS.contains(&key) || INDEXED_KEY_REGEX.is_match(key)
    }
}

/// `name=<eth>,bridge=..,hwaddr=..,ip=..,ip6=..,gw=..,gw6=..,tag=..,rate=..[,firewall=1]`
fn render_nic(nic: &NicAttributes) -> String {
    let name = match nic.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("eth{}", nic.id.trim_start_matches("net")),
    };

    let mut value = format!("name={}", name);
    push_option(&mut value, "bridge", nic.bridge.as_deref());
    push_option(&mut value, "hwaddr", nic.macaddr.as_deref());
    push_option(&mut value, "ip", nic.ip.as_deref());
    push_option(&mut value, "ip6", nic.ip6.as_deref());
    push_option(&mut value, "gw", nic.gw.as_deref());
    push_option(&mut value, "gw6", nic.gw6.as_deref());
    push_option(&mut value, "tag", nic.tag.as_deref());
    push_option(&mut value, "rate", nic.rate.as_deref());
    if is_enabled(nic.firewall.as_deref()) {
        value.push_str(",firewall=1");
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lxc() -> ComputeAttributes {
        ComputeAttributes::new(ComputeType::Lxc, "pve")
    }

    #[test]
    fn test_passes_plain_attributes() {
        let mut attrs = lxc()
            .with_config("cores", "1")
            .with_config("cpulimit", "1")
            .with_config("swap", "");
        attrs.vmid = Some("100".to_string());

        let parsed = ContainerParser.parse(&attrs);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed["cores"], "1");
        assert_eq!(parsed["cpulimit"], "1");
        assert!(!parsed.contains_key("swap"));
    }

    #[test]
    fn test_composes_ostemplate() {
        let attrs = lxc()
            .with_config("ostemplate_storage", "local")
            .with_config("ostemplate_file", "debian-12-standard_12.2-1_amd64.tar.zst");
        let parsed = ContainerParser.parse(&attrs);
        assert_eq!(
            parsed["ostemplate"],
            "local:vztmpl/debian-12-standard_12.2-1_amd64.tar.zst"
        );
        assert!(!parsed.contains_key("ostemplate_storage"));
    }

    #[test]
    fn test_renders_nics() {
        let attrs = lxc()
            .with_interface(
                "0",
                NicAttributes {
                    id: "net0".to_string(),
                    bridge: Some("vmbr0".to_string()),
                    ip: Some("10.0.0.10/24".to_string()),
                    gw: Some("10.0.0.1".to_string()),
                    ip6: Some("auto".to_string()),
                    firewall: Some("0".to_string()),
                    ..Default::default()
                },
            )
            .with_interface(
                "1",
                NicAttributes {
                    id: "net1".to_string(),
                    name: Some("mgmt".to_string()),
                    macaddr: Some("BC:24:11:00:00:02".to_string()),
                    firewall: Some("1".to_string()),
                    ..Default::default()
                },
            );

        let parsed = ContainerParser.parse(&attrs);
        assert_eq!(parsed["net0"], "name=eth0,bridge=vmbr0,ip=10.0.0.10/24,ip6=auto,gw=10.0.0.1");
        assert_eq!(parsed["net1"], "name=mgmt,hwaddr=BC:24:11:00:00:02,firewall=1");
    }

    #[test]
    fn test_known_keys() {
        assert!(ContainerParser.is_known_key("hostname"));
        assert!(ContainerParser.is_known_key("cores"));
        assert!(ContainerParser.is_known_key("mp0"));
        assert!(!ContainerParser.is_known_key("ostemplate"));
        assert!(!ContainerParser.is_known_key("scsi0"));
    }
}
