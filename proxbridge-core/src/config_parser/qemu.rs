///! QEMU/KVM guest config parsing

use super::{base_attributes, is_enabled, push_option, volume_id, ConfigParser};
use crate::validation::is_identifier;
use proxbridge_common::{ComputeAttributes, ComputeType, NicAttributes};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Plain qemu config attributes
const CONFIG_KEYS: &[&str] = &[
    "acpi", "agent", "arch", "args", "autostart", "balloon", "bios", "boot",
    "bootdisk", "cicustom", "cipassword", "citype", "ciuser", "cores", "cpu",
    "cpulimit", "cpuunits", "description", "efidisk0", "hotplug", "hugepages",
    "keyboard", "kvm", "localtime", "machine", "memory", "name", "nameserver",
    "numa", "onboot", "ostype", "protection", "scsihw", "searchdomain",
    "shares", "smbios1", "sockets", "sshkeys", "startup", "tablet", "tags",
    "tdf", "vcpus", "vga", "vmgenid", "watchdog",
];

static INDEXED_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(net|ide|sata|scsi|virtio|unused|ipconfig|serial|parallel|usb|hostpci|numa)[0-9]+$")
        .unwrap()
});

/// Console attributes composed into other config keys
const CPU_KEYS: &[&str] = &["cpu_type", "spectre", "pcid"];
const MEMORY_KEYS: &[&str] = &["min_memory"];
const CDROM_KEYS: &[&str] = &["cdrom", "cdrom_storage", "cdrom_iso"];

const DEFAULT_NIC_MODEL: &str = "virtio";

/// Parser for QEMU virtual machines
#[derive(Debug, Clone, Copy, Default)]
pub struct QemuParser;

impl ConfigParser for QemuParser {
    fn compute_type(&self) -> ComputeType {
        ComputeType::Qemu
    }

    fn parse(&self, attrs: &ComputeAttributes) -> BTreeMap<String, String> {
        let composed: Vec<&str> = [CPU_KEYS, MEMORY_KEYS, CDROM_KEYS].concat();
        let mut parsed = base_attributes(attrs, &composed);

        if let Some(cpu) = cpu(attrs) {
            parsed.insert("cpu".to_string(), cpu);
        }

        if let Some(min_memory) = attrs.config("min_memory") {
            parsed
                .entry("balloon".to_string())
                .or_insert_with(|| min_memory.to_string());
        }

        if let Some(cdrom) = cdrom(attrs) {
            parsed.insert("ide2".to_string(), cdrom);
        }

        for nic in attrs.interfaces_attributes.values() {
            if is_identifier(&nic.id) {
                parsed.insert(nic.id.clone(), render_nic(nic));
            }
        }

        parsed
    }

    fn is_known_key(&self, key: &str) -> bool {
        CONFIG_KEYS.contains(&key) || INDEXED_KEY_REGEX.is_match(key)
    }
}

/// `cputype=<type>[,flags=+spec-ctrl;+pcid]`
fn cpu(attrs: &ComputeAttributes) -> Option<String> {
    let cpu_type = attrs.config("cpu_type")?;
    let mut cpu = format!("cputype={}", cpu_type);

    let mut flags = Vec::new();
    if is_enabled(attrs.config("spectre")) {
        flags.push("+spec-ctrl");
    }
    if is_enabled(attrs.config("pcid")) {
        flags.push("+pcid");
    }
    if !flags.is_empty() {
        cpu.push_str(",flags=");
        cpu.push_str(&flags.join(";"));
    }

    Some(cpu)
}

fn cdrom(attrs: &ComputeAttributes) -> Option<String> {
    match attrs.config("cdrom")? {
        "none" => Some("none,media=cdrom".to_string()),
        "cdrom" => Some("cdrom,media=cdrom".to_string()),
        "image" => {
            let iso = attrs.config("cdrom_iso")?;
            Some(format!(
                "{},media=cdrom",
                volume_id(attrs.config("cdrom_storage"), "iso", iso)
            ))
        }
        _ => None,
    }
}

/// `<model>[=<mac>],bridge=..,tag=..,rate=..,queues=..[,firewall=1][,link_down=1]`
fn render_nic(nic: &NicAttributes) -> String {
    let model = nic
        .model
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_NIC_MODEL);

    let mut value = match nic.macaddr.as_deref().filter(|m| !m.is_empty()) {
        Some(mac) => format!("{}={}", model, mac),
        None => model.to_string(),
    };

    push_option(&mut value, "bridge", nic.bridge.as_deref());
    push_option(&mut value, "tag", nic.tag.as_deref());
    push_option(&mut value, "rate", nic.rate.as_deref());
    push_option(&mut value, "queues", nic.queues.as_deref());
    if is_enabled(nic.firewall.as_deref()) {
        value.push_str(",firewall=1");
    }
    if is_enabled(nic.link_down.as_deref()) {
        value.push_str(",link_down=1");
    }

    value
}
