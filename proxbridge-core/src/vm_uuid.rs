///! Console uuids of Proxmox guests, `<type>_<vmid>`

use proxbridge_common::{ComputeType, Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(qemu|lxc)_([0-9]+)$").unwrap()
});

/// Parsed guest uuid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VmUuid {
    pub compute_type: ComputeType,
    pub vmid: u32,
}

impl VmUuid {
    pub fn new(compute_type: ComputeType, vmid: u32) -> Self {
        Self { compute_type, vmid }
    }
}

impl std::str::FromStr for VmUuid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = UUID_REGEX
            .captures(s)
            .ok_or_else(|| Error::InvalidUuid(s.to_string()))?;

        let compute_type = caps[1].parse()?;
        let vmid = caps[2]
            .parse()
            .map_err(|_| Error::InvalidUuid(s.to_string()))?;

        Ok(Self { compute_type, vmid })
    }
}

impl std::fmt::Display for VmUuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.compute_type, self.vmid)
    }
}
