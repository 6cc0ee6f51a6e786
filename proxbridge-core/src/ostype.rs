///! Proxmox `ostype` codes and the operating system families they fit

use proxbridge_common::{Error, Result};

/// Console OS families that run a Linux kernel
pub const LINUX_FAMILIES: &[&str] = &[
    "Altlinux", "Archlinux", "Coreos", "Debian", "Fcos", "Gentoo",
    "NixOS", "Rancheros", "Redhat", "Rhcos", "Suse", "Xenserver",
];

pub const WINDOWS_FAMILIES: &[&str] = &["Windows"];

pub const SOLARIS_FAMILIES: &[&str] = &["Solaris"];

pub const LINUX_OSTYPES: &[&str] = &["l24", "l26"];

pub const WINDOWS_OSTYPES: &[&str] = &[
    "wxp", "w2k", "w2k3", "w2k8", "wvista", "win7", "win8", "win10", "win11",
];

/// Families a given `ostype` accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    Families(&'static [&'static str]),
    Any,
}

impl Compatibility {
    pub fn accepts(&self, family: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Families(families) => families.iter().any(|f| f.eq_ignore_ascii_case(family)),
        }
    }
}

/// Look up an `ostype` code, `None` for codes Proxmox doesn't know
pub fn compatibility(ostype: &str) -> Option<Compatibility> {
    if LINUX_OSTYPES.contains(&ostype) {
        return Some(Compatibility::Families(LINUX_FAMILIES));
    }
    if WINDOWS_OSTYPES.contains(&ostype) {
        return Some(Compatibility::Families(WINDOWS_FAMILIES));
    }
    match ostype {
        "solaris" => Some(Compatibility::Families(SOLARIS_FAMILIES)),
        "other" => Some(Compatibility::Any),
        _ => None,
    }
}

/// Check that a host's OS family can run under the given `ostype`
pub fn check_consistency(family: &str, ostype: &str) -> Result<()> {
    let compat = compatibility(ostype)
        .ok_or_else(|| Error::InvalidConfig(format!("Unknown ostype {}", ostype)))?;

    if !compat.accepts(family) {
        return Err(Error::Validation(format!(
            "Operating system family {} is not consistent with {}",
            family, ostype
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_families_fit_l26() {
        for family in LINUX_FAMILIES {
            assert!(check_consistency(family, "l26").is_ok(), "{} should fit l26", family);
        }
        assert!(check_consistency("Debian", "l24").is_ok());
    }

    #[test]
    fn test_solaris_does_not_fit_l26() {
        let err = check_consistency("Solaris", "l26").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err
            .to_string()
            .ends_with("Operating system family Solaris is not consistent with l26"));
        assert!(check_consistency("Solaris", "solaris").is_ok());
    }

    #[test]
    fn test_windows_ostypes() {
        assert!(check_consistency("Windows", "win10").is_ok());
        assert!(check_consistency("Windows", "l26").is_err());
        assert!(check_consistency("Redhat", "win11").is_err());
    }

    #[test]
    fn test_other_accepts_everything() {
        assert!(check_consistency("Freebsd", "other").is_ok());
        assert!(check_consistency("Windows", "other").is_ok());
    }

    #[test]
    fn test_unknown_ostype() {
        let err = check_consistency("Debian", "l99").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
