//! Common test utilities and helpers

#![allow(dead_code)]

use proxbridge_common::{ComputeType, HostRecord, NetworkInterface, OperatingSystem};
use proxbridge_core::config::ConnectionConfig;
use proxbridge_core::remote::GuestRecord;
use proxbridge_core::{ComputeResource, InMemorySession};
use std::sync::Arc;

pub const NODE: &str = "pve";

/// Connection settings that pass validation
pub fn test_connection() -> ConnectionConfig {
    ConnectionConfig {
        url: "https://pve.example.com:8006/api2/json".to_string(),
        user: "root@pam".to_string(),
        password: "proxmox01".to_string(),
        ssl_verify_peer: false,
    }
}

/// Compute resource over the given session
pub fn compute_resource(session: &InMemorySession) -> ComputeResource {
    ComputeResource::new(test_connection(), Arc::new(session.clone()))
}

/// Session holding one qemu VM (100) and one container (101), both with an
/// empty `cores` setting
pub async fn seeded_session() -> InMemorySession {
    let session = InMemorySession::new();
    session
        .add_guest(
            NODE,
            GuestRecord::new(ComputeType::Qemu, 100)
                .with_config("cores", "")
                .with_mac("ca:d0:e6:32:16:97"),
        )
        .await;
    session
        .add_guest(
            NODE,
            GuestRecord::new(ComputeType::Lxc, 101)
                .with_config("cores", "")
                .with_mac("ca:d0:e6:32:16:98"),
        )
        .await;
    session
}

/// Host with a single interface
pub fn host_with_nic(name: &str, nic: NetworkInterface) -> HostRecord {
    let mut host = HostRecord::new(name);
    host.interfaces = vec![nic];
    host
}

pub fn debian() -> OperatingSystem {
    OperatingSystem::new("Debian 12", "Debian")
}

pub fn solaris() -> OperatingSystem {
    OperatingSystem::new("Solaris 10", "Solaris")
}
