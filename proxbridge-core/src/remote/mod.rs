///! Remote hypervisor capabilities
///!
///! The adapter only needs to find a guest, read its config, update it and
///! destroy it. Anything able to do that against a Proxmox cluster plugs in
///! here; `memory` provides an in-process implementation.

pub mod memory;

pub use memory::{GuestRecord, InMemorySession};

use crate::vm_uuid::VmUuid;
use async_trait::async_trait;
use proxbridge_common::{AttributeDiff, VmConfig};

/// Errors reported by a remote session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("service error: {0}")]
    Service(String),
}

impl From<RemoteError> for proxbridge_common::Error {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::NotFound(what) => proxbridge_common::Error::VmNotFound(what),
            RemoteError::Service(msg) => proxbridge_common::Error::Remote(msg),
        }
    }
}

/// A guest (VM or container) on the cluster
#[async_trait]
pub trait RemoteVm: Send + Sync + std::fmt::Debug {
    /// Proxmox vmid
    fn identity(&self) -> String;

    fn is_container(&self) -> bool;

    /// MAC addresses of the guest's NICs
    fn macs(&self) -> Vec<String>;

    /// Current config
    async fn config(&self) -> Result<VmConfig, RemoteError>;

    /// Apply changed attributes
    async fn update(&self, diff: &AttributeDiff) -> Result<(), RemoteError>;

    async fn destroy(&self) -> Result<(), RemoteError>;
}

/// Session against a cluster
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Find a guest on any node
    async fn find_vm(&self, uuid: &VmUuid) -> Result<Box<dyn RemoteVm>, RemoteError>;
}
