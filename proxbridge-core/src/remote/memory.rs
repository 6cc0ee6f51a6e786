///! In-memory cluster session

use super::{RemoteError, RemoteSession, RemoteVm};
use crate::vm_uuid::VmUuid;
use async_trait::async_trait;
use proxbridge_common::{AttributeDiff, ComputeType, VmConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Guest stored on an in-memory node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRecord {
    pub vmid: u32,
    pub compute_type: ComputeType,
    #[serde(default)]
    pub config: VmConfig,
    #[serde(default)]
    pub macs: Vec<String>,
}

impl GuestRecord {
    pub fn new(compute_type: ComputeType, vmid: u32) -> Self {
        Self {
            vmid,
            compute_type,
            config: VmConfig::new(),
            macs: Vec::new(),
        }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key, value);
        self
    }

    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.macs.push(mac.into());
        self
    }

    pub fn uuid(&self) -> VmUuid {
        VmUuid::new(self.compute_type, self.vmid)
    }
}

#[derive(Debug, Default)]
struct SessionState {
    nodes: BTreeMap<String, BTreeMap<u32, GuestRecord>>,
    updates: Vec<(VmUuid, AttributeDiff)>,
    failure: Option<String>,
}

/// Cluster held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySession {
    state: Arc<RwLock<SessionState>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose lookups all fail with a service error
    pub fn failing(message: impl Into<String>) -> Self {
        let state = SessionState {
            failure: Some(message.into()),
            ..Default::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Place a guest on a node, replacing any guest with the same vmid there
    pub async fn add_guest(&self, node: &str, guest: GuestRecord) {
        let mut state = self.state.write().await;
        state
            .nodes
            .entry(node.to_string())
            .or_default()
            .insert(guest.vmid, guest);
    }

    pub async fn guest(&self, uuid: &VmUuid) -> Option<GuestRecord> {
        let state = self.state.read().await;
        state.find(uuid).map(|(_, guest)| guest.clone())
    }

    /// Updates applied so far, in order
    pub async fn updates(&self) -> Vec<(VmUuid, AttributeDiff)> {
        self.state.read().await.updates.clone()
    }

    pub async fn guest_count(&self) -> usize {
        let state = self.state.read().await;
        state.nodes.values().map(BTreeMap::len).sum()
    }
}

impl SessionState {
    fn find(&self, uuid: &VmUuid) -> Option<(&String, &GuestRecord)> {
        self.nodes.iter().find_map(|(node, guests)| {
            guests
                .get(&uuid.vmid)
                .filter(|guest| guest.compute_type == uuid.compute_type)
                .map(|guest| (node, guest))
        })
    }

    fn guest_mut(&mut self, node: &str, uuid: &VmUuid) -> Option<&mut GuestRecord> {
        self.nodes.get_mut(node)?.get_mut(&uuid.vmid)
    }
}

#[async_trait]
impl RemoteSession for InMemorySession {
    async fn find_vm(&self, uuid: &VmUuid) -> Result<Box<dyn RemoteVm>, RemoteError> {
        let state = self.state.read().await;

        if let Some(message) = &state.failure {
            return Err(RemoteError::Service(message.clone()));
        }

        let (node, guest) = state
            .find(uuid)
            .ok_or_else(|| RemoteError::NotFound(uuid.to_string()))?;

        debug!(uuid = %uuid, node = %node, "Found guest");

        Ok(Box::new(InMemoryVm {
            uuid: *uuid,
            node: node.clone(),
            macs: guest.macs.clone(),
            state: Arc::clone(&self.state),
        }))
    }
}

/// Handle on a guest of an `InMemorySession`
#[derive(Debug)]
struct InMemoryVm {
    uuid: VmUuid,
    node: String,
    macs: Vec<String>,
    state: Arc<RwLock<SessionState>>,
}

#[async_trait]
impl RemoteVm for InMemoryVm {
    fn identity(&self) -> String {
        self.uuid.vmid.to_string()
    }

    fn is_container(&self) -> bool {
        self.uuid.compute_type == ComputeType::Lxc
    }

    fn macs(&self) -> Vec<String> {
        self.macs.clone()
    }

    async fn config(&self) -> Result<VmConfig, RemoteError> {
        let state = self.state.read().await;
        state
            .nodes
            .get(&self.node)
            .and_then(|guests| guests.get(&self.uuid.vmid))
            .map(|guest| guest.config.clone())
            .ok_or_else(|| RemoteError::NotFound(self.uuid.to_string()))
    }

    async fn update(&self, diff: &AttributeDiff) -> Result<(), RemoteError> {
        let mut state = self.state.write().await;
        let guest = state
            .guest_mut(&self.node, &self.uuid)
            .ok_or_else(|| RemoteError::NotFound(self.uuid.to_string()))?;

        guest.config.apply(diff);
        state.updates.push((self.uuid, diff.clone()));
        Ok(())
    }

    async fn destroy(&self) -> Result<(), RemoteError> {
        let mut state = self.state.write().await;
        state
            .nodes
            .get_mut(&self.node)
            .and_then(|guests| guests.remove(&self.uuid.vmid))
            .map(|_| ())
            .ok_or_else(|| RemoteError::NotFound(self.uuid.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_vm_by_type_and_vmid() {
        let session = InMemorySession::new();
        session
            .add_guest("pve", GuestRecord::new(ComputeType::Qemu, 100).with_config("cores", "2"))
            .await;
        session.add_guest("pve2", GuestRecord::new(ComputeType::Lxc, 101)).await;

        let vm = session.find_vm(&VmUuid::new(ComputeType::Qemu, 100)).await.unwrap();
        assert_eq!(vm.identity(), "100");
        assert!(!vm.is_container());
        assert_eq!(vm.config().await.unwrap().get("cores"), Some("2"));

        let ct = session.find_vm(&VmUuid::new(ComputeType::Lxc, 101)).await.unwrap();
        assert!(ct.is_container());

        // Same vmid, other guest type
        let err = session.find_vm(&VmUuid::new(ComputeType::Lxc, 100)).await.unwrap_err();
        assert_eq!(err, RemoteError::NotFound("lxc_100".to_string()));
    }

    #[tokio::test]
    async fn test_failing_session() {
        let session = InMemorySession::failing("VM not found");
        let err = session.find_vm(&VmUuid::new(ComputeType::Qemu, 100)).await.unwrap_err();
        assert_eq!(err, RemoteError::Service("VM not found".to_string()));
    }

    #[tokio::test]
    async fn test_update_and_destroy() {
        let session = InMemorySession::new();
        session.add_guest("pve", GuestRecord::new(ComputeType::Qemu, 100)).await;
        let uuid = VmUuid::new(ComputeType::Qemu, 100);

        let vm = session.find_vm(&uuid).await.unwrap();
        let diff: AttributeDiff = [("memory", "4096")].into_iter().collect();
        vm.update(&diff).await.unwrap();

        assert_eq!(session.guest(&uuid).await.unwrap().config.get("memory"), Some("4096"));
        assert_eq!(session.updates().await, vec![(uuid, diff.clone())]);

        vm.destroy().await.unwrap();
        assert_eq!(session.guest_count().await, 0);
        assert!(matches!(vm.destroy().await, Err(RemoteError::NotFound(_))));
        assert!(matches!(vm.update(&diff).await, Err(RemoteError::NotFound(_))));
    }
}
