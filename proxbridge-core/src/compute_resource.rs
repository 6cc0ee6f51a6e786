//! Proxmox compute resource
//!
//! Bridges console host records and a Proxmox cluster session:
//! - guest lookup by console uuid, with remote failures reported as not found
//! - idempotent destroy
//! - saving a guest by sending only changed config attributes
//! - deriving compute and interface attributes from a host

use crate::compute_attrs;
use crate::config::{ConnectionConfig, DefaultsConfig};
use crate::diff;
use crate::interfaces::{map_interfaces, InterfaceAttrs};
use crate::log_vm_operation;
use crate::remote::{RemoteError, RemoteSession, RemoteVm};
use crate::vm_uuid::VmUuid;
use proxbridge_common::{AttributeDiff, ComputeAttributes, ComputeType, Error, HostRecord, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Who a lookup is performed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    pub user: String,
    pub admin: bool,
}

impl AccessContext {
    pub fn admin(user: impl Into<String>) -> Self {
        Self { user: user.into(), admin: true }
    }

    pub fn user(user: impl Into<String>) -> Self {
        Self { user: user.into(), admin: false }
    }

    /// Admins see every host, other users only the hosts they own
    pub fn can_see(&self, host: &HostRecord) -> bool {
        self.admin || host.owner.as_deref() == Some(self.user.as_str())
    }
}

/// Proxmox compute resource
pub struct ComputeResource {
    connection: ConnectionConfig,
    defaults: DefaultsConfig,
    session: Arc<dyn RemoteSession>,
}

impl ComputeResource {
    pub fn new(connection: ConnectionConfig, session: Arc<dyn RemoteSession>) -> Self {
        Self {
            connection,
            defaults: DefaultsConfig::default(),
            session,
        }
    }

    pub fn with_defaults(mut self, defaults: DefaultsConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    /// Check url, user and password
    pub fn validate(&self) -> Result<()> {
        crate::validation::validate_connection(
            &self.connection.url,
            &self.connection.user,
            &self.connection.password,
        )
    }

    /// Find a guest by console uuid.
    ///
    /// A malformed uuid is `Error::InvalidUuid`. A guest the cluster doesn't
    /// know, or a failing cluster, is `Error::VmNotFound`.
    pub async fn find_vm_by_uuid(&self, ctx: &AccessContext, uuid: &str) -> Result<Box<dyn RemoteVm>> {
        let parsed: VmUuid = uuid.parse()?;
        debug!(uuid, user = %ctx.user, "Looking up guest");

        let vm = match self.session.find_vm(&parsed).await {
            Ok(vm) => vm,
            Err(RemoteError::NotFound(_)) => return Err(Error::VmNotFound(uuid.to_string())),
            Err(RemoteError::Service(msg)) => {
                warn!(uuid, error = %msg, "Failed retrieving proxmox guest");
                return Err(Error::VmNotFound(uuid.to_string()));
            }
        };

        if vm.is_container() != parsed.compute_type.is_container() {
            return Err(Error::VmNotFound(uuid.to_string()));
        }

        Ok(vm)
    }

    /// Destroy a guest. A guest that is already gone counts as destroyed.
    pub async fn destroy_vm(&self, ctx: &AccessContext, uuid: &str) -> Result<bool> {
        let vm = match self.find_vm_by_uuid(ctx, uuid).await {
            Ok(vm) => vm,
            Err(Error::VmNotFound(_)) => {
                debug!(uuid, "Guest already absent");
                return Ok(true);
            }
            Err(e) => return Err(e),
        };

        match vm.destroy().await {
            Ok(()) | Err(RemoteError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        log_vm_operation!("destroy", uuid, user = ctx.user.as_str());
        Ok(true)
    }

    /// Save requested attributes on a guest.
    ///
    /// Only changed attributes are sent; the sent diff is returned.
    pub async fn save_vm(
        &self,
        ctx: &AccessContext,
        uuid: &str,
        attrs: &ComputeAttributes,
    ) -> Result<AttributeDiff> {
        let vm = self.find_vm_by_uuid(ctx, uuid).await?;

        let compute_type = if vm.is_container() {
            ComputeType::Lxc
        } else {
            ComputeType::Qemu
        };

        let mut requested = attrs.clone();
        requested.vmid = Some(vm.identity());

        let existing = vm.config().await?;
        let changed = diff::diff(&existing, compute_type, &requested);

        if changed.is_empty() {
            debug!(uuid, "Nothing to save");
            return Ok(changed);
        }

        vm.update(&changed).await?;
        log_vm_operation!("save", uuid, changed = changed.len());

        Ok(changed)
    }

    /// First host visible to `ctx` with a NIC matching any of the guest's MACs
    pub fn associated_host<'a>(
        &self,
        ctx: &AccessContext,
        vm: &dyn RemoteVm,
        hosts: &'a [HostRecord],
    ) -> Option<&'a HostRecord> {
        let macs = vm.macs();
        hosts
            .iter()
            .filter(|host| ctx.can_see(host))
            .find(|host| macs.iter().any(|mac| host.has_mac(mac)))
    }

    /// NIC attributes derived from the host's interfaces
    pub fn host_interfaces_attrs(&self, host: &HostRecord) -> Result<BTreeMap<String, InterfaceAttrs>> {
        map_interfaces(&host.interfaces)
    }

    /// Compute attributes for building the host's guest.
    ///
    /// Checks the OS family against a qemu `ostype`, defaults a container's
    /// hostname to the host name (written back to the host), and merges the
    /// host's interface addresses into the NIC attributes.
    pub fn host_compute_attrs(&self, host: &mut HostRecord) -> Result<ComputeAttributes> {
        compute_attrs::validate(host.os_family(), &host.compute_attributes)?;
        compute_attrs::fill_container_defaults(&host.name, &mut host.compute_attributes);

        let mapped = self.host_interfaces_attrs(host)?;

        let mut attrs = host.compute_attributes.clone();
        if attrs.node.is_empty() {
            attrs.node = self.defaults.node.clone();
        }
        compute_attrs::merge_interfaces(&mut attrs, &mapped, &self.defaults);

        Ok(attrs)
    }
}
