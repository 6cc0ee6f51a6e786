//! Proxbridge core library
//!
//! Maps console host records onto Proxmox VE guests: interface identifier
//! mapping, OS/ostype consistency, type-specific config parsing and config
//! diffing, plus a compute resource adapter over a remote session.

// Core modules
pub mod config;
pub mod logging;
pub mod validation;

// Host to guest attribute mapping
pub mod compute_attrs;
pub mod interfaces;
pub mod ostype;

// Guest configs
pub mod config_parser;
pub mod diff;

// Cluster access
pub mod compute_resource;
pub mod remote;
pub mod vm_uuid;

pub use compute_resource::{AccessContext, ComputeResource};
pub use config::ProxbridgeConfig;
pub use interfaces::{map_interfaces, InterfaceAttrs};
pub use remote::{InMemorySession, RemoteError, RemoteSession, RemoteVm};
pub use vm_uuid::VmUuid;
