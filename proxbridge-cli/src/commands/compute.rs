///! Compute attributes command

use crate::input;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use proxbridge_common::HostRecord;
use proxbridge_core::config::ProxbridgeConfig;
use proxbridge_core::{ComputeResource, InMemorySession};
use std::path::Path;
use std::sync::Arc;

pub fn handle_compute_attrs_command(
    host_file: &Path,
    config: &ProxbridgeConfig,
    format: OutputFormat,
) -> Result<()> {
    let mut host: HostRecord = input::load(host_file)?;
    let hostname_before = host.compute_attributes.config("hostname").map(str::to_string);

    // Building attributes never reaches the cluster
    let cr = ComputeResource::new(config.connection.clone(), Arc::new(InMemorySession::new()))
        .with_defaults(config.defaults.clone());
    let attrs = cr.host_compute_attrs(&mut host)?;

    if format == OutputFormat::Table && hostname_before.is_none() && attrs.compute_type.is_container() {
        output::print_info(&format!("Container hostname defaults to {}", host.name));
    }

    output::print_single(&attrs, format)
}
