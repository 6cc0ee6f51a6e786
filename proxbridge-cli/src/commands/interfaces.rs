///! Interface mapping command

use crate::input;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use proxbridge_common::HostRecord;
use proxbridge_core::{map_interfaces, InterfaceAttrs};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct InterfaceRow {
    id: String,
    ip: String,
    ip6: String,
}

impl From<InterfaceAttrs> for InterfaceRow {
    fn from(attrs: InterfaceAttrs) -> Self {
        Self {
            id: attrs.id,
            ip: attrs.ip.unwrap_or_default(),
            ip6: attrs.ip6.unwrap_or_default(),
        }
    }
}

pub fn handle_interfaces_command(
    host_file: &Path,
    format: OutputFormat,
) -> Result<()> {
    let host: HostRecord = input::load(host_file)?;

    let attrs = map_interfaces(&host.interfaces)?;

    let rows: Vec<InterfaceRow> = attrs.into_values().map(InterfaceRow::from).collect();
    output::print_output(rows, format)?;

    Ok(())
}
