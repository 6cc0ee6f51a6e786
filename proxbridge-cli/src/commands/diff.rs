///! Config diff command

use crate::input;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use proxbridge_common::{ComputeAttributes, ComputeType, VmConfig};
use proxbridge_core::diff;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct ChangeRow {
    attribute: String,
    current: String,
    requested: String,
}

pub fn handle_diff_command(
    existing_file: &Path,
    request_file: &Path,
    compute_type: Option<ComputeType>,
    format: OutputFormat,
) -> Result<()> {
    let existing: VmConfig = input::load(existing_file)?;
    let requested: ComputeAttributes = input::load(request_file)?;

    let compute_type = compute_type.unwrap_or(requested.compute_type);
    let changed = diff::diff(&existing, compute_type, &requested);

    match format {
        OutputFormat::Table => {
            if changed.is_empty() {
                output::print_success("Guest config is up to date");
                return Ok(());
            }

            let rows: Vec<ChangeRow> = changed
                .iter()
                .map(|(key, value)| ChangeRow {
                    attribute: key.to_string(),
                    current: existing.get(key).unwrap_or_default().to_string(),
                    requested: value.to_string(),
                })
                .collect();
            output::print_table(rows);
        }
        _ => output::print_single(&changed, format)?,
    }

    Ok(())
}
