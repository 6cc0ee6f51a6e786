//! Config attribute diffing
//!
//! Computes the update payload sent to Proxmox when a guest is saved: only
//! known attributes with a non-empty value that differs from the current
//! config. Unrelated remote state is never overwritten.

use crate::config_parser::{parser_for, ConfigParser, CONSOLE_KEYS};
use proxbridge_common::{AttributeDiff, ComputeAttributes, ComputeType, VmConfig};
use tracing::debug;

/// Diff requested attributes against an existing guest config
pub fn diff(existing: &VmConfig, compute_type: ComputeType, requested: &ComputeAttributes) -> AttributeDiff {
    diff_with(parser_for(compute_type), existing, requested)
}

/// Diff using an explicit parser
pub fn diff_with(
    parser: &dyn ConfigParser,
    existing: &VmConfig,
    requested: &ComputeAttributes,
) -> AttributeDiff {
    let mut changed = AttributeDiff::new();

    for (key, value) in parser.parse(requested) {
        if value.is_empty() || CONSOLE_KEYS.contains(&key.as_str()) {
            continue;
        }

        if !parser.is_known_key(&key) && !existing.contains_key(&key) {
            debug!(key = %key, "Skipping unknown config attribute");
            continue;
        }

        if existing.get(&key) == Some(value.as_str()) {
            continue;
        }

        changed.insert(key, value);
    }

    changed
}
