//! Shared helpers for command handlers.

use std::path::Path;

use restsync_core::Value;

use crate::cli::PayloadArgs;
use crate::error::CliError;

/// Read a config tree from a JSON or YAML file.
///
/// `.json` files go through serde_json; anything else is parsed as YAML,
/// which also accepts plain JSON.
pub fn read_tree_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&contents)?)
    } else {
        Ok(serde_yaml::from_str(&contents)?)
    }
}

/// Resolve the desired config from `--config-file` or `--config`.
pub fn read_payload(args: &PayloadArgs) -> Result<Option<Value>, CliError> {
    if let Some(ref path) = args.config_file {
        return read_tree_file(path).map(Some);
    }
    match args.config {
        Some(ref inline) => serde_json::from_str(inline)
            .map(Some)
            .map_err(|e| CliError::Validation {
                field: "config".into(),
                reason: format!("invalid JSON: {e}"),
            }),
        None => Ok(None),
    }
}
