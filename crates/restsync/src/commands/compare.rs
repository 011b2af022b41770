//! `compare`: run the comparison pipeline on two files, no device needed.
//!
//! The live file gets the same treatment a GET response does (parallel
//! `state` branches pruned, literals normalized); the desired file is
//! normalized only.

use serde::Serialize;

use restsync_core::{
    ChangeRecord, DiffBackend, Value, normalize, prune_keys, prune_parallel_state, trees_equal,
};

use crate::cli::{CompareArgs, GlobalOpts};
use crate::commands::util;
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub equal: bool,
    pub keys_ignore: Vec<String>,
    /// Before/after with ignored keys removed; absent when equal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<ChangeRecord>,
}

/// Compare two trees the way `apply` would, without touching a device.
pub fn compare_trees(
    current: Value,
    desired: &Value,
    keys_ignore: &[String],
    keep_state: bool,
    backend: &dyn DiffBackend,
) -> CompareReport {
    let current = if keep_state {
        normalize(&current)
    } else {
        normalize(&prune_parallel_state(current))
    };
    let desired = normalize(desired);

    let equal = trees_equal(&current, &desired, keys_ignore);
    let changes = (!equal).then(|| {
        let mut record = ChangeRecord::new(
            prune_keys(current, keys_ignore),
            prune_keys(desired, keys_ignore),
        );
        record.annotate(backend);
        record
    });

    CompareReport {
        equal,
        keys_ignore: keys_ignore.to_vec(),
        changes,
    }
}

pub fn handle(args: CompareArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let current = util::read_tree_file(&args.current)?;
    let desired = util::read_tree_file(&args.desired)?;
    let backend = config::load_config_or_default().defaults.diff.backend();

    let report = compare_trees(
        current,
        &desired,
        &args.keys_ignore,
        args.keep_state,
        backend.as_ref(),
    );

    let color = output::should_color(global.color);
    let out = output::render_single(global.output, &report, |r| {
        let mut text = if r.equal {
            "equal".to_owned()
        } else {
            "differs".to_owned()
        };
        if let Some(ref record) = r.changes {
            let table = output::render_change_table(record, color);
            if !table.is_empty() {
                text.push('\n');
                text.push_str(&table);
            }
        }
        text
    })?;
    output::print_output(&out, global.quiet);

    if args.exit_code && !report.equal {
        return Err(CliError::Drift);
    }
    Ok(())
}
