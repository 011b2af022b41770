//! Output formatting: table, JSON, YAML.
//!
//! Renders data in the format selected by `--output`. Table mode prints a
//! short summary plus a `tabled` diff table, structured formats use serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use restsync_core::{ChangeRecord, DiffBackend, StructuralDiff, Value};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// A one-word status, green when in sync and yellow when changed.
pub fn status_word(changed: bool, color: bool) -> String {
    let word = if changed { "changed" } else { "ok" };
    match (color, changed) {
        (false, _) => word.to_owned(),
        (true, true) => word.yellow().bold().to_string(),
        (true, false) => word.green().bold().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering calls `detail_fn`, which returns a pre-formatted string.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string(data)?)
}

pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

// ── Diff table ───────────────────────────────────────────────────────

#[derive(Debug, Tabled)]
struct DiffRow {
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Before")]
    before: String,
    #[tabled(rename = "After")]
    after: String,
}

/// Render a change record as a table, one row per differing path.
///
/// Uses the record's own diff when it carries one, otherwise computes a
/// structural diff for display. Returns an empty string when nothing differs.
pub fn render_change_table(record: &ChangeRecord, color: bool) -> String {
    let diff = match record
        .diff
        .clone()
        .or_else(|| StructuralDiff.diff(&record.before, &record.after))
    {
        Some(d) => d,
        None => return String::new(),
    };

    let rows = diff_rows(&diff, color);
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

fn diff_rows(diff: &Value, color: bool) -> Vec<DiffRow> {
    let Some(categories) = diff.as_mapping() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for (category, entries) in categories {
        let Some(entries) = entries.as_mapping() else {
            continue;
        };
        let label = category.to_string();
        for (path, detail) in entries {
            let (before, after) = match label.as_str() {
                "values_changed" | "type_changes" => (
                    detail.get("old_value").map(cell).unwrap_or_default(),
                    detail.get("new_value").map(cell).unwrap_or_default(),
                ),
                "dictionary_item_removed" | "iterable_item_removed" => (cell(detail), String::new()),
                _ => (String::new(), cell(detail)),
            };
            rows.push(DiffRow {
                change: paint_change(&label, color),
                path: path.to_string(),
                before,
                after,
            });
        }
    }
    rows
}

fn cell(value: &Value) -> String {
    value.canonical().into_owned()
}

fn paint_change(category: &str, color: bool) -> String {
    let short = match category {
        "values_changed" => "changed",
        "type_changes" => "type",
        "dictionary_item_added" | "iterable_item_added" => "added",
        "dictionary_item_removed" | "iterable_item_removed" => "removed",
        other => other,
    };
    if !color {
        return short.to_owned();
    }
    match short {
        "added" => short.green().to_string(),
        "removed" => short.red().to_string(),
        _ => short.yellow().to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(before: serde_json::Value, after: serde_json::Value) -> ChangeRecord {
        ChangeRecord::new(Value::from(before), Value::from(after))
    }

    #[test]
    fn identical_record_renders_nothing() {
        let r = record(json!({"a": "1"}), json!({"a": "1"}));
        assert!(render_change_table(&r, false).is_empty());
    }

    #[test]
    fn table_lists_each_path() {
        let r = record(
            json!({"config": {"port": "123", "old": "x"}}),
            json!({"config": {"port": "124", "new": "y"}}),
        );
        let table = render_change_table(&r, false);
        assert!(table.contains("root['config']['port']"), "{table}");
        assert!(table.contains("root['config']['old']"), "{table}");
        assert!(table.contains("root['config']['new']"), "{table}");
        assert!(table.contains("changed"));
        assert!(table.contains("removed"));
        assert!(table.contains("added"));
    }

    #[test]
    fn precomputed_diff_is_used() {
        let mut r = record(json!({"a": "1"}), json!({"a": "2"}));
        r.diff = Some(Value::from(json!({
            "values_changed": {"root['z']": {"new_value": "9", "old_value": "8"}}
        })));
        let table = render_change_table(&r, false);
        assert!(table.contains("root['z']"));
        assert!(!table.contains("root['a']"));
    }

    #[test]
    fn structured_formats_serialize() {
        let data = json!({"changed": false});
        assert_eq!(
            render_single(OutputFormat::JsonCompact, &data, |_| String::new()).unwrap(),
            r#"{"changed":false}"#
        );
        assert_eq!(
            render_single(OutputFormat::Yaml, &data, |_| String::new()).unwrap(),
            "changed: false\n"
        );
        assert_eq!(
            render_single(OutputFormat::Table, &data, |_| "detail".into()).unwrap(),
            "detail"
        );
    }

    #[test]
    fn status_word_without_color() {
        assert_eq!(status_word(true, false), "changed");
        assert_eq!(status_word(false, false), "ok");
    }
}
