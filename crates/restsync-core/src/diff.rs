// ── Change records and diff annotation ──
//
// A `ChangeRecord` is the before/after pair a reconciliation produces.
// Attaching a readable diff is best-effort: the backend is picked once from
// configuration and any failure to produce a diff leaves the record as-is.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::value::{Key, Mapping, Value};

// ── Capability ─────────────────────────────────────────────────────

/// Something that can describe the difference between two trees.
///
/// Returning `None` means "no diff available"; it never fails the caller.
pub trait DiffBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn diff(&self, before: &Value, after: &Value) -> Option<Value>;
}

/// The no-op backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiff;

impl DiffBackend for NoDiff {
    fn name(&self) -> &'static str {
        "none"
    }

    fn diff(&self, _before: &Value, _after: &Value) -> Option<Value> {
        None
    }
}

/// Which diff backend to run, as named in configuration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DiffMode {
    None,
    #[default]
    Structural,
}

impl DiffMode {
    pub fn backend(self) -> Box<dyn DiffBackend> {
        match self {
            Self::None => Box::new(NoDiff),
            Self::Structural => Box::new(StructuralDiff),
        }
    }
}

// ── Change record ──────────────────────────────────────────────────

/// Before/after snapshot of one resource change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub before: Value,
    pub after: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Value>,
}

impl Default for ChangeRecord {
    fn default() -> Self {
        Self::new(Value::empty_mapping(), Value::empty_mapping())
    }
}

impl ChangeRecord {
    pub fn new(before: Value, after: Value) -> Self {
        Self {
            before,
            after,
            diff: None,
        }
    }

    /// Attach a diff of `before` → `after` if the backend yields a non-empty one.
    pub fn annotate(&mut self, backend: &dyn DiffBackend) {
        match backend.diff(&self.before, &self.after) {
            Some(diff) if !diff.is_blank() => self.diff = Some(diff),
            _ => debug!(backend = backend.name(), "no diff attached to change record"),
        }
    }
}

// ── Structural diff ────────────────────────────────────────────────

/// Built-in differ. Lists are compared without regard to order.
///
/// Output groups changes by category, keyed by paths such as
/// `root['servers'][0]['port']`:
///
/// - `values_changed`: `{new_value, old_value}`
/// - `type_changes`: `{old_type, new_type, old_value, new_value}`
/// - `dictionary_item_added` / `dictionary_item_removed`: the value
/// - `iterable_item_added` / `iterable_item_removed`: the value
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralDiff;

impl DiffBackend for StructuralDiff {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn diff(&self, before: &Value, after: &Value) -> Option<Value> {
        let mut report = DiffReport::default();
        report.walk("root", before, after);
        report.into_value()
    }
}

#[derive(Default)]
struct DiffReport {
    values_changed: Mapping,
    type_changes: Mapping,
    dictionary_item_added: Mapping,
    dictionary_item_removed: Mapping,
    iterable_item_added: Mapping,
    iterable_item_removed: Mapping,
}

impl DiffReport {
    fn walk(&mut self, path: &str, old: &Value, new: &Value) {
        if old == new {
            return;
        }
        match (old, new) {
            (Value::Mapping(o), Value::Mapping(n)) => self.walk_mapping(path, o, n),
            (Value::List(o), Value::List(n)) => self.walk_list(path, o, n),
            _ if old.kind_name() == new.kind_name() => {
                self.values_changed.insert(
                    Key::from(path),
                    entry([("new_value", new.clone()), ("old_value", old.clone())]),
                );
            }
            _ => {
                self.type_changes.insert(
                    Key::from(path),
                    entry([
                        ("old_type", Value::from(old.kind_name())),
                        ("new_type", Value::from(new.kind_name())),
                        ("old_value", old.clone()),
                        ("new_value", new.clone()),
                    ]),
                );
            }
        }
    }

    fn walk_mapping(&mut self, path: &str, old: &Mapping, new: &Mapping) {
        for (key, value) in old {
            let child = key_path(path, key);
            match new.get(key) {
                Some(other) => self.walk(&child, value, other),
                None => {
                    self.dictionary_item_removed
                        .insert(Key::from(child), value.clone());
                }
            }
        }
        for (key, value) in new {
            if !old.contains_key(key) {
                self.dictionary_item_added
                    .insert(Key::from(key_path(path, key)), value.clone());
            }
        }
    }

    /// Exact matches pair up first, in any order. Leftover mappings pair
    /// in sequence and are diffed field by field; everything else left
    /// over is reported as removed or added.
    fn walk_list(&mut self, path: &str, old: &[Value], new: &[Value]) {
        let mut taken = vec![false; new.len()];
        let mut unmatched_old = Vec::new();

        for (i, item) in old.iter().enumerate() {
            let hit = new
                .iter()
                .enumerate()
                .position(|(j, candidate)| !taken[j] && candidate == item);
            match hit {
                Some(j) => taken[j] = true,
                None => unmatched_old.push(i),
            }
        }
        let mut unmatched_new: Vec<usize> = (0..new.len()).filter(|&j| !taken[j]).collect();

        for i in unmatched_old {
            let partner = unmatched_new
                .iter()
                .position(|&j| old[i].is_mapping() && new[j].is_mapping());
            match partner {
                Some(slot) => {
                    let j = unmatched_new.remove(slot);
                    self.walk(&index_path(path, i), &old[i], &new[j]);
                }
                None => {
                    self.iterable_item_removed
                        .insert(Key::from(index_path(path, i)), old[i].clone());
                }
            }
        }
        for j in unmatched_new {
            self.iterable_item_added
                .insert(Key::from(index_path(path, j)), new[j].clone());
        }
    }

    fn into_value(self) -> Option<Value> {
        let categories = [
            ("values_changed", self.values_changed),
            ("type_changes", self.type_changes),
            ("dictionary_item_added", self.dictionary_item_added),
            ("dictionary_item_removed", self.dictionary_item_removed),
            ("iterable_item_added", self.iterable_item_added),
            ("iterable_item_removed", self.iterable_item_removed),
        ];
        let out: Mapping = categories
            .into_iter()
            .filter(|(_, changes)| !changes.is_empty())
            .map(|(name, changes)| (Key::from(name), Value::Mapping(changes)))
            .collect();
        (!out.is_empty()).then_some(Value::Mapping(out))
    }
}

fn entry<const N: usize>(fields: [(&str, Value); N]) -> Value {
    Value::Mapping(
        fields
            .into_iter()
            .map(|(k, v)| (Key::from(k), v))
            .collect(),
    )
}

fn key_path(parent: &str, key: &Key) -> String {
    match key {
        Key::Int(i) => format!("{parent}[{i}]"),
        Key::Str(s) if s.contains('\'') => format!("{parent}[\"{s}\"]"),
        Key::Str(s) => format!("{parent}['{s}']"),
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}
