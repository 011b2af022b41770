// ── Tree pruning passes ──
//
// Both passes take an owned tree and hand it back, editing in place.
// Callers that still need the original pass a clone.

use crate::value::{Key, Mapping, Value};

// ── Key pruning ────────────────────────────────────────────────────

/// Remove every mapping entry whose key name is in `keys`, at any depth.
///
/// Matching is by exact name; integer keys never match. Inside lists only
/// mapping elements are visited.
pub fn prune_keys<K: AsRef<str>>(mut tree: Value, keys: &[K]) -> Value {
    prune_keys_in_place(&mut tree, keys);
    tree
}

/// In-place form of [`prune_keys`].
pub fn prune_keys_in_place<K: AsRef<str>>(tree: &mut Value, keys: &[K]) {
    if keys.is_empty() {
        return;
    }
    visit_mappings(tree, &mut |map| {
        map.retain(|key, _| !key_listed(key, keys));
    });
}

fn key_listed<K: AsRef<str>>(key: &Key, keys: &[K]) -> bool {
    key.as_str()
        .is_some_and(|name| keys.iter().any(|k| k.as_ref() == name))
}

// ── Parallel-state pruning ─────────────────────────────────────────

/// Drop read-only `state` branches that have a writable `config` sibling.
///
/// `<prefix>:state` pairs with any key ending in `<prefix>:config`, and a
/// bare `state` likewise pairs with any key ending in `state:config`. A bare
/// `config` sibling retires every state key. A state branch with no partner is kept, and still visited.
pub fn prune_parallel_state(mut tree: Value) -> Value {
    prune_parallel_state_in_place(&mut tree);
    tree
}

/// In-place form of [`prune_parallel_state`].
pub fn prune_parallel_state_in_place(tree: &mut Value) {
    visit_mappings(tree, &mut |map| {
        let doomed: Vec<Key> = map
            .keys()
            .filter(|key| key.as_str().is_some_and(|name| has_config_sibling(map, name)))
            .cloned()
            .collect();
        for key in &doomed {
            map.shift_remove(key);
        }
    });
}

/// The name a state key is paired under: `p` for `p:state`, and `state`
/// itself for the bare key.
fn state_base(name: &str) -> Option<&str> {
    if name == "state" {
        Some(name)
    } else {
        name.strip_suffix(":state")
    }
}

fn has_config_sibling(map: &Mapping, name: &str) -> bool {
    let Some(base) = state_base(name) else {
        return false;
    };
    let partner = format!("{base}:config");
    map.keys()
        .filter_map(Key::as_str)
        .any(|k| k == "config" || k.ends_with(&partner))
}

// ── Traversal ──────────────────────────────────────────────────────

/// Apply `edit` to every mapping, parent before children.
///
/// Mapping values are descended whether they are mappings or lists; list
/// elements are descended only when they are mappings.
fn visit_mappings(tree: &mut Value, edit: &mut impl FnMut(&mut Mapping)) {
    match tree {
        Value::Mapping(map) => visit_node(map, edit),
        Value::List(items) => visit_list(items, edit),
        _ => {}
    }
}

fn visit_node(map: &mut Mapping, edit: &mut impl FnMut(&mut Mapping)) {
    edit(map);
    for value in map.values_mut() {
        match value {
            Value::Mapping(child) => visit_node(child, edit),
            Value::List(items) => visit_list(items, edit),
            _ => {}
        }
    }
}

fn visit_list(items: &mut [Value], edit: &mut impl FnMut(&mut Mapping)) {
    for item in items {
        if let Value::Mapping(child) = item {
            visit_node(child, edit);
        }
    }
}
