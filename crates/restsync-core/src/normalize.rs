// ── Literal normalization ──
//
// Devices answer with numbers and booleans in whatever representation
// their YANG backend happens to pick. Both sides of a comparison are pushed
// through the same passes so `"10"` and `10`, or `"True"` and `true`, meet
// as the same literal.

use crate::value::{Mapping, Value};

/// Replace every number leaf with its canonical string.
///
/// Booleans are left alone. A bare scalar at the top level is returned as-is.
pub fn numbers_to_strings(tree: &Value) -> Value {
    map_leaves(tree, &|leaf| match leaf {
        Value::Number(n) => Value::String(n.to_string()),
        other => other.clone(),
    })
}

/// Replace every string leaf spelled `true` or `false` (any case) with a
/// boolean. Mapping keys are never touched.
pub fn strings_to_bools(tree: &Value) -> Value {
    map_leaves(tree, &|leaf| match leaf {
        Value::String(s) => parse_bool(s).map_or_else(|| leaf.clone(), Value::Bool),
        other => other.clone(),
    })
}

/// Numbers first, then booleans.
///
/// `1` becomes `"1"` and stays a string; only literal spellings of
/// `true`/`false` turn into booleans.
pub fn normalize(tree: &Value) -> Value {
    strings_to_bools(&numbers_to_strings(tree))
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Rebuild a container tree, rewriting scalar leaves with `leaf`.
fn map_leaves(tree: &Value, leaf: &impl Fn(&Value) -> Value) -> Value {
    match tree {
        Value::Mapping(_) | Value::List(_) => rebuild(tree, leaf),
        scalar => scalar.clone(),
    }
}

fn rebuild(node: &Value, leaf: &impl Fn(&Value) -> Value) -> Value {
    match node {
        Value::Mapping(map) => Value::Mapping(
            map.iter()
                .map(|(k, v)| (k.clone(), rebuild(v, leaf)))
                .collect::<Mapping>(),
        ),
        Value::List(items) => Value::List(items.iter().map(|v| rebuild(v, leaf)).collect()),
        scalar => leaf(scalar),
    }
}
