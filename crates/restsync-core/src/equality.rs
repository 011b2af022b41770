// ── Semantic equality ──
//
// Decides whether a live tree and a desired tree describe the same
// configuration. Leaves compare by canonical rendering, so `1`, `"1"` and
// a normalized boolean all meet on the same footing. Lists compare without
// regard to order.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::prune::{prune_keys, prune_keys_in_place};
use crate::value::{Mapping, Number, Value};

/// Compare two trees, ignoring every key named in `excluded`.
///
/// Neither argument is modified; when keys are excluded both sides are
/// pruned on private copies. Only mapping pairs can be equal unless the
/// two values are already identical. Never panics: any mismatch in shape
/// is simply `false`.
pub fn trees_equal<K: AsRef<str>>(current: &Value, desired: &Value, excluded: &[K]) -> bool {
    if excluded.is_empty() {
        return values_equal(current, desired);
    }
    let current = prune_keys(current.clone(), excluded);
    let desired = prune_keys(desired.clone(), excluded);
    values_equal(&current, &desired)
}

/// Like [`trees_equal`], but prunes `excluded` out of `current` in place.
///
/// `desired` is still compared through a private copy. Use this when the
/// caller wants the pruned live tree back, e.g. to report it as `before`.
pub fn trees_equal_in_place<K: AsRef<str>>(
    current: &mut Value,
    desired: &Value,
    excluded: &[K],
) -> bool {
    prune_keys_in_place(current, excluded);
    let desired = if excluded.is_empty() {
        Cow::Borrowed(desired)
    } else {
        Cow::Owned(prune_keys(desired.clone(), excluded))
    };
    values_equal(current, &desired)
}

// ── Recursive comparison ───────────────────────────────────────────

fn values_equal(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }
    match (left, right) {
        (Value::Mapping(l), Value::Mapping(r)) => mappings_equal(l, r),
        _ => false,
    }
}

fn mappings_equal(left: &Mapping, right: &Mapping) -> bool {
    if left.len() != right.len() {
        return false;
    }
    if left.is_empty() {
        return true;
    }
    if !left.keys().all(|k| right.contains_key(k)) {
        return false;
    }
    left.iter()
        .all(|(key, l)| right.get(key).is_some_and(|r| entries_equal(l, r)))
}

/// Compare the two values stored under one key.
fn entries_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Mapping(_), _) | (_, Value::Mapping(_)) => values_equal(left, right),
        (Value::List(l), Value::List(r)) => lists_equal(l, r),
        (Value::List(_), _) | (_, Value::List(_)) => false,
        _ => left.canonical() == right.canonical(),
    }
}

// ── Lists ──────────────────────────────────────────────────────────

/// Order-insensitive list comparison.
///
/// Both sides are sorted into a deterministic order and walked in step.
/// Containers pair positionally; scalars only have to appear somewhere
/// among the other side's scalars (see [`scalar_in_pool`]).
fn lists_equal(left: &[Value], right: &[Value]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let left = sorted(left);
    let right = sorted(right);
    let pool: Vec<Cow<'_, str>> = right
        .iter()
        .filter(|v| v.is_scalar())
        .map(|v| v.canonical())
        .collect();

    left.iter().zip(&right).all(|(l, r)| match (l, r) {
        (Value::Mapping(_), _) => values_equal(l, r),
        (Value::List(li), Value::List(ri)) => lists_equal(li, ri),
        (Value::List(_), _) => false,
        (scalar, _) => scalar_in_pool(scalar, &pool),
    })
}

/// Membership test against every scalar rendering on the opposing side.
///
/// This is deliberately not a multiset comparison: `["a", "a"]` matches
/// `["a", "b"]`. Lengths are checked by the caller.
fn scalar_in_pool(scalar: &Value, pool: &[Cow<'_, str>]) -> bool {
    let rendered = scalar.canonical();
    pool.iter().any(|p| *p == rendered)
}

fn sorted(items: &[Value]) -> Vec<&Value> {
    let mut out: Vec<&Value> = items.iter().collect();
    out.sort_by(|a, b| list_order(a, b));
    out
}

/// Sort rank: numbers, then strings, then lists, then mappings, then the rest.
fn rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::List(_) => 2,
        Value::Mapping(_) => 3,
        Value::Null | Value::Bool(_) => 4,
    }
}

fn list_order(a: &Value, b: &Value) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (Value::Number(x), Value::Number(y)) => numeric(x).total_cmp(&numeric(y)),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.canonical().cmp(&b.canonical()),
    })
}

fn numeric(n: &Number) -> f64 {
    n.as_f64().unwrap_or_default()
}
