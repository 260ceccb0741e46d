//! Lenient lookups into untyped JSON trees.
//!
//! A missing key, a non-object intermediate or an explicit `null` all read as
//! `None`, so callers never have to care about the shape of partial responses.

use serde_json::Value;

/// Walk `path` through nested objects. `null` at the end counts as absent.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

pub fn lookup_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path).and_then(Value::as_str)
}

pub fn lookup_u64(value: &Value, path: &[&str]) -> Option<u64> {
    lookup(value, path).and_then(Value::as_u64)
}

/// Array at `path`, or an empty slice when missing or not an array.
pub fn lookup_array<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    lookup(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
