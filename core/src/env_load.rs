//! Environment-variable decoding.
//!
//! Backend configuration can be injected through dotted-prefixed process
//! variables (e.g. `DOCKER.REGISTRY.URL`). Values that look like JSON
//! literals are decoded; everything else passes through as a plain string.
//! Dotted keys fold into nested structures.

use serde_json::{Map, Value};

use crate::error::Result;

/// Whether a raw value should be decoded as JSON.
///
/// True for values starting with `"`, `[` or `{`, and for exact
/// null/true/false or number literals. Numbers with a leading zero
/// (`"0123123"`) are not literals and pass through as strings.
pub fn looks_like_json(value: &str) -> bool {
    if matches!(value.as_bytes().first(), Some(b'"' | b'[' | b'{')) {
        return true;
    }
    matches!(value, "null" | "true" | "false") || is_json_number(value)
}

fn is_json_number(value: &str) -> bool {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };
    let mut bytes = int_part.bytes();
    if !matches!(bytes.next(), Some(b'1'..=b'9')) {
        return false;
    }
    if !bytes.all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        None => true,
        Some(frac) => !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()),
    }
}

/// Fold dotted keys into nested JSON objects.
///
/// `{"foo.bar": v}` becomes `{"foo": {"bar": v}}`. A non-object value at an
/// intermediate key is replaced by an object.
pub fn nest_dict(flat: impl IntoIterator<Item = (String, Value)>) -> Map<String, Value> {
    let mut nested = Map::new();
    for (key, value) in flat {
        insert_nested(&mut nested, &key, value);
    }
    nested
}

fn insert_nested(map: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            map.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_nested(child, rest, value);
            }
        }
    }
}

/// Decode prefixed variables into a nested structure.
///
/// Keys keep only the part after `prefix`, lowercased, and nest on `.`.
/// With `decode_json`, values classified by [`looks_like_json`] are decoded;
/// an unparseable classified value is a serialization error.
pub fn decode_vars(
    vars: impl IntoIterator<Item = (String, String)>,
    prefix: &str,
    decode_json: bool,
) -> Result<Map<String, Value>> {
    let mut flat = Vec::new();
    for (key, value) in vars {
        let Some(stripped) = key.strip_prefix(prefix) else {
            continue;
        };
        let decoded = if decode_json && looks_like_json(&value) {
            serde_json::from_str(&value)?
        } else {
            Value::String(value)
        };
        flat.push((stripped.to_lowercase(), decoded));
    }
    tracing::debug!(prefix, vars = flat.len(), "decoded prefixed variables");
    Ok(nest_dict(flat))
}

/// Decode prefixed process environment variables into a nested structure.
pub fn load_from_env(prefix: &str, decode_json: bool) -> Result<Map<String, Value>> {
    decode_vars(std::env::vars(), prefix, decode_json)
}
