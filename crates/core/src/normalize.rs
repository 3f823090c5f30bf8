//! Wire-to-domain key normalization
//!
//! The remote speaks `snake_case` and `kebab-case`; the domain model speaks
//! `camelCase`. Normalization rewrites every mapping key and leaves arrays and
//! scalars untouched.
//!
//! Key rule: a run of separators (`_` or `-`) followed by a character becomes
//! that character upper-cased. Separators with nothing after them are kept.
//! Because the output never contains a separator followed by another
//! character, normalizing twice is the same as normalizing once.
//!
//! When two wire keys collapse onto one domain key, the later one wins.

use serde_json::{Map, Value};
use workbase_domain::ResponsePayload;

/// Rewrite one key from wire convention to domain convention.
pub fn camel_case_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut pending_separators = String::new();

    for ch in key.chars() {
        if is_separator(ch) {
            pending_separators.push(ch);
        } else if pending_separators.is_empty() {
            out.push(ch);
        } else {
            pending_separators.clear();
            out.extend(ch.to_uppercase());
        }
    }

    out.push_str(&pending_separators);
    out
}

const fn is_separator(ch: char) -> bool {
    matches!(ch, '_' | '-')
}

/// Recursively rewrite every mapping key in `value`.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut normalized = Map::with_capacity(map.len());
            for (key, inner) in map {
                normalized.insert(camel_case_key(&key), normalize_keys(inner));
            }
            Value::Object(normalized)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        scalar => scalar,
    }
}

/// Normalizer applied to every successful response body
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Normalize structured payloads; text and binary pass through.
    pub fn normalize(self, payload: ResponsePayload) -> ResponsePayload {
        match payload {
            ResponsePayload::Json(value) => ResponsePayload::Json(normalize_keys(value)),
            other => other,
        }
    }
}
