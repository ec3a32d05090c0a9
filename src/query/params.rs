//! # Request Parameters
//!
//! The flat, order-preserving key/value input of the parser, and the decoder
//! that produces it from a raw URL query string.
//!
//! Decoding rules:
//! - `+` and percent escapes are decoded
//! - a key without `=` maps to the empty string
//! - repeated keys accumulate into an array
//! - `a[b]=1` builds a nested object, `a[]=1` appends to an array
//! - a plain value and a bracketed one under the same key are both kept

use crate::value::{Map, Value};

/// Bracket segments followed before the rest of a key is kept literally
pub const MAX_BRACKET_DEPTH: usize = 5;

/// Ordered request parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Map,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a URL query string; a leading `?` is ignored
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Params::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key.is_empty() {
                continue;
            }
            let (root, path) = split_brackets(&key);
            let slot = params.entries.entry(root).or_insert(Value::Null);
            assign(slot, &path, Value::String(value.into_owned()));
        }

        params
    }

    /// Set `key`, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Add a value for `key`; repeated keys accumulate into an array
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let slot = self.entries.entry(key.into()).or_insert(Value::Null);
        merge_leaf(slot, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in the order they were received
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_map(self) -> Map {
        self.entries
    }
}

impl From<Map> for Params {
    fn from(entries: Map) -> Self {
        Self { entries }
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

/// Split `a[b][]` into `("a", ["b", ""])`.
///
/// Keys with unbalanced brackets, or a bracket at position zero, are kept
/// whole.
fn split_brackets(key: &str) -> (String, Vec<String>) {
    let Some(open) = key.find('[').filter(|&i| i > 0) else {
        return (key.to_string(), Vec::new());
    };

    let root = &key[..open];
    let mut rest = &key[open..];
    let mut path = Vec::new();

    while path.len() < MAX_BRACKET_DEPTH {
        let Some(inner) = rest.strip_prefix('[') else {
            break;
        };
        let Some(close) = inner.find(']') else {
            return (key.to_string(), Vec::new());
        };
        path.push(inner[..close].to_string());
        rest = &inner[close + 1..];
    }

    if !rest.is_empty() {
        if path.len() < MAX_BRACKET_DEPTH {
            // trailing text after the last bracket
            return (key.to_string(), Vec::new());
        }
        path.push(rest.to_string());
    }

    (root.to_string(), path)
}

fn assign(slot: &mut Value, path: &[String], value: Value) {
    let Some((segment, rest)) = path.split_first() else {
        merge_leaf(slot, value);
        return;
    };

    if segment.is_empty() {
        if !matches!(slot, Value::Array(_)) {
            *slot = match std::mem::replace(slot, Value::Null) {
                Value::Null => Value::Array(Vec::new()),
                existing => Value::Array(vec![existing]),
            };
        }
        if let Value::Array(items) = slot {
            if rest.is_empty() {
                items.push(value);
            } else {
                items.push(Value::Null);
                if let Some(last) = items.last_mut() {
                    assign(last, rest, value);
                }
            }
        }
        return;
    }

    if let Some(map) = object_slot(slot) {
        let child = map.entry(segment.clone()).or_insert(Value::Null);
        assign(child, rest, value);
    }
}

/// The object a keyed bracket segment writes into.
///
/// A scalar already in the slot is kept: the slot becomes an array holding
/// it followed by the new object. An array slot writes into its trailing
/// object, appending one when needed.
fn object_slot(slot: &mut Value) -> Option<&mut Map> {
    match slot {
        Value::Null => *slot = Value::Object(Map::new()),
        Value::Object(_) => {}
        Value::Array(items) => {
            if !matches!(items.last(), Some(Value::Object(_))) {
                items.push(Value::Object(Map::new()));
            }
        }
        _ => {
            let existing = std::mem::replace(slot, Value::Null);
            *slot = Value::Array(vec![existing, Value::Object(Map::new())]);
        }
    }

    match slot {
        Value::Object(map) => Some(map),
        Value::Array(items) => match items.last_mut() {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

fn merge_leaf(slot: &mut Value, value: Value) {
    match slot {
        Value::Null => *slot = value,
        Value::Array(items) => items.push(value),
        _ => {
            let existing = std::mem::replace(slot, Value::Null);
            *slot = Value::Array(vec![existing, value]);
        }
    }
}
