//! # Query Value Tree
//!
//! Every typed token, filter clause and predefined-query context is represented
//! by [`Value`]. Dates and regexes are opaque leaves: tree walks never descend
//! into them.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Insertion-ordered object map used throughout the query tree
pub type Map = IndexMap<String, Value>;

/// Largest integer an f64 represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A regex literal parsed from `/pattern/flags` syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexLiteral {
    pub pattern: String,
    pub case_insensitive: bool,
}

impl RegexLiteral {
    pub fn new(pattern: impl Into<String>, case_insensitive: bool) -> Self {
        Self {
            pattern: pattern.into(),
            case_insensitive,
        }
    }

    /// The `$options` string for this literal
    pub fn options(&self) -> &'static str {
        if self.case_insensitive {
            "i"
        } else {
            ""
        }
    }
}

/// A node of the query result tree
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Opaque leaf
    Date(DateTime<Utc>),
    /// Opaque leaf
    Regex(RegexLiteral),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Dates and regexes are never descended into
    pub fn is_opaque(&self) -> bool {
        matches!(self, Value::Date(_) | Value::Regex(_))
    }

    /// Whether this value counts as "absent" when a token is rebuilt from it
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Render the value back into raw token text.
    ///
    /// Arrays are joined with `,` so repeated query keys re-enter the
    /// comma-list typing path; objects render as compact JSON.
    pub fn to_token_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
            Value::Regex(r) => format!("/{}/{}", r.pattern, r.options()),
            Value::Array(items) => items
                .iter()
                .map(Value::to_token_string)
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }

    /// Convert into a plain `serde_json::Value`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Format a number the way it would be written in a query string
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$date", &d.to_rfc3339_opts(SecondsFormat::Millis, true))?;
                map.end()
            }
            Value::Regex(r) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("$regex", &r.pattern)?;
                map.serialize_entry("$options", r.options())?;
                map.end()
            }
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(map) => serializer.collect_map(map),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_integral_numbers_serialize_as_integers() {
        assert_eq!(Value::Number(18.0).to_json(), json!(18));
        assert_eq!(Value::Number(1.5).to_json(), json!(1.5));
    }

    #[test]
    fn test_opaque_leaves_serialize_as_extended_json() {
        let date = Value::Date(Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap());
        assert_eq!(date.to_json(), json!({"$date": "2020-01-02T03:04:05.000Z"}));

        let regex = Value::Regex(RegexLiteral::new("^jo", true));
        assert_eq!(regex.to_json(), json!({"$regex": "^jo", "$options": "i"}));
    }

    #[test]
    fn test_object_preserves_insertion_order() {
        let mut map = Map::new();
        map.insert("z".to_string(), Value::from(1i64));
        map.insert("a".to_string(), Value::from(2i64));
        let rendered = serde_json::to_string(&Value::Object(map)).unwrap();
        assert_eq!(rendered, r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn test_token_string() {
        let list = Value::Array(vec![Value::from("a"), Value::from(2i64), Value::Bool(true)]);
        assert_eq!(list.to_token_string(), "a,2,true");
        assert_eq!(Value::Number(0.25).to_token_string(), "0.25");
        assert_eq!(Value::Regex(RegexLiteral::new("x", false)).to_token_string(), "/x/");
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({"a": [1, "b", null]}));
        let expected: Map = [(
            "a".to_string(),
            Value::Array(vec![Value::Number(1.0), Value::from("b"), Value::Null]),
        )]
        .into_iter()
        .collect();
        assert_eq!(value, Value::Object(expected));
    }

    #[test]
    fn test_blank() {
        assert!(Value::from("").is_blank());
        assert!(Value::Null.is_blank());
        assert!(!Value::from("0").is_blank());
    }

    #[test]
    fn test_json_round_trip_keeps_key_order() {
        let value = Value::from(json!({"b": 1, "a": {"z": true, "c": null}}));
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(value.to_json().to_string(), r#"{"b":1,"a":{"z":true,"c":null}}"#);
    }
}
