//! # Relation Expansion
//!
//! Turns dotted relation paths into nested populate descriptors.
//!
//! ```text
//! author.company:name:url$country-NL
//! ```
//!
//! becomes `author` → `company`, where the terminal `company` segment selects
//! `name url` and matches `country == "NL"`. A match spec uses `~` for a
//! case-insensitive regex and `-` for an exact value; `~` is checked first.

use serde::Serialize;

use crate::value::{Map, Value};

/// One link of a populate chain
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PopulateDescriptor {
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,

    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub matches: Option<Map>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub populate: Option<Box<PopulateDescriptor>>,
}

impl PopulateDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Wrap `inner` under a parent segment
    pub fn nested(path: impl Into<String>, inner: PopulateDescriptor) -> Self {
        Self {
            path: path.into(),
            populate: Some(Box::new(inner)),
            ..Default::default()
        }
    }

    /// Depth of the chain, counting this link
    pub fn depth(&self) -> usize {
        1 + self.populate.as_ref().map_or(0, |inner| inner.depth())
    }

    /// Rebuild a descriptor from its serialized object form
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let path = map.get("path")?.as_str()?.to_string();
        let select = map.get("select").and_then(Value::as_str).map(str::to_string);
        let matches = map.get("match").and_then(Value::as_object).cloned();
        let populate = match map.get("populate") {
            Some(inner) => Some(Box::new(Self::from_value(inner)?)),
            None => None,
        };
        Some(Self {
            path,
            select,
            matches,
            populate,
        })
    }
}

/// Parse a comma-separated list of dotted populate paths
pub fn cast_populate(raw: &str) -> Vec<PopulateDescriptor> {
    raw.split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .filter_map(parse_path)
        .collect()
}

fn parse_path(path: &str) -> Option<PopulateDescriptor> {
    let segments: Vec<&str> = path.split('.').collect();
    let (terminal, parents) = segments.split_last()?;

    Some(
        parents
            .iter()
            .rev()
            .fold(terminal_descriptor(terminal), |inner, segment| {
                PopulateDescriptor::nested(*segment, inner)
            }),
    )
}

fn terminal_descriptor(segment: &str) -> PopulateDescriptor {
    let Some((path, selection)) = segment.split_once(':') else {
        return PopulateDescriptor::new(segment);
    };

    let mut fields: Vec<&str> = selection.split(':').collect();
    let mut matches = None;
    if let Some(last) = fields.last_mut() {
        if let Some((before, spec)) = last.split_once('$') {
            *last = before;
            matches = parse_match(spec);
        }
    }

    let fields: Vec<&str> = fields.into_iter().filter(|f| !f.is_empty()).collect();
    let select = (!fields.is_empty()).then(|| fields.join(" "));

    PopulateDescriptor {
        path: path.to_string(),
        select,
        matches,
        populate: None,
    }
}

fn parse_match(spec: &str) -> Option<Map> {
    let mut condition = Map::new();

    if let Some((field, pattern)) = spec.split_once('~') {
        let mut regex = Map::new();
        regex.insert("$regex".to_string(), Value::string(pattern));
        regex.insert("$options".to_string(), Value::string("i"));
        condition.insert(field.to_string(), Value::Object(regex));
    } else if let Some((field, literal)) = spec.split_once('-') {
        condition.insert(field.to_string(), Value::string(literal));
    } else {
        return None;
    }

    Some(condition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(descriptors: &[PopulateDescriptor]) -> serde_json::Value {
        serde_json::to_value(descriptors).unwrap()
    }

    #[test]
    fn test_flat_and_nested_paths() {
        let populate = cast_populate("field1.p1,field2");
        assert_eq!(
            render(&populate),
            json!([{"path": "field1", "populate": {"path": "p1"}}, {"path": "field2"}])
        );
    }

    #[test]
    fn test_deep_chain() {
        let populate = cast_populate("a.b.c");
        assert_eq!(populate.len(), 1);
        assert_eq!(populate[0].depth(), 3);
        assert_eq!(
            render(&populate),
            json!([{"path": "a", "populate": {"path": "b", "populate": {"path": "c"}}}])
        );
    }

    #[test]
    fn test_selection() {
        let populate = cast_populate("author:name:email");
        assert_eq!(render(&populate), json!([{"path": "author", "select": "name email"}]));
    }

    #[test]
    fn test_regex_match() {
        let populate = cast_populate("field:a:b$status~active");
        assert_eq!(
            render(&populate),
            json!([{
                "path": "field",
                "select": "a b",
                "match": {"status": {"$regex": "active", "$options": "i"}}
            }])
        );
    }

    #[test]
    fn test_exact_match_on_nested_terminal() {
        let populate = cast_populate("author.company:name$country-NL");
        assert_eq!(
            render(&populate),
            json!([{
                "path": "author",
                "populate": {"path": "company", "select": "name", "match": {"country": "NL"}}
            }])
        );
    }

    #[test]
    fn test_tilde_checked_before_dash() {
        let populate = cast_populate("f:x$name~a-b");
        assert_eq!(
            render(&populate),
            json!([{"path": "f", "select": "x", "match": {"name": {"$regex": "a-b", "$options": "i"}}}])
        );
    }

    #[test]
    fn test_match_without_operator_is_dropped() {
        let populate = cast_populate("f:x$plain");
        assert_eq!(render(&populate), json!([{"path": "f", "select": "x"}]));
    }

    #[test]
    fn test_dollar_without_colon_is_part_of_path() {
        let populate = cast_populate("f$status-x");
        assert_eq!(render(&populate), json!([{"path": "f$status-x"}]));
    }

    #[test]
    fn test_from_value_roundtrip() {
        let original = cast_populate("a.b:x:y$s~q");
        let value = Value::from(render(&original)[0].clone());
        assert_eq!(PopulateDescriptor::from_value(&value), Some(original[0].clone()));
    }
}
