//! # Predefined Queries
//!
//! Substitutes `${name}` placeholders in assembled query options with values
//! looked up in a caller-supplied context, by dotted path (`${user.id}`).
//!
//! - placeholder as a value or array element: replaced by the context value
//! - placeholder as a key whose clause carries `$exists`, resolving to an
//!   object: the object's entries are merged into the parent
//! - placeholder as a key resolving to a string: the key is renamed and its
//!   value is still walked
//!
//! The filter, the sort and projection keys, and every populate descriptor
//! (path, selection and match condition) are walked. Entries landing on an
//! existing object entry are merged into it. Dates and regexes are never
//! descended into. Values pulled from the context are inserted as-is.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::errors::{QueryError, QueryResult};
use super::options::QueryOptions;
use super::populate::PopulateDescriptor;
use crate::value::{Map, Value};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$\{([A-Za-z_$][\w$]*(?:\.[\w$]+)*)\}$").expect("placeholder pattern compiles")
});

/// The reference named by a full-string `${name}` placeholder
pub fn placeholder(s: &str) -> Option<&str> {
    PLACEHOLDER
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolve every placeholder in `filter`; without a context it is returned
/// unchanged
pub fn resolve(filter: Map, context: Option<&Value>) -> QueryResult<Map> {
    match context {
        Some(context) => resolve_map(&filter, context),
        None => Ok(filter),
    }
}

/// Resolve every placeholder across assembled query options
pub fn resolve_options(
    options: QueryOptions,
    context: Option<&Value>,
) -> QueryResult<QueryOptions> {
    let Some(context) = context else {
        return Ok(options);
    };

    let QueryOptions {
        filter,
        sort,
        limit,
        skip,
        select,
        populate,
    } = options;

    Ok(QueryOptions {
        filter: resolve_map(&filter, context)?,
        sort: sort.map(|fields| resolve_keys(fields, context)).transpose()?,
        limit,
        skip,
        select: select.map(|fields| resolve_keys(fields, context)).transpose()?,
        populate: populate
            .map(|descriptors| {
                descriptors
                    .into_iter()
                    .map(|descriptor| resolve_descriptor(descriptor, context))
                    .collect::<QueryResult<Vec<_>>>()
            })
            .transpose()?,
    })
}

/// Look up a dotted path in the context
pub fn lookup<'c>(context: &'c Value, reference: &str) -> QueryResult<&'c Value> {
    reference
        .split('.')
        .try_fold(context, |node, part| match node {
            Value::Object(map) => map.get(part),
            Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .ok_or_else(|| QueryError::missing_reference(reference))
}

fn resolve_map(map: &Map, context: &Value) -> QueryResult<Map> {
    let mut resolved = Map::with_capacity(map.len());

    for (key, value) in map {
        let Some(reference) = placeholder(key) else {
            merge_entry(&mut resolved, key.clone(), resolve_value(value, context)?);
            continue;
        };

        match lookup(context, reference)? {
            Value::Object(fields) if has_exists_clause(value) => {
                for (k, v) in fields {
                    merge_entry(&mut resolved, k.clone(), v.clone());
                }
            }
            Value::String(renamed) => {
                merge_entry(&mut resolved, renamed.clone(), resolve_value(value, context)?);
            }
            Value::Object(_) => {
                return Err(QueryError::invalid_predefined(
                    key.as_str(),
                    "an object reference needs an $exists clause",
                ));
            }
            _ => {
                return Err(QueryError::invalid_predefined(
                    key.as_str(),
                    "a key reference must resolve to an object or a string",
                ));
            }
        }
    }

    Ok(resolved)
}

fn resolve_value(value: &Value, context: &Value) -> QueryResult<Value> {
    match value {
        Value::String(s) => match placeholder(s) {
            Some(reference) => lookup(context, reference).cloned(),
            None => Ok(value.clone()),
        },
        Value::Object(map) => resolve_map(map, context).map(Value::Object),
        Value::Array(items) => items
            .iter()
            .map(|item| resolve_value(item, context))
            .collect::<QueryResult<Vec<_>>>()
            .map(Value::Array),
        _ => Ok(value.clone()),
    }
}

/// Rename placeholder keys of a sort spec or projection
fn resolve_keys(
    fields: IndexMap<String, i8>,
    context: &Value,
) -> QueryResult<IndexMap<String, i8>> {
    fields
        .into_iter()
        .map(|(field, polarity)| -> QueryResult<(String, i8)> {
            Ok((resolve_text(field, context)?, polarity))
        })
        .collect()
}

fn resolve_descriptor(
    descriptor: PopulateDescriptor,
    context: &Value,
) -> QueryResult<PopulateDescriptor> {
    Ok(PopulateDescriptor {
        path: resolve_text(descriptor.path, context)?,
        select: descriptor
            .select
            .map(|select| resolve_text(select, context))
            .transpose()?,
        matches: descriptor
            .matches
            .map(|matches| resolve_map(&matches, context))
            .transpose()?,
        populate: descriptor
            .populate
            .map(|inner| resolve_descriptor(*inner, context).map(Box::new))
            .transpose()?,
    })
}

/// Resolve a placeholder standing for a name; it must resolve to a string
fn resolve_text(text: String, context: &Value) -> QueryResult<String> {
    let Some(reference) = placeholder(&text) else {
        return Ok(text);
    };

    match lookup(context, reference)? {
        Value::String(resolved) => Ok(resolved.clone()),
        _ => Err(QueryError::invalid_predefined(
            text.as_str(),
            "a name reference must resolve to a string",
        )),
    }
}

/// Insert `value`, merging objects into an existing object entry
fn merge_entry(target: &mut Map, key: String, value: Value) {
    if let Value::Object(incoming) = value {
        if let Some(Value::Object(existing)) = target.get_mut(&key) {
            for (k, v) in incoming {
                merge_entry(existing, k, v);
            }
            return;
        }
        target.insert(key, Value::Object(incoming));
        return;
    }
    target.insert(key, value);
}

fn has_exists_clause(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|clause| clause.contains_key("$exists"))
}
