//! Parsed query options: the output of the parser

use serde::Serialize;

use super::params::Params;
use super::populate::PopulateDescriptor;
use super::select::Projection;
use super::sort::SortSpec;
use crate::value::{Map, Value};

/// Keys under which each query option is read from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorKeys {
    pub select: String,
    pub populate: String,
    pub sort: String,
    pub skip: String,
    pub limit: String,
    pub filter: String,
}

impl Default for OperatorKeys {
    fn default() -> Self {
        Self {
            select: "select".to_string(),
            populate: "populate".to_string(),
            sort: "sort".to_string(),
            skip: "skip".to_string(),
            limit: "limit".to_string(),
            filter: "filter".to_string(),
        }
    }
}

impl OperatorKeys {
    /// All six keys
    pub fn all(&self) -> [&str; 6] {
        [
            self.select.as_str(),
            self.populate.as_str(),
            self.sort.as_str(),
            self.skip.as_str(),
            self.limit.as_str(),
            self.filter.as_str(),
        ]
    }
}

/// Structured query options for a document-database query.
///
/// `filter` is always present; every other section only when its key was
/// supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryOptions {
    pub filter: Map,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Projection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub populate: Option<Vec<PopulateDescriptor>>,
}

impl QueryOptions {
    /// Flatten these options back into parameters under `keys`
    pub fn to_params(&self, keys: &OperatorKeys) -> Params {
        let mut params = Params::new();
        params.insert(keys.filter.as_str(), Value::Object(self.filter.clone()));

        if let Some(sort) = &self.sort {
            params.insert(keys.sort.as_str(), polarity_object(sort));
        }
        if let Some(limit) = self.limit {
            params.insert(keys.limit.as_str(), Value::Number(limit as f64));
        }
        if let Some(skip) = self.skip {
            params.insert(keys.skip.as_str(), Value::Number(skip as f64));
        }
        if let Some(select) = &self.select {
            params.insert(keys.select.as_str(), polarity_object(select));
        }
        if let Some(populate) = &self.populate {
            let items = populate
                .iter()
                .map(|descriptor| Value::from(serde_json::to_value(descriptor).unwrap_or_default()))
                .collect();
            params.insert(keys.populate.as_str(), Value::Array(items));
        }

        params
    }

    /// Render as a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn polarity_object(fields: &indexmap::IndexMap<String, i8>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(field, polarity)| (field.clone(), Value::Number(f64::from(*polarity))))
            .collect(),
    )
}
