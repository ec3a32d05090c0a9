//! Sort order

use indexmap::IndexMap;

use super::unary::parse_unaries;
use crate::value::Map;

/// Field → 1 (ascending) or -1 (descending), in priority order
pub type SortSpec = IndexMap<String, i8>;

/// Build a sort spec from `-created,name`
pub fn cast_sort(raw: &str) -> SortSpec {
    parse_unaries(raw, 1, -1)
}

/// Build a sort spec from an already-structured `{field: 1|-1}` object
pub fn sort_from_object(map: &Map) -> SortSpec {
    map.iter()
        .filter_map(|(field, value)| {
            let n = value.as_f64()?;
            Some((field.clone(), if n < 0.0 { -1 } else { 1 }))
        })
        .collect()
}
