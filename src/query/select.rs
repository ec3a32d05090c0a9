//! Field projection
//!
//! A projection cannot mix inclusions and exclusions except for `_id`. When a
//! list does mix them, inclusions are dropped and the projection degrades to
//! exclusion-only.

use indexmap::IndexMap;

use super::unary::parse_unaries;
use crate::value::Map;

/// Field name exempt from the include/exclude exclusivity rule
pub const ID_FIELD: &str = "_id";

/// Field → 1 (include) or 0 (exclude)
pub type Projection = IndexMap<String, i8>;

/// Build a projection from `a,-b,+c`
pub fn cast_select(raw: &str) -> Projection {
    enforce_exclusivity(parse_unaries(raw, 1, 0))
}

/// Build a projection from an already-structured `{field: 0|1}` object.
///
/// Non-numeric entries are skipped; any non-zero number means include.
pub fn select_from_object(map: &Map) -> Projection {
    let fields = map
        .iter()
        .filter_map(|(field, value)| {
            let n = value.as_f64()?;
            Some((field.clone(), if n == 0.0 { 0 } else { 1 }))
        })
        .collect();
    enforce_exclusivity(fields)
}

fn enforce_exclusivity(mut fields: Projection) -> Projection {
    let mut polarities = fields
        .iter()
        .filter(|(field, _)| field.as_str() != ID_FIELD)
        .map(|(_, polarity)| *polarity);

    let mixed = match polarities.next() {
        Some(first) => polarities.any(|p| p != first),
        None => false,
    };

    if mixed {
        fields.retain(|field, polarity| field == ID_FIELD || *polarity == 0);
    }
    fields
}
