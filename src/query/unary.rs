//! Comma-separated `+name` / `-name` lists shared by sort and select

use indexmap::IndexMap;

/// Parse `raw` into an ordered name → polarity map.
///
/// A leading `-` selects `minus`; a leading `+` or no prefix selects `plus`.
/// Names are trimmed, empty names are skipped, and a repeated name keeps its
/// first position with the last polarity.
pub fn parse_unaries(raw: &str, plus: i8, minus: i8) -> IndexMap<String, i8> {
    let mut result = IndexMap::new();

    for item in raw.split(',') {
        let (polarity, name) = match item.strip_prefix('-') {
            Some(name) => (minus, name),
            None => (plus, item.strip_prefix('+').unwrap_or(item)),
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        result.insert(name.to_string(), polarity);
    }

    result
}
