//! Numeric coercion with query-string semantics
//!
//! Accepts decimal literals with optional sign, fraction and exponent,
//! `0x`/`0o`/`0b` integer literals, and `Infinity`. Surrounding whitespace
//! is ignored. Words such as `inf` or `nan` are not numbers.

use std::sync::LazyLock;

use regex::Regex;

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("decimal pattern compiles")
});

/// Coerce `raw` to a number, or `None` when it is not fully numeric
pub fn coerce_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }

    if DECIMAL.is_match(s) {
        s.parse::<f64>().ok()
    } else {
        None
    }
}
