//! Property-based tests for value typing

use proptest::prelude::*;
use querycast::{QueryParser, Value};

fn parse(raw: &str) -> Value {
    QueryParser::default().parse_value(raw, None).unwrap()
}

/// Plain words that never look like numbers, dates, lists or regexes
fn arb_word() -> impl Strategy<Value = String> {
    "[a-z]{1,12}".prop_filter("reserved literal", |s| {
        !matches!(s.as_str(), "true" | "false" | "null")
    })
}

#[test]
fn test_reserved_literals() {
    assert_eq!(parse("true"), Value::Bool(true));
    assert_eq!(parse("false"), Value::Bool(false));
    assert_eq!(parse("null"), Value::Null);
    assert_eq!(parse("TRUE"), Value::string("TRUE"));
}

#[test]
fn test_zero_padded_examples() {
    assert_eq!(parse("007"), Value::string("007"));
    assert_eq!(parse("0123"), Value::string("0123"));
    assert_eq!(parse("0"), Value::Number(0.0));
    assert_eq!(parse("0.5"), Value::Number(0.5));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: integers without padding type as numbers
    #[test]
    fn prop_integers_are_numbers(n in -1_000_000_000_000i64..1_000_000_000_000i64) {
        prop_assert_eq!(parse(&n.to_string()), Value::Number(n as f64));
    }

    /// Property: decimals type as the number they spell
    #[test]
    fn prop_decimals_are_numbers(whole in 1u32..100_000, frac in 0u32..1000) {
        let raw = format!("{}.{}", whole, frac);
        let expected: f64 = raw.parse().unwrap();
        prop_assert_eq!(parse(&raw), Value::Number(expected));
    }

    /// Property: zero-padded digit strings stay strings
    #[test]
    fn prop_zero_padded_stay_strings(digits in "0[0-9]{1,10}") {
        prop_assert_eq!(parse(&digits), Value::String(digits.clone()));
    }

    /// Property: plain words type as themselves
    #[test]
    fn prop_words_are_strings(word in arb_word()) {
        prop_assert_eq!(parse(&word), Value::String(word.clone()));
    }

    /// Property: comma lists keep length and order, each element typed alone
    #[test]
    fn prop_lists_type_each_element(words in prop::collection::vec(arb_word(), 2..6)) {
        let raw = words.join(",");
        let expected = Value::Array(words.iter().map(|w| Value::String(w.clone())).collect());
        prop_assert_eq!(parse(&raw), expected);
    }

    /// Property: regex literals keep their pattern
    #[test]
    fn prop_regex_literals(pattern in "[a-z^$.]{0,10}", insensitive in any::<bool>()) {
        let raw = format!("/{}/{}", pattern, if insensitive { "i" } else { "" });
        match parse(&raw) {
            Value::Regex(regex) => {
                prop_assert_eq!(regex.pattern, pattern);
                prop_assert_eq!(regex.case_insensitive, insensitive);
            }
            other => prop_assert!(false, "expected regex, got {:?}", other),
        }
    }
}
