//! Query Parser Tests
//!
//! End-to-end parsing of whole requests: operator keys, renamed keys,
//! structured input and reparsing of assembled options.

use querycast::{Map, Params, ParserConfig, QueryError, QueryParser, Value};
use serde_json::json;

// =============================================================================
// FULL REQUESTS
// =============================================================================

#[test]
fn test_full_request() {
    let options = QueryParser::default()
        .parse("status=active&age>=18&tags=a,b&sort=-created&select=name,email&populate=author.company&limit=20&skip=40")
        .unwrap();

    assert_eq!(
        options.to_json(),
        json!({
            "filter": {
                "status": "active",
                "age": {"$gte": 18},
                "tags": {"$in": ["a", "b"]}
            },
            "sort": {"created": -1},
            "limit": 20,
            "skip": 40,
            "select": {"name": 1, "email": 1},
            "populate": [
                {"path": "author", "populate": {"path": "company"}}
            ]
        })
    );
}

#[test]
fn test_rendered_json_keeps_priority_order() {
    let options = QueryParser::default()
        .parse("sort=-created,name,age&b=1&a=2")
        .unwrap();
    assert_eq!(
        options.to_json().to_string(),
        r#"{"filter":{"b":1,"a":2},"sort":{"created":-1,"name":1,"age":1}}"#
    );
    assert_eq!(
        options.to_json().to_string(),
        serde_json::to_string(&options).unwrap()
    );
}

#[test]
fn test_json_seed_keeps_field_order() {
    let options = QueryParser::default()
        .parse(r#"filter={"z":1,"m":2,"a":3}&b=4"#)
        .unwrap();
    assert_eq!(
        options.to_json()["filter"].to_string(),
        r#"{"z":1,"m":2,"a":3,"b":4}"#
    );
}

#[test]
fn test_empty_request() {
    let options = QueryParser::default().parse("").unwrap();
    assert_eq!(options.to_json(), json!({"filter": {}}));
}

#[test]
fn test_sort_priority_order() {
    let options = QueryParser::default().parse("sort=-created,+name,age").unwrap();
    let sort: Vec<(&str, i8)> = options
        .sort
        .as_ref()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    assert_eq!(sort, [("created", -1), ("name", 1), ("age", 1)]);
}

#[test]
fn test_select_conflict_keeps_exclusions() {
    let options = QueryParser::default().parse("select=a,-b").unwrap();
    assert_eq!(options.to_json()["select"], json!({"b": 0}));

    let options = QueryParser::default().parse("select=a,-_id").unwrap();
    assert_eq!(options.to_json()["select"], json!({"a": 1, "_id": 0}));
}

#[test]
fn test_invalid_counts() {
    let parser = QueryParser::default();
    for query in ["limit=abc", "limit=-1", "skip=1.5"] {
        let err = parser.parse(query).unwrap_err();
        assert!(
            matches!(err, QueryError::InvalidCast { .. }),
            "{} should be rejected",
            query
        );
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[test]
fn test_renamed_operator_keys() {
    let parser = QueryParser::builder()
        .sort_key("order")
        .limit_key("max")
        .filter_key("q")
        .build()
        .unwrap();

    let options = parser
        .parse(r#"order=-age&max=3&q={"a":1}&sort=x"#)
        .unwrap();
    assert_eq!(options.to_json()["sort"], json!({"age": -1}));
    assert_eq!(options.limit, Some(3));
    assert_eq!(options.to_json()["filter"], json!({"a": 1, "sort": "x"}));
}

#[test]
fn test_parser_from_config_json() {
    let config = ParserConfig::from_json(
        r#"{"date_format": "%d/%m/%Y", "blacklist": ["secret"], "skip_key": "offset"}"#,
    )
    .unwrap();
    let parser = QueryParser::from_config(config).unwrap();

    let options = parser.parse("born=15/01/2024&secret=x&offset=2").unwrap();
    assert_eq!(
        options.to_json(),
        json!({
            "filter": {"born": {"$date": "2024-01-15T00:00:00.000Z"}},
            "skip": 2
        })
    );
}

#[test]
fn test_cast_params_bind_field_casters() {
    let parser = QueryParser::builder()
        .cast_param("zip", "string")
        .build()
        .unwrap();
    let options = parser.parse("zip=12345&n=12345").unwrap();
    assert_eq!(options.to_json()["filter"], json!({"zip": "12345", "n": 12345}));
}

#[test]
fn test_custom_caster_overrides_builtin() {
    let parser = QueryParser::builder()
        .caster_fn("string", |raw| Ok(Value::string(format!("s:{}", raw))))
        .build()
        .unwrap();
    assert_eq!(
        parser.parse_value("string(x)", None).unwrap(),
        Value::string("s:x")
    );
}

#[test]
fn test_custom_caster_error_carries_token() {
    let parser = QueryParser::builder()
        .caster_fn("even", |raw| match raw.parse::<i64>() {
            Ok(n) if n % 2 == 0 => Ok(Value::Number(n as f64)),
            _ => Err(format!("{} is not even", raw)),
        })
        .build()
        .unwrap();

    assert_eq!(parser.parse_value("even(4)", None).unwrap(), Value::Number(4.0));
    let err = parser.parse("n=even(3)").unwrap_err();
    assert_eq!(err, QueryError::invalid_cast("even(3)", "3 is not even"));
}

// =============================================================================
// STRUCTURED INPUT
// =============================================================================

#[test]
fn test_params_input() {
    let params: Params = [("status", "A"), ("age>", "3"), ("limit", "2")]
        .into_iter()
        .collect();
    let options = QueryParser::default().parse(&params).unwrap();
    assert_eq!(
        options.to_json(),
        json!({"filter": {"status": "A", "age": {"$gte": 3}}, "limit": 2})
    );
}

#[test]
fn test_map_input_with_structured_operators() {
    let map = match Value::from(json!({
        "sort": {"name": 1, "age": -1},
        "select": {"a": 1},
        "limit": 5,
        "populate": [{"path": "owner", "select": "name"}]
    })) {
        Value::Object(map) => map,
        _ => unreachable!(),
    };

    let options = QueryParser::default().parse(map).unwrap();
    assert_eq!(
        options.to_json(),
        json!({
            "filter": {},
            "sort": {"name": 1, "age": -1},
            "limit": 5,
            "select": {"a": 1},
            "populate": [{"path": "owner", "select": "name"}]
        })
    );
}

#[test]
fn test_reparsing_assembled_options_is_stable() {
    let parser = QueryParser::default();
    let options = parser
        .parse("status=active&age>18&created<2024-01-15&name=/^a/i&sort=-age,name&select=a,b&populate=author.company:name$country-NL&limit=10&skip=5")
        .unwrap();

    let again = parser.parse(options.to_params(parser.keys())).unwrap();
    assert_eq!(again, options);
}

#[test]
fn test_reparsing_with_renamed_keys() {
    let parser = QueryParser::builder().limit_key("max").build().unwrap();
    let options = parser.parse("max=7&a=1").unwrap();

    let again = parser.parse(options.to_params(parser.keys())).unwrap();
    assert_eq!(again, options);
    assert_eq!(again.filter, {
        let mut expected = Map::new();
        expected.insert("a".to_string(), Value::Number(1.0));
        expected
    });
}
