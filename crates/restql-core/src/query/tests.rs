use super::*;
use proptest::prelude::*;

fn flat(name: &str) -> Selector {
    Selector::Flat(name.to_string())
}

fn names(set: &BTreeSet<String>) -> Vec<&str> {
    set.iter().map(String::as_str).collect()
}

// ---- selectors ---------------------------------------------------------

#[test]
fn empty_braces_parse_to_empty_query() {
    let query = parse("{}").expect("empty selector list should parse");

    assert!(query.is_empty());
    assert_eq!(query.depth(), 0);
}

#[test]
fn include_order_is_preserved() {
    let query = parse("{name, id, active}").expect("flat query should parse");

    assert_eq!(query.include(), &[flat("name"), flat("id"), flat("active")]);
    assert!(query.exclude().is_empty());
}

#[test]
fn repeated_flat_selector_is_kept_once() {
    let query = parse("{id, name, id}").expect("duplicate flat selector should parse");

    assert_eq!(query.include(), &[flat("id"), flat("name")]);
}

#[test]
fn wildcard_keeps_its_position() {
    let query = parse("{name, *, id}").expect("wildcard query should parse");

    assert_eq!(query.include(), &[flat("name"), Selector::Wildcard, flat("id")]);
}

#[test]
fn excludes_collect_into_set() {
    let query = parse("{-b, -a, -b}").expect("exclusion query should parse");

    assert!(query.include().is_empty());
    assert_eq!(names(query.exclude()), vec!["a", "b"]);
}

#[test]
fn nested_selectors_ride_along_with_excludes() {
    let query = parse("{-secret, lines{id}}").expect("mixed exclusion query should parse");

    assert_eq!(names(query.exclude()), vec!["secret"]);
    let [Selector::Nested(name, nested)] = query.include() else {
        panic!("only the nested selector should remain in include");
    };
    assert_eq!(name, "lines");
    assert_eq!(nested.include(), &[flat("id")]);
}

#[test]
fn wildcard_is_dropped_in_exclusion_mode() {
    let query = parse("{*, -secret}").expect("wildcard with exclusion should parse");

    assert!(query.include().is_empty());
    assert!(query.is_exclusion());
}

// ---- arguments ---------------------------------------------------------

#[test]
fn rename_argument_maps_field_to_output_name() {
    let query = parse("(id:item_id, name:item_name){id, name}").expect("renames should parse");

    let args = query.argument("id").expect("id should carry arguments");
    assert_eq!(args.rename.as_deref(), Some("item_id"));
    assert_eq!(args.filter, None);
    assert_eq!(args.output_name("id"), "item_id");
    assert!(query.argument("missing").is_none());
}

#[test]
fn filter_suffix_rides_on_rename() {
    let query = parse("(lines:lines~active_only){lines{id}}").expect("filter should parse");

    let args = query.argument("lines").expect("lines should carry arguments");
    assert_eq!(args.rename.as_deref(), Some("lines"));
    assert_eq!(args.filter.as_deref(), Some("active_only"));
}

#[test]
fn filter_without_rename_keeps_field_name() {
    let query = parse("(lines~active_only){lines}").expect("bare filter should parse");

    let args = query.argument("lines").expect("lines should carry arguments");
    assert_eq!(args.rename, None);
    assert_eq!(args.output_name("lines"), "lines");
    assert_eq!(args.filter.as_deref(), Some("active_only"));
}

#[test]
fn nested_level_carries_its_own_argument_block() {
    let query = parse("(category:cat){category(name:label){id, name}}")
        .expect("nested argument block should parse");

    assert_eq!(
        query
            .argument("category")
            .and_then(|args| args.rename.as_deref()),
        Some("cat")
    );
    let [Selector::Nested(_, nested)] = query.include() else {
        panic!("category should be nested");
    };
    assert_eq!(
        nested.argument("name").and_then(|args| args.rename.as_deref()),
        Some("label")
    );
    assert!(nested.argument("category").is_none());
}

// ---- format errors -----------------------------------------------------

fn format_error(raw: &str) -> String {
    match parse(raw) {
        Err(QueryError::Format { message }) => message,
        other => panic!("expected a format error for {raw:?}, got {other:?}"),
    }
}

#[test]
fn flat_include_with_exclude_is_rejected() {
    let message = format_error("{id, -name}");

    assert!(message.contains("'id'"), "{message}");
}

#[test]
fn field_both_selected_and_excluded_is_rejected() {
    format_error("{-id, id}");
    format_error("{-lines, lines{id}}");
}

#[test]
fn duplicate_argument_is_rejected() {
    let message = format_error("(id:a, id:b){id}");

    assert_eq!(message, "duplicate arguments for field 'id'");
}

#[test]
fn depth_limit_is_a_format_error() {
    let options = ParseOptions { max_depth: Some(1) };

    assert!(parse_with("{a{b}}", options).is_ok());
    assert!(matches!(
        parse_with("{a{b{c}}}", options),
        Err(QueryError::Format { .. })
    ));
    assert!(parse_with("{a{b{c}}}", ParseOptions { max_depth: None }).is_ok());
}

#[test]
fn default_depth_limit_stops_runaway_nesting() {
    let raw = format!("{}{}", "{a".repeat(DEFAULT_MAX_DEPTH + 2), "}".repeat(DEFAULT_MAX_DEPTH + 2));

    assert!(matches!(parse(&raw), Err(QueryError::Format { .. })));
}

// ---- syntax errors -----------------------------------------------------

fn syntax_error(raw: &str) -> (String, String) {
    match parse(raw) {
        Err(QueryError::Syntax {
            message, offending, ..
        }) => (message, offending),
        other => panic!("expected a syntax error for {raw:?}, got {other:?}"),
    }
}

#[test]
fn missing_closing_brace_reports_end_of_query() {
    let (message, offending) = syntax_error("{id, name");

    assert_eq!(message, "expected '}', found end of query");
    assert_eq!(offending, "");
}

#[test]
fn trailing_comma_reports_offending_text() {
    let (_, offending) = syntax_error("{id,}");

    assert_eq!(offending, "}");
}

#[test]
fn trailing_input_is_rejected() {
    let (message, offending) = syntax_error("{id} extra");

    assert_eq!(message, "unexpected trailing input");
    assert_eq!(offending, "extra");
}

#[test]
fn empty_input_is_a_syntax_error() {
    let (message, _) = syntax_error("   ");

    assert_eq!(message, "empty query");
}

#[test]
fn bare_field_list_requires_braces() {
    syntax_error("id, name");
}

#[test]
fn argument_pair_requires_separator() {
    let (message, offending) = syntax_error("(id){id}");

    assert_eq!(message, "expected ':' or '~' after argument field 'id'");
    assert_eq!(offending, "){id}");
}

#[test]
fn syntax_error_display_mentions_offending_text() {
    let err = parse("{id name}").expect_err("missing comma should fail");

    assert_eq!(err.to_string(), "expected '}', found name 'name' on 'name}'");
}

// ---- canonical text ----------------------------------------------------

#[test]
fn display_renders_canonical_text() {
    let query = parse("( name : label , lines ~ open ) { name , lines ( qty:q ) { id , qty } , * }")
        .expect("spaced query should parse");

    assert_eq!(
        query.to_string(),
        "(lines~open,name:label){name,lines(qty:q){id,qty},*}"
    );
}

#[test]
fn display_renders_excludes_after_nested() {
    let query = parse("{-b, rel{id}, -a}").expect("exclusion query should parse");

    assert_eq!(query.to_string(), "{rel{id},-a,-b}");
}

#[test]
fn depth_counts_nested_levels() {
    let query = parse("{a{b{c}}, d{e}}").expect("nested query should parse");

    assert_eq!(query.depth(), 2);
}

// ---- properties --------------------------------------------------------

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,6}"
}

fn arb_query_text() -> impl Strategy<Value = String> {
    let leaf = prop::collection::vec(arb_name(), 0..4).prop_map(|fields| {
        format!("{{{}}}", fields.join(","))
    });

    leaf.prop_recursive(3, 16, 4, |inner| {
        (
            prop::collection::vec(arb_name(), 0..3),
            prop::collection::vec((arb_name(), inner), 0..3),
        )
            .prop_map(|(flat, nested)| {
                let mut selectors = flat;
                selectors.extend(nested.into_iter().map(|(name, body)| format!("{name}{body}")));
                format!("{{{}}}", selectors.join(","))
            })
    })
}

proptest! {
    #[test]
    fn canonical_text_reparses_to_same_query(raw in arb_query_text()) {
        let query = parse(&raw).expect("generated query should parse");
        let reparsed = parse(&query.to_string()).expect("canonical text should parse");

        prop_assert_eq!(query, reparsed);
    }

    #[test]
    fn parse_is_deterministic(raw in arb_query_text()) {
        prop_assert_eq!(parse(&raw), parse(&raw));
    }

    #[test]
    fn arbitrary_text_never_panics(raw in ".{0,40}") {
        let _ = parse(&raw);
    }
}
