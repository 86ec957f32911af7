use restql::{
    config::ProjectionConfig,
    envelope::Envelope,
    error::{ErrorKind, FieldErrorKind, QueryErrorKind},
    fixture::Fixture,
    serializer::Serializer,
};
use restql_core::{
    filter::FilterRegistry,
    overwrite::Overwrites,
    traits::Record,
    value::Value,
};
use serde_json::{Value as JsonValue, json};

const CATALOG: &str = include_str!("../fixtures/catalog.json");

fn catalog() -> Fixture {
    Fixture::from_json_str(CATALOG).expect("catalog fixture should load")
}

fn utc_serializer() -> Serializer {
    let config = ProjectionConfig::from_toml_str(r#"utc_offset = "Z""#)
        .expect("utc config should load");

    Serializer::from_config(config).expect("serializer should build")
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).expect("value should serialize")
}

#[test]
fn default_query_projects_every_field() {
    let fixture = catalog();
    let rows = utc_serializer()
        .many_json(fixture.records(), None, &Overwrites::new())
        .expect("serialization should succeed");

    assert_eq!(
        to_json(&rows),
        to_json(&json!([
            {
                "id": 7,
                "name": "widget",
                "active": true,
                "category_id": 3,
                "line_ids": [11, 12, 13],
                "release_date": "2023-11-05",
                "write_date": "2024-03-01T09:20:30+00:00",
                "image_128": "data:image/png;base64,iVBORw0K",
                "options_json": {"color": "red"}
            },
            {
                "id": 8,
                "name": "gadget",
                "active": false,
                "category_id": false,
                "line_ids": [],
                "release_date": null,
                "write_date": "2024-03-02T18:00:00+00:00",
                "image_128": null,
                "options_json": ""
            }
        ]))
    );
}

#[test]
fn one_record_with_nested_and_renamed_fields() {
    let fixture = catalog();
    let out = utc_serializer()
        .one(
            &fixture.records()[0],
            Some("(category_id:category){name, category_id{name, parent_id{name}}}"),
            &Overwrites::new(),
        )
        .expect("serialization should succeed");

    assert_eq!(
        to_json(&out),
        r#"{"name":"widget","category":{"name":"tools","parent_id":{"name":"all"}}}"#
    );
}

#[test]
fn overwrites_apply_to_each_top_level_record_only() {
    let fixture = catalog();
    let overwrites = Overwrites::new()
        .compute("name", |current, _| {
            json!(format!("{}!", current.and_then(JsonValue::as_str).unwrap_or_default()))
        })
        .literal("source", "catalog");

    let rows = utc_serializer()
        .many(fixture.records(), Some("{name, line_ids{id}}"), &overwrites)
        .expect("serialization should succeed");

    assert_eq!(rows[0]["name"], json!("widget!"));
    assert_eq!(rows[1]["name"], json!("gadget!"));
    assert_eq!(rows[0]["source"], json!("catalog"));
    assert_eq!(rows[0]["line_ids"], json!([{"id": 11}, {"id": 12}, {"id": 13}]));
}

#[test]
fn registered_filters_shape_relations() {
    let filters = FilterRegistry::new().with("done_only", |set| {
        set.filter(|line| line.value("state") == Some(Value::from("done")))
    });
    let serializer = utc_serializer().with_filters(filters);
    let fixture = catalog();

    let out = serializer
        .one(
            &fixture.records()[0],
            Some("(line_ids:done_lines~done_only){line_ids{id, qty}}"),
            &Overwrites::new(),
        )
        .expect("serialization should succeed");

    assert_eq!(
        to_json(&out),
        r#"{"done_lines":[{"id":11,"qty":2},{"id":13,"qty":5}]}"#
    );
}

#[test]
fn parallel_threshold_does_not_change_output() {
    let fixture = catalog();
    let records: Vec<&dyn Record> = fixture
        .records()
        .iter()
        .cycle()
        .take(50)
        .map(|record| record as &dyn Record)
        .collect();

    let sequential = Serializer::from_config(
        ProjectionConfig::from_toml_str("utc_offset = \"Z\"\nparallel_threshold = 0")
            .expect("config should load"),
    )
    .expect("serializer should build");
    let parallel = Serializer::from_config(
        ProjectionConfig::from_toml_str("utc_offset = \"Z\"\nparallel_threshold = 2")
            .expect("config should load"),
    )
    .expect("serializer should build");

    let query = Some("{id, category_id{name}, line_ids}");
    let left = sequential
        .many_json(&records, query, &Overwrites::new())
        .expect("sequential serialization should succeed");
    let right = parallel
        .many_json(&records, query, &Overwrites::new())
        .expect("parallel serialization should succeed");

    assert_eq!(to_json(&left), to_json(&right));
}

#[test]
fn syntax_error_envelope_names_offending_text() {
    let fixture = catalog();
    let err = utc_serializer()
        .one(&fixture.records()[0], Some("{id, name"), &Overwrites::new())
        .expect_err("unterminated query should fail");

    assert_eq!(err.kind, ErrorKind::Query(QueryErrorKind::Syntax));
    assert_eq!(
        serde_json::to_value(Envelope::failure(&err)).expect("envelope should serialize"),
        json!({
            "status": "error",
            "message": "QuerySyntaxError: expected '}', found end of query",
            "hint": err.hint(),
        })
    );
}

#[test]
fn field_errors_map_to_public_kinds() {
    let fixture = catalog();
    let serializer = utc_serializer();
    let record = &fixture.records()[0];
    let none = Overwrites::new();

    let cases = [
        ("{ghost}", ErrorKind::Field(FieldErrorKind::NotFound)),
        ("{name{id}}", ErrorKind::Field(FieldErrorKind::NotNested)),
        ("(line_ids~missing){line_ids}", ErrorKind::Field(FieldErrorKind::Filter)),
        ("{id, -name}", ErrorKind::Query(QueryErrorKind::Format)),
    ];
    for (query, kind) in cases {
        let err = serializer
            .one(record, Some(query), &none)
            .expect_err("query should fail");
        assert_eq!(err.kind, kind, "{query}: {}", err.message);
    }
}

#[test]
fn configured_depth_limit_rejects_deep_queries() {
    let serializer = Serializer::from_config(
        ProjectionConfig::from_toml_str("max_depth = 1").expect("config should load"),
    )
    .expect("serializer should build");
    let fixture = catalog();

    let err = serializer
        .one(
            &fixture.records()[0],
            Some("{category_id{parent_id{name}}}"),
            &Overwrites::new(),
        )
        .expect_err("query nests too deep");

    assert_eq!(err.kind, ErrorKind::Query(QueryErrorKind::Format));
}

#[test]
fn success_envelope_wraps_result() {
    let fixture = catalog();
    let outcome = utc_serializer()
        .one(&fixture.records()[1], Some("(id:item_id){id}"), &Overwrites::new())
        .map(JsonValue::Object);

    assert_eq!(
        to_json(&Envelope::from(outcome)),
        r#"{"status":"success","result":{"item_id":8}}"#
    );
}
