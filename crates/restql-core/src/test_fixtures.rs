//! Shared record graph for projection tests.
//!
//! product.product (id 7, "widget")
//! ├── category_id  → product.category (id 3, "tools")
//! └── line_ids     → order.line × 3 (ids 11, 12, 13)

use crate::{
    memory::MemoryRecord,
    model::{EntityModel, FieldKind, FieldModel},
    value::Value,
};
use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Arc;

pub(crate) fn category_model() -> Arc<EntityModel> {
    Arc::new(EntityModel::new(
        "product.category",
        vec![
            FieldModel::new("id", FieldKind::Scalar),
            FieldModel::new("name", FieldKind::Scalar),
            FieldModel::relation("parent_id", FieldKind::ManyToOne, "product.category"),
        ],
    ))
}

pub(crate) fn line_model() -> Arc<EntityModel> {
    Arc::new(EntityModel::new(
        "order.line",
        vec![
            FieldModel::new("id", FieldKind::Scalar),
            FieldModel::new("qty", FieldKind::Scalar),
            FieldModel::new("state", FieldKind::Scalar),
        ],
    ))
}

pub(crate) fn product_model() -> Arc<EntityModel> {
    Arc::new(EntityModel::new(
        "product.product",
        vec![
            FieldModel::new("id", FieldKind::Scalar),
            FieldModel::new("name", FieldKind::Scalar),
            FieldModel::new("active", FieldKind::Scalar),
            FieldModel::relation("category_id", FieldKind::ManyToOne, "product.category"),
            FieldModel::relation("line_ids", FieldKind::ToMany, "order.line"),
            FieldModel::new("release_date", FieldKind::Date),
            FieldModel::new("write_date", FieldKind::DateTime),
            FieldModel::new("image_128", FieldKind::Binary),
            FieldModel::new("options_json", FieldKind::JsonText),
        ],
    ))
}

pub(crate) fn category(id: i64, name: &str) -> MemoryRecord {
    MemoryRecord::new(category_model(), id).with_value("name", name)
}

pub(crate) fn line(id: i64, qty: i64, state: &str) -> MemoryRecord {
    MemoryRecord::new(line_model(), id)
        .with_value("qty", qty)
        .with_value("state", state)
}

/// The widget product with every field populated.
pub(crate) fn widget() -> MemoryRecord {
    let release = NaiveDate::from_ymd_opt(2023, 11, 5).expect("fixture date should be valid");
    let written = Utc
        .with_ymd_and_hms(2024, 3, 1, 9, 20, 30)
        .single()
        .expect("fixture instant should be valid");

    MemoryRecord::new(product_model(), 7_i64)
        .with_value("name", "widget")
        .with_value("active", true)
        .with_one("category_id", Some(category(3, "tools")))
        .with_many(
            "line_ids",
            vec![line(11, 2, "done"), line(12, 0, "draft"), line(13, 5, "done")],
        )
        .with_value("release_date", release)
        .with_value("write_date", written)
        .with_value("image_128", Value::Blob(b"iVBORw0K".to_vec()))
        .with_value("options_json", r#"{"color":"red"}"#)
}

/// A product with no category and no lines.
pub(crate) fn bare_product(id: i64, name: &str) -> MemoryRecord {
    MemoryRecord::new(product_model(), id).with_value("name", name)
}
