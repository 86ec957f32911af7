//! JSON fixtures describing an entity model set and a record graph.
//!
//! ```json
//! {
//!   "entity": "product.product",
//!   "models": {
//!     "product.product": [
//!       {"name": "id", "kind": "scalar"},
//!       {"name": "category_id", "kind": "many_to_one", "target": "product.category"}
//!     ],
//!     "product.category": [{"name": "id", "kind": "scalar"}]
//!   },
//!   "records": [{"id": 7, "category_id": {"id": 3}}]
//! }
//! ```
//!
//! Relation fields hold nested objects (or `null`) and arrays of objects;
//! every nested object carries its own `id`.

use crate::error::Error;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use restql_core::{
    memory::MemoryRecord,
    model::{EntityModel, FieldKind, FieldModel},
    value::Value,
};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::{collections::BTreeMap, fs, path::Path, sync::Arc};
use thiserror::Error as ThisError;

///
/// FixtureError
///

#[derive(Debug, ThisError)]
pub enum FixtureError {
    #[error("cannot read fixture '{path}': {message}")]
    Io { path: String, message: String },

    #[error("malformed fixture: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown entity model '{name}'")]
    UnknownModel { name: String },

    #[error("relation field '{field}' on '{entity}' declares no target entity")]
    MissingTarget { entity: String, field: String },

    #[error("record of '{entity}' has no 'id'")]
    MissingId { entity: String },

    #[error("field '{field}' is not declared on '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("field '{field}' on '{entity}' ({kind}): {message}")]
    InvalidValue {
        entity: String,
        field: String,
        kind: FieldKind,
        message: String,
    },
}

impl From<FixtureError> for Error {
    fn from(err: FixtureError) -> Self {
        Self::config(err.to_string())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureFile {
    entity: String,
    models: BTreeMap<String, Vec<FieldModel>>,
    #[serde(default)]
    records: Vec<Map<String, JsonValue>>,
}

///
/// Fixture
///

#[derive(Clone, Debug)]
pub struct Fixture {
    entity: String,
    models: BTreeMap<String, Arc<EntityModel>>,
    records: Vec<MemoryRecord>,
}

impl Fixture {
    pub fn from_json_str(text: &str) -> Result<Self, FixtureError> {
        let file: FixtureFile = serde_json::from_str(text)?;

        let models: BTreeMap<String, Arc<EntityModel>> = file
            .models
            .into_iter()
            .map(|(name, fields)| {
                let model = Arc::new(EntityModel::new(name.clone(), fields));
                (name, model)
            })
            .collect();

        let builder = GraphBuilder { models: &models };
        let records = file
            .records
            .iter()
            .map(|object| builder.record(&file.entity, object))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            entity: file.entity,
            models,
            records,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| FixtureError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        Self::from_json_str(&text)
    }

    /// Entity name of the top-level records.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    #[must_use]
    pub fn model(&self, name: &str) -> Option<&EntityModel> {
        self.models.get(name).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn records(&self) -> &[MemoryRecord] {
        &self.records
    }
}

///
/// GraphBuilder
///

struct GraphBuilder<'m> {
    models: &'m BTreeMap<String, Arc<EntityModel>>,
}

impl GraphBuilder<'_> {
    fn record(&self, entity: &str, object: &Map<String, JsonValue>) -> Result<MemoryRecord, FixtureError> {
        let model = self
            .models
            .get(entity)
            .ok_or_else(|| FixtureError::UnknownModel {
                name: entity.to_string(),
            })?;
        let id = object
            .get("id")
            .filter(|id| !id.is_null())
            .ok_or_else(|| FixtureError::MissingId {
                entity: entity.to_string(),
            })?;
        let id = scalar(id).map_err(|message| invalid(entity, "id", FieldKind::Scalar, message))?;

        let mut record = MemoryRecord::new(model.clone(), id);
        for (name, raw) in object {
            if name == "id" {
                continue;
            }
            let field = model.field(name).ok_or_else(|| FixtureError::UnknownField {
                entity: entity.to_string(),
                field: name.clone(),
            })?;
            record = self.field(record, entity, field, raw)?;
        }

        Ok(record)
    }

    fn field(
        &self,
        record: MemoryRecord,
        entity: &str,
        field: &FieldModel,
        raw: &JsonValue,
    ) -> Result<MemoryRecord, FixtureError> {
        let name = field.name.as_str();
        let fail = |message: String| invalid(entity, name, field.kind, message);

        let record = match field.kind {
            FieldKind::ManyToOne => {
                let related = match raw {
                    JsonValue::Null | JsonValue::Bool(false) => None,
                    JsonValue::Object(object) => {
                        Some(self.record(self.target(entity, field)?, object)?)
                    }
                    other => return Err(fail(format!("expected an object or null, found {other}"))),
                };
                record.with_one(name, related)
            }
            FieldKind::ToMany => {
                let JsonValue::Array(items) = raw else {
                    return Err(fail(format!("expected an array of objects, found {raw}")));
                };
                let target = self.target(entity, field)?;
                let related = items
                    .iter()
                    .map(|item| match item {
                        JsonValue::Object(object) => self.record(target, object),
                        other => Err(fail(format!("expected an object, found {other}"))),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                record.with_many(name, related)
            }
            kind => record.with_value(name, value(kind, raw).map_err(fail)?),
        };

        Ok(record)
    }

    fn target<'f>(&self, entity: &str, field: &'f FieldModel) -> Result<&'f str, FixtureError> {
        field
            .target
            .as_deref()
            .ok_or_else(|| FixtureError::MissingTarget {
                entity: entity.to_string(),
                field: field.name.clone(),
            })
    }
}

fn invalid(entity: &str, field: &str, kind: FieldKind, message: String) -> FixtureError {
    FixtureError::InvalidValue {
        entity: entity.to_string(),
        field: field.to_string(),
        kind,
        message,
    }
}

//
// Values
//

fn value(kind: FieldKind, raw: &JsonValue) -> Result<Value, String> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    match kind {
        FieldKind::Scalar => scalar(raw),
        FieldKind::Date => {
            let text = text(raw)?;
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|err| format!("'{text}' is not a YYYY-MM-DD date: {err}"))
        }
        FieldKind::DateTime => datetime(text(raw)?).map(Value::DateTime),
        FieldKind::Time => {
            let text = text(raw)?;
            NaiveTime::parse_from_str(text, "%H:%M:%S")
                .map(Value::Time)
                .map_err(|err| format!("'{text}' is not an HH:MM:SS time: {err}"))
        }
        FieldKind::Binary => Ok(Value::Blob(text(raw)?.as_bytes().to_vec())),
        FieldKind::JsonText => match raw {
            JsonValue::String(text) => Ok(Value::Text(text.clone())),
            // embedded documents may be written inline
            other => Ok(Value::Text(other.to_string())),
        },
        FieldKind::ManyToOne | FieldKind::ToMany => {
            Err("relation fields hold records, not values".to_string())
        }
    }
}

fn scalar(raw: &JsonValue) -> Result<Value, String> {
    match raw {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(v) => Ok(Value::Bool(*v)),
        JsonValue::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_u64().map(Value::Uint))
            .or_else(|| n.as_f64().map(Value::Float))
            .ok_or_else(|| format!("unsupported number {n}")),
        JsonValue::String(v) => Ok(Value::Text(v.clone())),
        JsonValue::Array(items) => items.iter().map(scalar).collect::<Result<_, _>>().map(Value::List),
        JsonValue::Object(_) => Err("objects are not scalar values".to_string()),
    }
}

fn text(raw: &JsonValue) -> Result<&str, String> {
    raw.as_str()
        .ok_or_else(|| format!("expected a string, found {raw}"))
}

// RFC 3339, or a naive "YYYY-MM-DD HH:MM:SS" read as UTC.
fn datetime(text: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(text)
        .map(|instant| instant.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").map(|naive| naive.and_utc())
        })
        .map_err(|err| format!("'{text}' is not an RFC 3339 datetime: {err}"))
}

///
/// TESTS
///
