//! Field-kind driven value conversion.
//!
//! Every `FieldKind` has exactly one conversion function; `Codec::encode`
//! selects it with an exhaustive match so a new kind cannot fall through to a
//! default branch unnoticed.


use crate::{model::FieldKind, value::Value};
use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Utc};
use serde_json::Value as JsonValue;
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Field-name fragment marking binary fields that carry image payloads.
pub const DEFAULT_IMAGE_MARKER: &str = "image_";

/// MIME type used for image data URIs.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

///
/// CodecError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CodecError {
    #[error("field '{field}' declared as {kind} holds an incompatible {found} value")]
    TypeMismatch {
        field: String,
        kind: FieldKind,
        found: &'static str,
    },

    #[error("binary field '{field}' is not valid UTF-8")]
    InvalidUtf8 { field: String },

    #[error("field '{field}' holds malformed embedded JSON: {message}")]
    InvalidJson { field: String, message: String },
}

///
/// FieldData
///
/// Raw input for one field conversion: a plain value, or the identifiers
/// gathered from a relation.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FieldData {
    Value(Value),
    One(Option<Value>),
    Many(Vec<Value>),
}

impl FieldData {
    const fn shape(&self) -> &'static str {
        match self {
            Self::Value(value) => value.type_name(),
            Self::One(_) => "single relation",
            Self::Many(_) => "many relation",
        }
    }
}

///
/// DisplayOffset
/// UTC offset applied to datetime values before formatting.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DisplayOffset {
    /// The process-local offset at the instant being formatted.
    #[default]
    Local,
    Fixed(FixedOffset),
}

///
/// Codec
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Codec {
    image_marker: String,
    image_mime: String,
    offset: DisplayOffset,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            image_marker: DEFAULT_IMAGE_MARKER.to_string(),
            image_mime: DEFAULT_IMAGE_MIME.to_string(),
            offset: DisplayOffset::Local,
        }
    }
}

impl Codec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_image_marker(mut self, marker: impl Into<String>) -> Self {
        self.image_marker = marker.into();
        self
    }

    #[must_use]
    pub fn with_image_mime(mut self, mime: impl Into<String>) -> Self {
        self.image_mime = mime.into();
        self
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: DisplayOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Convert the raw data of `field` according to its declared kind.
    pub fn encode(
        &self,
        field: &str,
        kind: FieldKind,
        data: FieldData,
    ) -> Result<JsonValue, CodecError> {
        match kind {
            FieldKind::Scalar => encode_scalar(field, data),
            FieldKind::ManyToOne => encode_reference(field, data),
            FieldKind::ToMany => encode_references(field, data),
            FieldKind::Date => encode_date(field, data),
            FieldKind::DateTime => self.encode_datetime(field, data),
            FieldKind::Time => encode_time(field, data),
            FieldKind::Binary => self.encode_binary(field, data),
            FieldKind::JsonText => encode_json_text(field, data),
        }
    }

    // ISO-8601 at the display offset, whole seconds only.
    fn encode_datetime(&self, field: &str, data: FieldData) -> Result<JsonValue, CodecError> {
        match data {
            FieldData::Value(Value::DateTime(instant)) => {
                Ok(JsonValue::String(self.format_instant(instant)))
            }
            FieldData::Value(Value::Null) => Ok(JsonValue::Null),
            other => Err(mismatch(field, FieldKind::DateTime, &other)),
        }
    }

    fn format_instant(&self, instant: DateTime<Utc>) -> String {
        match self.offset {
            DisplayOffset::Local => instant
                .with_timezone(&Local)
                .to_rfc3339_opts(SecondsFormat::Secs, false),
            DisplayOffset::Fixed(offset) => instant
                .with_timezone(&offset)
                .to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }

    // UTF-8 text; image fields become data URIs.
    fn encode_binary(&self, field: &str, data: FieldData) -> Result<JsonValue, CodecError> {
        let text = match data {
            FieldData::Value(Value::Blob(bytes)) => String::from_utf8(bytes)
                .map_err(|_| CodecError::InvalidUtf8 {
                    field: field.to_string(),
                })?,
            FieldData::Value(Value::Text(text)) => text,
            FieldData::Value(Value::Null) => return Ok(JsonValue::Null),
            other => return Err(mismatch(field, FieldKind::Binary, &other)),
        };

        if !self.image_marker.is_empty() && field.contains(&self.image_marker) {
            Ok(JsonValue::String(format!(
                "data:{};base64,{text}",
                self.image_mime
            )))
        } else {
            Ok(JsonValue::String(text))
        }
    }
}

fn encode_scalar(field: &str, data: FieldData) -> Result<JsonValue, CodecError> {
    match data {
        FieldData::Value(value) => Ok(value.into_json()),
        other => Err(mismatch(field, FieldKind::Scalar, &other)),
    }
}

// Related identifier, or `false` when the relation is empty.
fn encode_reference(field: &str, data: FieldData) -> Result<JsonValue, CodecError> {
    match data {
        FieldData::One(Some(id)) => Ok(id.into_json()),
        FieldData::One(None) | FieldData::Value(Value::Null) => Ok(JsonValue::Bool(false)),
        other => Err(mismatch(field, FieldKind::ManyToOne, &other)),
    }
}

fn encode_references(field: &str, data: FieldData) -> Result<JsonValue, CodecError> {
    match data {
        FieldData::Many(ids) => Ok(JsonValue::Array(
            ids.into_iter().map(Value::into_json).collect(),
        )),
        other => Err(mismatch(field, FieldKind::ToMany, &other)),
    }
}

fn encode_date(field: &str, data: FieldData) -> Result<JsonValue, CodecError> {
    match data {
        FieldData::Value(Value::Date(date)) => {
            Ok(JsonValue::String(date.format("%Y-%m-%d").to_string()))
        }
        FieldData::Value(Value::Null) => Ok(JsonValue::Null),
        other => Err(mismatch(field, FieldKind::Date, &other)),
    }
}

fn encode_time(field: &str, data: FieldData) -> Result<JsonValue, CodecError> {
    match data {
        FieldData::Value(Value::Time(time)) => {
            Ok(JsonValue::String(time.format("%H:%M:%S").to_string()))
        }
        FieldData::Value(Value::Null) => Ok(JsonValue::Null),
        other => Err(mismatch(field, FieldKind::Time, &other)),
    }
}

// Empty payloads pass through unchanged.
fn encode_json_text(field: &str, data: FieldData) -> Result<JsonValue, CodecError> {
    match data {
        FieldData::Value(Value::Text(text)) if text.is_empty() => {
            Ok(JsonValue::String(text))
        }
        FieldData::Value(Value::Text(text)) => {
            serde_json::from_str(&text).map_err(|err| CodecError::InvalidJson {
                field: field.to_string(),
                message: err.to_string(),
            })
        }
        FieldData::Value(Value::Null) => Ok(JsonValue::Null),
        other => Err(mismatch(field, FieldKind::JsonText, &other)),
    }
}

fn mismatch(field: &str, kind: FieldKind, data: &FieldData) -> CodecError {
    CodecError::TypeMismatch {
        field: field.to_string(),
        kind,
        found: data.shape(),
    }
}
