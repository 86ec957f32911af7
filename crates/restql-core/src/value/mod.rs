
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde_json::{Number, Value as JsonValue};

///
/// Value
/// Raw field value as handed over by the host record layer.
///
/// Null     → the field holds no value (SQL NULL / unset).
/// DateTime → an absolute instant; the codec applies the display offset.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Float(f64),
    Int(i64),
    /// Ordered list of values, order preserved on output.
    List(Vec<Self>),
    Null,
    Text(String),
    Time(NaiveTime),
    Uint(u64),
}

impl Value {
    /// Short variant label used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Blob(_) => "blob",
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::List(_) => "list",
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Time(_) => "time",
            Self::Uint(_) => "uint",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert into its plain JSON form without any field-kind interpretation.
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    #[must_use]
    pub fn into_json(self) -> JsonValue {
        match self {
            Self::Blob(bytes) => JsonValue::Array(
                bytes
                    .into_iter()
                    .map(|byte| JsonValue::Number(byte.into()))
                    .collect(),
            ),
            Self::Bool(v) => JsonValue::Bool(v),
            Self::Date(v) => JsonValue::String(v.format("%Y-%m-%d").to_string()),
            Self::DateTime(v) => JsonValue::String(v.to_rfc3339_opts(SecondsFormat::Secs, false)),
            Self::Float(v) => Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number),
            Self::Int(v) => JsonValue::Number(v.into()),
            Self::List(items) => JsonValue::Array(items.into_iter().map(Self::into_json).collect()),
            Self::Null => JsonValue::Null,
            Self::Text(v) => JsonValue::String(v),
            Self::Time(v) => JsonValue::String(v.format("%H:%M:%S").to_string()),
            Self::Uint(v) => JsonValue::Number(v.into()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
