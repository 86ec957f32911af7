use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// FieldKind
///
/// Declared type tag of one entity field, as reported by the host.
/// The projector branches on this tag and never inspects values to guess it.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[display("scalar")]
    Scalar,

    /// Single-valued relation (one related record or none).
    #[display("many_to_one")]
    ManyToOne,

    /// Many-valued relation; one-to-many and many-to-many project identically.
    #[display("to_many")]
    #[serde(alias = "one_to_many", alias = "many_to_many")]
    ToMany,

    #[display("date")]
    Date,

    #[display("datetime")]
    #[serde(rename = "datetime", alias = "date_time")]
    DateTime,

    #[display("time")]
    Time,

    #[display("binary")]
    Binary,

    /// Text column carrying an embedded JSON document.
    #[display("json_text")]
    JsonText,
}

impl FieldKind {
    /// Relation cardinality, or `None` for value-typed fields.
    #[must_use]
    pub const fn cardinality(self) -> Option<Cardinality> {
        match self {
            Self::ManyToOne => Some(Cardinality::One),
            Self::ToMany => Some(Cardinality::Many),
            Self::Scalar
            | Self::Date
            | Self::DateTime
            | Self::Time
            | Self::Binary
            | Self::JsonText => None,
        }
    }

    #[must_use]
    pub const fn is_relation(self) -> bool {
        self.cardinality().is_some()
    }
}

///
/// Cardinality
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Cardinality {
    #[display("one")]
    One,
    #[display("many")]
    Many,
}

///
/// FieldModel
/// Runtime metadata for one declared field.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldModel {
    /// Field name as referenced by queries.
    pub name: String,
    pub kind: FieldKind,
    /// Related entity name for relation fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl FieldModel {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            target: None,
        }
    }

    #[must_use]
    pub fn relation(name: impl Into<String>, kind: FieldKind, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            target: Some(target.into()),
        }
    }
}

///
/// TESTS
///
