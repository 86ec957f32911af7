use derive_more::Display;
use restql_core::{
    codec::CodecError, error::Error as CoreError, project::ProjectionError, query::QueryError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind taxonomy and user-facing hint text.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Remediation hint shown next to the message in error envelopes.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match &self.kind {
            ErrorKind::Query(QueryErrorKind::Syntax) => {
                "Check the query syntax, e.g. {id, name, lines{id}}"
            }
            ErrorKind::Query(QueryErrorKind::Format) => {
                "Select fields or exclude them at one level, not both"
            }
            ErrorKind::Field(FieldErrorKind::NotFound) => "Check the field names in the query",
            ErrorKind::Field(FieldErrorKind::NotNested) => {
                "Only relation fields accept a nested query"
            }
            ErrorKind::Field(FieldErrorKind::Filter) => {
                "Filter methods apply to registered to-many relations only"
            }
            ErrorKind::Value => "The stored value does not match its declared field type",
            ErrorKind::Config => "Check the configuration file",
        }
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Syntax { .. } => Self::new(
                ErrorKind::Query(QueryErrorKind::Syntax),
                format!("QuerySyntaxError: {err}"),
            ),
            QueryError::Format { .. } => Self::new(
                ErrorKind::Query(QueryErrorKind::Format),
                format!("QueryFormatError: {err}"),
            ),
        }
    }
}

impl From<ProjectionError> for Error {
    fn from(err: ProjectionError) -> Self {
        let kind = match &err {
            ProjectionError::FieldNotFound { .. } => ErrorKind::Field(FieldErrorKind::NotFound),
            ProjectionError::InvalidNestedField { .. } => {
                ErrorKind::Field(FieldErrorKind::NotNested)
            }
            ProjectionError::UnknownFilter { .. } | ProjectionError::FilterNotApplicable { .. } => {
                ErrorKind::Field(FieldErrorKind::Filter)
            }
            ProjectionError::RelationUnavailable { .. } | ProjectionError::Codec(_) => {
                ErrorKind::Value
            }
        };

        Self::new(kind, err.to_string())
    }
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        Self::new(ErrorKind::Value, err.to_string())
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Query(err) => err.into(),
            CoreError::Projection(err) => err.into(),
            CoreError::Codec(err) => err.into(),
        }
    }
}

///
/// ErrorKind
///

#[derive(Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    #[display("query.{_0}")]
    Query(QueryErrorKind),

    #[display("field.{_0}")]
    Field(FieldErrorKind),

    /// A raw value could not be converted for its field kind.
    #[display("value")]
    Value,

    /// Configuration or fixture input is invalid.
    #[display("config")]
    Config,
}

///
/// QueryErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum QueryErrorKind {
    #[display("syntax")]
    Syntax,

    /// Parseable, but the selectors contradict each other or nest too deep.
    #[display("format")]
    Format,
}

///
/// FieldErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum FieldErrorKind {
    #[display("not_found")]
    NotFound,

    #[display("not_nested")]
    NotNested,

    #[display("filter")]
    Filter,
}

///
/// TESTS
///
