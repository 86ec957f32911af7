use crate::{codec::CodecError, project::ProjectionError, query::QueryError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error wrapping each module's failure type.
/// `class` and `origin` give a stable coarse classification for callers that
/// map errors onto their own taxonomy.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Query(QueryError::Syntax { .. }) => ErrorClass::Syntax,
            Self::Query(QueryError::Format { .. }) => ErrorClass::Format,
            Self::Projection(
                ProjectionError::FieldNotFound { .. } | ProjectionError::UnknownFilter { .. },
            ) => ErrorClass::NotFound,
            Self::Projection(
                ProjectionError::InvalidNestedField { .. }
                | ProjectionError::FilterNotApplicable { .. },
            ) => ErrorClass::Unsupported,
            Self::Projection(ProjectionError::RelationUnavailable { .. }) => {
                ErrorClass::InvariantViolation
            }
            Self::Projection(ProjectionError::Codec(_)) | Self::Codec(_) => ErrorClass::Conversion,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Query(_) => ErrorOrigin::Query,
            Self::Projection(ProjectionError::Codec(_)) | Self::Codec(_) => ErrorOrigin::Codec,
            Self::Projection(_) => ErrorOrigin::Projection,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin(), self.class())
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Query text does not follow the grammar.
    Syntax,
    /// Query text is well-formed but describes an invalid query.
    Format,
    NotFound,
    Unsupported,
    /// Raw value could not be converted for its declared field kind.
    Conversion,
    /// The host answered with data contradicting its own field metadata.
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Syntax => "syntax",
            Self::Format => "format",
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
            Self::Conversion => "conversion",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Query,
    Projection,
    Codec,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Query => "query",
            Self::Projection => "projection",
            Self::Codec => "codec",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
