use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

///
/// Envelope
///
/// Response body wrapping a serializer outcome:
///
/// success → `{"status": "success", "result": ..., "meta": ...}`
/// error   → `{"status": "error", "message": ..., "hint": ...}`
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Envelope {
    Success {
        result: JsonValue,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<JsonValue>,
    },
    Error {
        message: String,
        hint: String,
    },
}

impl Envelope {
    #[must_use]
    pub fn success(result: impl Into<JsonValue>) -> Self {
        Self::Success {
            result: result.into(),
            meta: None,
        }
    }

    #[must_use]
    pub fn with_meta(self, meta: impl Into<JsonValue>) -> Self {
        match self {
            Self::Success { result, .. } => Self::Success {
                result,
                meta: Some(meta.into()),
            },
            error @ Self::Error { .. } => error,
        }
    }

    #[must_use]
    pub fn failure(err: &Error) -> Self {
        Self::Error {
            message: err.message.clone(),
            hint: err.hint().to_string(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl<T: Into<JsonValue>> From<Result<T, Error>> for Envelope {
    fn from(outcome: Result<T, Error>) -> Self {
        match outcome {
            Ok(result) => Self::success(result),
            Err(err) => Self::failure(&err),
        }
    }
}

///
/// TESTS
///
