//! Post-projection key overwrites.
//!
//! Overwrites run once per top-level projected record, after projection and
//! never inside nested recursion.

use serde_json::{Map, Value as JsonValue};
use std::{fmt, sync::Arc};

///
/// ComputeFn
/// Receives the projected value under the key (if any) and the key itself.
///

pub type ComputeFn = Arc<dyn Fn(Option<&JsonValue>, &str) -> JsonValue + Send + Sync>;

///
/// Overwrite
///

#[derive(Clone)]
pub enum Overwrite {
    /// Assign this value, inserting the key when absent.
    Literal(JsonValue),

    /// Assign the result of the function.
    Compute(ComputeFn),
}

impl Overwrite {
    fn resolve(&self, current: Option<&JsonValue>, key: &str) -> JsonValue {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Compute(compute) => compute(current, key),
        }
    }
}

impl fmt::Debug for Overwrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

///
/// Overwrites
/// Ordered overwrite list; registration order is application order.
///

#[derive(Clone, Debug, Default)]
pub struct Overwrites {
    entries: Vec<(String, Overwrite)>,
}

impl Overwrites {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn literal(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.entries
            .push((key.into(), Overwrite::Literal(value.into())));
        self
    }

    #[must_use]
    pub fn compute<F>(mut self, key: impl Into<String>, compute: F) -> Self
    where
        F: Fn(Option<&JsonValue>, &str) -> JsonValue + Send + Sync + 'static,
    {
        self.entries
            .push((key.into(), Overwrite::Compute(Arc::new(compute))));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Overwrite)> {
        self.entries
            .iter()
            .map(|(key, overwrite)| (key.as_str(), overwrite))
    }

    /// Apply every overwrite to `projected`, in registration order.
    pub fn apply(&self, projected: &mut Map<String, JsonValue>) {
        for (key, overwrite) in &self.entries {
            let value = overwrite.resolve(projected.get(key), key);
            projected.insert(key.clone(), value);
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Overwrite)> for Overwrites {
    fn from_iter<I: IntoIterator<Item = (K, Overwrite)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, overwrite)| (key.into(), overwrite))
                .collect(),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn projected() -> Map<String, JsonValue> {
        let JsonValue::Object(map) = json!({"id": 7, "name": "widget"}) else {
            unreachable!("literal is an object");
        };
        map
    }

    #[test]
    fn compute_replaces_existing_value() {
        let overwrites = Overwrites::new().compute("name", |current, _| {
            let name = current.and_then(JsonValue::as_str).unwrap_or_default();
            JsonValue::String(name.to_uppercase())
        });
        let mut out = projected();

        overwrites.apply(&mut out);

        assert_eq!(JsonValue::Object(out), json!({"id": 7, "name": "WIDGET"}));
    }

    #[test]
    fn literal_injects_missing_key() {
        let overwrites = Overwrites::new().literal("source", "catalog");
        let mut out = projected();

        overwrites.apply(&mut out);

        assert_eq!(
            JsonValue::Object(out),
            json!({"id": 7, "name": "widget", "source": "catalog"})
        );
    }

    #[test]
    fn compute_sees_absent_key_as_none() {
        let overwrites = Overwrites::new().compute("url", |current, key| {
            assert!(current.is_none());
            JsonValue::String(format!("/{key}"))
        });
        let mut out = projected();

        overwrites.apply(&mut out);

        assert_eq!(out.get("url"), Some(&json!("/url")));
    }

    #[test]
    fn later_overwrites_observe_earlier_ones() {
        let overwrites = Overwrites::new()
            .literal("id", 8)
            .compute("id", |current, _| {
                json!(current.and_then(JsonValue::as_i64).unwrap_or_default() * 10)
            });
        let mut out = projected();

        overwrites.apply(&mut out);

        assert_eq!(out.get("id"), Some(&json!(80)));
    }

    #[test]
    fn default_overwrites_are_fresh_and_empty() {
        let mut first = Overwrites::default();
        first = first.literal("a", 1);

        assert_eq!(first.len(), 1);
        assert!(Overwrites::default().is_empty());
    }
}
