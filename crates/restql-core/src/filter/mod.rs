//! Named filter methods for to-many relations.
//!
//! A filter takes the related set of one relation and returns the set to
//! enumerate, possibly narrowed or reordered. The projector resolves filter
//! names through this table only; it never dispatches by method name on the
//! record itself.

use crate::traits::RecordSet;
use std::{collections::BTreeMap, fmt, sync::Arc};

///
/// FilterFn
///

pub type FilterFn = Arc<dyn for<'a> Fn(RecordSet<'a>) -> RecordSet<'a> + Send + Sync>;

///
/// FilterRegistry
///

#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: BTreeMap<String, FilterFn>,
}

impl FilterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `filter` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: for<'a> Fn(RecordSet<'a>) -> RecordSet<'a> + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    /// Builder form of `register`.
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, filter: F) -> Self
    where
        F: for<'a> Fn(RecordSet<'a>) -> RecordSet<'a> + Send + Sync + 'static,
    {
        self.register(name, filter);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FilterFn> {
        self.filters.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.filters.keys()).finish()
    }
}

///
/// TESTS
///
