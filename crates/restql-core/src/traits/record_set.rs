use crate::{traits::Record, value::Value};
use derive_more::{Deref, IntoIterator};
use std::{cmp::Ordering, fmt};

///
/// RecordSet
///
/// Ordered handle over the members of a many-valued relation.
/// Filter methods take a set and return a (possibly narrowed or reordered) set;
/// the projector enumerates whatever order they hand back.
///

#[derive(Clone, Default, Deref, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct RecordSet<'a> {
    records: Vec<&'a dyn Record>,
}

impl<'a> RecordSet<'a> {
    #[must_use]
    pub const fn new(records: Vec<&'a dyn Record>) -> Self {
        Self { records }
    }

    /// Keep the members matching `keep`, preserving order.
    #[must_use]
    pub fn filter(mut self, mut keep: impl FnMut(&dyn Record) -> bool) -> Self {
        self.records.retain(|record| keep(*record));
        self
    }

    /// Stable sort of the members.
    #[must_use]
    pub fn sorted_by(mut self, mut compare: impl FnMut(&dyn Record, &dyn Record) -> Ordering) -> Self {
        self.records.sort_by(|left, right| compare(*left, *right));
        self
    }

    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.records.reverse();
        self
    }

    #[must_use]
    pub fn truncated(mut self, len: usize) -> Self {
        self.records.truncate(len);
        self
    }

    /// Member identifiers in set order.
    #[must_use]
    pub fn ids(&self) -> Vec<Value> {
        self.records.iter().map(|record| record.id()).collect()
    }
}

impl<'a> FromIterator<&'a dyn Record> for RecordSet<'a> {
    fn from_iter<I: IntoIterator<Item = &'a dyn Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Debug for RecordSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.records
                    .iter()
                    .map(|record| format!("{}({:?})", record.entity_name(), record.id())),
            )
            .finish()
    }
}
