//! Owned in-memory record graph.
//!
//! `MemoryRecord` implements the host capability traits over plain owned
//! data. It backs fixtures and tests, and serves hosts that already hold their
//! rows in memory. Relation members are owned by their parent, so a graph built
//! this way is always a tree.
use crate::{
    model::{EntityModel, FieldKind},
    traits::{FieldResolver, Record, RecordSet, Related},
    value::Value,
};
use std::{collections::BTreeMap, sync::Arc};

///
/// MemoryField
///

#[derive(Clone, Debug, PartialEq)]
pub enum MemoryField {
    Value(Value),
    One(Option<Box<MemoryRecord>>),
    Many(Vec<MemoryRecord>),
}

///
/// MemoryRecord
///
/// A declared field with no stored entry reads as `Null` (value fields) or as
/// an empty relation.
///

#[derive(Clone, Debug, PartialEq)]
pub struct MemoryRecord {
    model: Arc<EntityModel>,
    id: Value,
    fields: BTreeMap<String, MemoryField>,
}

impl MemoryRecord {
    /// Create a record; the identifier is also stored under `id` when the
    /// model declares that field.
    #[must_use]
    pub fn new(model: Arc<EntityModel>, id: impl Into<Value>) -> Self {
        let id = id.into();
        let mut fields = BTreeMap::new();
        if model.field("id").is_some() {
            fields.insert("id".to_string(), MemoryField::Value(id.clone()));
        }

        Self { model, id, fields }
    }

    #[must_use]
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .insert(field.into(), MemoryField::Value(value.into()));
        self
    }

    #[must_use]
    pub fn with_one(mut self, field: impl Into<String>, related: Option<Self>) -> Self {
        self.fields
            .insert(field.into(), MemoryField::One(related.map(Box::new)));
        self
    }

    #[must_use]
    pub fn with_many(mut self, field: impl Into<String>, related: Vec<Self>) -> Self {
        self.fields.insert(field.into(), MemoryField::Many(related));
        self
    }

    #[must_use]
    pub fn model(&self) -> &EntityModel {
        &self.model
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&MemoryField> {
        self.fields.get(name)
    }
}

impl FieldResolver for MemoryRecord {
    fn entity_name(&self) -> &str {
        self.model.entity_name()
    }

    fn field_names(&self) -> Vec<&str> {
        self.model.field_names()
    }

    fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.model.field_kind(name)
    }
}

impl Record for MemoryRecord {
    fn id(&self) -> Value {
        self.id.clone()
    }

    fn value(&self, field: &str) -> Option<Value> {
        if !self.model.has_field(field) {
            return None;
        }

        match self.fields.get(field) {
            Some(MemoryField::Value(value)) => Some(value.clone()),
            Some(MemoryField::One(_) | MemoryField::Many(_)) => None,
            None => Some(Value::Null),
        }
    }

    fn related(&self, field: &str) -> Option<Related<'_>> {
        let kind = self.model.field_kind(field)?;

        match self.fields.get(field) {
            Some(MemoryField::One(related)) => Some(Related::One(
                related.as_deref().map(|record| record as &dyn Record),
            )),
            Some(MemoryField::Many(related)) => Some(Related::Many(
                related.iter().map(|record| record as &dyn Record).collect(),
            )),
            Some(MemoryField::Value(_)) => None,
            None => match kind {
                FieldKind::ManyToOne => Some(Related::One(None)),
                FieldKind::ToMany => Some(Related::Many(RecordSet::default())),
                _ => None,
            },
        }
    }
}

///
/// TESTS
///
