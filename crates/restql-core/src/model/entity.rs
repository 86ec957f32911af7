use crate::{
    model::field::{FieldKind, FieldModel},
    traits::FieldResolver,
};
use serde::{Deserialize, Serialize};

///
/// EntityModel
/// Runtime model for one entity: its name and ordered field list.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityModel {
    /// Stable external name used in diagnostics and relation targets.
    pub name: String,
    /// Ordered field list (authoritative for wildcard and exclusion order).
    pub fields: Vec<FieldModel>,
}

impl EntityModel {
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<FieldModel>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Resolve one field model entry by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl FieldResolver for EntityModel {
    fn entity_name(&self) -> &str {
        &self.name
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.field(name).map(|field| field.kind)
    }
}
