mod record_set;

pub use record_set::RecordSet;

use crate::{model::FieldKind, value::Value};

///
/// FieldResolver
///
/// Field metadata capability supplied by the host.
/// Reports the declared field set of one entity and the type tag of each field;
/// the projector never infers a kind from a value.
///

pub trait FieldResolver {
    /// Entity name used in diagnostics.
    fn entity_name(&self) -> &str;

    /// Declared field names in their canonical order.
    fn field_names(&self) -> Vec<&str>;

    /// Declared kind of `name`, or `None` when the entity has no such field.
    fn field_kind(&self, name: &str) -> Option<FieldKind>;

    fn has_field(&self, name: &str) -> bool {
        self.field_kind(name).is_some()
    }
}

///
/// Record
///
/// Borrowed view of one host entity instance.
///
/// `value` serves value-typed fields; `related` serves relation fields.
/// Records are read concurrently during parallel projection, hence `Sync`.
///

pub trait Record: FieldResolver + Sync {
    /// Identifier emitted for relation fields projected without a nested query.
    fn id(&self) -> Value;

    /// Raw value of a value-typed field.
    fn value(&self, field: &str) -> Option<Value>;

    /// Related records behind a relation field.
    fn related(&self, field: &str) -> Option<Related<'_>>;
}

///
/// Related
///

pub enum Related<'a> {
    One(Option<&'a dyn Record>),
    Many(RecordSet<'a>),
}

impl<T: FieldResolver + ?Sized> FieldResolver for &T {
    fn entity_name(&self) -> &str {
        (**self).entity_name()
    }

    fn field_names(&self) -> Vec<&str> {
        (**self).field_names()
    }

    fn field_kind(&self, name: &str) -> Option<FieldKind> {
        (**self).field_kind(name)
    }
}

impl<T: Record + ?Sized> Record for &T {
    fn id(&self) -> Value {
        (**self).id()
    }

    fn value(&self, field: &str) -> Option<Value> {
        (**self).value(field)
    }

    fn related(&self, field: &str) -> Option<Related<'_>> {
        (**self).related(field)
    }
}
