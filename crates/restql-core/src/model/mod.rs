//! Runtime entity metadata.
//!
//! Hosts that keep their own schema registry implement `FieldResolver`
//! directly; `EntityModel` is the plain owned form used by the in-memory
//! records, fixtures, and tests.
pub mod entity;
pub mod field;

pub use entity::EntityModel;
pub use field::{Cardinality, FieldKind, FieldModel};
