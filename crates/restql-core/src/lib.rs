//! Core engine for RestQL: the projection query language, the projector that
//! walks host record graphs, field-kind value conversion, and the host
//! capability traits, with the vocabulary exported via the `prelude`.

pub mod codec;
pub mod error;
pub mod filter;
pub mod memory;
pub mod model;
pub mod overwrite;
pub mod project;
pub mod query;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Domain vocabulary only; errors and configuration stay at their module paths.
///

pub mod prelude {
    pub use crate::{
        filter::FilterRegistry,
        memory::MemoryRecord,
        model::{EntityModel, FieldKind, FieldModel},
        overwrite::Overwrites,
        project::{Projection, Projector},
        query::{ParsedQuery, Selector, parse},
        traits::{FieldResolver, Record, RecordSet, Related},
        value::Value,
    };
}
