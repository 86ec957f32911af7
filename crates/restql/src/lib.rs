//! ## Crate layout
//! - `core`: the projection engine (query language, projector, codec, host traits).
//! - `config`: TOML-backed serializer settings.
//! - `envelope`: success and error response bodies.
//! - `error`: public error taxonomy with hint text.
//! - `fixture`: JSON record graphs for tests, demos, and the shell.
//! - `serializer`: the `Serializer` entry point.
//!
//! The `prelude` module carries what a caller needs to serialize records.

pub use restql_core as core;

pub mod config;
pub mod envelope;
pub mod error;
pub mod fixture;
pub mod serializer;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::ProjectionConfig;
pub use envelope::Envelope;
pub use error::Error;
pub use serializer::Serializer;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        Envelope, Error, ProjectionConfig, Serializer,
        core::{
            filter::FilterRegistry,
            memory::MemoryRecord,
            model::{EntityModel, FieldKind, FieldModel},
            overwrite::Overwrites,
            project::Projection,
            traits::{FieldResolver as _, Record, RecordSet, Related},
            value::Value,
        },
    };
}
