use crate::{config::ProjectionConfig, error::Error};
use restql_core::{
    filter::FilterRegistry,
    overwrite::Overwrites,
    project::{Projection, ProjectionError, Projector},
    query::{self, ParsedQuery},
    traits::Record,
};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

///
/// Serializer
///
/// Entry point for turning host records into query-shaped JSON.
/// Parses the query once per call, projects one record or a collection, and
/// applies overwrites to each top-level projection.
///

#[derive(Clone, Debug)]
pub struct Serializer {
    config: ProjectionConfig,
    projector: Projector,
}

impl Default for Serializer {
    fn default() -> Self {
        Self {
            config: ProjectionConfig::default(),
            projector: Projector::new(),
        }
    }
}

impl Serializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a serializer from validated configuration.
    pub fn from_config(config: ProjectionConfig) -> Result<Self, Error> {
        config.validate()?;
        let projector = Projector::new().with_codec(config.codec()?);

        Ok(Self { config, projector })
    }

    #[must_use]
    pub fn with_filters(mut self, filters: FilterRegistry) -> Self {
        self.projector = self.projector.with_filters(filters);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    #[must_use]
    pub const fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Compile `raw`, or the configured default query when `None`.
    pub fn parse(&self, raw: Option<&str>) -> Result<ParsedQuery, Error> {
        let raw = raw.unwrap_or(&self.config.default_query);

        query::parse_with(raw, self.config.parse_options()).map_err(|err| {
            warn!(query = raw, error = %err, "query rejected");
            Error::from(err)
        })
    }

    /// Serialize one record.
    pub fn one(
        &self,
        record: &dyn Record,
        query: Option<&str>,
        overwrites: &Overwrites,
    ) -> Result<Projection, Error> {
        let parsed = self.parse(query)?;
        debug!(entity = record.entity_name(), query = %parsed, "serializing record");

        let mut out = self.projector.project(record, &parsed).map_err(|err| {
            warn!(entity = record.entity_name(), query = %parsed, error = %err, "projection failed");
            Error::from(err)
        })?;
        overwrites.apply(&mut out);

        Ok(out)
    }

    /// Serialize a collection; output order follows input order.
    pub fn many<R: Record>(
        &self,
        records: &[R],
        query: Option<&str>,
        overwrites: &Overwrites,
    ) -> Result<Vec<Projection>, Error> {
        let parsed = self.parse(query)?;
        let parallel = self.use_parallel(records.len());
        debug!(records = records.len(), parallel, query = %parsed, "serializing records");

        let result = if parallel {
            self.project_many_par(records, &parsed)
        } else {
            self.projector.project_many(records, &parsed)
        };
        let mut rows = result.map_err(|err| {
            warn!(records = records.len(), query = %parsed, error = %err, "projection failed");
            Error::from(err)
        })?;

        if !overwrites.is_empty() {
            for row in &mut rows {
                overwrites.apply(row);
            }
        }

        Ok(rows)
    }

    /// `many` rendered as a JSON array.
    pub fn many_json<R: Record>(
        &self,
        records: &[R],
        query: Option<&str>,
        overwrites: &Overwrites,
    ) -> Result<JsonValue, Error> {
        let rows = self.many(records, query, overwrites)?;

        Ok(JsonValue::Array(rows.into_iter().map(JsonValue::Object).collect()))
    }

    const fn use_parallel(&self, len: usize) -> bool {
        cfg!(feature = "parallel")
            && self.config.parallel_threshold > 0
            && len >= self.config.parallel_threshold
    }

    #[cfg(feature = "parallel")]
    fn project_many_par<R: Record>(
        &self,
        records: &[R],
        parsed: &ParsedQuery,
    ) -> Result<Vec<Projection>, ProjectionError> {
        self.projector.project_many_par(records, parsed)
    }

    #[cfg(not(feature = "parallel"))]
    fn project_many_par<R: Record>(
        &self,
        records: &[R],
        parsed: &ParsedQuery,
    ) -> Result<Vec<Projection>, ProjectionError> {
        self.projector.project_many(records, parsed)
    }
}
