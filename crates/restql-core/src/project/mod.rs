//! Query projection over host record graphs.
//!
//! `Projector` walks one record with a `ParsedQuery`, resolving field kinds
//! through the record's `FieldResolver`, converting values through the
//! `Codec`, and recursing into relations for nested selectors. Output maps keep
//! key insertion order.


use crate::{
    codec::{Codec, CodecError, FieldData},
    filter::FilterRegistry,
    model::{Cardinality, FieldKind},
    query::{ParsedQuery, Selector},
    traits::{Record, RecordSet, Related},
};
use serde_json::{Map, Value as JsonValue};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One projected record.
pub type Projection = Map<String, JsonValue>;

///
/// ProjectionError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ProjectionError {
    #[error("field '{field}' does not exist on entity '{entity}'")]
    FieldNotFound { entity: String, field: String },

    #[error("field '{field}' on entity '{entity}' is {kind}, not a relation, and cannot be nested")]
    InvalidNestedField {
        entity: String,
        field: String,
        kind: FieldKind,
    },

    #[error("filter method '{filter}' requested on field '{field}' is not registered")]
    UnknownFilter { field: String, filter: String },

    #[error("filter method '{filter}' cannot apply to field '{field}': it is not a to-many relation")]
    FilterNotApplicable { field: String, filter: String },

    #[error("relation '{field}' on entity '{entity}' did not resolve to a {expected} relation")]
    RelationUnavailable {
        entity: String,
        field: String,
        expected: Cardinality,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ProjectionError {
    fn field_not_found(record: &dyn Record, field: &str) -> Self {
        Self::FieldNotFound {
            entity: record.entity_name().to_string(),
            field: field.to_string(),
        }
    }

    fn relation_unavailable(record: &dyn Record, field: &str, expected: Cardinality) -> Self {
        Self::RelationUnavailable {
            entity: record.entity_name().to_string(),
            field: field.to_string(),
            expected,
        }
    }
}

///
/// Projector
///
/// Stateless between calls; one projector can serve any number of
/// concurrent projections.
///

#[derive(Clone, Debug, Default)]
pub struct Projector {
    filters: FilterRegistry,
    codec: Codec,
}

impl Projector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filters(mut self, filters: FilterRegistry) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    #[must_use]
    pub const fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Project one record.
    pub fn project(
        &self,
        record: &dyn Record,
        query: &ParsedQuery,
    ) -> Result<Projection, ProjectionError> {
        if query.is_exclusion() {
            self.project_exclusion(record, query)
        } else {
            self.project_inclusion(record, query)
        }
    }

    /// Project each record independently; output order follows input order.
    pub fn project_many<R: Record>(
        &self,
        records: &[R],
        query: &ParsedQuery,
    ) -> Result<Vec<Projection>, ProjectionError> {
        records
            .iter()
            .map(|record| self.project(record, query))
            .collect()
    }

    /// Parallel `project_many`: same output, same error for the same input.
    #[cfg(feature = "parallel")]
    pub fn project_many_par<R: Record>(
        &self,
        records: &[R],
        query: &ParsedQuery,
    ) -> Result<Vec<Projection>, ProjectionError> {
        let results: Vec<_> = records
            .par_iter()
            .map(|record| self.project(record, query))
            .collect();

        // first failure in input order, as the sequential path reports
        results.into_iter().collect()
    }

    //
    // Levels
    //

    // Explicit selectors in order; `*` expands in place to the fields not
    // explicitly selected at this level.
    fn project_inclusion(
        &self,
        record: &dyn Record,
        query: &ParsedQuery,
    ) -> Result<Projection, ProjectionError> {
        let mut out = Projection::new();
        let explicit: BTreeSet<&str> = query.include().iter().filter_map(Selector::field).collect();

        for selector in query.include() {
            match selector {
                Selector::Wildcard => {
                    for field in record.field_names() {
                        if !explicit.contains(field) {
                            self.emit_flat(record, query, field, &mut out)?;
                        }
                    }
                }
                Selector::Flat(field) => self.emit_flat(record, query, field, &mut out)?,
                Selector::Nested(field, nested) => {
                    self.emit_nested(record, query, field, nested, &mut out)?;
                }
            }
        }

        Ok(out)
    }

    // Every declared field minus the exclusions, in resolver order; nested
    // selectors take the place of their field.
    fn project_exclusion(
        &self,
        record: &dyn Record,
        query: &ParsedQuery,
    ) -> Result<Projection, ProjectionError> {
        let nested: BTreeMap<&str, &ParsedQuery> = query
            .include()
            .iter()
            .filter_map(|selector| match selector {
                Selector::Nested(field, nested) => Some((field.as_str(), nested)),
                _ => None,
            })
            .collect();

        if let Some(missing) = nested.keys().find(|field| !record.has_field(field)) {
            return Err(ProjectionError::field_not_found(record, missing));
        }

        let mut out = Projection::new();
        for field in record.field_names() {
            if query.exclude().contains(field) {
                continue;
            }
            match nested.get(field) {
                Some(nested) => self.emit_nested(record, query, field, nested, &mut out)?,
                None => self.emit_flat(record, query, field, &mut out)?,
            }
        }

        Ok(out)
    }

    //
    // Fields
    //

    fn emit_flat(
        &self,
        record: &dyn Record,
        query: &ParsedQuery,
        field: &str,
        out: &mut Projection,
    ) -> Result<(), ProjectionError> {
        let kind = record
            .field_kind(field)
            .ok_or_else(|| ProjectionError::field_not_found(record, field))?;
        let (output, filter) = output_and_filter(query, field);
        check_filter_target(field, kind.cardinality(), filter)?;

        let data = match kind.cardinality() {
            None => FieldData::Value(
                record
                    .value(field)
                    .ok_or_else(|| ProjectionError::field_not_found(record, field))?,
            ),
            Some(Cardinality::One) => match record.related(field) {
                Some(Related::One(related)) => FieldData::One(related.map(|related| related.id())),
                _ => {
                    return Err(ProjectionError::relation_unavailable(
                        record,
                        field,
                        Cardinality::One,
                    ));
                }
            },
            Some(Cardinality::Many) => {
                let members = self.related_many(record, field, filter)?;
                FieldData::Many(members.ids())
            }
        };

        let value = self.codec.encode(field, kind, data)?;
        out.insert(output.to_string(), value);

        Ok(())
    }

    fn emit_nested(
        &self,
        record: &dyn Record,
        query: &ParsedQuery,
        field: &str,
        nested: &ParsedQuery,
        out: &mut Projection,
    ) -> Result<(), ProjectionError> {
        let kind = record
            .field_kind(field)
            .ok_or_else(|| ProjectionError::field_not_found(record, field))?;
        let Some(cardinality) = kind.cardinality() else {
            return Err(ProjectionError::InvalidNestedField {
                entity: record.entity_name().to_string(),
                field: field.to_string(),
                kind,
            });
        };
        let (output, filter) = output_and_filter(query, field);
        check_filter_target(field, Some(cardinality), filter)?;

        let value = match cardinality {
            Cardinality::One => match record.related(field) {
                Some(Related::One(Some(related))) => {
                    JsonValue::Object(self.project(related, nested)?)
                }
                Some(Related::One(None)) => JsonValue::Bool(false),
                _ => {
                    return Err(ProjectionError::relation_unavailable(
                        record,
                        field,
                        Cardinality::One,
                    ));
                }
            },
            Cardinality::Many => {
                let members = self.related_many(record, field, filter)?;
                let projected = members
                    .iter()
                    .map(|member| self.project(*member, nested).map(JsonValue::Object))
                    .collect::<Result<Vec<_>, _>>()?;
                JsonValue::Array(projected)
            }
        };

        out.insert(output.to_string(), value);

        Ok(())
    }

    // Members of a to-many relation after the requested filter method.
    fn related_many<'r>(
        &self,
        record: &'r dyn Record,
        field: &str,
        filter: Option<&str>,
    ) -> Result<RecordSet<'r>, ProjectionError> {
        let Some(Related::Many(members)) = record.related(field) else {
            return Err(ProjectionError::relation_unavailable(
                record,
                field,
                Cardinality::Many,
            ));
        };

        match filter {
            None => Ok(members),
            Some(name) => {
                let filter = self
                    .filters
                    .get(name)
                    .ok_or_else(|| ProjectionError::UnknownFilter {
                        field: field.to_string(),
                        filter: name.to_string(),
                    })?;
                Ok(filter(members))
            }
        }
    }
}

// Output key and filter method registered for `field` at this level.
fn output_and_filter<'q>(query: &'q ParsedQuery, field: &'q str) -> (&'q str, Option<&'q str>) {
    query.argument(field).map_or((field, None), |args| {
        (args.output_name(field), args.filter.as_deref())
    })
}

fn check_filter_target(
    field: &str,
    cardinality: Option<Cardinality>,
    filter: Option<&str>,
) -> Result<(), ProjectionError> {
    match filter {
        Some(filter) if cardinality != Some(Cardinality::Many) => {
            Err(ProjectionError::FilterNotApplicable {
                field: field.to_string(),
                filter: filter.to_string(),
            })
        }
        _ => Ok(()),
    }
}
