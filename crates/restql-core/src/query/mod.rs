//! Projection query language.
//!
//! A query is a brace-delimited selector list, optionally preceded by an
//! argument block that renames fields or attaches filter methods:
//!
//! ```text
//! (id:item_id, line_ids:lines~active_only){id, name, line_ids{id, qty}, -secret}
//! ```
//!
//! `parse` compiles the text into an immutable `ParsedQuery` tree.
mod lexer;
mod parser;

#[cfg(test)]
mod tests;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Default bound on selector nesting; also bounds projection recursion.
pub const DEFAULT_MAX_DEPTH: usize = 32;

///
/// QueryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    /// Malformed query text.
    #[error("{message}{}", offending_suffix(.offending))]
    Syntax {
        message: String,
        /// Unparsed input starting at the failure point.
        offending: String,
        offset: usize,
    },

    /// Well-formed text describing an invalid query.
    #[error("{message}")]
    Format { message: String },
}

impl QueryError {
    pub(crate) fn syntax(message: impl Into<String>, source: &str, offset: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            offending: source.get(offset..).unwrap_or_default().trim_end().to_string(),
            offset,
        }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}

fn offending_suffix(offending: &str) -> String {
    if offending.is_empty() {
        String::new()
    } else {
        format!(" on '{offending}'")
    }
}

///
/// ParseOptions
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseOptions {
    /// Maximum nesting below the top level; `None` disables the bound.
    pub max_depth: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

/// Parse query text with the default options.
pub fn parse(raw: &str) -> Result<ParsedQuery, QueryError> {
    parse_with(raw, ParseOptions::default())
}

/// Parse query text with explicit options.
pub fn parse_with(raw: &str, options: ParseOptions) -> Result<ParsedQuery, QueryError> {
    parser::Parser::new(raw, options)?.parse()
}

///
/// FieldArguments
/// Rename and filter-method arguments registered for one field.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldArguments {
    pub rename: Option<String>,
    pub filter: Option<String>,
}

impl FieldArguments {
    /// Output key for `field`; the field name itself unless renamed.
    #[must_use]
    pub fn output_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.rename.as_deref().unwrap_or(field)
    }
}

///
/// Selector
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Selector {
    Wildcard,
    Flat(String),
    Nested(String, ParsedQuery),
}

impl Selector {
    /// Field name for flat and nested selectors.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Wildcard => None,
            Self::Flat(name) | Self::Nested(name, _) => Some(name),
        }
    }
}

///
/// ParsedQuery
///
/// Compiled form of one query level.
///
/// - `include` keeps selector order; it drives output key order.
/// - When `exclude` is non-empty, `include` holds only nested selectors.
/// - Both empty means "project nothing", not "project everything".
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedQuery {
    include: Vec<Selector>,
    exclude: BTreeSet<String>,
    arguments: BTreeMap<String, FieldArguments>,
}

impl ParsedQuery {
    pub(crate) const fn from_parts(
        include: Vec<Selector>,
        exclude: BTreeSet<String>,
        arguments: BTreeMap<String, FieldArguments>,
    ) -> Self {
        Self {
            include,
            exclude,
            arguments,
        }
    }

    #[must_use]
    pub fn include(&self) -> &[Selector] {
        &self.include
    }

    #[must_use]
    pub const fn exclude(&self) -> &BTreeSet<String> {
        &self.exclude
    }

    #[must_use]
    pub const fn arguments(&self) -> &BTreeMap<String, FieldArguments> {
        &self.arguments
    }

    #[must_use]
    pub fn argument(&self, field: &str) -> Option<&FieldArguments> {
        self.arguments.get(field)
    }

    /// True for `{}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    #[must_use]
    pub fn is_exclusion(&self) -> bool {
        !self.exclude.is_empty()
    }

    /// Deepest nesting level below this one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.include
            .iter()
            .filter_map(|selector| match selector {
                Selector::Nested(_, nested) => Some(nested.depth() + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }
}

// Canonical text: arguments sorted by field, selectors in order, excludes last.
impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.arguments.is_empty() {
            f.write_str("(")?;
            for (i, (field, args)) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                f.write_str(field)?;
                if let Some(rename) = &args.rename {
                    write!(f, ":{rename}")?;
                }
                if let Some(filter) = &args.filter {
                    write!(f, "~{filter}")?;
                }
            }
            f.write_str(")")?;
        }

        f.write_str("{")?;
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| {
            if first {
                first = false;
                Ok(())
            } else {
                f.write_str(",")
            }
        };
        for selector in &self.include {
            sep(f)?;
            match selector {
                Selector::Wildcard => f.write_str("*")?,
                Selector::Flat(name) => f.write_str(name)?,
                Selector::Nested(name, nested) => write!(f, "{name}{nested}")?,
            }
        }
        for name in &self.exclude {
            sep(f)?;
            write!(f, "-{name}")?;
        }
        f.write_str("}")
    }
}
