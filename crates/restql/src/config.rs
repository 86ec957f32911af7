use crate::error::Error;
use chrono::FixedOffset;
use restql_core::{
    codec::{Codec, DEFAULT_IMAGE_MARKER, DEFAULT_IMAGE_MIME, DisplayOffset},
    query::{self, DEFAULT_MAX_DEPTH, ParseOptions},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

///
/// CONSTANTS
///

pub const DEFAULT_QUERY: &str = "{*}";

/// Collections at least this long are projected in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

///
/// ProjectionConfig
///
/// Serializer settings, normally read from a `restql.toml`:
///
/// ```toml
/// default_query = "{*}"
/// max_depth = 32            # 0 disables the bound
/// image_marker = "image_"
/// image_mime = "image/png"
/// utc_offset = "+01:00"     # omit for the local offset
/// parallel_threshold = 64   # 0 never fans out
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    pub default_query: String,
    pub max_depth: usize,
    pub image_marker: String,
    pub image_mime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
    pub parallel_threshold: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            default_query: DEFAULT_QUERY.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            image_marker: DEFAULT_IMAGE_MARKER.to_string(),
            image_mime: DEFAULT_IMAGE_MIME.to_string(),
            utc_offset: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ProjectionConfig {
    /// Parse and validate TOML configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(text)
            .map_err(|err| Error::config(format!("invalid configuration: {err}")))?;
        config.validate()?;

        Ok(config)
    }

    /// Read and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            Error::config(format!("cannot read configuration '{}': {err}", path.display()))
        })?;

        Self::from_toml_str(&text)
    }

    /// Check every setting that can only fail at use time.
    pub fn validate(&self) -> Result<(), Error> {
        self.display_offset()?;
        query::parse_with(&self.default_query, self.parse_options()).map_err(|err| {
            Error::config(format!(
                "default_query '{}' is invalid: {err}",
                self.default_query
            ))
        })?;

        Ok(())
    }

    #[must_use]
    pub const fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_depth: if self.max_depth == 0 {
                None
            } else {
                Some(self.max_depth)
            },
        }
    }

    pub fn display_offset(&self) -> Result<DisplayOffset, Error> {
        let Some(raw) = self.utc_offset.as_deref() else {
            return Ok(DisplayOffset::Local);
        };

        parse_offset(raw)
            .map(DisplayOffset::Fixed)
            .ok_or_else(|| {
                Error::config(format!(
                    "utc_offset '{raw}' is invalid: expected Z or +HH:MM / -HH:MM"
                ))
            })
    }

    pub fn codec(&self) -> Result<Codec, Error> {
        Ok(Codec::new()
            .with_image_marker(self.image_marker.clone())
            .with_image_mime(self.image_mime.clone())
            .with_offset(self.display_offset()?))
    }
}

// Z | UTC | ±HH:MM
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    // chrono stops at the end of the offset and treats the colon as optional
    if raw.len() != 6 || raw.as_bytes()[3] != b':' {
        return None;
    }

    raw.parse().ok()
}

///
/// TESTS
///
