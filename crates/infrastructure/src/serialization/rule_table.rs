//! Rule tables stored as JSON or YAML files.
//!
//! A loaded table is an untyped [`Value`]; shape checks happen when the
//! table is registered, so a file holding a non-array still loads and then
//! fails with the invalid-rules error.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// On-disk encoding of a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTableFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl RuleTableFormat {
    /// Picks the format from the file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Errors raised while reading a rule table file.
#[derive(Debug, Error)]
pub enum RuleTableError {
    /// The file could not be read.
    #[error("failed to read rule table {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON.
    #[error("invalid JSON rule table: {0}")]
    Json(#[from] serde_json::Error),

    /// The file is not valid YAML.
    #[error("invalid YAML rule table: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension is neither JSON nor YAML.
    #[error("unsupported rule table format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Parses a rule table from text.
///
/// # Errors
///
/// Returns [`RuleTableError::Json`] or [`RuleTableError::Yaml`] if `content`
/// does not parse.
pub fn parse_rule_table(content: &str, format: RuleTableFormat) -> Result<Value, RuleTableError> {
    match format {
        RuleTableFormat::Json => Ok(serde_json::from_str(content)?),
        RuleTableFormat::Yaml => Ok(serde_yaml::from_str(content)?),
    }
}

/// Reads a rule table file, picking the format from its extension.
///
/// # Errors
///
/// Returns [`RuleTableError::UnsupportedFormat`] for unknown extensions,
/// [`RuleTableError::Io`] if the file cannot be read, or a parse error.
pub async fn load_rule_table(path: impl AsRef<Path>) -> Result<Value, RuleTableError> {
    let path = path.as_ref();
    let format = RuleTableFormat::from_path(path)
        .ok_or_else(|| RuleTableError::UnsupportedFormat(path.to_path_buf()))?;

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RuleTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), ?format, "Loading rule table");
    parse_rule_table(&content, format)
}
