//! Infrastructure error types

use apitest_application::SuiteError;
use thiserror::Error;

use crate::serialization::RuleTableError;

/// Errors raised while setting up or running a harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The rule table could not be turned into a suite.
    #[error(transparent)]
    Suite(#[from] SuiteError),

    /// The rule table file could not be loaded.
    #[error(transparent)]
    RuleTable(#[from] RuleTableError),

    /// The configured unit filter is not a valid regex.
    #[error("invalid unit filter '{pattern}': {source}")]
    InvalidFilter {
        /// The rejected pattern.
        pattern: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },
}

/// Result type alias for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
