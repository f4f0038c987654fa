//! Application error types

use apitest_domain::{AssertionFailure, RuleError};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while building a suite from a rule table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SuiteError {
    /// The rule table itself is malformed.
    #[error("invalid rule table: {0}")]
    InvalidTable(RuleError),

    /// One rule of the table is malformed.
    #[error("invalid rule #{index}: {source}")]
    InvalidRule {
        /// Zero-based position of the rule in the table.
        index: usize,
        /// The violated constraint.
        #[source]
        source: RuleError,
    },
}

impl SuiteError {
    /// Returns the underlying rule error.
    #[must_use]
    pub const fn rule_error(&self) -> RuleError {
        match self {
            Self::InvalidTable(error) | Self::InvalidRule { source: error, .. } => *error,
        }
    }

    /// Returns the numeric code of the underlying rule error.
    #[must_use]
    pub const fn code(&self) -> u8 {
        self.rule_error().code()
    }
}

/// Why a registered test unit failed.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum UnitFailure {
    /// The captured response did not match the rule expectation.
    #[error("{0}")]
    Assertion(#[from] AssertionFailure),

    /// A hook or the handler panicked while the unit ran.
    #[error("unit panicked: {0}")]
    Panicked(String),
}

/// Result type alias for suite construction.
pub type SuiteResult<T> = Result<T, SuiteError>;
