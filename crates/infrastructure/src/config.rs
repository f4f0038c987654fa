//! Harness configuration.
//!
//! Settings can be built in code or read from `APITEST_*` environment
//! variables.

use regex::Regex;
use serde::{Deserialize, Serialize};

use apitest_application::FALLBACK_ENDPOINT;

use crate::error::{HarnessError, HarnessResult};

/// Environment variable overriding [`HarnessConfig::fallback_endpoint`].
pub const ENV_FALLBACK_ENDPOINT: &str = "APITEST_FALLBACK_ENDPOINT";
/// Environment variable overriding [`HarnessConfig::stop_on_failure`].
pub const ENV_STOP_ON_FAILURE: &str = "APITEST_STOP_ON_FAILURE";
/// Environment variable overriding [`HarnessConfig::filter`].
pub const ENV_FILTER: &str = "APITEST_FILTER";

/// How a harness selects and runs units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Endpoint used when neither a rule nor the suite names one.
    pub fallback_endpoint: String,
    /// Skip the remaining units after the first failure.
    pub stop_on_failure: bool,
    /// Regex on unit names; non-matching units are skipped.
    pub filter: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fallback_endpoint: FALLBACK_ENDPOINT.to_string(),
            stop_on_failure: false,
            filter: None,
        }
    }
}

impl HarnessConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for unset keys.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            fallback_endpoint: non_empty(ENV_FALLBACK_ENDPOINT).unwrap_or(defaults.fallback_endpoint),
            stop_on_failure: non_empty(ENV_STOP_ON_FAILURE)
                .map_or(defaults.stop_on_failure, |value| parse_flag(&value)),
            filter: non_empty(ENV_FILTER).or(defaults.filter),
        }
    }

    /// Sets the fallback endpoint (builder pattern).
    #[must_use]
    pub fn with_fallback_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.fallback_endpoint = endpoint.into();
        self
    }

    /// Sets whether to stop on first failure (builder pattern).
    #[must_use]
    pub fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Sets the unit name filter (builder pattern).
    #[must_use]
    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    /// Compiles the unit name filter.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidFilter`] if the pattern does not compile.
    pub fn filter_regex(&self) -> HarnessResult<Option<Regex>> {
        self.filter
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| HarnessError::InvalidFilter {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
