//! Entry points wiring a suite to the harness.
//!
//! ```ignore
//! let report = run_api_test_table(InProcessEngine::<MyApi>::default(), None, &rules, HarnessConfig::from_env()).await?;
//! assert!(report.all_passed());
//! ```

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use apitest_application::ports::HandlerEngine;
use apitest_application::{ApiTest, HandlerInvoker, RuleEntry};

use crate::config::HarnessConfig;
use crate::error::HarnessResult;
use crate::sandbox::StubSandbox;
use crate::serialization::load_rule_table;
use crate::testing::{SuiteReport, TestHarness};

fn suite<E>(engine: E, endpoint: Option<String>, config: &HarnessConfig) -> ApiTest<E, StubSandbox>
where
    E: HandlerEngine + 'static,
{
    let invoker =
        HandlerInvoker::new(engine, endpoint).with_fallback_endpoint(config.fallback_endpoint.clone());
    ApiTest::with_invoker(invoker, Arc::new(StubSandbox::new()))
}

/// Validates `entries`, registers one unit per rule and runs them.
///
/// # Errors
///
/// Returns an error if the filter does not compile or a rule is malformed;
/// in both cases no unit runs.
pub async fn run_api_tests<E>(
    engine: E,
    endpoint: Option<String>,
    entries: Vec<RuleEntry<StubSandbox>>,
    config: HarnessConfig,
) -> HarnessResult<SuiteReport>
where
    E: HandlerEngine + 'static,
{
    let suite = suite(engine, endpoint, &config);
    let mut harness = TestHarness::with_config(config)?;
    let count = suite.register(entries, &mut harness)?;
    info!(count, "Rules registered");
    Ok(harness.run().await)
}

/// Same as [`run_api_tests`] for an untyped rule table without hooks.
///
/// # Errors
///
/// Returns an error if the filter does not compile, `rules` is not an
/// array, or a rule is malformed.
pub async fn run_api_test_table<E>(
    engine: E,
    endpoint: Option<String>,
    rules: &Value,
    config: HarnessConfig,
) -> HarnessResult<SuiteReport>
where
    E: HandlerEngine + 'static,
{
    let suite = suite(engine, endpoint, &config);
    let mut harness = TestHarness::with_config(config)?;
    let count = suite.register_table(rules, &mut harness)?;
    info!(count, "Rules registered");
    Ok(harness.run().await)
}

/// Loads a JSON or YAML rule table and runs it.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded, or for any reason
/// [`run_api_test_table`] fails.
pub async fn run_api_test_file<E>(
    engine: E,
    endpoint: Option<String>,
    path: impl AsRef<Path>,
    config: HarnessConfig,
) -> HarnessResult<SuiteReport>
where
    E: HandlerEngine + 'static,
{
    let rules = load_rule_table(path).await?;
    run_api_test_table(engine, endpoint, &rules, config).await
}
