//! Register suite use case.
//!
//! Turns a rule table into test units. Every rule is validated before
//! anything is registered, so a malformed table never produces a partial
//! suite.

use std::sync::Arc;

use apitest_domain::{Rule, match_response, rule_list, validate_rule};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{SuiteError, SuiteResult, UnitFailure};
use crate::hooks::{RuleEntry, RuleHooks};
use crate::ports::{HandlerEngine, Sandbox, TestRegistry, TestUnit};
use crate::use_cases::HandlerInvoker;

/// A declarative API test suite bound to one handler engine.
pub struct ApiTest<E: HandlerEngine, S: Sandbox> {
    invoker: Arc<HandlerInvoker<E>>,
    sandbox: Arc<S>,
}

impl<E, S> ApiTest<E, S>
where
    E: HandlerEngine + 'static,
    S: Sandbox + 'static,
{
    /// Creates a suite for `engine`, using `endpoint` as the default endpoint.
    #[must_use]
    pub fn new(engine: E, endpoint: Option<String>, sandbox: Arc<S>) -> Self {
        Self::with_invoker(HandlerInvoker::new(engine, endpoint), sandbox)
    }

    /// Creates a suite around a configured invoker.
    #[must_use]
    pub fn with_invoker(invoker: HandlerInvoker<E>, sandbox: Arc<S>) -> Self {
        Self {
            invoker: Arc::new(invoker),
            sandbox,
        }
    }

    /// Returns the sandbox shared by the units of this suite.
    #[must_use]
    pub const fn sandbox(&self) -> &Arc<S> {
        &self.sandbox
    }

    /// Validates every rule and registers one unit per rule, plus a hook
    /// that restores the sandbox after each unit.
    ///
    /// Returns the number of registered units.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::InvalidRule`] for the first malformed rule; in
    /// that case nothing is registered.
    pub fn register<R>(&self, entries: Vec<RuleEntry<S>>, registry: &mut R) -> SuiteResult<usize>
    where
        R: TestRegistry + ?Sized,
    {
        let rules = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let rule = validate_rule(&entry.definition)
                    .map_err(|source| SuiteError::InvalidRule { index, source })?;
                debug!(index, description = %rule.description, "Rule validated");
                Ok((rule, entry.hooks))
            })
            .collect::<SuiteResult<Vec<_>>>()?;

        let sandbox = Arc::clone(&self.sandbox);
        registry.after_each(Arc::new(move || sandbox.restore()));

        let count = rules.len();
        for (rule, hooks) in rules {
            registry.register(self.unit(rule, hooks));
        }

        Ok(count)
    }

    /// Registers an untyped rule table (rules without hooks).
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::InvalidTable`] if `rules` is not an array, or
    /// [`SuiteError::InvalidRule`] for the first malformed rule.
    pub fn register_table<R>(&self, rules: &Value, registry: &mut R) -> SuiteResult<usize>
    where
        R: TestRegistry + ?Sized,
    {
        let entries = rule_list(rules)
            .map_err(SuiteError::InvalidTable)?
            .iter()
            .cloned()
            .map(RuleEntry::new)
            .collect();

        self.register(entries, registry)
    }

    fn unit(&self, rule: Rule, hooks: RuleHooks<S>) -> TestUnit {
        let invoker = Arc::clone(&self.invoker);
        let sandbox = Arc::clone(&self.sandbox);
        let name = rule.description.clone();
        let exclusive = rule.only;

        debug!(description = %name, exclusive, "Registering unit");

        TestUnit::new(name, move || {
            Box::pin(async move { execute(&invoker, &rule, &hooks, sandbox.as_ref()).await })
        })
        .exclusive(exclusive)
    }
}

/// Runs one rule: invoke the handler, match the response, run `after`.
///
/// # Errors
///
/// Returns [`UnitFailure::Assertion`] if the response does not match.
pub async fn execute<E, S>(
    invoker: &HandlerInvoker<E>,
    rule: &Rule,
    hooks: &RuleHooks<S>,
    sandbox: &S,
) -> Result<(), UnitFailure>
where
    E: HandlerEngine,
    S: Sandbox,
{
    let response = invoker.invoke(rule, hooks, sandbox).await;

    if let Err(failure) = match_response(&rule.response, &response) {
        warn!(
            description = %rule.description,
            mismatch = ?failure.mismatch,
            "{}",
            failure
        );
        return Err(failure.into());
    }

    hooks.run_after(&response, sandbox);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CleanupHook;
    use crate::use_cases::invoke_handler::tests::{Behavior, FakeEngine};
    use apitest_domain::{Mismatch, ResponseSnapshot, RuleError};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSandbox {
        restores: AtomicUsize,
        stubs: Mutex<Vec<String>>,
    }

    impl Sandbox for CountingSandbox {
        fn restore(&self) {
            self.restores.fetch_add(1, Ordering::SeqCst);
            self.stubs.lock().clear();
        }
    }

    #[derive(Default)]
    struct RecordingRegistry {
        units: Vec<TestUnit>,
        cleanups: Vec<CleanupHook>,
    }

    impl TestRegistry for RecordingRegistry {
        fn register(&mut self, unit: TestUnit) {
            self.units.push(unit);
        }

        fn after_each(&mut self, hook: CleanupHook) {
            self.cleanups.push(hook);
        }
    }

    impl RecordingRegistry {
        async fn run_all(self) -> Vec<(String, Result<(), UnitFailure>)> {
            let mut results = Vec::new();
            for unit in self.units {
                let name = unit.name().to_string();
                let result = unit.run().await;
                for cleanup in &self.cleanups {
                    cleanup();
                }
                results.push((name, result));
            }
            results
        }
    }

    fn suite(behavior: Behavior) -> (ApiTest<FakeEngine, CountingSandbox>, FakeEngine) {
        let engine = FakeEngine::new(behavior);
        let suite = ApiTest::new(
            engine.clone(),
            Some("/custom/path/to/my/api".to_string()),
            Arc::new(CountingSandbox::default()),
        );
        (suite, engine)
    }

    fn ok_response() -> Behavior {
        Behavior::Respond(ResponseSnapshot::new(200).with_body(json!({})))
    }

    #[test]
    fn test_invalid_rule_registers_nothing() {
        let (suite, _) = suite(ok_response());
        let mut registry = RecordingRegistry::default();

        let entries = vec![
            RuleEntry::new(json!({ "description": "fine", "response": {} })),
            RuleEntry::new(json!({ "response": {} })),
        ];
        let error = suite.register(entries, &mut registry).expect_err("should fail");

        assert_eq!(
            error,
            SuiteError::InvalidRule {
                index: 1,
                source: RuleError::InvalidDescription
            }
        );
        assert_eq!(error.code(), 3);
        assert!(registry.units.is_empty());
        assert!(registry.cleanups.is_empty());
    }

    #[test]
    fn test_table_must_be_an_array() {
        let (suite, _) = suite(ok_response());
        let mut registry = RecordingRegistry::default();

        for rules in [json!(1), json!(true), json!("foo"), json!({ "a": 1 })] {
            let error = suite.register_table(&rules, &mut registry).expect_err("should fail");
            assert_eq!(error, SuiteError::InvalidTable(RuleError::InvalidRules));
            assert_eq!(error.code(), 1);
        }
    }

    #[test]
    fn test_registers_units_in_order() {
        let (suite, _) = suite(ok_response());
        let mut registry = RecordingRegistry::default();

        let count = suite
            .register_table(
                &json!([
                    { "description": "first", "response": {} },
                    { "description": "second", "only": true, "response": {} }
                ]),
                &mut registry,
            )
            .expect("table should be valid");

        assert_eq!(count, 2);
        assert_eq!(registry.cleanups.len(), 1);
        let names: Vec<_> = registry.units.iter().map(TestUnit::name).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(!registry.units[0].is_exclusive());
        assert!(registry.units[1].is_exclusive());
    }

    #[tokio::test]
    async fn test_units_pass_and_fail() {
        let (suite, engine) = suite(ok_response());
        let mut registry = RecordingRegistry::default();

        suite
            .register_table(
                &json!([
                    { "description": "ok", "request": {}, "response": { "code": 200, "body": {} } },
                    { "description": "wrong code", "response": { "code": 999 } }
                ]),
                &mut registry,
            )
            .expect("table should be valid");

        let results = registry.run_all().await;
        assert_eq!(results[0], ("ok".to_string(), Ok(())));

        let Err(UnitFailure::Assertion(failure)) = &results[1].1 else {
            panic!("expected an assertion failure");
        };
        assert_eq!(failure.mismatch, Mismatch::Code);
        assert_eq!(failure.expected, json!(999));
        assert_eq!(failure.actual, json!(200));

        let endpoints: Vec<_> = engine.requests.lock().iter().map(|r| r.endpoint.clone()).collect();
        assert_eq!(endpoints, vec!["/custom/path/to/my/api", "/custom/path/to/my/api"]);
    }

    #[tokio::test]
    async fn test_sandbox_restored_after_every_unit() {
        let (suite, _) = suite(ok_response());
        let sandbox = Arc::clone(suite.sandbox());
        let mut registry = RecordingRegistry::default();

        let entries = vec![
            RuleEntry::new(json!({ "description": "stubbing", "response": {} }))
                .before(|sandbox: &CountingSandbox| sandbox.stubs.lock().push("stub".to_string())),
            RuleEntry::new(json!({ "description": "failing", "response": { "code": 500 } })),
        ];
        suite.register(entries, &mut registry).expect("rules should be valid");

        let results = registry.run_all().await;
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert_eq!(sandbox.restores.load(Ordering::SeqCst), 2);
        assert!(sandbox.stubs.lock().is_empty());
    }

    #[tokio::test]
    async fn test_after_hook_runs_only_on_match() {
        let (suite, _) = suite(ok_response());
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = RecordingRegistry::default();

        let passing_calls = Arc::clone(&calls);
        let failing_calls = Arc::clone(&calls);
        let entries = vec![
            RuleEntry::new(json!({ "description": "passes", "response": {} })).after(
                move |response: &ResponseSnapshot, _: &CountingSandbox| {
                    passing_calls.lock().push(format!("after passes {}", response.code));
                },
            ),
            RuleEntry::new(json!({ "description": "fails", "response": { "code": 201 } })).after(
                move |_: &ResponseSnapshot, _: &CountingSandbox| {
                    failing_calls.lock().push("after fails".to_string());
                },
            ),
        ];
        suite.register(entries, &mut registry).expect("rules should be valid");
        registry.run_all().await;

        assert_eq!(*calls.lock(), vec!["after passes 200".to_string()]);
    }

    #[tokio::test]
    async fn test_handler_failure_is_matched_normally() {
        let failure = apitest_domain::HandlerFailure::new(404, "missing")
            .with_body(json!({ "message": "not found" }));
        let (suite, _) = suite(Behavior::FailProcess(failure));
        let mut registry = RecordingRegistry::default();

        suite
            .register_table(
                &json!([{
                    "description": "not found",
                    "response": { "code": 404, "body": { "message": "not found" } }
                }]),
                &mut registry,
            )
            .expect("table should be valid");

        let results = registry.run_all().await;
        assert_eq!(results[0].1, Ok(()));
    }
}
