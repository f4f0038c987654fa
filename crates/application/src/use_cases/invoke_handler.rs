//! Invoke handler use case.

use apitest_domain::{HandlerFailure, RequestSpec, ResponseSnapshot, Rule, Session};
use tracing::debug;

use crate::hooks::RuleHooks;
use crate::ports::{Dispatch, HandlerEngine, HandlerRequest};

/// Endpoint used when neither the rule nor the suite names one.
pub const FALLBACK_ENDPOINT: &str = "/";

/// Builds a handler instance from a rule and captures its response.
pub struct HandlerInvoker<E: HandlerEngine> {
    engine: E,
    default_endpoint: Option<String>,
    fallback_endpoint: String,
}

impl<E: HandlerEngine> HandlerInvoker<E> {
    /// Creates a new `HandlerInvoker` use case.
    #[must_use]
    pub fn new(engine: E, default_endpoint: Option<String>) -> Self {
        Self {
            engine,
            default_endpoint,
            fallback_endpoint: FALLBACK_ENDPOINT.to_string(),
        }
    }

    /// Overrides the endpoint used when no other endpoint applies.
    #[must_use]
    pub fn with_fallback_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.fallback_endpoint = endpoint.into();
        self
    }

    /// Resolves the endpoint for a rule: rule request, then suite default,
    /// then the fallback.
    #[must_use]
    pub fn endpoint_for<'a>(&'a self, rule: &'a Rule) -> &'a str {
        rule.endpoint()
            .or(self.default_endpoint.as_deref())
            .unwrap_or(&self.fallback_endpoint)
    }

    /// Builds the fields assigned to the handler instance for a rule.
    #[must_use]
    pub fn request_for(&self, rule: &Rule) -> HandlerRequest {
        let spec = rule.request.clone().unwrap_or_default();
        let endpoint = self.endpoint_for(rule).to_string();

        let RequestSpec {
            data,
            raw_data,
            path_parameters,
            headers,
            cookies,
            ..
        } = spec;

        HandlerRequest {
            endpoint,
            data,
            raw_data,
            path_parameters,
            headers,
            cookies,
            session: Session::from_rule(rule),
        }
    }

    /// Runs one rule against the handler engine.
    ///
    /// Order: build the dispatch, run `before`, validate, process, read the
    /// response, run `get_response`. A failure from either handler phase is
    /// turned into a snapshot, so this always yields a response.
    pub async fn invoke<S>(&self, rule: &Rule, hooks: &RuleHooks<S>, sandbox: &S) -> ResponseSnapshot {
        let request = self.request_for(rule);
        debug!(
            description = %rule.description,
            endpoint = %request.endpoint,
            authenticated = request.session.is_some(),
            "Invoking handler"
        );

        let mut dispatch = self.engine.prepare(request);

        hooks.run_before(sandbox);

        let outcome = drive(dispatch.as_mut()).await;
        if let Err(failure) = &outcome {
            debug!(
                description = %rule.description,
                status_code = ?failure.status_code,
                message = %failure.message,
                "Handler failed, using failure as response"
            );
        }

        let response = ResponseSnapshot::from_outcome(outcome);
        hooks.run_get_response(&response);
        response
    }
}

async fn drive(dispatch: &mut dyn Dispatch) -> Result<ResponseSnapshot, HandlerFailure> {
    dispatch.validate().await?;
    dispatch.process().await?;
    Ok(dispatch.response())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use apitest_domain::validate_rule;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::sync::Arc;

    /// What the fake engine should do when dispatched.
    #[derive(Clone)]
    pub(crate) enum Behavior {
        Respond(ResponseSnapshot),
        FailValidation(HandlerFailure),
        FailProcess(HandlerFailure),
    }

    /// Engine that records requests and lifecycle events.
    #[derive(Clone)]
    pub(crate) struct FakeEngine {
        pub behavior: Behavior,
        pub requests: Arc<Mutex<Vec<HandlerRequest>>>,
        pub events: Arc<Mutex<Vec<String>>>,
    }

    impl FakeEngine {
        pub(crate) fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                requests: Arc::new(Mutex::new(Vec::new())),
                events: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    struct FakeDispatch {
        behavior: Behavior,
        events: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Dispatch for FakeDispatch {
        async fn validate(&mut self) -> Result<(), HandlerFailure> {
            self.events.lock().push("validate".to_string());
            match &self.behavior {
                Behavior::FailValidation(failure) => Err(failure.clone()),
                _ => Ok(()),
            }
        }

        async fn process(&mut self) -> Result<(), HandlerFailure> {
            self.events.lock().push("process".to_string());
            match &self.behavior {
                Behavior::FailProcess(failure) => Err(failure.clone()),
                _ => Ok(()),
            }
        }

        fn response(&self) -> ResponseSnapshot {
            match &self.behavior {
                Behavior::Respond(response) => response.clone(),
                _ => ResponseSnapshot::new(200),
            }
        }
    }

    impl HandlerEngine for FakeEngine {
        fn prepare(&self, request: HandlerRequest) -> Box<dyn Dispatch> {
            self.events.lock().push("prepare".to_string());
            self.requests.lock().push(request);
            Box::new(FakeDispatch {
                behavior: self.behavior.clone(),
                events: Arc::clone(&self.events),
            })
        }
    }

    fn rule(value: Value) -> Rule {
        validate_rule(&value).expect("rule should be valid")
    }

    #[tokio::test]
    async fn test_success_returns_engine_response() {
        let response = ResponseSnapshot::new(200).with_body(json!({}));
        let engine = FakeEngine::new(Behavior::Respond(response.clone()));
        let invoker = HandlerInvoker::new(engine.clone(), None);

        let result = invoker
            .invoke(&rule(json!({ "description": "ok", "response": {} })), &RuleHooks::new(), &())
            .await;

        assert_eq!(result, response);
        assert_eq!(*engine.events.lock(), vec!["prepare", "validate", "process"]);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_process() {
        let failure = HandlerFailure::new(400, "bad input");
        let engine = FakeEngine::new(Behavior::FailValidation(failure));
        let invoker = HandlerInvoker::new(engine.clone(), None);

        let result = invoker
            .invoke(&rule(json!({ "description": "bad", "response": {} })), &RuleHooks::new(), &())
            .await;

        assert_eq!(result, ResponseSnapshot::new(400).with_body(json!({ "message": "bad input" })));
        assert_eq!(*engine.events.lock(), vec!["prepare", "validate"]);
    }

    #[tokio::test]
    async fn test_process_failure_with_body() {
        let failure = HandlerFailure::new(404, "missing").with_body(json!({ "message": "not found" }));
        let engine = FakeEngine::new(Behavior::FailProcess(failure));
        let invoker = HandlerInvoker::new(engine, None);

        let result = invoker
            .invoke(&rule(json!({ "description": "404", "response": {} })), &RuleHooks::new(), &())
            .await;

        assert_eq!(result, ResponseSnapshot::new(404).with_body(json!({ "message": "not found" })));
    }

    #[test]
    fn test_endpoint_resolution() {
        let engine = FakeEngine::new(Behavior::Respond(ResponseSnapshot::new(200)));
        let plain = rule(json!({ "description": "a", "response": {} }));
        let custom = rule(json!({
            "description": "b",
            "request": { "endpoint": "custom-endpoint" },
            "response": {}
        }));

        let invoker = HandlerInvoker::new(engine.clone(), Some("/api/users".to_string()));
        assert_eq!(invoker.endpoint_for(&plain), "/api/users");
        assert_eq!(invoker.endpoint_for(&custom), "custom-endpoint");

        let invoker = HandlerInvoker::new(engine, None).with_fallback_endpoint("/fallback");
        assert_eq!(invoker.endpoint_for(&plain), "/fallback");
    }

    #[test]
    fn test_request_fields_and_defaults() {
        let engine = FakeEngine::new(Behavior::Respond(ResponseSnapshot::new(200)));
        let invoker = HandlerInvoker::new(engine, None);

        let request = invoker.request_for(&rule(json!({ "description": "a", "response": {} })));
        assert_eq!(request.endpoint, FALLBACK_ENDPOINT);
        assert!(request.path_parameters.is_empty());
        assert!(request.headers.is_empty());
        assert!(request.cookies.is_empty());
        assert!(request.session.is_none());

        let request = invoker.request_for(&rule(json!({
            "description": "b",
            "session": true,
            "request": {
                "data": { "fooData": 1 },
                "pathParameters": [1, 2],
                "headers": { "some-header": 123 },
                "cookies": { "some-cookie": 321 }
            },
            "response": {}
        })));
        assert_eq!(request.data, Some(json!({ "fooData": 1 })));
        assert_eq!(request.path_parameters, vec!["1", "2"]);
        assert_eq!(request.headers.get("some-header"), Some(&json!(123)));
        assert_eq!(request.cookies.get("some-cookie"), Some(&json!(321)));
        let session = request.session.expect("session should be attached");
        assert_eq!(session.client_code(), Some("defaultClient"));
    }

    #[tokio::test]
    async fn test_hooks_run_around_invocation() {
        let engine = FakeEngine::new(Behavior::Respond(ResponseSnapshot::new(201)));
        let invoker = HandlerInvoker::new(engine.clone(), None);

        let before_events = Arc::clone(&engine.events);
        let seen_events = Arc::clone(&engine.events);
        let entry = crate::hooks::RuleEntry::<()>::new(Value::Null)
            .before(move |_| before_events.lock().push("before".to_string()))
            .get_response(move |response| {
                seen_events.lock().push(format!("get_response {}", response.code));
            });

        invoker
            .invoke(&rule(json!({ "description": "hooks", "response": {} })), &entry.hooks, &())
            .await;

        assert_eq!(
            *engine.events.lock(),
            vec!["prepare", "before", "validate", "process", "get_response 201"]
        );
    }
}
