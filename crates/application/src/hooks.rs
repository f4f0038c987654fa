//! Rule lifecycle hooks.
//!
//! Hooks are plain function values. The suite threads the sandbox and the
//! captured response into them; they never reach for shared globals.

use std::fmt;
use std::sync::Arc;

use apitest_domain::ResponseSnapshot;
use serde_json::Value;

/// Runs before the handler is invoked.
pub type BeforeHook<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Runs after the response matched.
pub type AfterHook<S> = Arc<dyn Fn(&ResponseSnapshot, &S) + Send + Sync>;

/// Inspects the captured response before matching.
pub type ResponseHook = Arc<dyn Fn(&ResponseSnapshot) + Send + Sync>;

/// Optional callbacks attached to a rule.
pub struct RuleHooks<S> {
    before: Option<BeforeHook<S>>,
    after: Option<AfterHook<S>>,
    get_response: Option<ResponseHook>,
}

impl<S> RuleHooks<S> {
    /// Creates an empty set of hooks.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            before: None,
            after: None,
            get_response: None,
        }
    }

    /// Runs the `before` hook, if any.
    pub fn run_before(&self, sandbox: &S) {
        if let Some(before) = &self.before {
            before(sandbox);
        }
    }

    /// Runs the `after` hook, if any.
    pub fn run_after(&self, response: &ResponseSnapshot, sandbox: &S) {
        if let Some(after) = &self.after {
            after(response, sandbox);
        }
    }

    /// Runs the `get_response` hook, if any.
    pub fn run_get_response(&self, response: &ResponseSnapshot) {
        if let Some(get_response) = &self.get_response {
            get_response(response);
        }
    }
}

impl<S> Default for RuleHooks<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for RuleHooks<S> {
    fn clone(&self) -> Self {
        Self {
            before: self.before.clone(),
            after: self.after.clone(),
            get_response: self.get_response.clone(),
        }
    }
}

impl<S> fmt::Debug for RuleHooks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleHooks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("get_response", &self.get_response.is_some())
            .finish()
    }
}

/// An unvalidated rule definition together with its hooks.
pub struct RuleEntry<S> {
    /// Declarative rule data, validated at registration.
    pub definition: Value,
    /// Callbacks run around the invocation.
    pub hooks: RuleHooks<S>,
}

impl<S> RuleEntry<S> {
    /// Creates an entry without hooks.
    #[must_use]
    pub fn new(definition: Value) -> Self {
        Self {
            definition,
            hooks: RuleHooks::new(),
        }
    }

    /// Sets the hook run before the handler (builder pattern).
    #[must_use]
    pub fn before(mut self, hook: impl Fn(&S) + Send + Sync + 'static) -> Self {
        self.hooks.before = Some(Arc::new(hook));
        self
    }

    /// Sets the hook run after matching (builder pattern).
    #[must_use]
    pub fn after(mut self, hook: impl Fn(&ResponseSnapshot, &S) + Send + Sync + 'static) -> Self {
        self.hooks.after = Some(Arc::new(hook));
        self
    }

    /// Sets the hook that inspects the response before matching (builder pattern).
    #[must_use]
    pub fn get_response(mut self, hook: impl Fn(&ResponseSnapshot) + Send + Sync + 'static) -> Self {
        self.hooks.get_response = Some(Arc::new(hook));
        self
    }
}

impl<S> From<Value> for RuleEntry<S> {
    fn from(definition: Value) -> Self {
        Self::new(definition)
    }
}

impl<S> fmt::Debug for RuleEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEntry")
            .field("definition", &self.definition)
            .field("hooks", &self.hooks)
            .finish()
    }
}
