//! In-memory [`Sandbox`] adapter.
//!
//! Hooks install named stubs; handlers call them through [`StubSandbox::call`]
//! and every call is recorded so `after` hooks can assert on it.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use apitest_application::ports::Sandbox;

/// Arguments of one recorded stub call.
pub type StubCall = Vec<Value>;

#[derive(Debug, Default)]
struct Stub {
    returns: Value,
    calls: Vec<StubCall>,
}

/// Thread-safe stub and spy registry.
#[derive(Debug, Default)]
pub struct StubSandbox {
    stubs: Mutex<HashMap<String, Stub>>,
}

impl StubSandbox {
    /// Creates an empty sandbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a stub returning `returns`, replacing any stub of the same name.
    pub fn stub(&self, name: impl Into<String>, returns: impl Into<Value>) {
        let name = name.into();
        debug!(stub = %name, "Stub installed");
        self.stubs.lock().insert(
            name,
            Stub {
                returns: returns.into(),
                calls: Vec::new(),
            },
        );
    }

    /// Calls a stub, recording `args`. Returns `None` if nothing is stubbed
    /// under `name`.
    pub fn call(&self, name: &str, args: StubCall) -> Option<Value> {
        let mut stubs = self.stubs.lock();
        let stub = stubs.get_mut(name)?;
        stub.calls.push(args);
        Some(stub.returns.clone())
    }

    /// Returns true if a stub is installed under `name`.
    #[must_use]
    pub fn is_stubbed(&self, name: &str) -> bool {
        self.stubs.lock().contains_key(name)
    }

    /// Number of recorded calls to `name`.
    #[must_use]
    pub fn call_count(&self, name: &str) -> usize {
        self.stubs.lock().get(name).map_or(0, |stub| stub.calls.len())
    }

    /// Recorded calls to `name`, oldest first.
    #[must_use]
    pub fn calls(&self, name: &str) -> Vec<StubCall> {
        self.stubs
            .lock()
            .get(name)
            .map(|stub| stub.calls.clone())
            .unwrap_or_default()
    }

    /// Number of installed stubs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stubs.lock().len()
    }

    /// Returns true if no stub is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stubs.lock().is_empty()
    }
}

impl Sandbox for StubSandbox {
    fn restore(&self) {
        let mut stubs = self.stubs.lock();
        if !stubs.is_empty() {
            debug!(count = stubs.len(), "Sandbox restored");
        }
        stubs.clear();
    }
}
