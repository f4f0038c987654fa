//! Test registration port
//!
//! The suite does not run tests itself: it registers named units of work and
//! a cleanup hook with a [`TestRegistry`], which decides when to run them.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::UnitFailure;

/// Future returned by a test unit.
pub type UnitFuture = Pin<Box<dyn Future<Output = Result<(), UnitFailure>> + Send>>;

/// Deferred body of a test unit.
pub type UnitBody = Box<dyn FnOnce() -> UnitFuture + Send>;

/// Hook run after every unit, whatever its outcome.
pub type CleanupHook = Arc<dyn Fn() + Send + Sync>;

/// A named, awaitable unit of work.
pub struct TestUnit {
    name: String,
    exclusive: bool,
    body: UnitBody,
}

impl TestUnit {
    /// Creates a unit from its name and body.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: FnOnce() -> UnitFuture + Send + 'static,
    {
        Self {
            name: name.into(),
            exclusive: false,
            body: Box::new(body),
        }
    }

    /// Marks the unit for exclusive execution (builder pattern).
    #[must_use]
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// Returns the unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the unit should run exclusively.
    #[must_use]
    pub const fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Consumes the unit and starts its body.
    #[must_use]
    pub fn run(self) -> UnitFuture {
        (self.body)()
    }
}

impl fmt::Debug for TestUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestUnit")
            .field("name", &self.name)
            .field("exclusive", &self.exclusive)
            .finish_non_exhaustive()
    }
}

/// Port for the external test-registration framework.
pub trait TestRegistry {
    /// Registers a unit of work.
    fn register(&mut self, unit: TestUnit);

    /// Registers a hook to run after every unit.
    fn after_each(&mut self, hook: CleanupHook);
}
