//! Mocking sandbox port

/// Stub/spy registry shared by the units of a suite.
///
/// Rule hooks receive the sandbox to install stubs; the suite restores it
/// after every unit.
pub trait Sandbox: Send + Sync {
    /// Removes every stub and recorded call.
    fn restore(&self);
}
