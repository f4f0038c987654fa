//! Stub registry restored after every unit.

mod stub_sandbox;

pub use stub_sandbox::{StubCall, StubSandbox};
