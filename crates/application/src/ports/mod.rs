//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the suite core and its external
//! collaborators: the handler engine, the mocking sandbox and the test
//! registration framework. Adapters live in the infrastructure layer.

mod handler_engine;
mod sandbox;
mod test_registry;

pub use handler_engine::{Dispatch, HandlerEngine, HandlerRequest};
pub use sandbox::Sandbox;
pub use test_registry::{CleanupHook, TestRegistry, TestUnit, UnitBody, UnitFuture};
