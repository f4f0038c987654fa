//! Handler engine port
//!
//! The engine owns the request-handler lifecycle. The invoker hands it a
//! [`HandlerRequest`] and drives the returned [`Dispatch`] through its two
//! phases.

use async_trait::async_trait;
use serde_json::Value;

use apitest_domain::{FieldMap, HandlerFailure, ResponseSnapshot, Session};

/// Fields assigned to a fresh handler instance before it runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandlerRequest {
    /// Endpoint the handler is invoked for.
    pub endpoint: String,
    /// Structured payload.
    pub data: Option<Value>,
    /// Raw payload.
    pub raw_data: Option<String>,
    /// Positional path parameters.
    pub path_parameters: Vec<String>,
    /// Request headers.
    pub headers: FieldMap,
    /// Request cookies.
    pub cookies: FieldMap,
    /// Authenticated caller, if any.
    pub session: Option<Session>,
}

/// One handler invocation, ready to run.
#[async_trait]
pub trait Dispatch: Send {
    /// Runs the input-validation phase.
    ///
    /// # Errors
    ///
    /// Returns the failure raised by the handler.
    async fn validate(&mut self) -> Result<(), HandlerFailure>;

    /// Runs the processing phase.
    ///
    /// # Errors
    ///
    /// Returns the failure raised by the handler.
    async fn process(&mut self) -> Result<(), HandlerFailure>;

    /// Returns the response built by the handler.
    fn response(&self) -> ResponseSnapshot;
}

/// Port for the external request-handler engine.
pub trait HandlerEngine: Send + Sync {
    /// Builds a dispatch context for `request.endpoint` around a new handler
    /// instance carrying the request fields.
    fn prepare(&self, request: HandlerRequest) -> Box<dyn Dispatch>;
}
