//! [`HandlerEngine`] adapter running [`Api`] handlers in process.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use apitest_application::ports::{Dispatch, HandlerEngine, HandlerRequest};
use apitest_domain::{HandlerFailure, ResponseSnapshot};

use super::api::{Api, ResponseWriter};

/// Engine building a new `A` for every dispatch.
pub struct InProcessEngine<A> {
    factory: Arc<dyn Fn() -> A + Send + Sync>,
}

impl<A: Api + 'static> InProcessEngine<A> {
    /// Creates an engine that builds handlers with `factory`.
    #[must_use]
    pub fn new(factory: impl Fn() -> A + Send + Sync + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
        }
    }
}

impl<A: Api + Default + 'static> Default for InProcessEngine<A> {
    fn default() -> Self {
        Self::new(A::default)
    }
}

impl<A> Clone for InProcessEngine<A> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<A> fmt::Debug for InProcessEngine<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InProcessEngine")
            .field("handler", &std::any::type_name::<A>())
            .finish()
    }
}

impl<A: Api + 'static> HandlerEngine for InProcessEngine<A> {
    fn prepare(&self, request: HandlerRequest) -> Box<dyn Dispatch> {
        Box::new(ApiDispatch {
            api: (self.factory)(),
            request,
            response: ResponseWriter::new(),
        })
    }
}

/// One handler instance with its request and response.
struct ApiDispatch<A> {
    api: A,
    request: HandlerRequest,
    response: ResponseWriter,
}

#[async_trait]
impl<A: Api> Dispatch for ApiDispatch<A> {
    async fn validate(&mut self) -> Result<(), HandlerFailure> {
        self.api.validate(&self.request).await
    }

    async fn process(&mut self) -> Result<(), HandlerFailure> {
        self.api.process(&self.request, &mut self.response).await
    }

    fn response(&self) -> ResponseSnapshot {
        self.response.snapshot()
    }
}
