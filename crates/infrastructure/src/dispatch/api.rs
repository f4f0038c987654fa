//! Handler trait and response writer.

use async_trait::async_trait;
use serde_json::Value;

use apitest_application::ports::HandlerRequest;
use apitest_domain::{DEFAULT_RESPONSE_CODE, FieldMap, HandlerFailure, ResponseSnapshot};

/// A request handler run by the [`InProcessEngine`](super::InProcessEngine).
///
/// A new instance is built for every invocation, so handlers may keep state
/// between `validate` and `process`.
#[async_trait]
pub trait Api: Send + Sync {
    /// Validates the incoming request. Accepts everything by default.
    ///
    /// # Errors
    ///
    /// Returns a [`HandlerFailure`] to reject the request.
    async fn validate(&mut self, _request: &HandlerRequest) -> Result<(), HandlerFailure> {
        Ok(())
    }

    /// Handles the request, writing the response into `response`.
    ///
    /// # Errors
    ///
    /// Returns a [`HandlerFailure`] to answer with an error response.
    async fn process(
        &mut self,
        request: &HandlerRequest,
        response: &mut ResponseWriter,
    ) -> Result<(), HandlerFailure>;
}

/// Response under construction. The code defaults to 200.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseWriter {
    code: Option<u16>,
    body: Option<Value>,
    headers: FieldMap,
    cookies: FieldMap,
}

impl ResponseWriter {
    /// Creates an empty response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status code.
    pub fn set_code(&mut self, code: u16) -> &mut Self {
        self.code = Some(code);
        self
    }

    /// Sets the body.
    pub fn set_body(&mut self, body: impl Into<Value>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Sets one header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets several headers, keeping the ones already set.
    pub fn set_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.headers
            .extend(headers.into_iter().map(|(name, value)| (name.into(), value.into())));
        self
    }

    /// Sets one cookie.
    pub fn set_cookie(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Sets several cookies, keeping the ones already set.
    pub fn set_cookies<I, K, V>(&mut self, cookies: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.cookies
            .extend(cookies.into_iter().map(|(name, value)| (name.into(), value.into())));
        self
    }

    /// Returns the response as written so far.
    #[must_use]
    pub fn snapshot(&self) -> ResponseSnapshot {
        ResponseSnapshot {
            code: self.code.unwrap_or(DEFAULT_RESPONSE_CODE),
            body: self.body.clone(),
            headers: Some(self.headers.clone()),
            cookies: Some(self.cookies.clone()),
        }
    }
}
