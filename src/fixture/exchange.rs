//! Per-exchange request composition and the recorded response.

use std::error::Error;
use std::time::{Duration, Instant};

use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use serde_json::Value;

use super::FixtureTemplate;
use super::token::BearerToken;
use crate::outcome::TransportError;

#[derive(Debug, Clone)]
enum RequestBody {
    Json(Value),
    Raw(String),
}

/// One request under construction, derived from a [`FixtureTemplate`].
///
/// Headers start as a copy of the template defaults; modifying them never
/// touches the template.
#[derive(Debug)]
#[must_use = "an exchange does nothing until sent"]
pub struct ExchangeBuilder<'a> {
    fixture: &'a FixtureTemplate,
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<RequestBody>,
    timeout: Option<Duration>,
    invalid_header: Option<TransportError>,
}

impl<'a> ExchangeBuilder<'a> {
    pub(super) fn new(fixture: &'a FixtureTemplate, method: Method, url: String) -> Self {
        Self {
            fixture,
            method,
            url,
            headers: fixture.default_headers().clone(),
            body: None,
            timeout: None,
            invalid_header: None,
        }
    }

    /// Sends `Authorization: Bearer <token>`.
    #[must_use]
    pub fn bearer(self, token: &BearerToken) -> Self {
        let value = token.header_value();
        self.insert_header(AUTHORIZATION, &value, true)
    }

    /// Overrides or adds a header.
    #[must_use]
    pub fn header(self, name: HeaderName, value: &str) -> Self {
        self.insert_header(name, value, false)
    }

    /// Sends `body` encoded as JSON.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Sends `body` verbatim with the given content type.
    #[must_use]
    pub fn raw_body(mut self, content_type: &str, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Raw(body.into()));
        self.insert_header(CONTENT_TYPE, content_type, false)
    }

    /// Replaces the template's timeout for this exchange only.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn insert_header(mut self, name: HeaderName, value: &str, sensitive: bool) -> Self {
        match HeaderValue::from_str(value) {
            Ok(mut header_value) => {
                header_value.set_sensitive(sensitive);
                self.headers.insert(name, header_value);
            }
            Err(error) => {
                self.invalid_header.get_or_insert(TransportError::InvalidHeader {
                    name: name.as_str().to_owned(),
                    message: error.to_string(),
                });
            }
        }
        self
    }

    /// Issues the request and records the full response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when a header could not be encoded, the
    /// request could not be sent (including timeouts), or the body could not
    /// be read. HTTP error statuses are not errors here.
    pub fn send(self) -> Result<Exchange, TransportError> {
        if let Some(error) = self.invalid_header {
            return Err(error);
        }

        let mut request = self
            .fixture
            .client()
            .request(self.method.clone(), self.url.as_str())
            .headers(self.headers);
        request = match self.body {
            Some(RequestBody::Json(body)) => request.json(&body),
            Some(RequestBody::Raw(body)) => request.body(body),
            None => request,
        };
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let started = Instant::now();
        let response = request.send().map_err(|error| TransportError::Request {
            method: self.method.to_string(),
            url: self.url.clone(),
            message: error_chain(&error),
        })?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().map_err(|error| TransportError::Body {
            url: self.url.clone(),
            message: error_chain(&error),
        })?;
        let elapsed = started.elapsed();

        tracing::debug!(
            method = %self.method,
            url = %self.url,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis(),
            "exchange completed"
        );

        Ok(Exchange {
            method: self.method,
            url: self.url,
            status,
            headers,
            body,
            elapsed,
        })
    }
}

/// Joins an error with its sources, skipping causes its text already shows.
pub(super) fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// A completed request/response pair.
#[derive(Debug, Clone)]
pub struct Exchange {
    method: Method,
    url: String,
    status: StatusCode,
    headers: HeaderMap,
    body: String,
    elapsed: Duration,
}

impl Exchange {
    /// HTTP method that was sent.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute URL that was requested.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A response header as text, if present and valid ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    /// Raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Wall time from send until the body was read.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whether the status is one of `accepted`.
    #[must_use]
    pub fn status_in(&self, accepted: &[u16]) -> bool {
        accepted.contains(&self.status.as_u16())
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Decode`] when the body is not valid JSON.
    pub fn json(&self) -> Result<Value, TransportError> {
        serde_json::from_str(&self.body).map_err(|error| TransportError::Decode {
            url: self.url.clone(),
            message: error.to_string(),
        })
    }
}
