//! Baseline request template shared by every case in a run.
//!
//! The template owns the resolved origin, the default JSON headers and one
//! blocking HTTP client with a bounded per-request timeout. Cases never
//! mutate it; each exchange starts from a fresh [`ExchangeBuilder`].

mod exchange;
mod token;


use std::time::Duration;

use http::Method;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::blocking::Client;
use url::Url;

use crate::config::{ConfigKey, ConfigResolver};
use crate::error::HarnessError;
use crate::gate::SkipReason;

pub use exchange::{Exchange, ExchangeBuilder};
pub use token::BearerToken;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Immutable request baseline.
#[derive(Debug, Clone)]
pub struct FixtureTemplate {
    origin: Result<String, SkipReason>,
    default_headers: HeaderMap,
    client: Client,
    timeout: Duration,
}

impl FixtureTemplate {
    /// Builds the template from the target configuration.
    ///
    /// A missing or unparsable `BASE_URL` does not fail the build; every
    /// later [`FixtureTemplate::request`] returns a skip instead.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Client`] when the HTTP client cannot be
    /// configured.
    pub fn build(resolver: &ConfigResolver, timeout: Duration) -> Result<Self, HarnessError> {
        let origin = resolve_origin(resolver);
        match &origin {
            Ok(value) => tracing::info!(origin = %value, "target origin resolved"),
            Err(reason) => tracing::warn!("no usable target origin: {reason}"),
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| HarnessError::Client {
                message: error.to_string(),
            })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
        default_headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));

        Ok(Self {
            origin,
            default_headers,
            client,
            timeout,
        })
    }

    /// The resolved origin without a trailing slash, if one is usable.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref().ok()
    }

    /// Per-request timeout applied by the client.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Headers every exchange starts with.
    #[must_use]
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub(crate) const fn client(&self) -> &Client {
        &self.client
    }

    /// Joins `path` onto the origin, adding a leading `/` when missing.
    ///
    /// # Errors
    ///
    /// Returns the origin's [`SkipReason`] when no usable origin is configured.
    pub fn url_for(&self, path: &str) -> Result<String, SkipReason> {
        let origin = self.origin.as_ref().map_err(Clone::clone)?;
        if path.starts_with('/') {
            Ok(format!("{origin}{path}"))
        } else {
            Ok(format!("{origin}/{path}"))
        }
    }

    /// Starts an exchange against `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`SkipReason`] when no usable origin is configured.
    pub fn request(&self, method: Method, path: &str) -> Result<ExchangeBuilder<'_>, SkipReason> {
        let url = self.url_for(path)?;
        Ok(ExchangeBuilder::new(self, method, url))
    }

    /// Starts a `GET` exchange.
    ///
    /// # Errors
    ///
    /// See [`FixtureTemplate::request`].
    pub fn get(&self, path: &str) -> Result<ExchangeBuilder<'_>, SkipReason> {
        self.request(Method::GET, path)
    }

    /// Starts a `POST` exchange.
    ///
    /// # Errors
    ///
    /// See [`FixtureTemplate::request`].
    pub fn post(&self, path: &str) -> Result<ExchangeBuilder<'_>, SkipReason> {
        self.request(Method::POST, path)
    }

    /// Starts a `PUT` exchange.
    ///
    /// # Errors
    ///
    /// See [`FixtureTemplate::request`].
    pub fn put(&self, path: &str) -> Result<ExchangeBuilder<'_>, SkipReason> {
        self.request(Method::PUT, path)
    }

    /// Starts a `PATCH` exchange.
    ///
    /// # Errors
    ///
    /// See [`FixtureTemplate::request`].
    pub fn patch(&self, path: &str) -> Result<ExchangeBuilder<'_>, SkipReason> {
        self.request(Method::PATCH, path)
    }

    /// Starts a `DELETE` exchange.
    ///
    /// # Errors
    ///
    /// See [`FixtureTemplate::request`].
    pub fn delete(&self, path: &str) -> Result<ExchangeBuilder<'_>, SkipReason> {
        self.request(Method::DELETE, path)
    }
}

fn resolve_origin(resolver: &ConfigResolver) -> Result<String, SkipReason> {
    let raw = resolver
        .resolve(ConfigKey::BaseUrl)
        .into_option()
        .ok_or_else(|| SkipReason::missing_key(ConfigKey::BaseUrl))?;
    let origin = raw.strip_suffix('/').unwrap_or(&raw);

    Url::parse(origin).map_err(|error| {
        SkipReason::new(format!(
            "BASE_URL '{origin}' is not a valid absolute URL ({error}); {}",
            ConfigKey::BaseUrl.hint()
        ))
    })?;

    Ok(origin.to_owned())
}
