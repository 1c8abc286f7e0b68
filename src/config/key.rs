//! Named configuration keys understood by the harness.
//!
//! Every key maps to a stable environment variable name. A small, explicit
//! table declares which keys borrow the value of another key when unset.

use std::fmt;

/// A named configuration item describing the target deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    /// Base origin of the target API, e.g. `https://api.example.com`.
    BaseUrl,
    /// Bearer token accepted by the protected endpoints.
    AuthToken,
    /// Path of a protected resource collection, e.g. `/users`.
    ProtectedEndpoint,
    /// Valid token that lacks the role required by the admin endpoint.
    UserToken,
    /// Path that only privileged callers may read.
    AdminEndpoint,
    /// Token that the target considers expired.
    ExpiredToken,
    /// Collection path used by the write cases.
    CreateEndpoint,
    /// Identifier of a resource whose deletion conflicts with existing state.
    ConflictResourceId,
    /// Response-time budget for a successful request, in milliseconds.
    ResponseTimeoutMs,
    /// Path that reliably produces a 5xx response.
    Error5xxEndpoint,
}

/// Single-level fallback rules: `(key, fallback)`.
///
/// Fallback targets never appear on the left-hand side, so chains cannot form.
const FALLBACK_RULES: &[(ConfigKey, ConfigKey)] = &[
    (ConfigKey::AdminEndpoint, ConfigKey::ProtectedEndpoint),
    (ConfigKey::CreateEndpoint, ConfigKey::ProtectedEndpoint),
];

impl ConfigKey {
    /// Every key, in documentation order.
    pub const ALL: [Self; 10] = [
        Self::BaseUrl,
        Self::AuthToken,
        Self::ProtectedEndpoint,
        Self::UserToken,
        Self::AdminEndpoint,
        Self::ExpiredToken,
        Self::CreateEndpoint,
        Self::ConflictResourceId,
        Self::ResponseTimeoutMs,
        Self::Error5xxEndpoint,
    ];

    /// Returns the environment variable name for the key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BaseUrl => "BASE_URL",
            Self::AuthToken => "AUTH_TOKEN",
            Self::ProtectedEndpoint => "PROTECTED_ENDPOINT",
            Self::UserToken => "USER_TOKEN",
            Self::AdminEndpoint => "ADMIN_ENDPOINT",
            Self::ExpiredToken => "EXPIRED_TOKEN",
            Self::CreateEndpoint => "CREATE_ENDPOINT",
            Self::ConflictResourceId => "CONFLICT_RESOURCE_ID",
            Self::ResponseTimeoutMs => "RESPONSE_TIMEOUT_MS",
            Self::Error5xxEndpoint => "ERROR_5XX_ENDPOINT",
        }
    }

    /// Describes how to supply the key; quoted in skip reasons.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::BaseUrl => "set it to the API origin, e.g. https://api.example.com",
            Self::AuthToken => "set it to a valid bearer token for the protected endpoint",
            Self::ProtectedEndpoint => "set it to a protected collection path, e.g. /users",
            Self::UserToken => "set it to a valid token without the admin role",
            Self::AdminEndpoint => "set it to a path that requires elevated privileges",
            Self::ExpiredToken => "set it to a token the target reports as expired",
            Self::CreateEndpoint => "set it to the collection path that accepts POST",
            Self::ConflictResourceId => {
                "set it to the id of a resource whose deletion the target refuses"
            }
            Self::ResponseTimeoutMs => "set it to the response-time budget in milliseconds",
            Self::Error5xxEndpoint => "set it to a path that reliably answers with a 5xx status",
        }
    }

    /// Whether the value is a credential that must never be logged.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::AuthToken | Self::UserToken | Self::ExpiredToken)
    }

    /// Returns the key whose value is borrowed when this key is unset.
    #[must_use]
    pub fn fallback(self) -> Option<Self> {
        FALLBACK_RULES
            .iter()
            .find(|(key, _)| *key == self)
            .map(|(_, fallback)| *fallback)
    }

    /// Looks a key up by its environment variable name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// A resolved configuration value, or the explicit absence of one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigValue {
    /// A non-blank, trimmed value.
    Value(String),
    /// Neither source supplied a non-blank value.
    #[default]
    Unset,
}

impl ConfigValue {
    /// Normalises a raw lookup result: trims it and maps blank text to `Unset`.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Self::Value(value.to_owned()),
            _ => Self::Unset,
        }
    }

    /// Returns `self` when set, otherwise evaluates `fallback`.
    #[must_use]
    pub fn or_else(self, fallback: impl FnOnce() -> Self) -> Self {
        match self {
            Self::Value(_) => self,
            Self::Unset => fallback(),
        }
    }

    /// Whether a value is present.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Borrows the value, if any.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value.as_str()),
            Self::Unset => None,
        }
    }

    /// Converts into a plain `Option`.
    #[must_use]
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unset => None,
        }
    }
}
