//! Layered lookup of target configuration keys.
//!
//! The process environment always wins over the override file. Blank values
//! count as absent in both layers, and every returned value is trimmed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::key::{ConfigKey, ConfigValue};
use super::snapshot::EnvironmentSnapshot;

/// Source of process-level variables, consulted before the override file.
#[cfg_attr(test, mockall::automock)]
pub trait EnvironmentSource: Send + Sync {
    /// Returns the raw value of `name`, if set.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads variables from the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl EnvironmentSource for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables, for embedding the harness or for tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixedEnvironment {
    vars: BTreeMap<String, String>,
}

impl FixedEnvironment {
    /// Builds the environment from `(name, value)` pairs.
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self { vars }
    }
}

impl EnvironmentSource for FixedEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Resolves [`ConfigKey`]s against the environment and the override snapshot.
///
/// Cloning is cheap; both layers are shared behind `Arc`.
#[derive(Clone)]
pub struct ConfigResolver {
    environment: Arc<dyn EnvironmentSource>,
    snapshot: Arc<EnvironmentSnapshot>,
}

impl fmt::Debug for ConfigResolver {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ConfigResolver")
            .field("snapshot_entries", &self.snapshot.len())
            .finish_non_exhaustive()
    }
}

impl ConfigResolver {
    /// Creates a resolver over explicit layers.
    #[must_use]
    pub fn new(environment: Arc<dyn EnvironmentSource>, snapshot: Arc<EnvironmentSnapshot>) -> Self {
        Self {
            environment,
            snapshot,
        }
    }

    /// Creates a resolver over the real process environment.
    #[must_use]
    pub fn from_process(snapshot: Arc<EnvironmentSnapshot>) -> Self {
        Self::new(Arc::new(ProcessEnvironment), snapshot)
    }

    /// Resolves `key` by its own name only.
    #[must_use]
    pub fn resolve(&self, key: ConfigKey) -> ConfigValue {
        let name = key.name();
        ConfigValue::from_raw(self.environment.var(name).as_deref())
            .or_else(|| ConfigValue::from_raw(self.snapshot.get(name)))
    }

    /// Resolves `key`, then its declared fallback key when unset.
    ///
    /// Keys without a fallback rule resolve exactly as [`Self::resolve`].
    #[must_use]
    pub fn resolve_with_fallback(&self, key: ConfigKey) -> ConfigValue {
        let own = self.resolve(key);
        match key.fallback() {
            Some(fallback) => own.or_else(|| self.resolve(fallback)),
            None => own,
        }
    }

    /// Resolves a millisecond budget.
    ///
    /// Values that do not parse as a non-negative integer resolve to `None`
    /// so the caller can apply its own default.
    #[must_use]
    pub fn resolve_millis(&self, key: ConfigKey) -> Option<Duration> {
        let raw = self.resolve(key).into_option()?;
        match raw.parse::<u64>() {
            Ok(millis) => Some(Duration::from_millis(millis)),
            Err(error) => {
                if key.is_secret() {
                    tracing::warn!("{key} is not a whole number of milliseconds: {error}");
                } else {
                    tracing::warn!("{key}={raw:?} is not a whole number of milliseconds: {error}");
                }
                None
            }
        }
    }

    /// Borrows the override snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &EnvironmentSnapshot {
        &self.snapshot
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
