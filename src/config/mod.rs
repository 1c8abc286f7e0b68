//! Configuration for the harness and for the target under test.
//!
//! Two independent layers live here:
//!
//! - [`HarnessConfig`] controls how the harness runs (timeouts, workers,
//!   filters, report format) and is loaded through ortho-config.
//! - [`ConfigResolver`] answers questions about the *target* deployment
//!   (`BASE_URL`, `AUTH_TOKEN`, ...) from the process environment first and
//!   the optional `.env` override file second.

mod harness;
mod key;
mod resolver;
mod snapshot;

#[cfg(test)]
mod tests;

pub use harness::{HarnessConfig, ReportFormat};
pub use key::{ConfigKey, ConfigValue};
pub use resolver::{ConfigResolver, EnvironmentSource, FixedEnvironment, ProcessEnvironment};
pub use snapshot::{DEFAULT_OVERRIDE_FILE, EnvironmentSnapshot};
