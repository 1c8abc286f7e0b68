//! Diagnostic logging for harness runs.
//!
//! Logs go to stderr so that stdout carries only the report. The filter is
//! taken from `RUST_LOG` when set, and falls back to the given default.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Installs the global `tracing` subscriber.
///
/// Returns `false` when a subscriber was already installed, which happens
/// when the harness is embedded in a process that configured its own.
#[must_use]
pub fn init_tracing(default_filter: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_names(true)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init()
        .is_ok()
}
