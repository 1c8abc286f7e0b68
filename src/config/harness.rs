//! Settings for the harness itself, as opposed to the target deployment.
//!
//! These are loaded with ortho-config's layered approach (lowest to highest):
//!
//! 1. **Defaults** – built-in values below
//! 2. **Configuration file** – `.restcontract.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `RESTCONTRACT_WORKERS`, `RESTCONTRACT_GROUP`, ...
//! 4. **Command-line arguments** – `--workers`/`-w`, `--group`/`-g`, ...
//!
//! ```toml
//! env_file = "staging.env"
//! request_timeout_secs = 15
//! workers = 4
//! group = "auth"
//! format = "jsonl"
//! ```

use std::str::FromStr;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::cases::CaseGroup;
use crate::config::snapshot::DEFAULT_OVERRIDE_FILE;
use crate::error::HarnessError;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_WORKERS: usize = 1;

/// Output format for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// One JSON object per case.
    Jsonl,
}

impl FromStr for ReportFormat {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "jsonl" | "json-lines" => Ok(Self::Jsonl),
            other => Err(HarnessError::Configuration {
                message: format!("unknown report format '{other}' (expected text or jsonl)"),
            }),
        }
    }
}

/// Harness settings supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use restcontract::HarnessConfig;
///
/// let config = HarnessConfig::load().expect("failed to load configuration");
/// let timeout = config.request_timeout();
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "RESTCONTRACT",
    discovery(
        dotfile_name = ".restcontract.toml",
        config_file_name = "restcontract.toml",
        app_name = "restcontract"
    )
)]
pub struct HarnessConfig {
    /// Path of the override file holding target keys.
    ///
    /// Can be provided via:
    /// - CLI: `--env-file <PATH>` or `-e <PATH>`
    /// - Environment: `RESTCONTRACT_ENV_FILE`
    /// - Config file: `env_file = "..."`
    #[ortho_config(cli_short = 'e')]
    pub env_file: Option<String>,

    /// Per-exchange timeout in seconds. Zero selects the default.
    #[ortho_config()]
    pub request_timeout_secs: u64,

    /// Number of worker threads running cases.
    #[ortho_config(cli_short = 'w')]
    pub workers: usize,

    /// Only run cases of this group (e.g. `auth`, `post-create`).
    #[ortho_config(cli_short = 'g')]
    pub group: Option<String>,

    /// Only run the case with this id.
    #[ortho_config()]
    pub case: Option<String>,

    /// Report format: `text` or `jsonl`.
    #[ortho_config(cli_short = 'f')]
    pub format: Option<String>,

    /// Lists the case catalogue and exits without sending requests.
    ///
    /// Note: ortho-config does not load boolean values from the environment,
    /// so this is CLI or file only.
    #[ortho_config(cli_short = 'l')]
    pub list: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            env_file: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            workers: DEFAULT_WORKERS,
            group: None,
            case: None,
            format: None,
            list: false,
        }
    }
}

impl HarnessConfig {
    /// Location of the override file; `.env` when not configured.
    #[must_use]
    pub fn override_file(&self) -> Utf8PathBuf {
        self.env_file
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map_or_else(
                || Utf8PathBuf::from(DEFAULT_OVERRIDE_FILE),
                Utf8PathBuf::from,
            )
    }

    /// Per-exchange timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        if self.request_timeout_secs == 0 {
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.request_timeout_secs)
        }
    }

    /// Worker thread count, never below one.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.max(1)
    }

    /// Parses the group filter.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] for an unknown group name.
    pub fn group_filter(&self) -> Result<Option<CaseGroup>, HarnessError> {
        self.group.as_deref().map(CaseGroup::from_str).transpose()
    }

    /// Parses the report format.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] for an unknown format.
    pub fn report_format(&self) -> Result<ReportFormat, HarnessError> {
        self.format
            .as_deref()
            .map_or(Ok(ReportFormat::default()), ReportFormat::from_str)
    }
}
