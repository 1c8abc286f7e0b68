//! restcontract CLI entrypoint: runs the contract catalogue against a target.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use restcontract::report::{write_catalogue, write_report};
use restcontract::telemetry::{DEFAULT_FILTER, init_tracing};
use restcontract::{
    CapabilityGate, ConfigResolver, EnvironmentSnapshot, FixtureTemplate, HarnessConfig,
    HarnessError, Runner, cases,
};

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::from(2)
        }
    }
}

/// Runs the harness; `Ok(false)` means a case failed or errored.
fn run() -> Result<bool, HarnessError> {
    let config = load_config()?;
    if !init_tracing(DEFAULT_FILTER) {
        tracing::debug!("tracing subscriber already installed");
    }

    let group = config.group_filter()?;
    let format = config.report_format()?;
    let selected = cases::select(group, config.case.as_deref());
    if selected.is_empty() {
        return Err(HarnessError::Configuration {
            message: "no cases match the requested group and case filters".to_owned(),
        });
    }

    if config.list {
        write_catalogue(&mut io::stdout().lock(), &selected)?;
        return Ok(true);
    }

    let override_file = config.override_file();
    let snapshot = Arc::new(EnvironmentSnapshot::load(&override_file));
    tracing::debug!(
        file = %override_file,
        entries = snapshot.len(),
        "loaded override file"
    );

    let resolver = ConfigResolver::from_process(snapshot);
    let fixture = FixtureTemplate::build(&resolver, config.request_timeout())?;
    let gate = CapabilityGate::new(resolver);

    let summary = Runner::new(&gate, &fixture, config.worker_count()).run(&selected);

    let mut stdout = io::stdout().lock();
    write_report(&mut stdout, &summary, format)?;
    stdout.flush()?;
    Ok(!summary.has_failures())
}

/// Loads harness settings from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`HarnessError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<HarnessConfig, HarnessError> {
    HarnessConfig::load().map_err(|error| HarnessError::Configuration {
        message: error.to_string(),
    })
}
