//! restcontract: a contract-verification harness for REST API deployments.
//!
//! A fixed catalogue of HTTP cases checks a target deployment against a
//! behavioural contract (status codes, auth enforcement, payload shape, error
//! semantics). Each case asks the [`CapabilityGate`] whether the target can
//! support it, so one catalogue stays valid against partially configured or
//! partially capable targets: unsupported cases are skipped with a reason
//! instead of failing.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use restcontract::{
//!     CapabilityGate, ConfigResolver, EnvironmentSnapshot, FixtureTemplate, Runner, cases,
//! };
//!
//! let resolver = ConfigResolver::from_process(Arc::new(EnvironmentSnapshot::load_default()));
//! let fixture = FixtureTemplate::build(&resolver, Duration::from_secs(10))?;
//! let gate = CapabilityGate::new(resolver);
//! let summary = Runner::new(&gate, &fixture, 4).run(&cases::catalogue());
//! assert!(!summary.has_failures());
//! # Ok::<(), restcontract::HarnessError>(())
//! ```

pub mod cases;
pub mod config;
pub mod error;
pub mod fixture;
pub mod gate;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod telemetry;

pub use cases::{CaseContext, CaseGroup, ContractCase};
pub use config::{
    ConfigKey, ConfigResolver, ConfigValue, EnvironmentSnapshot, EnvironmentSource,
    FixedEnvironment, HarnessConfig, ProcessEnvironment, ReportFormat,
};
pub use error::HarnessError;
pub use fixture::{BearerToken, Exchange, ExchangeBuilder, FixtureTemplate};
pub use gate::{CapabilityGate, GateDecision, ProbeExpectation, SkipReason};
pub use outcome::{CaseOutcome, CaseResult, ContractViolation, Interrupt, TransportError};
pub use runner::{CaseReport, RunSummary, Runner, Tally};
