//! Shared test utilities: a mock target deployment and a harness wired to it.

use std::sync::Arc;
use std::time::Duration;

use restcontract::{
    CapabilityGate, CaseContext, CaseOutcome, ConfigResolver, EnvironmentSnapshot,
    FixedEnvironment, FixtureTemplate, cases,
};
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A Wiremock server standing in for the target deployment.
///
/// The server runs on its own thread, so blocking requests from the test
/// thread reach it without entering the runtime.
pub struct TargetServer {
    runtime: Runtime,
    server: MockServer,
}

impl TargetServer {
    /// Starts a fresh server.
    ///
    /// # Panics
    ///
    /// Panics if the Tokio runtime cannot be created.
    pub fn start() -> Self {
        let runtime = Runtime::new()
            .unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}"));
        let server = runtime.block_on(MockServer::start());
        Self { runtime, server }
    }

    /// Mounts `mock`; earlier mounts win when several match.
    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Origin of the server, without a trailing slash.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Every request the server has seen so far.
    pub fn received_requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    /// Builds a harness whose `BASE_URL` points at this server.
    pub fn harness(&self, pairs: &[(&str, &str)]) -> Harness {
        self.harness_with_timeout(pairs, DEFAULT_TIMEOUT)
    }

    /// As [`TargetServer::harness`], with an explicit per-exchange timeout.
    pub fn harness_with_timeout(&self, pairs: &[(&str, &str)], timeout: Duration) -> Harness {
        let origin = self.uri();
        let mut all = vec![("BASE_URL", origin.as_str())];
        all.extend_from_slice(pairs);
        Harness::with_timeout(&all, timeout)
    }
}

/// Gate and request template for one test, resolved from fixed pairs.
pub struct Harness {
    /// Capability gate over the fixed environment.
    pub gate: CapabilityGate,
    /// Request template built from the same environment.
    pub fixture: FixtureTemplate,
}

impl Harness {
    /// Resolves every key from `pairs` only; no `.env` file is read.
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        Self::with_timeout(pairs, DEFAULT_TIMEOUT)
    }

    /// As [`Harness::with`], with an explicit per-exchange timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn with_timeout(pairs: &[(&str, &str)], timeout: Duration) -> Self {
        let resolver = ConfigResolver::new(
            Arc::new(FixedEnvironment::from_pairs(pairs.iter().copied())),
            Arc::new(EnvironmentSnapshot::empty()),
        );
        let fixture = FixtureTemplate::build(&resolver, timeout)
            .unwrap_or_else(|error| panic!("failed to build request template: {error}"));
        Self {
            gate: CapabilityGate::new(resolver),
            fixture,
        }
    }

    /// Context handed to case bodies.
    pub const fn context(&self) -> CaseContext<'_> {
        CaseContext::new(&self.gate, &self.fixture)
    }

    /// Runs the catalogue case with `id`.
    ///
    /// # Panics
    ///
    /// Panics if no case has that id.
    pub fn run(&self, id: &str) -> CaseOutcome {
        let case = cases::find(id).unwrap_or_else(|| panic!("unknown case id {id}"));
        case.run(&self.context())
    }
}
