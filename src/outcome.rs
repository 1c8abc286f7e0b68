//! Case outcomes and the interruptions that produce them.
//!
//! A case body returns [`CaseResult`]. Each early exit is tagged with its
//! category so the report keeps "untestable here" (skip), "tested and the
//! contract was broken" (failure), and "could not talk to the target"
//! (error) apart.

use std::fmt;

use thiserror::Error;

use crate::gate::SkipReason;

/// A response that breaks the asserted contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{expectation}: expected {expected}, got {actual}")]
pub struct ContractViolation {
    /// What the case was checking.
    pub expectation: String,
    /// The acceptable value(s).
    pub expected: String,
    /// What the target actually returned.
    pub actual: String,
}

impl ContractViolation {
    /// Builds a violation from its three parts.
    #[must_use]
    pub fn new(
        expectation: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            expectation: expectation.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Infrastructure failures while exchanging with the target.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be built or sent, or timed out.
    #[error("{method} {url} failed: {message}")]
    Request {
        /// HTTP method of the failed exchange.
        method: String,
        /// Target URL.
        url: String,
        /// Transport-level error detail.
        message: String,
    },

    /// The response body could not be read.
    #[error("failed to read response body from {url}: {message}")]
    Body {
        /// Target URL.
        url: String,
        /// Error detail.
        message: String,
    },

    /// A header value could not be encoded.
    #[error("invalid value for header {name}: {message}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Encoding error detail.
        message: String,
    },

    /// A JSON body was expected but did not decode.
    #[error("response from {url} is not valid JSON: {message}")]
    Decode {
        /// Target URL.
        url: String,
        /// Decoder error detail.
        message: String,
    },
}

/// Early exit from a case body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interrupt {
    /// A precondition does not hold on this target.
    Skip(SkipReason),
    /// The contract under test was violated.
    Violation(ContractViolation),
    /// The exchange itself failed.
    Transport(TransportError),
}

impl From<SkipReason> for Interrupt {
    fn from(reason: SkipReason) -> Self {
        Self::Skip(reason)
    }
}

impl From<ContractViolation> for Interrupt {
    fn from(violation: ContractViolation) -> Self {
        Self::Violation(violation)
    }
}

impl From<TransportError> for Interrupt {
    fn from(error: TransportError) -> Self {
        Self::Transport(error)
    }
}

/// Result type returned by case bodies.
pub type CaseResult = Result<(), Interrupt>;

/// Final verdict for one case invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    /// Preconditions held and the contract was honoured.
    Passed,
    /// The case could not be evaluated against this target.
    Skipped(SkipReason),
    /// Preconditions held and the contract was violated.
    Failed(ContractViolation),
    /// The exchange failed before the contract could be judged.
    Errored(TransportError),
}

impl CaseOutcome {
    /// Short lowercase label used in reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Skipped(_) => "skipped",
            Self::Failed(_) => "failed",
            Self::Errored(_) => "errored",
        }
    }

    /// Whether the outcome should fail the run.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Errored(_))
    }

    /// Skip reason, violation, or error text; `None` for a pass.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Passed => None,
            Self::Skipped(reason) => Some(reason.to_string()),
            Self::Failed(violation) => Some(violation.to_string()),
            Self::Errored(error) => Some(error.to_string()),
        }
    }
}

impl From<CaseResult> for CaseOutcome {
    fn from(result: CaseResult) -> Self {
        match result {
            Ok(()) => Self::Passed,
            Err(Interrupt::Skip(reason)) => Self::Skipped(reason),
            Err(Interrupt::Violation(violation)) => Self::Failed(violation),
            Err(Interrupt::Transport(error)) => Self::Errored(error),
        }
    }
}

impl fmt::Display for CaseOutcome {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(detail) => write!(formatter, "{}: {detail}", self.label()),
            None => formatter.write_str(self.label()),
        }
    }
}
