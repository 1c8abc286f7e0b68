//! Capability gating: decide whether a case can be evaluated on this target.
//!
//! Static preconditions are configuration keys that must resolve. Dynamic
//! preconditions are exploratory exchanges whose status must match what the
//! case assumes (for example, that a "protected" path really answers 401
//! without credentials). Either kind of mismatch is a skip, never a failure.

use std::fmt;

use http::StatusCode;

use crate::config::{ConfigKey, ConfigResolver, ConfigValue};

/// Human-readable explanation attached to every skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipReason(String);

impl SkipReason {
    /// Wraps a free-form reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Reason for an unset configuration key, naming the key and how to set it.
    #[must_use]
    pub fn missing_key(key: ConfigKey) -> Self {
        let message = match key.fallback() {
            Some(fallback) => format!(
                "{key} is not set (nor its fallback {fallback}); {} via the environment or .env",
                key.hint()
            ),
            None => format!(
                "{key} is not set; {} via the environment or .env",
                key.hint()
            ),
        };
        Self(message)
    }

    /// Reason for a probe whose observed status contradicts the expectation.
    #[must_use]
    pub fn capability_mismatch(expectation: &ProbeExpectation, observed: StatusCode) -> Self {
        Self(format!(
            "{} not observed on this target (expected {}, got {}); {}",
            expectation.capability,
            expectation.accepted_list(),
            observed.as_u16(),
            expectation.remedy
        ))
    }

    /// Borrows the reason text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Verdict of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// All preconditions hold; the real assertion is meaningful.
    Proceed,
    /// A precondition does not hold on this target.
    Skip(SkipReason),
}

impl GateDecision {
    /// Whether the decision is [`GateDecision::Proceed`].
    #[must_use]
    pub const fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }

    /// Converts into a `Result` so case bodies can use `?`.
    ///
    /// # Errors
    ///
    /// Returns the skip reason for [`GateDecision::Skip`].
    pub fn into_result(self) -> Result<(), SkipReason> {
        match self {
            Self::Proceed => Ok(()),
            Self::Skip(reason) => Err(reason),
        }
    }
}

/// The status a dynamic probe must observe before a case proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeExpectation {
    capability: &'static str,
    accepted: &'static [u16],
    remedy: &'static str,
}

impl ProbeExpectation {
    /// Declares a probe expectation.
    ///
    /// `capability` names the behaviour, `accepted` lists the statuses that
    /// demonstrate it, and `remedy` tells the operator how to make the case
    /// runnable.
    #[must_use]
    pub const fn new(
        capability: &'static str,
        accepted: &'static [u16],
        remedy: &'static str,
    ) -> Self {
        Self {
            capability,
            accepted,
            remedy,
        }
    }

    /// Whether `status` demonstrates the capability.
    #[must_use]
    pub fn accepts(&self, status: StatusCode) -> bool {
        self.accepted.contains(&status.as_u16())
    }

    fn accepted_list(&self) -> String {
        self.accepted
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// Evaluates static and dynamic preconditions for a case.
///
/// Holds no mutable state and is evaluated afresh on every call.
#[derive(Debug, Clone)]
pub struct CapabilityGate {
    resolver: ConfigResolver,
}

impl CapabilityGate {
    /// Creates a gate over `resolver`.
    #[must_use]
    pub const fn new(resolver: ConfigResolver) -> Self {
        Self { resolver }
    }

    /// Checks that every key in `required` resolves, honouring fallbacks.
    ///
    /// Keys are checked in order; the first missing key is named.
    #[must_use]
    pub fn evaluate(&self, required: &[ConfigKey]) -> GateDecision {
        match required
            .iter()
            .find(|key| !self.resolver.resolve_with_fallback(**key).is_set())
        {
            Some(missing) => {
                tracing::debug!("gate skip: {missing} unset");
                GateDecision::Skip(SkipReason::missing_key(*missing))
            }
            None => GateDecision::Proceed,
        }
    }

    /// Checks `required` and returns the resolved values in the same order.
    ///
    /// # Errors
    ///
    /// Returns a [`SkipReason`] naming the first unset key.
    pub fn require<const N: usize>(
        &self,
        required: [ConfigKey; N],
    ) -> Result<[String; N], SkipReason> {
        let mut values = Vec::with_capacity(N);
        for key in required {
            match self.resolver.resolve_with_fallback(key) {
                ConfigValue::Value(value) => values.push(value),
                ConfigValue::Unset => {
                    tracing::debug!("gate skip: {key} unset");
                    return Err(SkipReason::missing_key(key));
                }
            }
        }
        <[String; N]>::try_from(values)
            .map_err(|_| SkipReason::new("resolved value count did not match required keys"))
    }

    /// Resolves a key that the case can do without.
    #[must_use]
    pub fn optional(&self, key: ConfigKey) -> ConfigValue {
        self.resolver.resolve_with_fallback(key)
    }

    /// Judges the outcome of an exploratory exchange.
    #[must_use]
    pub fn probe(&self, expectation: &ProbeExpectation, observed: StatusCode) -> GateDecision {
        if expectation.accepts(observed) {
            GateDecision::Proceed
        } else {
            tracing::debug!(
                "gate skip: {} probe observed {}",
                expectation.capability,
                observed.as_u16()
            );
            GateDecision::Skip(SkipReason::capability_mismatch(expectation, observed))
        }
    }

    /// Borrows the underlying resolver.
    #[must_use]
    pub const fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }
}
