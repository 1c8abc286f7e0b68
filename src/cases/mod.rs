//! The contract case catalogue.
//!
//! Each case is a plain function over a [`CaseContext`]. It consults the gate
//! for the keys it needs, issues exchanges through the fixture, and returns
//! early with a skip, a violation, or a transport error through `?`.

mod auth;
mod delete;
mod error_responses;
mod get_single;
mod headers;
mod patch_update;
mod post_create;
mod put_update;
mod support;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::ConfigKey;
use crate::error::HarnessError;
use crate::fixture::{BearerToken, FixtureTemplate};
use crate::gate::{CapabilityGate, SkipReason};
use crate::outcome::{CaseOutcome, CaseResult};

/// Functional area a case belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseGroup {
    /// Authentication and authorisation enforcement.
    Auth,
    /// Fetching a single resource by id.
    GetSingle,
    /// Resource creation.
    PostCreate,
    /// Full replacement.
    PutUpdate,
    /// Partial update.
    PatchUpdate,
    /// Deletion semantics.
    Delete,
    /// Error payloads and latency.
    ErrorResponses,
    /// Response header hygiene.
    Headers,
}

impl CaseGroup {
    /// Every group in catalogue order.
    pub const ALL: [Self; 8] = [
        Self::Auth,
        Self::GetSingle,
        Self::PostCreate,
        Self::PutUpdate,
        Self::PatchUpdate,
        Self::Delete,
        Self::ErrorResponses,
        Self::Headers,
    ];

    /// Kebab-case group name used on the command line and in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::GetSingle => "get-single",
            Self::PostCreate => "post-create",
            Self::PutUpdate => "put-update",
            Self::PatchUpdate => "patch-update",
            Self::Delete => "delete",
            Self::ErrorResponses => "error-responses",
            Self::Headers => "headers",
        }
    }
}

impl fmt::Display for CaseGroup {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for CaseGroup {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == wanted)
            .ok_or_else(|| HarnessError::Configuration {
                message: format!(
                    "unknown case group '{wanted}' (expected one of: {})",
                    Self::ALL.map(Self::as_str).join(", ")
                ),
            })
    }
}

/// Signature shared by every case body.
pub type CaseBody = fn(&CaseContext<'_>) -> CaseResult;

/// One entry in the catalogue.
#[derive(Clone, Copy)]
pub struct ContractCase {
    id: &'static str,
    group: CaseGroup,
    title: &'static str,
    body: CaseBody,
}

impl fmt::Debug for ContractCase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ContractCase")
            .field("id", &self.id)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

impl ContractCase {
    /// Declares a case.
    #[must_use]
    pub const fn new(
        id: &'static str,
        group: CaseGroup,
        title: &'static str,
        body: CaseBody,
    ) -> Self {
        Self {
            id,
            group,
            title,
            body,
        }
    }

    /// Stable identifier, e.g. `auth-001-no-token`.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    /// Group the case belongs to.
    #[must_use]
    pub const fn group(&self) -> CaseGroup {
        self.group
    }

    /// One-line description of the asserted behaviour.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.title
    }

    /// Runs the case body and classifies its result.
    #[must_use]
    pub fn run(&self, context: &CaseContext<'_>) -> CaseOutcome {
        CaseOutcome::from((self.body)(context))
    }
}

/// What a case body can reach: the gate and the request template.
#[derive(Debug, Clone, Copy)]
pub struct CaseContext<'a> {
    gate: &'a CapabilityGate,
    fixture: &'a FixtureTemplate,
}

impl<'a> CaseContext<'a> {
    /// Bundles the shared run state for a case.
    #[must_use]
    pub const fn new(gate: &'a CapabilityGate, fixture: &'a FixtureTemplate) -> Self {
        Self { gate, fixture }
    }

    /// The capability gate.
    #[must_use]
    pub const fn gate(&self) -> &'a CapabilityGate {
        self.gate
    }

    /// The request template.
    #[must_use]
    pub const fn fixture(&self) -> &'a FixtureTemplate {
        self.fixture
    }

    /// Requires a usable origin plus every key in `keys`.
    ///
    /// # Errors
    ///
    /// Returns a [`SkipReason`] for a missing origin or the first unset key.
    pub fn require<const N: usize>(&self, keys: [ConfigKey; N]) -> Result<[String; N], SkipReason> {
        self.fixture.url_for("/")?;
        self.gate.require(keys)
    }

    /// Resolves a bearer token from `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`SkipReason`] when the key is unset.
    pub fn token(&self, key: ConfigKey) -> Result<BearerToken, SkipReason> {
        let [value] = self.require([key])?;
        Ok(BearerToken::new(value))
    }

    /// Resolves an endpoint path from `key`, honouring its fallback.
    ///
    /// # Errors
    ///
    /// Returns a [`SkipReason`] when neither the key nor its fallback is set.
    pub fn path(&self, key: ConfigKey) -> Result<String, SkipReason> {
        let [value] = self.require([key])?;
        Ok(support::normalise_path(&value))
    }

    /// Resolves a bearer token when configured; cases may proceed without it.
    #[must_use]
    pub fn optional_token(&self, key: ConfigKey) -> Option<BearerToken> {
        self.gate.optional(key).into_option().map(BearerToken::new)
    }
}

/// Every case in catalogue order.
#[must_use]
pub fn catalogue() -> Vec<&'static ContractCase> {
    [
        auth::CASES,
        get_single::CASES,
        post_create::CASES,
        put_update::CASES,
        patch_update::CASES,
        delete::CASES,
        error_responses::CASES,
        headers::CASES,
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Looks a case up by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static ContractCase> {
    catalogue().into_iter().find(|case| case.id() == id)
}

/// Cases matching an optional group and an optional id, in catalogue order.
#[must_use]
pub fn select(group: Option<CaseGroup>, id: Option<&str>) -> Vec<&'static ContractCase> {
    catalogue()
        .into_iter()
        .filter(|case| group.is_none_or(|wanted| case.group() == wanted))
        .filter(|case| id.is_none_or(|wanted| case.id() == wanted))
        .collect()
}
