//! Authentication and authorisation enforcement.

use super::support::{ensure, expect_status};
use super::{CaseContext, CaseGroup, ContractCase};
use crate::config::ConfigKey;
use crate::fixture::BearerToken;
use crate::gate::ProbeExpectation;
use crate::outcome::{CaseResult, ContractViolation};

const INVALID_TOKEN: &str = "invalid_token_12345";

pub(super) const ENFORCES_AUTH: ProbeExpectation = ProbeExpectation::new(
    "authentication enforcement",
    &[401],
    "point PROTECTED_ENDPOINT at a path that requires a bearer token",
);

pub(super) const CASES: &[ContractCase] = &[
    ContractCase::new(
        "auth-001-no-token",
        CaseGroup::Auth,
        "protected endpoint rejects a request without a token with 401",
        rejects_missing_token,
    ),
    ContractCase::new(
        "auth-001-invalid-token",
        CaseGroup::Auth,
        "protected endpoint rejects an invalid token with 401",
        rejects_invalid_token,
    ),
    ContractCase::new(
        "auth-002-valid-token",
        CaseGroup::Auth,
        "protected endpoint answers 200 or 201 with a valid token",
        accepts_valid_token,
    ),
    ContractCase::new(
        "auth-003-insufficient-role",
        CaseGroup::Auth,
        "role-restricted endpoint answers 403 to a low-privilege token",
        rejects_insufficient_role,
    ),
    ContractCase::new(
        "auth-004-expired-token",
        CaseGroup::Auth,
        "protected endpoint rejects an expired token with 401",
        rejects_expired_token,
    ),
];

fn rejects_missing_token(context: &CaseContext<'_>) -> CaseResult {
    let path = context.path(ConfigKey::ProtectedEndpoint)?;

    let exchange = context.fixture().get(&path)?.send()?;

    context
        .gate()
        .probe(&ENFORCES_AUTH, exchange.status())
        .into_result()?;
    Ok(())
}

fn rejects_invalid_token(context: &CaseContext<'_>) -> CaseResult {
    let path = context.path(ConfigKey::ProtectedEndpoint)?;

    let exchange = context
        .fixture()
        .get(&path)?
        .bearer(&BearerToken::new(INVALID_TOKEN))
        .send()?;

    context
        .gate()
        .probe(&ENFORCES_AUTH, exchange.status())
        .into_result()?;
    Ok(())
}

fn accepts_valid_token(context: &CaseContext<'_>) -> CaseResult {
    let path = context.path(ConfigKey::ProtectedEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;

    let exchange = context.fixture().get(&path)?.bearer(&token).send()?;

    expect_status(&exchange, &[200, 201], "with a valid token")?;
    ensure(!exchange.body().trim().is_empty(), || {
        ContractViolation::new(
            format!("GET {path} with a valid token"),
            "a response body",
            "an empty body",
        )
    })?;
    Ok(())
}

fn rejects_insufficient_role(context: &CaseContext<'_>) -> CaseResult {
    let token = context.token(ConfigKey::UserToken)?;
    let path = context.path(ConfigKey::AdminEndpoint)?;

    let exchange = context.fixture().get(&path)?.bearer(&token).send()?;

    expect_status(&exchange, &[403], "with a low-privilege token")?;
    Ok(())
}

fn rejects_expired_token(context: &CaseContext<'_>) -> CaseResult {
    let token = context.token(ConfigKey::ExpiredToken)?;
    let path = context.path(ConfigKey::ProtectedEndpoint)?;

    let exchange = context.fixture().get(&path)?.bearer(&token).send()?;

    expect_status(&exchange, &[401], "with an expired token")?;
    Ok(())
}
