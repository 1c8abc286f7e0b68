//! Response header hygiene.

use http::header::CONTENT_TYPE;

use super::support::{ensure, expect_status, get_as};
use super::{CaseContext, CaseGroup, ContractCase};
use crate::config::ConfigKey;
use crate::fixture::Exchange;
use crate::outcome::{CaseResult, ContractViolation, Interrupt};

const SENSITIVE_HEADERS: &[&str] = &["x-powered-by"];

pub(super) const CASES: &[ContractCase] = &[
    ContractCase::new(
        "headers-001-json-content-type",
        CaseGroup::Headers,
        "a successful GET declares application/json",
        declares_json_content_type,
    ),
    ContractCase::new(
        "headers-002-no-sensitive-headers",
        CaseGroup::Headers,
        "a successful GET does not expose framework headers",
        hides_sensitive_headers,
    ),
];

fn fetch_protected(context: &CaseContext<'_>) -> Result<(String, Exchange), Interrupt> {
    let path = context.path(ConfigKey::ProtectedEndpoint)?;

    let token = context.optional_token(ConfigKey::AuthToken);
    let exchange = get_as(context, &path, token.as_ref())?;

    expect_status(&exchange, &[200], "for the success endpoint")?;
    Ok((path, exchange))
}

fn declares_json_content_type(context: &CaseContext<'_>) -> CaseResult {
    let (path, exchange) = fetch_protected(context)?;

    let content_type = exchange.header(CONTENT_TYPE.as_str()).unwrap_or_default();
    ensure(content_type.contains("application/json"), || {
        ContractViolation::new(
            format!("GET {path} Content-Type"),
            "application/json",
            if content_type.is_empty() {
                "no Content-Type"
            } else {
                content_type
            },
        )
    })?;
    Ok(())
}

fn hides_sensitive_headers(context: &CaseContext<'_>) -> CaseResult {
    let (path, exchange) = fetch_protected(context)?;

    for name in SENSITIVE_HEADERS {
        let value = exchange.header(name).unwrap_or_default();
        ensure(value.trim().is_empty(), || {
            ContractViolation::new(
                format!("GET {path} header '{name}'"),
                "absent or empty",
                value,
            )
        })?;
    }
    Ok(())
}
