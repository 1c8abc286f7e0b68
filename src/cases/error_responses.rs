//! Error payloads and response latency.

use std::time::Duration;

use serde_json::Value;

use super::support::{NONEXISTENT_ID, ensure, expect_status, get_as, resource_path};
use super::{CaseContext, CaseGroup, ContractCase};
use crate::config::ConfigKey;
use crate::outcome::{CaseResult, ContractViolation};

const DEFAULT_RESPONSE_BUDGET: Duration = Duration::from_millis(10_000);

/// Headroom past the budget so a late response is measured, not cut off.
const BUDGET_SLACK: Duration = Duration::from_secs(1);

pub(super) const CASES: &[ContractCase] = &[
    ContractCase::new(
        "error-001-4xx-body",
        CaseGroup::ErrorResponses,
        "a 4xx response carries a JSON body with a message (a non-JSON body fails)",
        client_error_has_message,
    ),
    ContractCase::new(
        "error-002-5xx-handled",
        CaseGroup::ErrorResponses,
        "the fault endpoint answers 5xx with a readable body",
        server_error_is_readable,
    ),
    ContractCase::new(
        "error-003-response-time",
        CaseGroup::ErrorResponses,
        "a successful GET completes within the response-time budget",
        responds_within_budget,
    ),
];

/// A 4xx whose body is not JSON is a contract failure, not a transport error:
/// the exchange worked and the body broke the documented error shape.
fn client_error_has_message(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::ProtectedEndpoint)?;
    let path = resource_path(&collection, NONEXISTENT_ID);

    let token = context.optional_token(ConfigKey::AuthToken);
    let exchange = get_as(context, &path, token.as_ref())?;

    ensure(exchange.status().is_client_error(), || {
        ContractViolation::new(
            format!("GET {path} status"),
            "a 4xx status",
            exchange.status().as_u16().to_string(),
        )
    })?;
    let body = exchange.json().map_err(|_| {
        ContractViolation::new(
            format!("GET {path} error body"),
            "a JSON body with a 'message' field",
            "a non-JSON body",
        )
    })?;
    let message = body.get("message").filter(|value| !value.is_null());
    ensure(message.is_some(), || {
        ContractViolation::new(
            format!("GET {path} error body"),
            "a 'message' field",
            describe_body(&body),
        )
    })?;
    Ok(())
}

fn describe_body(body: &Value) -> String {
    match body {
        Value::Object(fields) if fields.is_empty() => "an empty object".to_owned(),
        Value::Object(fields) => format!(
            "fields {}",
            fields.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
        ),
        other => other.to_string(),
    }
}

fn server_error_is_readable(context: &CaseContext<'_>) -> CaseResult {
    let path = context.path(ConfigKey::Error5xxEndpoint)?;

    let exchange = context.fixture().get(&path)?.send()?;

    ensure(exchange.status().is_server_error(), || {
        ContractViolation::new(
            format!("GET {path} status"),
            "a 5xx status",
            exchange.status().as_u16().to_string(),
        )
    })?;
    Ok(())
}

fn responds_within_budget(context: &CaseContext<'_>) -> CaseResult {
    let path = context.path(ConfigKey::ProtectedEndpoint)?;
    let budget = context
        .gate()
        .resolver()
        .resolve_millis(ConfigKey::ResponseTimeoutMs)
        .unwrap_or(DEFAULT_RESPONSE_BUDGET);

    let timeout = budget
        .saturating_add(BUDGET_SLACK)
        .max(context.fixture().timeout());

    let mut request = context.fixture().get(&path)?.timeout(timeout);
    if let Some(token) = context.optional_token(ConfigKey::AuthToken) {
        request = request.bearer(&token);
    }
    let exchange = request.send()?;

    expect_status(&exchange, &[200], "for the success endpoint")?;
    ensure(exchange.elapsed() <= budget, || {
        ContractViolation::new(
            format!("GET {path} response time"),
            format!("at most {} ms", budget.as_millis()),
            format!("{} ms", exchange.elapsed().as_millis()),
        )
    })?;
    Ok(())
}
