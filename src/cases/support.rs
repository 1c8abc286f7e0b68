//! Helpers shared by case bodies.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde_json::{Value, json};

use super::CaseContext;
use crate::fixture::{BearerToken, Exchange};
use crate::gate::SkipReason;
use crate::outcome::{ContractViolation, Interrupt};

/// Id that no realistic deployment has issued.
pub(super) const NONEXISTENT_ID: &str = "999999999";

/// Statuses that count as a successful creation.
pub(super) const CREATED: &[u16] = &[200, 201];

static UNIQUE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Adds a leading `/` when missing.
pub(super) fn normalise_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

/// `{collection}/{id}` with exactly one separator.
pub(super) fn resource_path(collection: &str, id: &str) -> String {
    format!("{}/{id}", collection.trim_end_matches('/'))
}

/// A value unique within the process and across runs.
pub(super) fn unique_suffix() -> String {
    let sequence = UNIQUE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{sequence}", Utc::now().timestamp_millis())
}

/// A unique address under `example.com`.
pub(super) fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", unique_suffix())
}

/// The canonical creation payload.
pub(super) fn person_body(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "gender": "male",
        "status": "active",
    })
}

/// Renders an `id` field as a path segment; numbers and strings qualify.
pub(super) fn id_of(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    }
}

/// Fails unless the exchange status is one of `accepted`.
pub(super) fn expect_status(
    exchange: &Exchange,
    accepted: &[u16],
    expectation: &str,
) -> Result<(), ContractViolation> {
    if exchange.status_in(accepted) {
        Ok(())
    } else {
        Err(ContractViolation::new(
            format!("{} {} {expectation}", exchange.method(), path_of(exchange)),
            status_list(accepted),
            describe_status(exchange),
        ))
    }
}

/// Fails with `violation` unless `condition` holds.
pub(super) fn ensure(
    condition: bool,
    violation: impl FnOnce() -> ContractViolation,
) -> Result<(), ContractViolation> {
    if condition { Ok(()) } else { Err(violation()) }
}

fn status_list(accepted: &[u16]) -> String {
    accepted
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}

fn describe_status(exchange: &Exchange) -> String {
    exchange.status().as_u16().to_string()
}

fn path_of(exchange: &Exchange) -> String {
    url::Url::parse(exchange.url())
        .map_or_else(|_| exchange.url().to_owned(), |url| url.path().to_owned())
}

/// A resource created as a case precondition.
#[derive(Debug, Clone)]
pub(super) struct CreatedResource {
    pub(super) path: String,
    pub(super) name: String,
    pub(super) email: String,
}

/// Creates a resource under `collection`; any failure to do so is a skip.
pub(super) fn create_resource(
    context: &CaseContext<'_>,
    token: &BearerToken,
    collection: &str,
    name: &str,
    email_prefix: &str,
) -> Result<CreatedResource, Interrupt> {
    let email = unique_email(email_prefix);
    let exchange = context
        .fixture()
        .post(collection)?
        .bearer(token)
        .json(person_body(name, &email))
        .send()?;

    if !exchange.status_in(CREATED) {
        return Err(SkipReason::new(format!(
            "precondition failed: creating a resource at {collection} returned {}",
            exchange.status().as_u16()
        ))
        .into());
    }
    let body = exchange.json().map_err(|_| {
        SkipReason::new(format!(
            "precondition failed: creation response from {collection} is not JSON"
        ))
    })?;
    let id = id_of(&body).ok_or_else(|| {
        SkipReason::new(format!(
            "precondition failed: creation response from {collection} has no id"
        ))
    })?;

    tracing::debug!(%collection, %id, "created precondition resource");
    Ok(CreatedResource {
        path: resource_path(collection, &id),
        name: name.to_owned(),
        email,
    })
}

/// Sends a `GET`, with a bearer token only when one is given.
pub(super) fn get_as(
    context: &CaseContext<'_>,
    path: &str,
    bearer: Option<&BearerToken>,
) -> Result<Exchange, Interrupt> {
    let mut request = context.fixture().get(path)?;
    if let Some(token) = bearer {
        request = request.bearer(token);
    }
    Ok(request.send()?)
}

/// Lists `collection` and returns the first element's id; an empty or
/// unusable listing is a skip.
pub(super) fn first_listed_id(
    context: &CaseContext<'_>,
    bearer: Option<&BearerToken>,
    collection: &str,
) -> Result<String, Interrupt> {
    let exchange = get_as(context, collection, bearer)?;

    if !exchange.status_in(&[200]) {
        return Err(SkipReason::new(format!(
            "precondition failed: listing {collection} returned {}",
            exchange.status().as_u16()
        ))
        .into());
    }
    let listing = exchange.json()?;
    listing
        .as_array()
        .and_then(|items| items.first())
        .and_then(id_of)
        .ok_or_else(|| {
            SkipReason::new(format!(
                "precondition failed: listing {collection} has no element with an id"
            ))
            .into()
        })
}
