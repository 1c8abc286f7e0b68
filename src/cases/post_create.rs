//! Resource creation.

use http::header::LOCATION;
use serde_json::{Value, json};

use super::support::{CREATED, ensure, expect_status, id_of, person_body, unique_email};
use super::{CaseContext, CaseGroup, ContractCase};
use crate::config::ConfigKey;
use crate::gate::{ProbeExpectation, SkipReason};
use crate::outcome::{CaseResult, ContractViolation};

const INVALID_EMAIL: &str = "not-an-email";

const CREATION_REQUIRES_AUTH: ProbeExpectation = ProbeExpectation::new(
    "authentication enforcement on creation",
    &[401],
    "point CREATE_ENDPOINT at a collection that requires a bearer token",
);

pub(super) const CASES: &[ContractCase] = &[
    ContractCase::new(
        "post-001-created-resource",
        CaseGroup::PostCreate,
        "POST with a valid body answers 200 or 201 and echoes the resource",
        returns_created_resource,
    ),
    ContractCase::new(
        "post-002-location-header",
        CaseGroup::PostCreate,
        "POST with a valid body answers 200 or 201 with a usable Location",
        returns_location_header,
    ),
    ContractCase::new(
        "post-003-duplicate",
        CaseGroup::PostCreate,
        "a duplicate POST answers 400, 409 or 422",
        rejects_duplicate,
    ),
    ContractCase::new(
        "post-004-empty-body",
        CaseGroup::PostCreate,
        "POST with an empty object answers 400, 415 or 422",
        rejects_empty_body,
    ),
    ContractCase::new(
        "post-005-invalid-email",
        CaseGroup::PostCreate,
        "POST with a malformed email answers 400 or 422",
        rejects_invalid_email,
    ),
    ContractCase::new(
        "post-006-missing-field",
        CaseGroup::PostCreate,
        "POST without a required field answers 400 or 422",
        rejects_missing_field,
    ),
    ContractCase::new(
        "post-007-wrong-content-type",
        CaseGroup::PostCreate,
        "POST with a text/plain body answers 400, 415 or 422",
        rejects_wrong_content_type,
    ),
    ContractCase::new(
        "post-008-without-auth",
        CaseGroup::PostCreate,
        "POST without a token on a protected collection answers 401",
        rejects_missing_auth,
    ),
];

fn returns_created_resource(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let name = "Post Created Resource";
    let email = unique_email("post-created");

    let exchange = context
        .fixture()
        .post(&collection)?
        .bearer(&token)
        .json(person_body(name, &email))
        .send()?;

    expect_status(&exchange, CREATED, "with a valid body")?;
    let body = exchange.json()?;
    ensure(id_of(&body).is_some(), || {
        ContractViolation::new(
            format!("POST {collection} response"),
            "an id",
            body.to_string(),
        )
    })?;
    expect_echo(&body, &collection, "name", name)?;
    expect_echo(&body, &collection, "email", &email)?;
    Ok(())
}

fn expect_echo(
    body: &Value,
    collection: &str,
    field: &str,
    sent: &str,
) -> Result<(), ContractViolation> {
    let returned = body.get(field).and_then(Value::as_str);
    ensure(returned == Some(sent), || {
        ContractViolation::new(
            format!("POST {collection} echoed '{field}'"),
            sent,
            returned.unwrap_or("nothing"),
        )
    })
}

fn returns_location_header(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;

    let exchange = context
        .fixture()
        .post(&collection)?
        .bearer(&token)
        .json(person_body("Post Location", &unique_email("post-location")))
        .send()?;

    expect_status(&exchange, CREATED, "with a valid body")?;
    if let Some(location) = exchange.header(LOCATION.as_str()) {
        ensure(location.starts_with("http") || location.starts_with('/'), || {
            ContractViolation::new(
                format!("POST {collection} Location header"),
                "an absolute URL or a path",
                location,
            )
        })?;
    }
    Ok(())
}

fn rejects_duplicate(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let body = person_body("Post Duplicate", &unique_email("post-duplicate"));

    let first = context
        .fixture()
        .post(&collection)?
        .bearer(&token)
        .json(body.clone())
        .send()?;
    if !first.status_in(CREATED) {
        return Err(SkipReason::new(format!(
            "precondition failed: first POST to {collection} returned {}",
            first.status().as_u16()
        ))
        .into());
    }
    if first.json().ok().as_ref().and_then(id_of).is_none() {
        return Err(SkipReason::new(format!(
            "precondition failed: first POST to {collection} returned no id"
        ))
        .into());
    }

    let second = context
        .fixture()
        .post(&collection)?
        .bearer(&token)
        .json(body)
        .send()?;

    expect_status(&second, &[400, 409, 422], "repeating an identical body")?;
    Ok(())
}

fn rejects_empty_body(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;

    let exchange = context
        .fixture()
        .post(&collection)?
        .bearer(&token)
        .json(json!({}))
        .send()?;

    expect_status(&exchange, &[400, 415, 422], "with an empty object")?;
    Ok(())
}

fn rejects_invalid_email(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;

    let exchange = context
        .fixture()
        .post(&collection)?
        .bearer(&token)
        .json(person_body("Invalid Email", INVALID_EMAIL))
        .send()?;

    expect_status(&exchange, &[400, 422], "with a malformed email")?;
    Ok(())
}

fn rejects_missing_field(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;

    let exchange = context
        .fixture()
        .post(&collection)?
        .bearer(&token)
        .json(json!({"name": "No Email", "gender": "male", "status": "active"}))
        .send()?;

    expect_status(&exchange, &[400, 422], "without an email")?;
    Ok(())
}

fn rejects_wrong_content_type(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let body = person_body("Wrong CT", &unique_email("post-wrong-ct"));

    let exchange = context
        .fixture()
        .post(&collection)?
        .bearer(&token)
        .raw_body("text/plain", body.to_string())
        .send()?;

    expect_status(&exchange, &[400, 415, 422], "with a text/plain body")?;
    Ok(())
}

fn rejects_missing_auth(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;

    let exchange = context
        .fixture()
        .post(&collection)?
        .json(person_body("Post 401", &unique_email("post-401")))
        .send()?;

    context
        .gate()
        .probe(&CREATION_REQUIRES_AUTH, exchange.status())
        .into_result()?;
    Ok(())
}
