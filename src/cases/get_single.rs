//! Fetching a single resource by id.

use serde_json::Value;

use super::auth::ENFORCES_AUTH;
use super::support::{
    NONEXISTENT_ID, ensure, expect_status, first_listed_id, get_as, id_of, resource_path,
};
use super::{CaseContext, CaseGroup, ContractCase};
use crate::config::ConfigKey;
use crate::outcome::{CaseResult, ContractViolation};

const INVALID_ID: &str = "abc";

pub(super) const CASES: &[ContractCase] = &[
    ContractCase::new(
        "get-001-valid-id-body",
        CaseGroup::GetSingle,
        "GET by a listed id answers 200 with the matching id",
        returns_matching_resource,
    ),
    ContractCase::new(
        "get-002-field-types",
        CaseGroup::GetSingle,
        "GET by a listed id returns a numeric id and string name and email",
        returns_typed_fields,
    ),
    ContractCase::new(
        "get-003-nonexistent-id",
        CaseGroup::GetSingle,
        "GET by an unknown id answers 404",
        rejects_nonexistent_id,
    ),
    ContractCase::new(
        "get-004-invalid-id-format",
        CaseGroup::GetSingle,
        "GET by a malformed id answers 400 or 404",
        rejects_malformed_id,
    ),
    ContractCase::new(
        "get-005-with-auth",
        CaseGroup::GetSingle,
        "authenticated GET by id answers 200 with data",
        returns_resource_with_auth,
    ),
    ContractCase::new(
        "get-006-without-auth",
        CaseGroup::GetSingle,
        "unauthenticated GET by id on a protected collection answers 401",
        rejects_missing_auth,
    ),
];

fn returns_matching_resource(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::ProtectedEndpoint)?;
    let token = context.optional_token(ConfigKey::AuthToken);
    let id = first_listed_id(context, token.as_ref(), &collection)?;
    let path = resource_path(&collection, &id);

    let exchange = get_as(context, &path, token.as_ref())?;

    expect_status(&exchange, &[200], "for a listed id")?;
    let body = exchange.json()?;
    let returned = id_of(&body);
    ensure(returned.as_deref() == Some(id.as_str()), || {
        ContractViolation::new(
            format!("GET {path} body id"),
            id.clone(),
            returned.clone().unwrap_or_else(|| "no id".to_owned()),
        )
    })?;
    Ok(())
}

fn returns_typed_fields(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::ProtectedEndpoint)?;
    let token = context.optional_token(ConfigKey::AuthToken);
    let id = first_listed_id(context, token.as_ref(), &collection)?;
    let path = resource_path(&collection, &id);

    let exchange = get_as(context, &path, token.as_ref())?;

    expect_status(&exchange, &[200], "for a listed id")?;
    let body = exchange.json()?;
    expect_field(&body, &path, "id", "a number", Value::is_number)?;
    expect_field(&body, &path, "name", "a string", Value::is_string)?;
    expect_field(&body, &path, "email", "a string", Value::is_string)?;
    Ok(())
}

fn expect_field(
    body: &Value,
    path: &str,
    field: &str,
    expected: &str,
    check: fn(&Value) -> bool,
) -> Result<(), ContractViolation> {
    let value = body.get(field);
    ensure(value.is_some_and(check), || {
        ContractViolation::new(
            format!("GET {path} field '{field}'"),
            expected,
            value.map_or_else(|| "absent".to_owned(), describe_json_type),
        )
    })
}

fn describe_json_type(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
    .to_owned()
}

fn rejects_nonexistent_id(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::ProtectedEndpoint)?;
    let path = resource_path(&collection, NONEXISTENT_ID);

    let token = context.optional_token(ConfigKey::AuthToken);
    let exchange = get_as(context, &path, token.as_ref())?;

    expect_status(&exchange, &[404], "for an unknown id")?;
    Ok(())
}

fn rejects_malformed_id(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::ProtectedEndpoint)?;
    let path = resource_path(&collection, INVALID_ID);

    let token = context.optional_token(ConfigKey::AuthToken);
    let exchange = get_as(context, &path, token.as_ref())?;

    expect_status(&exchange, &[400, 404], "for a malformed id")?;
    Ok(())
}

fn returns_resource_with_auth(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::ProtectedEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let id = first_listed_id(context, Some(&token), &collection)?;
    let path = resource_path(&collection, &id);

    let exchange = context.fixture().get(&path)?.bearer(&token).send()?;

    expect_status(&exchange, &[200], "with a valid token")?;
    let body = exchange.json()?;
    ensure(id_of(&body).is_some(), || {
        ContractViolation::new(format!("GET {path} body"), "an object with an id", body.to_string())
    })?;
    Ok(())
}

fn rejects_missing_auth(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::ProtectedEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let id = first_listed_id(context, Some(&token), &collection)?;
    let path = resource_path(&collection, &id);

    let exchange = context.fixture().get(&path)?.send()?;

    context
        .gate()
        .probe(&ENFORCES_AUTH, exchange.status())
        .into_result()?;
    Ok(())
}
