//! Partial update of an existing resource.

use serde_json::{Value, json};

use super::support::{
    NONEXISTENT_ID, create_resource, ensure, expect_status, resource_path,
};
use super::{CaseContext, CaseGroup, ContractCase};
use crate::config::ConfigKey;
use crate::fixture::BearerToken;
use crate::outcome::{CaseResult, ContractViolation, Interrupt};

const PATCHED_STATUS: &str = "inactive";

pub(super) const CASES: &[ContractCase] = &[
    ContractCase::new(
        "patch-001-partial-body",
        CaseGroup::PatchUpdate,
        "PATCH with a partial body answers 200 and the change is visible",
        applies_partial_body,
    ),
    ContractCase::new(
        "patch-002-only-sent-fields",
        CaseGroup::PatchUpdate,
        "PATCH leaves fields that were not sent unchanged",
        preserves_unsent_fields,
    ),
    ContractCase::new(
        "patch-003-with-auth",
        CaseGroup::PatchUpdate,
        "authenticated PATCH answers 200",
        accepts_authenticated_patch,
    ),
    ContractCase::new(
        "patch-004-empty-body",
        CaseGroup::PatchUpdate,
        "PATCH with an empty object answers 200 or 400, never a server error",
        tolerates_empty_body,
    ),
    ContractCase::new(
        "patch-005-invalid-value",
        CaseGroup::PatchUpdate,
        "PATCH with an invalid enum value answers 400 or 422",
        rejects_invalid_value,
    ),
    ContractCase::new(
        "patch-006-nonexistent-id",
        CaseGroup::PatchUpdate,
        "PATCH to an unknown id answers 404",
        rejects_nonexistent_id,
    ),
];

fn patch_status(
    context: &CaseContext<'_>,
    token: &BearerToken,
    path: &str,
) -> Result<(), Interrupt> {
    let exchange = context
        .fixture()
        .patch(path)?
        .bearer(token)
        .json(json!({"status": PATCHED_STATUS}))
        .send()?;

    expect_status(&exchange, &[200], "with a partial body")?;
    Ok(())
}

fn fetch(context: &CaseContext<'_>, token: &BearerToken, path: &str) -> Result<Value, Interrupt> {
    let exchange = context.fixture().get(path)?.bearer(token).send()?;
    expect_status(&exchange, &[200], "after PATCH")?;
    Ok(exchange.json()?)
}

fn expect_field(body: &Value, path: &str, field: &str, expected: &str) -> Result<(), ContractViolation> {
    let actual = body.get(field).and_then(Value::as_str);
    ensure(actual == Some(expected), || {
        ContractViolation::new(
            format!("GET {path} after PATCH field '{field}'"),
            expected,
            actual.unwrap_or("nothing"),
        )
    })
}

fn applies_partial_body(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let created = create_resource(context, &token, &collection, "Patch Test", "patch-valid")?;

    patch_status(context, &token, &created.path)?;

    let updated = fetch(context, &token, &created.path)?;
    expect_field(&updated, &created.path, "status", PATCHED_STATUS)?;
    Ok(())
}

fn preserves_unsent_fields(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let created = create_resource(context, &token, &collection, "Patch Partial", "patch-partial")?;

    patch_status(context, &token, &created.path)?;

    let updated = fetch(context, &token, &created.path)?;
    expect_field(&updated, &created.path, "status", PATCHED_STATUS)?;
    expect_field(&updated, &created.path, "name", &created.name)?;
    expect_field(&updated, &created.path, "email", &created.email)?;
    Ok(())
}

fn accepts_authenticated_patch(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let created = create_resource(context, &token, &collection, "Patch Auth", "patch-auth")?;

    patch_status(context, &token, &created.path)?;
    Ok(())
}

fn tolerates_empty_body(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let created = create_resource(context, &token, &collection, "Patch Empty", "patch-empty")?;

    let exchange = context
        .fixture()
        .patch(&created.path)?
        .bearer(&token)
        .json(json!({}))
        .send()?;

    expect_status(&exchange, &[200, 400], "with an empty object")?;
    Ok(())
}

fn rejects_invalid_value(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let created = create_resource(context, &token, &collection, "Patch Invalid", "patch-invalid")?;

    let exchange = context
        .fixture()
        .patch(&created.path)?
        .bearer(&token)
        .json(json!({"status": "invalid_enum_value"}))
        .send()?;

    expect_status(&exchange, &[400, 422], "with an invalid enum value")?;
    Ok(())
}

fn rejects_nonexistent_id(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::ProtectedEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let path = resource_path(&collection, NONEXISTENT_ID);

    let exchange = context
        .fixture()
        .patch(&path)?
        .bearer(&token)
        .json(json!({"status": PATCHED_STATUS}))
        .send()?;

    expect_status(&exchange, &[404], "to an unknown id")?;
    Ok(())
}
