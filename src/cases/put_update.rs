//! Full replacement of an existing resource.

use serde_json::json;

use super::support::{create_resource, expect_status, resource_path, unique_email};
use super::{CaseContext, CaseGroup, ContractCase};
use crate::config::ConfigKey;
use crate::gate::ProbeExpectation;
use crate::outcome::CaseResult;

const INVALID_ID: &str = "invalid-id-format";

const UPDATED: &[u16] = &[200, 204];

const VALIDATES_FULL_REPLACEMENT: ProbeExpectation = ProbeExpectation::new(
    "required-field validation on PUT",
    &[400, 422],
    "this target accepts partial PUT bodies, so the case does not apply",
);

pub(super) const CASES: &[ContractCase] = &[
    ContractCase::new(
        "put-001-valid-body",
        CaseGroup::PutUpdate,
        "PUT with a full valid body answers 200 or 204",
        accepts_full_body,
    ),
    ContractCase::new(
        "put-002-with-auth",
        CaseGroup::PutUpdate,
        "authenticated PUT with changed values answers 200 or 204",
        accepts_changed_body,
    ),
    ContractCase::new(
        "put-003-invalid-values",
        CaseGroup::PutUpdate,
        "PUT with an invalid enum value answers 400 or 422",
        rejects_invalid_values,
    ),
    ContractCase::new(
        "put-004-missing-fields",
        CaseGroup::PutUpdate,
        "PUT without required fields answers 400 or 422",
        rejects_missing_fields,
    ),
    ContractCase::new(
        "put-005-invalid-id-format",
        CaseGroup::PutUpdate,
        "PUT to a malformed id answers 400 or 404",
        rejects_malformed_id,
    ),
];

fn accepts_full_body(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let created = create_resource(context, &token, &collection, "Put Original", "put-valid")?;

    let exchange = context
        .fixture()
        .put(&created.path)?
        .bearer(&token)
        .json(json!({
            "name": "Put Updated",
            "email": created.email,
            "gender": "male",
            "status": "inactive",
        }))
        .send()?;

    expect_status(&exchange, UPDATED, "with a full valid body")?;
    Ok(())
}

fn accepts_changed_body(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let created = create_resource(context, &token, &collection, "Put Auth", "put-auth")?;

    let exchange = context
        .fixture()
        .put(&created.path)?
        .bearer(&token)
        .json(json!({
            "name": "Put Auth Updated",
            "email": unique_email("put-auth-updated"),
            "gender": "female",
            "status": "inactive",
        }))
        .send()?;

    expect_status(&exchange, UPDATED, "with a valid token")?;
    Ok(())
}

fn rejects_invalid_values(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let created = create_resource(context, &token, &collection, "Put Invalid", "put-invalid")?;

    let exchange = context
        .fixture()
        .put(&created.path)?
        .bearer(&token)
        .json(json!({
            "name": "Put Invalid",
            "email": created.email,
            "gender": "invalid_enum",
            "status": "active",
        }))
        .send()?;

    expect_status(&exchange, &[400, 422], "with an invalid enum value")?;
    Ok(())
}

fn rejects_missing_fields(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::CreateEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let created = create_resource(context, &token, &collection, "Put Missing", "put-missing")?;

    let exchange = context
        .fixture()
        .put(&created.path)?
        .bearer(&token)
        .json(json!({"name": "Only Name"}))
        .send()?;

    context
        .gate()
        .probe(&VALIDATES_FULL_REPLACEMENT, exchange.status())
        .into_result()?;
    Ok(())
}

fn rejects_malformed_id(context: &CaseContext<'_>) -> CaseResult {
    let collection = context.path(ConfigKey::ProtectedEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let path = resource_path(&collection, INVALID_ID);

    let exchange = context
        .fixture()
        .put(&path)?
        .bearer(&token)
        .json(json!({
            "name": "Put Invalid Id",
            "email": "putinvalid@example.com",
            "gender": "male",
            "status": "active",
        }))
        .send()?;

    expect_status(&exchange, &[400, 404], "to a malformed id")?;
    Ok(())
}
