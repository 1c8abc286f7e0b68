//! Deletion semantics.

use super::support::{expect_status, resource_path};
use super::{CaseContext, CaseGroup, ContractCase};
use crate::config::ConfigKey;
use crate::outcome::CaseResult;

pub(super) const CASES: &[ContractCase] = &[ContractCase::new(
    "delete-001-conflict",
    CaseGroup::Delete,
    "DELETE of a resource with dependants answers 409",
    rejects_conflicting_delete,
)];

fn rejects_conflicting_delete(context: &CaseContext<'_>) -> CaseResult {
    let [id] = context.require([ConfigKey::ConflictResourceId])?;
    let collection = context.path(ConfigKey::ProtectedEndpoint)?;
    let token = context.token(ConfigKey::AuthToken)?;
    let path = resource_path(&collection, &id);

    let exchange = context.fixture().delete(&path)?.bearer(&token).send()?;

    expect_status(&exchange, &[409], "of a resource that cannot be removed")?;
    Ok(())
}
