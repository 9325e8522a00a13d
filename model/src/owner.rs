use crate::error::{self, Result};
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use k8s_openapi::Resource;
use snafu::OptionExt;

/// Derives the owner-reference set naming `service_account` as the owner of dependent objects, so
/// that deleting the service account cascades to them. The service account must be the live object
/// as returned by the API server; the uid is only assigned on creation.
pub fn owner_references_for_service_account(
    service_account: &ServiceAccount,
) -> Result<Vec<OwnerReference>> {
    let name = service_account
        .metadata
        .name
        .clone()
        .context(error::MissingObjectIdentitySnafu {
            what: "service account",
            field: "name",
        })?;
    let uid = service_account
        .metadata
        .uid
        .clone()
        .context(error::MissingObjectIdentitySnafu {
            what: "service account",
            field: "uid",
        })?;

    Ok(vec![OwnerReference {
        api_version: ServiceAccount::API_VERSION.to_string(),
        kind: ServiceAccount::KIND.to_string(),
        name,
        uid,
        ..Default::default()
    }])
}
