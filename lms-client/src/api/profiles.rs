//! Profiles API

use serde_json::Value;

use shared::Role;
use shared::models::{Profile, ProfileUpsert};

use crate::error::ClientResult;
use crate::service::RemoteDataService;
use crate::table::Query;

pub const TABLE: &str = "profiles";

/// Fetch a profile by identity id
pub async fn get(service: &dyn RemoteDataService, identity_id: &str) -> ClientResult<Option<Profile>> {
    let rows = service
        .select(TABLE, Query::new().eq("id", identity_id).limit(1))
        .await?;
    let mut profiles: Vec<Profile> = super::typed_rows(rows)?;
    Ok(profiles.pop())
}

/// Fetch only the role column for an identity.
///
/// Returns `None` when there is no row, the role is absent, or the
/// stored value is not a role this client recognizes.
pub async fn fetch_role(
    service: &dyn RemoteDataService,
    identity_id: &str,
) -> ClientResult<Option<Role>> {
    let rows = service
        .select(
            TABLE,
            Query::new().columns("role").eq("id", identity_id).limit(1),
        )
        .await?;
    Ok(rows
        .first()
        .and_then(|row| row.get("role"))
        .and_then(Value::as_str)
        .and_then(Role::parse))
}

/// Upsert a profile with a default role (sign-up bootstrap).
///
/// Conflicts on `id` so re-running for an existing account is
/// harmless.
pub async fn upsert_default(
    service: &dyn RemoteDataService,
    identity_id: &str,
    email: Option<&str>,
    role: Role,
) -> ClientResult<()> {
    let row = ProfileUpsert {
        id: identity_id.to_string(),
        email: email.map(str::to_string),
        role: role.as_str().to_string(),
    };
    service
        .upsert(TABLE, vec![serde_json::to_value(row)?], &["id"])
        .await
}
