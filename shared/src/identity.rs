//! Authenticated identity

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Role;

/// The authenticated user record owned by the remote auth capability.
///
/// The client never creates or mutates identities; it receives them from
/// sign-in responses and session-change notifications and holds them as
/// snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Unique user id assigned by the auth service
    pub id: String,
    pub email: Option<String>,
    /// Service-controlled claims (trusted, set by the backend)
    #[serde(default)]
    pub app_metadata: Map<String, Value>,
    /// User-controlled claims (advisory)
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            app_metadata: Map::new(),
            user_metadata: Map::new(),
        }
    }

    /// Extract an embedded role claim, if any.
    ///
    /// Namespaces are checked in a fixed precedence order: the
    /// service-controlled `app_metadata` wins over `user_metadata`.
    /// A claim carrying an unrecognized role string is ignored.
    pub fn role_claim(&self) -> Option<Role> {
        for metadata in [&self.app_metadata, &self.user_metadata] {
            if let Some(value) = metadata.get("role").and_then(Value::as_str) {
                if let Some(role) = Role::parse(value) {
                    return Some(role);
                }
            }
        }
        None
    }
}
