//! Profile model

use serde::{Deserialize, Serialize};

/// Profile row (`profiles` table), keyed by the auth user id.
///
/// `role` is stored as the raw string so that a row carrying a value this
/// client does not recognize still deserializes; role interpretation
/// happens at resolution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<String>,
}

/// Upsert payload used to bootstrap a profile at sign-up time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpsert {
    pub id: String,
    pub email: Option<String>,
    pub role: String,
}
