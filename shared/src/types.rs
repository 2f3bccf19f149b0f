//! Common types for the shared crate

use serde::{Deserialize, Serialize};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Authorization role resolved for an identity.
///
/// `Admin` and `Employee` are assigned through the remote profile table;
/// `User` is the soft default applied when a profile row exists without a
/// role (or does not exist at all). An unknown role is represented as
/// `Option::<Role>::None`, never as a variant, so that "not yet resolved"
/// can never be confused with a granted role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    User,
}

impl Role {
    /// Parse a role string from a profile row or metadata claim.
    ///
    /// Unrecognized values return `None`; authorization treats them the
    /// same as an unresolved role.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_roles() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("employee"), Some(Role::Employee));
        assert_eq!(Role::parse("user"), Some(Role::User));
    }

    #[test]
    fn parse_unknown_role_is_none() {
        assert_eq!(Role::parse("manager"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("Admin"), None);
    }
}
