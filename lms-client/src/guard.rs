//! Route authorization guard
//!
//! A pure decision function consulted before rendering any protected
//! view. It holds no state and caches nothing; callers re-evaluate it
//! whenever any input changes. The one non-negotiable property is that
//! it fails closed: an unknown role never grants access, and protected
//! content is never rendered while the role is still loading.

use shared::{Identity, Role};

use crate::role::RoleState;
use crate::session::SessionSnapshot;

/// What a navigation to a role-gated view should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Render the protected content
    Render,
    /// Send the user to `/signin`, optionally carrying the attempted
    /// location so sign-in can return there (advisory only)
    RedirectSignIn { return_to: Option<String> },
    /// Send the user to `/unauthorized`
    RedirectUnauthorized,
    /// Render an interim "checking permissions" placeholder
    ShowChecking,
}

/// Decide what a role-gated navigation should render.
///
/// Rules, evaluated in order:
/// 1. no identity → redirect to sign-in
/// 2. no role requirement → render
/// 3. role still loading → interim placeholder (no render, no redirect)
/// 4. role unknown after loading → redirect to unauthorized
/// 5. role mismatch → redirect to unauthorized
/// 6. otherwise → render
pub fn decide(
    identity: Option<&Identity>,
    role: Option<Role>,
    role_loading: bool,
    required_role: Option<Role>,
    attempted: Option<&str>,
) -> Decision {
    if identity.is_none() {
        return Decision::RedirectSignIn {
            return_to: attempted.map(str::to_string),
        };
    }

    let Some(required) = required_role else {
        return Decision::Render;
    };

    if role_loading {
        return Decision::ShowChecking;
    }

    match role {
        Some(role) if role == required => Decision::Render,
        _ => Decision::RedirectUnauthorized,
    }
}

/// Convenience form over the store snapshots
pub fn decide_snapshot(
    session: &SessionSnapshot,
    role: &RoleState,
    required_role: Option<Role>,
    attempted: Option<&str>,
) -> Decision {
    decide(
        session.identity.as_ref(),
        role.role,
        role.loading,
        required_role,
        attempted,
    )
}
