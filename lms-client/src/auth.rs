//! Interactive auth flows
//!
//! User-facing sign-in/sign-up/sign-out built on the remote service.
//! Unlike background hydration, failures here are surfaced to the
//! caller so the UI can show them inline.

use shared::{Identity, Role};

use crate::api::profiles;
use crate::error::{ClientError, ClientResult};
use crate::service::RemoteDataService;

/// Outcome of a sign-up attempt
#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub identity: Option<Identity>,
    /// The account exists but e-mail confirmation is still required
    pub confirmation_pending: bool,
}

fn require_credentials(email: &str, password: &str) -> ClientResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ClientError::Validation(
            "Email and password are required.".into(),
        ));
    }
    Ok(())
}

fn looks_like_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        _ => false,
    }
}

/// Sign in with email/password
pub async fn sign_in(
    service: &dyn RemoteDataService,
    email: &str,
    password: &str,
) -> ClientResult<Identity> {
    require_credentials(email, password)?;
    service.sign_in_with_password(email, password).await
}

/// Sign up with email/password, bootstrapping a profile row with the
/// default `employee` role when the account is created immediately.
pub async fn sign_up(
    service: &dyn RemoteDataService,
    email: &str,
    password: &str,
) -> ClientResult<SignUpOutcome> {
    require_credentials(email, password)?;

    let identity = service.sign_up(email, password).await?;

    if let Some(identity) = &identity {
        // Profile bootstrap is best-effort; a failed upsert must not
        // fail the sign-up the user just completed.
        if let Err(e) =
            profiles::upsert_default(service, &identity.id, Some(email), Role::Employee).await
        {
            tracing::warn!(user_id = %identity.id, "profile bootstrap failed: {e}");
        }
    }

    let confirmation_pending = identity.is_none();
    Ok(SignUpOutcome {
        identity,
        confirmation_pending,
    })
}

/// Dedicated administrator sign-in.
///
/// Signs in, confirms the profile role is `admin`, and signs back out
/// when it is not, so a non-admin session never lingers after using the
/// admin entry point.
pub async fn admin_sign_in(
    service: &dyn RemoteDataService,
    email: &str,
    password: &str,
) -> ClientResult<Identity> {
    if !looks_like_email(email.trim()) {
        return Err(ClientError::Validation(
            "Please enter a valid email address.".into(),
        ));
    }
    if password.len() < 6 {
        return Err(ClientError::Validation(
            "Password must be at least 6 characters.".into(),
        ));
    }

    let identity = service.sign_in_with_password(email.trim(), password).await?;

    // A fetch failure counts as "not an admin"; the admin entry point
    // never extends trust on missing information.
    let role = match profiles::fetch_role(service, &identity.id).await {
        Ok(role) => role,
        Err(e) => {
            tracing::warn!(user_id = %identity.id, "admin role check failed: {e}");
            None
        }
    };

    if role != Some(Role::Admin) {
        if let Err(e) = service.sign_out().await {
            tracing::warn!("sign-out after failed admin check: {e}");
        }
        return Err(ClientError::Forbidden("This account is not an admin.".into()));
    }

    Ok(identity)
}

/// Best-effort sign-out. Local state is cleared regardless of whether
/// the backend acknowledged the revocation.
pub async fn sign_out(service: &dyn RemoteDataService) -> ClientResult<()> {
    service.sign_out().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(looks_like_email("admin@company.com"));
        assert!(!looks_like_email("admin"));
        assert!(!looks_like_email("admin@company"));
        assert!(!looks_like_email("@company.com"));
        assert!(!looks_like_email("a@b@c.com"));
    }
}
