//! Backend healthcheck
//!
//! Minimal connectivity verification for development diagnostics: an
//! auth session probe plus a head-count select on `learning_paths`.
//! Collects error strings instead of failing; the application must
//! never block on this.

use crate::service::RemoteDataService;
use crate::table::Query;

/// Healthcheck outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub session_ok: bool,
    pub db_ok: bool,
    pub errors: Vec<String>,
}

impl HealthReport {
    pub fn ok(&self) -> bool {
        self.session_ok && self.db_ok
    }
}

/// Probe the auth and table capabilities
pub async fn run(service: &dyn RemoteDataService) -> HealthReport {
    let mut errors = Vec::new();

    let session_ok = match service.get_session().await {
        Ok(_) => true,
        Err(e) => {
            errors.push(format!("auth session probe error: {e}"));
            false
        }
    };

    // RLS may legitimately deny this; the error string is still useful
    // to whoever is diagnosing the setup.
    let db_ok = match service
        .select_count("learning_paths", Query::new().columns("id").limit(1))
        .await
    {
        Ok(_) => true,
        Err(e) => {
            errors.push(format!("db select error: {e}"));
            false
        }
    };

    HealthReport {
        session_ok,
        db_ok,
        errors,
    }
}
