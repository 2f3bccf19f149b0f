//! Remote data service contract
//!
//! The backend is an opaque capability: session lifecycle on one side,
//! tabular CRUD on the other. Everything above this trait (session
//! store, role resolver, feature APIs) is written against it, so tests
//! can substitute an in-memory double for the hosted service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use shared::Identity;

use crate::error::ClientResult;
use crate::table::Query;

/// Session lifecycle notification, emitted on sign-in, sign-out, and
/// token refresh.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SignedIn(Identity),
    SignedOut,
    TokenRefreshed(Identity),
}

impl SessionEvent {
    /// The identity carried by this event (`None` on sign-out)
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionEvent::SignedIn(identity) | SessionEvent::TokenRefreshed(identity) => {
                Some(identity)
            }
            SessionEvent::SignedOut => None,
        }
    }
}

/// Auth and table capabilities of the hosted backend
#[async_trait]
pub trait RemoteDataService: Send + Sync {
    // ========== Auth capability ==========

    /// Current session, if any. Used for startup hydration; a failure
    /// here is non-fatal to callers (they treat the identity as null).
    async fn get_session(&self) -> ClientResult<Option<Identity>>;

    /// Sign in with email/password
    async fn sign_in_with_password(&self, email: &str, password: &str) -> ClientResult<Identity>;

    /// Sign up with email/password. Returns `None` when the account was
    /// created but e-mail confirmation is still pending.
    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<Option<Identity>>;

    /// Sign out. Best-effort: local session state is cleared and a
    /// `SignedOut` event is emitted even when the remote call fails.
    async fn sign_out(&self) -> ClientResult<()>;

    /// Subscribe to session-change notifications. Events are delivered
    /// in emission order.
    fn subscribe_session(&self) -> broadcast::Receiver<SessionEvent>;

    // ========== Table capability ==========

    /// Filtered, optionally ordered/limited select
    async fn select(&self, table: &str, query: Query) -> ClientResult<Vec<Value>>;

    /// Row count for a filtered select, without fetching rows
    async fn select_count(&self, table: &str, query: Query) -> ClientResult<u64>;

    /// Insert rows
    async fn insert(&self, table: &str, rows: Vec<Value>) -> ClientResult<()>;

    /// Patch rows matching the query's filters
    async fn update(&self, table: &str, patch: Value, query: Query) -> ClientResult<()>;

    /// Insert-or-merge rows on the given conflict columns
    async fn upsert(&self, table: &str, rows: Vec<Value>, on_conflict: &[&str])
    -> ClientResult<()>;
}

/// Shared handle to the remote data service
pub type SharedService = Arc<dyn RemoteDataService>;
