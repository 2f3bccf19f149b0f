//! Role resolver
//!
//! Three-tier resolution, stopping at the first hit:
//! 1. local cache entry for this exact identity id
//! 2. role claim embedded in the identity's metadata (written back to
//!    the cache)
//! 3. remote `profiles` lookup by id (written back to the cache; a
//!    missing row or absent role defaults to the unprivileged `user`
//!    role, never to `admin`)
//!
//! Concurrent resolutions are not serialized. Each one captures a
//! generation token up front; a result may only be applied while its
//! token is still the newest, so a slow lookup for a previous identity
//! can never overwrite the role of the current one. Token claims and
//! result commits share a lock, making the staleness check and the
//! publish a single step.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::watch;

use shared::{Identity, Role};

use crate::error::ClientResult;
use crate::role::cache::RoleCache;
use crate::service::SharedService;
use crate::table::Query;

const PROFILES_TABLE: &str = "profiles";

/// Published resolver output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleState {
    /// `None` means unknown; the guard fails closed on it
    pub role: Option<Role>,
    /// A resolution for the current identity is still in flight
    pub loading: bool,
}

impl RoleState {
    pub const fn unknown() -> Self {
        Self {
            role: None,
            loading: false,
        }
    }

    pub const fn loading() -> Self {
        Self {
            role: None,
            loading: true,
        }
    }

    pub const fn resolved(role: Role) -> Self {
        Self {
            role: Some(role),
            loading: false,
        }
    }
}

/// Resolves and publishes the authorization role for the current identity
pub struct RoleResolver {
    service: SharedService,
    cache: RoleCache,
    generation: Mutex<u64>,
    state: watch::Sender<RoleState>,
}

impl RoleResolver {
    pub fn new(service: SharedService, cache: RoleCache) -> Self {
        let (state, _) = watch::channel(RoleState::unknown());
        Self {
            service,
            cache,
            generation: Mutex::new(0),
            state,
        }
    }

    /// Subscribe to role state changes
    pub fn subscribe(&self) -> watch::Receiver<RoleState> {
        self.state.subscribe()
    }

    /// Current role state snapshot
    pub fn state(&self) -> RoleState {
        *self.state.borrow()
    }

    /// Start a resolution for an identity transition.
    ///
    /// Must be called synchronously at the point the transition is
    /// observed: claiming the token here is what establishes which
    /// resolution is newest. The synchronous part of the work also
    /// happens here: a null identity clears the role and the cache
    /// immediately, and a non-null identity flips the state to loading.
    pub fn begin(&self, identity: Option<&Identity>) -> u64 {
        let mut generation = self.lock_generation();
        *generation += 1;
        let token = *generation;
        match identity {
            None => {
                self.cache.clear();
                self.state.send_replace(RoleState::unknown());
            }
            Some(identity) => {
                tracing::debug!(user_id = %identity.id, token, "role resolution started");
                self.state.send_replace(RoleState::loading());
            }
        }
        token
    }

    /// Complete a resolution begun with [`begin`](Self::begin).
    ///
    /// Returns the applied role, or `None` when the identity is null,
    /// the role could not be determined, or the result was discarded as
    /// stale.
    pub async fn complete(&self, token: u64, identity: Option<&Identity>) -> Option<Role> {
        let Some(identity) = identity else {
            return None;
        };

        if let Some(role) = self.cache.read(&identity.id) {
            return self.apply(token, &identity.id, role, false);
        }

        if let Some(role) = identity.role_claim() {
            return self.apply(token, &identity.id, role, true);
        }

        match self.fetch_profile_role(&identity.id).await {
            Ok(role) => self.apply(token, &identity.id, role, true),
            Err(e) => {
                // Denied and missing are indistinguishable under RLS;
                // either way the role stays unknown and the guard
                // refuses access.
                tracing::warn!(user_id = %identity.id, "profile lookup failed: {e}");
                self.publish(token, RoleState::unknown());
                None
            }
        }
    }

    /// Resolve in one step. Session handling uses the split
    /// `begin`/`complete` form so the token is claimed in arrival order.
    pub async fn resolve(&self, identity: Option<&Identity>) -> Option<Role> {
        let token = self.begin(identity);
        self.complete(token, identity).await
    }

    fn apply(
        &self,
        token: u64,
        identity_id: &str,
        role: Role,
        write_back: bool,
    ) -> Option<Role> {
        let generation = self.lock_generation();
        if *generation != token {
            tracing::debug!(token, current = *generation, "stale role resolution discarded");
            return None;
        }
        if write_back {
            self.cache.write(identity_id, role);
        }
        self.state.send_replace(RoleState::resolved(role));
        drop(generation);
        tracing::debug!(user_id = %identity_id, %role, "role resolved");
        Some(role)
    }

    fn publish(&self, token: u64, state: RoleState) {
        let generation = self.lock_generation();
        if *generation == token {
            self.state.send_replace(state);
        } else {
            tracing::debug!(token, current = *generation, "stale role resolution discarded");
        }
    }

    /// The generation lock serializes commits. A token claim and its
    /// publish, or a completion's staleness check and its publish,
    /// each run fully under the lock, so a stale result can never land
    /// after a newer transition has already published.
    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    async fn fetch_profile_role(&self, identity_id: &str) -> ClientResult<Role> {
        let rows = self
            .service
            .select(
                PROFILES_TABLE,
                Query::new().columns("role").eq("id", identity_id).limit(1),
            )
            .await?;

        // No row, a null role, or a role value this client does not
        // recognize all collapse to the soft default.
        Ok(rows
            .first()
            .and_then(|row| row.get("role"))
            .and_then(Value::as_str)
            .and_then(Role::parse)
            .unwrap_or(Role::User))
    }
}
