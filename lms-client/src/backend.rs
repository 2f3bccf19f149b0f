//! Hosted backend implementation of [`RemoteDataService`]
//!
//! Holds the current session (persisted to the cache directory so a
//! restarted client can hydrate without re-authenticating) and emits
//! session-change events on every sign-in/sign-out transition. The
//! backend's own session storage stays authoritative: the persisted
//! copy is revalidated against `/auth/v1/user` before it is trusted.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};

use shared::Identity;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::service::{RemoteDataService, SessionEvent};
use crate::table::Query;

const SESSION_FILE: &str = "session.json";
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Session state persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    access_token: String,
    refresh_token: Option<String>,
    identity: Identity,
}

impl PersistedSession {
    /// Extract the `exp` claim (Unix seconds) from the access token
    fn token_exp(&self) -> Option<u64> {
        use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

        let payload = self.access_token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: Value = serde_json::from_slice(&bytes).ok()?;
        claims.get("exp")?.as_u64()
    }

    fn is_expired(&self) -> bool {
        match self.token_exp() {
            Some(exp) => (shared::util::now_millis() / 1000) as u64 >= exp,
            None => false,
        }
    }
}

/// Client for the hosted backend's auth and table capabilities
pub struct BackendClient {
    http: HttpClient,
    cache_dir: PathBuf,
    session: RwLock<Option<PersistedSession>>,
    events: broadcast::Sender<SessionEvent>,
}

impl BackendClient {
    /// Create a new backend client, picking up a persisted session from
    /// the cache directory when one is still plausibly valid.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = HttpClient::new(&config)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let persisted = match Self::load_persisted(&config.cache_dir.join(SESSION_FILE)) {
            Some(session) if session.is_expired() => {
                tracing::debug!("persisted session expired, discarding");
                let _ = std::fs::remove_file(config.cache_dir.join(SESSION_FILE));
                None
            }
            other => other,
        };

        Ok(Self {
            http,
            cache_dir: config.cache_dir,
            session: RwLock::new(persisted),
            events,
        })
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }

    fn load_persisted(path: &std::path::Path) -> Option<PersistedSession> {
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!("corrupt persisted session, ignoring: {e}");
                    None
                }
            },
            Err(e) => {
                tracing::warn!("failed to read persisted session: {e}");
                None
            }
        }
    }

    /// Write (or clear) the persisted session. Best-effort: persistence
    /// is an optimization, never a correctness dependency.
    fn persist(&self, session: Option<&PersistedSession>) {
        let path = self.session_path();
        let result = match session {
            Some(session) => serde_json::to_string(session)
                .map_err(std::io::Error::other)
                .and_then(|json| {
                    std::fs::create_dir_all(&self.cache_dir)?;
                    std::fs::write(&path, json)
                }),
            None => match std::fs::remove_file(&path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            },
        };
        if let Err(e) = result {
            tracing::warn!("failed to persist session state: {e}");
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; events are advisory.
        let _ = self.events.send(event);
    }

    async fn bearer(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }
}

#[async_trait]
impl RemoteDataService for BackendClient {
    async fn get_session(&self) -> ClientResult<Option<Identity>> {
        let Some(token) = self.bearer().await else {
            return Ok(None);
        };

        match self.http.auth_user(&token).await {
            Ok(identity) => Ok(Some(identity)),
            Err(ClientError::Auth(reason)) => {
                tracing::debug!(%reason, "persisted session rejected by backend");
                *self.session.write().await = None;
                self.persist(None);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ClientResult<Identity> {
        let grant = self.http.token_password_grant(email, password).await?;
        let identity = grant.user.clone();

        let session = PersistedSession {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            identity: identity.clone(),
        };
        self.persist(Some(&session));
        *self.session.write().await = Some(session);

        tracing::debug!(user_id = %identity.id, "signed in");
        self.emit(SessionEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<Option<Identity>> {
        self.http.sign_up(email, password).await
    }

    async fn sign_out(&self) -> ClientResult<()> {
        let previous = self.session.write().await.take();
        self.persist(None);

        if let Some(session) = previous {
            if let Err(e) = self.http.logout(&session.access_token).await {
                // Best-effort: local state is already cleared.
                tracing::warn!("remote sign-out failed: {e}");
            }
        }

        self.emit(SessionEvent::SignedOut);
        Ok(())
    }

    fn subscribe_session(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn select(&self, table: &str, query: Query) -> ClientResult<Vec<Value>> {
        let bearer = self.bearer().await;
        self.http.get_rows(table, &query, bearer.as_deref()).await
    }

    async fn select_count(&self, table: &str, query: Query) -> ClientResult<u64> {
        let bearer = self.bearer().await;
        self.http.head_count(table, &query, bearer.as_deref()).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> ClientResult<()> {
        let bearer = self.bearer().await;
        self.http.insert_rows(table, &rows, bearer.as_deref()).await
    }

    async fn update(&self, table: &str, patch: Value, query: Query) -> ClientResult<()> {
        let bearer = self.bearer().await;
        self.http
            .patch_rows(table, &patch, &query, bearer.as_deref())
            .await
    }

    async fn upsert(
        &self,
        table: &str,
        rows: Vec<Value>,
        on_conflict: &[&str],
    ) -> ClientResult<()> {
        let bearer = self.bearer().await;
        self.http
            .upsert_rows(table, &rows, on_conflict, bearer.as_deref())
            .await
    }
}
