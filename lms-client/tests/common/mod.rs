//! In-memory stand-in for the hosted backend
//!
//! Implements [`RemoteDataService`] over plain maps so the session/role
//! core can be exercised without a network. Profile selects can be
//! gated per identity id to reproduce slow lookups landing after newer
//! ones.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::{Notify, broadcast};

use lms_client::error::{ClientError, ClientResult};
use lms_client::service::{RemoteDataService, SessionEvent};
use lms_client::table::Query;
use shared::Identity;

pub struct MockBackend {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    users: Mutex<HashMap<String, (String, Identity)>>,
    session: Mutex<Option<Identity>>,
    events: broadcast::Sender<SessionEvent>,
    /// Profile selects for these identity ids block until notified
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    fail_selects: AtomicBool,
    fail_get_session: AtomicBool,
    confirmation_required: AtomicBool,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            tables: Mutex::new(HashMap::new()),
            users: Mutex::new(HashMap::new()),
            session: Mutex::new(None),
            events,
            gates: Mutex::new(HashMap::new()),
            fail_selects: AtomicBool::new(false),
            fail_get_session: AtomicBool::new(false),
            confirmation_required: AtomicBool::new(false),
        })
    }

    /// Seed a profile row
    pub fn with_profile(self: &Arc<Self>, id: &str, role: Option<&str>) -> Arc<Self> {
        self.push_row(
            "profiles",
            json!({ "id": id, "email": format!("{id}@example.com"), "role": role }),
        );
        self.clone()
    }

    /// Register a sign-in account
    pub fn with_user(self: &Arc<Self>, email: &str, password: &str, identity: Identity) -> Arc<Self> {
        self.users
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), identity));
        self.clone()
    }

    pub fn push_row(&self, table: &str, row: Value) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every select/count fail with a remote error
    pub fn fail_selects(&self, fail: bool) {
        self.fail_selects.store(fail, Ordering::SeqCst);
    }

    /// Make session hydration fail with a network-shaped error
    pub fn fail_get_session(&self, fail: bool) {
        self.fail_get_session.store(fail, Ordering::SeqCst);
    }

    /// Require e-mail confirmation at sign-up (no immediate identity)
    pub fn require_confirmation(&self, required: bool) {
        self.confirmation_required.store(required, Ordering::SeqCst);
    }

    /// Hold profile selects for this identity id until the returned
    /// handle is notified
    pub fn gate_profile_lookup(&self, identity_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(identity_id.to_string(), gate.clone());
        gate
    }

    pub fn set_session(&self, identity: Option<Identity>) {
        *self.session.lock().unwrap() = identity;
    }

    pub fn current_session(&self) -> Option<Identity> {
        self.session.lock().unwrap().clone()
    }

    /// Emit a raw session event, as the hosted SDK would on refresh
    pub fn emit_session(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    fn gated(&self, query: &Query) -> Option<Arc<Notify>> {
        let gates = self.gates.lock().unwrap();
        query
            .filters()
            .iter()
            .find(|(column, _)| column == "id")
            .and_then(|(_, id)| gates.get(id).cloned())
    }

    fn select_rows(&self, table: &str, query: &Query) -> Vec<Value> {
        let mut rows: Vec<Value> = self
            .rows(table)
            .into_iter()
            .filter(|row| query.matches(row))
            .collect();

        if let Some(order) = query.order_spec() {
            rows.sort_by(|a, b| {
                let left = a.get(&order.column);
                let right = b.get(&order.column);
                let ordering = match (left, right) {
                    (Some(Value::Number(x)), Some(Value::Number(y))) => x
                        .as_f64()
                        .partial_cmp(&y.as_f64())
                        .unwrap_or(std::cmp::Ordering::Equal),
                    (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
                    _ => std::cmp::Ordering::Equal,
                };
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = query.limit_spec() {
            rows.truncate(limit as usize);
        }
        rows
    }
}

#[async_trait]
impl RemoteDataService for MockBackend {
    async fn get_session(&self) -> ClientResult<Option<Identity>> {
        if self.fail_get_session.load(Ordering::SeqCst) {
            return Err(ClientError::Auth("session endpoint unreachable".into()));
        }
        Ok(self.current_session())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ClientResult<Identity> {
        let identity = {
            let users = self.users.lock().unwrap();
            match users.get(email) {
                Some((expected, identity)) if expected == password => identity.clone(),
                Some(_) => return Err(ClientError::InvalidCredentials),
                None => return Err(ClientError::InvalidCredentials),
            }
        };
        self.set_session(Some(identity.clone()));
        self.emit_session(SessionEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<Option<Identity>> {
        if self.confirmation_required.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let mut identity = Identity::new(uuid::Uuid::new_v4().to_string());
        identity.email = Some(email.to_string());
        self.users
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), identity.clone()));
        Ok(Some(identity))
    }

    async fn sign_out(&self) -> ClientResult<()> {
        self.set_session(None);
        self.emit_session(SessionEvent::SignedOut);
        Ok(())
    }

    fn subscribe_session(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn select(&self, table: &str, query: Query) -> ClientResult<Vec<Value>> {
        if let Some(gate) = self.gated(&query) {
            gate.notified().await;
        }
        if self.fail_selects.load(Ordering::SeqCst) {
            return Err(ClientError::Remote("select unavailable".into()));
        }
        Ok(self.select_rows(table, &query))
    }

    async fn select_count(&self, table: &str, query: Query) -> ClientResult<u64> {
        if self.fail_selects.load(Ordering::SeqCst) {
            return Err(ClientError::Remote("select unavailable".into()));
        }
        Ok(self.select_rows(table, &query).len() as u64)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> ClientResult<()> {
        for row in rows {
            self.push_row(table, row);
        }
        Ok(())
    }

    async fn update(&self, table: &str, patch: Value, query: Query) -> ClientResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| query.matches(row)) {
                if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
                    for (key, value) in fields {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        Ok(())
    }

    async fn upsert(
        &self,
        table: &str,
        rows: Vec<Value>,
        on_conflict: &[&str],
    ) -> ClientResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let existing = tables.entry(table.to_string()).or_default();
        for row in rows {
            let conflict = existing.iter_mut().find(|candidate| {
                on_conflict
                    .iter()
                    .all(|key| candidate.get(*key) == row.get(*key))
            });
            match conflict {
                Some(candidate) => {
                    if let (Some(target), Some(fields)) =
                        (candidate.as_object_mut(), row.as_object())
                    {
                        for (key, value) in fields {
                            target.insert(key.clone(), value.clone());
                        }
                    }
                }
                None => existing.push(row),
            }
        }
        Ok(())
    }
}

/// Identity with a metadata role claim in the given namespace
#[allow(dead_code)]
pub fn identity_with_claim(id: &str, namespace: &str, role: &str) -> Identity {
    let mut identity = Identity::new(id);
    match namespace {
        "app" => {
            identity.app_metadata.insert("role".into(), json!(role));
        }
        _ => {
            identity.user_metadata.insert("role".into(), json!(role));
        }
    }
    identity
}
