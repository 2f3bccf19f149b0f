//! Session store
//!
//! Tracks the current authenticated identity. Hydrates once from the
//! backend at startup and then follows session-change notifications,
//! kicking off a role resolution on every identity transition.
//! Consumers observe immutable snapshots through a `watch` channel and
//! render with a null identity until hydration lands.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use shared::Identity;

use crate::role::RoleResolver;
use crate::service::{SessionEvent, SharedService};

/// Immutable view of the session state
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// `None` until hydration resolves, and after sign-out
    pub identity: Option<Identity>,
    /// Initial hydration still in flight
    pub loading: bool,
}

/// Holds the current identity and notifies dependents on change
pub struct SessionStore {
    service: SharedService,
    resolver: Arc<RoleResolver>,
    active: AtomicBool,
    snapshot: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    pub fn new(service: SharedService, resolver: Arc<RoleResolver>) -> Arc<Self> {
        let (snapshot, _) = watch::channel(SessionSnapshot {
            identity: None,
            loading: true,
        });
        Arc::new(Self {
            service,
            resolver,
            active: AtomicBool::new(true),
            snapshot,
        })
    }

    /// Subscribe to session snapshots
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn resolver(&self) -> &Arc<RoleResolver> {
        &self.resolver
    }

    /// Spawn hydration plus the event pump on the current runtime.
    ///
    /// The subscription is taken before hydration starts so a sign-in
    /// racing the initial `get_session` is not lost.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let events = self.service.subscribe_session();
        let store = self.clone();
        tokio::spawn(async move {
            store.initialize().await;
            store.run(events).await;
        })
    }

    /// Fetch the current session once. Never fatal: on error the
    /// identity is treated as null and the app stays usable signed out.
    pub async fn initialize(&self) {
        match self.service.get_session().await {
            Ok(identity) => self.on_change(identity),
            Err(e) => {
                tracing::warn!("session hydration failed, continuing signed out: {e}");
                self.on_change(None);
            }
        }
    }

    /// Consume session-change notifications until the channel closes or
    /// the store is torn down.
    pub async fn run(&self, mut events: broadcast::Receiver<SessionEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if !self.active.load(Ordering::SeqCst) {
                        break;
                    }
                    self.on_change(event.identity().cloned());
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    // Skipped events are fine: the next one carries the
                    // newest identity, and the resolver's token ordering
                    // handles the rest.
                    tracing::warn!(missed, "session event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Apply an identity transition.
    ///
    /// Idempotent and safe to call after teardown: once `shutdown` has
    /// run, no further state is mutated. The resolution token is claimed
    /// synchronously here so that resolutions carry tokens in arrival
    /// order even though they complete concurrently.
    pub fn on_change(&self, identity: Option<Identity>) {
        if !self.active.load(Ordering::SeqCst) {
            tracing::debug!("session change after teardown ignored");
            return;
        }

        self.snapshot.send_replace(SessionSnapshot {
            identity: identity.clone(),
            loading: false,
        });

        let token = self.resolver.begin(identity.as_ref());
        let resolver = self.resolver.clone();
        tokio::spawn(async move {
            resolver.complete(token, identity.as_ref()).await;
        });
    }

    /// Tear the store down. Subsequent notifications are ignored and the
    /// event pump exits on its next wakeup.
    pub fn shutdown(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}
