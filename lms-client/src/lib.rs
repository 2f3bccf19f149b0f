//! LMS Client - client library for the hosted learning-management backend
//!
//! Wraps the backend's auth and table capabilities behind the
//! [`RemoteDataService`] trait and layers the session/role/guard core on
//! top: [`SessionStore`] tracks the authenticated identity,
//! [`RoleResolver`] derives the authorization role (cache, metadata
//! claim, then remote profile lookup, with stale-resolution discard),
//! and [`guard::decide`] is the pure routing decision for role-gated
//! views.

pub mod api;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod guard;
pub mod health;
pub mod http;
pub mod role;
pub mod service;
pub mod session;
pub mod table;

pub use backend::BackendClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use guard::{Decision, decide};
pub use role::{RoleResolver, RoleState, cache::RoleCache};
pub use service::{RemoteDataService, SessionEvent, SharedService};
pub use session::{SessionSnapshot, SessionStore};
pub use table::Query;

// Re-export shared types for convenience
pub use shared::{Identity, Role};
