//! Shared types for the LMS client
//!
//! Common types used across client crates: the authenticated identity,
//! the resolved authorization role, and the remote table row models.

pub mod identity;
pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use identity::Identity;
pub use serde::{Deserialize, Serialize};
pub use types::{Role, Timestamp};
