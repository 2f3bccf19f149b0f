//! Role resolution
//!
//! Derives the authorization role for the current identity and keeps it
//! fresh across identity transitions without ever applying a stale
//! lookup result.

pub mod cache;
mod resolver;

pub use cache::RoleCache;
pub use resolver::{RoleResolver, RoleState};
