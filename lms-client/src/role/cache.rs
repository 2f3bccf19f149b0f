//! Local role cache
//!
//! Persists the last-resolved role per identity id in a single JSON
//! file under the cache directory. The cache is advisory only: every
//! operation is independently fault-tolerant, and any storage failure
//! degrades to a cache miss.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use shared::Role;

/// Fixed cache file name
pub const ROLE_CACHE_FILE: &str = "role-cache.json";

/// Cache record: last-resolved role for an identity id
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RoleCacheEntry {
    identity_id: String,
    role: String,
}

/// File-backed role cache
#[derive(Debug, Clone)]
pub struct RoleCache {
    path: PathBuf,
}

impl RoleCache {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            path: cache_dir.join(ROLE_CACHE_FILE),
        }
    }

    /// Read the cached role for an identity.
    ///
    /// A hit requires the stored identity id to equal `identity_id`
    /// exactly; an entry for any other identity is ignored. Corrupt or
    /// unreadable cache files are treated as a miss.
    pub fn read(&self, identity_id: &str) -> Option<Role> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("role cache read failed: {e}");
                return None;
            }
        };

        let entry: RoleCacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("role cache corrupt, ignoring: {e}");
                return None;
            }
        };

        if entry.identity_id != identity_id {
            return None;
        }
        Role::parse(&entry.role)
    }

    /// Write the resolved role for an identity. Best-effort.
    pub fn write(&self, identity_id: &str, role: Role) {
        let entry = RoleCacheEntry {
            identity_id: identity_id.to_string(),
            role: role.as_str().to_string(),
        };
        let result = serde_json::to_string(&entry)
            .map_err(std::io::Error::other)
            .and_then(|json| {
                if let Some(dir) = self.path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                std::fs::write(&self.path, json)
            });
        if let Err(e) = result {
            tracing::warn!("role cache write failed: {e}");
        }
    }

    /// Remove the cache entry (sign-out). Best-effort.
    pub fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("role cache clear failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trip_same_identity() {
        let dir = TempDir::new().unwrap();
        let cache = RoleCache::new(dir.path());

        cache.write("u1", Role::Admin);
        assert_eq!(cache.read("u1"), Some(Role::Admin));
    }

    #[test]
    fn different_identity_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = RoleCache::new(dir.path());

        cache.write("u1", Role::Admin);
        assert_eq!(cache.read("u2"), None);
    }

    #[test]
    fn clear_removes_entry() {
        let dir = TempDir::new().unwrap();
        let cache = RoleCache::new(dir.path());

        cache.write("u1", Role::Employee);
        cache.clear();
        assert_eq!(cache.read("u1"), None);

        // clearing again must not fail
        cache.clear();
    }

    #[test]
    fn corrupt_file_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = RoleCache::new(dir.path());

        std::fs::write(dir.path().join(ROLE_CACHE_FILE), "{not json").unwrap();
        assert_eq!(cache.read("u1"), None);

        // and a subsequent write recovers
        cache.write("u1", Role::User);
        assert_eq!(cache.read("u1"), Some(Role::User));
    }

    #[test]
    fn unknown_role_string_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = RoleCache::new(dir.path());

        std::fs::write(
            dir.path().join(ROLE_CACHE_FILE),
            r#"{"identity_id":"u1","role":"superuser"}"#,
        )
        .unwrap();
        assert_eq!(cache.read("u1"), None);
    }
}
