//! Feature data APIs
//!
//! Pure consumers of the table capability. None of these carry
//! authorization logic; row-level security on the backend is the
//! enforcement layer, and the route guard decides what gets rendered.

pub mod courses;
pub mod learning_paths;
pub mod profiles;
pub mod progress;
pub mod stats;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientResult;

/// Deserialize a set of JSON rows into typed models
pub(crate) fn typed_rows<T: DeserializeOwned>(rows: Vec<Value>) -> ClientResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(Into::into))
        .collect()
}
