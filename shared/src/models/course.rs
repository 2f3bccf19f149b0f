//! Course model

use serde::{Deserialize, Serialize};

/// Course row (`courses` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub learning_path_id: String,
    pub title: String,
    /// Position within the learning path, ascending
    pub sequence: i64,
    pub url: Option<String>,
}

/// Create course payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCreate {
    pub learning_path_id: String,
    pub title: String,
    pub sequence: i64,
    pub url: Option<String>,
}
