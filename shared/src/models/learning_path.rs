//! Learning path model

use serde::{Deserialize, Serialize};

/// Learning path row (`learning_paths` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPath {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub external_url: Option<String>,
}

/// Create learning path payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPathCreate {
    pub name: String,
    pub description: String,
    pub external_url: Option<String>,
}
