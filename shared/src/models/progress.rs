//! Enrollment and course progress models

use serde::{Deserialize, Serialize};

/// Enrollment row (`enrollments` table), unique per (user, learning path)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub user_id: String,
    pub learning_path_id: String,
}

/// Course progress row (`course_progress` table), unique per (user, course)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseProgress {
    pub user_id: String,
    pub course_id: String,
    /// 0..=100
    pub percent_complete: f64,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

/// Aggregate statistics shown on the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_users: u64,
    pub total_enrollments: u64,
    /// Mean `percent_complete` across all progress rows, rounded to 0.1
    pub avg_completion: f64,
}
