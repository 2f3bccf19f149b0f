//! Enrollment and progress API

use serde_json::{Value, json};

use shared::models::{CourseProgress, Enrollment};
use shared::util::now_rfc3339;

use crate::error::ClientResult;
use crate::service::RemoteDataService;
use crate::table::Query;

pub const ENROLLMENTS_TABLE: &str = "enrollments";
pub const PROGRESS_TABLE: &str = "course_progress";

/// Enroll a user in a learning path (idempotent)
pub async fn enroll(
    service: &dyn RemoteDataService,
    user_id: &str,
    learning_path_id: &str,
) -> ClientResult<()> {
    let row = Enrollment {
        user_id: user_id.to_string(),
        learning_path_id: learning_path_id.to_string(),
    };
    service
        .upsert(
            ENROLLMENTS_TABLE,
            vec![serde_json::to_value(row)?],
            &["user_id", "learning_path_id"],
        )
        .await
}

/// Start a course for a user: creates a zero-percent progress row, or
/// refreshes `started_at` on an existing row that never recorded one.
pub async fn start_course(
    service: &dyn RemoteDataService,
    user_id: &str,
    course_id: &str,
) -> ClientResult<()> {
    let existing = service
        .select(
            PROGRESS_TABLE,
            Query::new()
                .eq("user_id", user_id)
                .eq("course_id", course_id)
                .limit(1),
        )
        .await?;

    match existing.first() {
        Some(row) => {
            let started_at = row
                .get("started_at")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(now_rfc3339);
            service
                .update(
                    PROGRESS_TABLE,
                    json!({ "started_at": started_at }),
                    Query::new().eq("user_id", user_id).eq("course_id", course_id),
                )
                .await
        }
        None => {
            service
                .insert(
                    PROGRESS_TABLE,
                    vec![json!({
                        "user_id": user_id,
                        "course_id": course_id,
                        "percent_complete": 0,
                        "started_at": now_rfc3339(),
                        "completed_at": null,
                    })],
                )
                .await
        }
    }
}

/// Update progress percent for a course, clamped to 0..=100. Hitting
/// 100 stamps `completed_at`; anything below clears it.
pub async fn update_progress(
    service: &dyn RemoteDataService,
    user_id: &str,
    course_id: &str,
    percent: f64,
) -> ClientResult<f64> {
    let clamped = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let completed_at = if clamped >= 100.0 {
        json!(now_rfc3339())
    } else {
        json!(null)
    };

    service
        .upsert(
            PROGRESS_TABLE,
            vec![json!({
                "user_id": user_id,
                "course_id": course_id,
                "percent_complete": clamped,
                "completed_at": completed_at,
            })],
            &["user_id", "course_id"],
        )
        .await?;

    Ok(clamped)
}

/// All progress rows for a user
pub async fn user_progress(
    service: &dyn RemoteDataService,
    user_id: &str,
) -> ClientResult<Vec<CourseProgress>> {
    let rows = service
        .select(
            PROGRESS_TABLE,
            Query::new()
                .columns("user_id,course_id,percent_complete,started_at,completed_at")
                .eq("user_id", user_id),
        )
        .await?;
    super::typed_rows(rows)
}
