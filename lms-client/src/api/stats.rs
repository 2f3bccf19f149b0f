//! Admin aggregate statistics

use serde_json::Value;

use shared::models::AggregateStats;

use crate::error::ClientResult;
use crate::service::RemoteDataService;
use crate::table::Query;

/// Aggregate stats for the admin dashboard: head-counts of profiles and
/// enrollments, plus the mean completion percent across all progress
/// rows (rounded to 0.1).
pub async fn aggregate(service: &dyn RemoteDataService) -> ClientResult<AggregateStats> {
    let total_users = service
        .select_count("profiles", Query::new().columns("id"))
        .await?;
    let total_enrollments = service
        .select_count("enrollments", Query::new().columns("user_id"))
        .await?;

    let progress = service
        .select("course_progress", Query::new().columns("percent_complete"))
        .await?;

    let avg_completion = if progress.is_empty() {
        0.0
    } else {
        let sum: f64 = progress
            .iter()
            .filter_map(|row| row.get("percent_complete"))
            .filter_map(Value::as_f64)
            .sum();
        (sum / progress.len() as f64 * 10.0).round() / 10.0
    };

    Ok(AggregateStats {
        total_users,
        total_enrollments,
        avg_completion,
    })
}
