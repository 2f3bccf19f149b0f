//! Courses API

use serde_json::json;

use shared::models::{Course, CourseCreate};

use crate::error::{ClientError, ClientResult};
use crate::service::RemoteDataService;
use crate::table::Query;

pub const TABLE: &str = "courses";

/// List the courses of a learning path, in sequence order
pub async fn list_for_path(
    service: &dyn RemoteDataService,
    learning_path_id: &str,
) -> ClientResult<Vec<Course>> {
    let rows = service
        .select(
            TABLE,
            Query::new()
                .eq("learning_path_id", learning_path_id)
                .order("sequence", true),
        )
        .await?;
    super::typed_rows(rows)
}

/// Fetch a single course by id
pub async fn get(service: &dyn RemoteDataService, course_id: &str) -> ClientResult<Option<Course>> {
    let rows = service
        .select(TABLE, Query::new().eq("id", course_id).limit(1))
        .await?;
    let mut courses: Vec<Course> = super::typed_rows(rows)?;
    Ok(courses.pop())
}

/// Create a course within a learning path
pub async fn create(service: &dyn RemoteDataService, course: CourseCreate) -> ClientResult<()> {
    let title = course.title.trim();
    if title.is_empty() {
        return Err(ClientError::Validation("Title is required".into()));
    }
    if course.sequence < 0 {
        return Err(ClientError::Validation(
            "Sequence must be zero or positive".into(),
        ));
    }

    service
        .insert(
            TABLE,
            vec![json!({
                "learning_path_id": course.learning_path_id,
                "title": title,
                "sequence": course.sequence,
                "url": course.url,
            })],
        )
        .await
}
