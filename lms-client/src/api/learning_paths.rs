//! Learning paths API

use serde_json::json;

use shared::models::{LearningPath, LearningPathCreate};

use crate::error::{ClientError, ClientResult};
use crate::service::RemoteDataService;
use crate::table::Query;

pub const TABLE: &str = "learning_paths";

/// List all learning paths, ordered by name
pub async fn list(service: &dyn RemoteDataService) -> ClientResult<Vec<LearningPath>> {
    let rows = service.select(TABLE, Query::new().order("name", true)).await?;
    super::typed_rows(rows)
}

/// Create a learning path
pub async fn create(
    service: &dyn RemoteDataService,
    path: LearningPathCreate,
) -> ClientResult<()> {
    let name = path.name.trim();
    if name.is_empty() {
        return Err(ClientError::Validation("Name is required".into()));
    }
    let description = path.description.trim();
    if description.is_empty() {
        return Err(ClientError::Validation("Description is required".into()));
    }
    if let Some(url) = path.external_url.as_deref() {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::Validation(
                "External URL must start with http(s)://".into(),
            ));
        }
    }

    service
        .insert(
            TABLE,
            vec![json!({
                "name": name,
                "description": description,
                "external_url": path.external_url,
            })],
        )
        .await
}
