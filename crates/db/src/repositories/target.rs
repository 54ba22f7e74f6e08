//! Target repository.

use std::sync::Arc;

use crate::entities::{Target, target};
use faved_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

/// Target repository for database operations.
#[derive(Clone)]
pub struct TargetRepository {
    db: Arc<DatabaseConnection>,
}

impl TargetRepository {
    /// Create a new target repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a target by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<target::Model>> {
        Target::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store the recomputed favorite count for a target.
    pub async fn set_favorites_count(&self, model: target::Model, count: i32) -> AppResult<()> {
        let mut active: target::ActiveModel = model.into();
        active.favorites_count = Set(Some(count));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Invalidate the cached favorite count; the next read recomputes it.
    pub async fn invalidate_favorites_count(&self, id: &str) -> AppResult<()> {
        let Some(model) = self.find_by_id(id).await? else {
            return Ok(());
        };

        let mut active: target::ActiveModel = model.into();
        active.favorites_count = Set(None);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_target(id: &str, kind: &str, published: bool) -> target::Model {
        target::Model {
            id: id.to_string(),
            kind: kind.to_string(),
            title: "A Post".to_string(),
            slug: "a-post".to_string(),
            is_published: published,
            favorites_count: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let target = create_test_target("target1", "post", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[target.clone()]])
                .into_connection(),
        );

        let repo = TargetRepository::new(db);
        let result = repo.find_by_id("target1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().kind, "post");
    }

    #[tokio::test]
    async fn test_invalidate_count_missing_target_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<target::Model>::new()])
                .into_connection(),
        );

        let repo = TargetRepository::new(db);
        let result = repo.invalidate_favorites_count("gone").await;

        assert!(result.is_ok());
    }
}
