//! Notice repository.

use std::sync::Arc;

use crate::entities::{Notice, notice};
use faved_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Notice repository for database operations.
#[derive(Clone)]
pub struct NoticeRepository {
    db: Arc<DatabaseConnection>,
}

impl NoticeRepository {
    /// Create a new notice repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Queue a notice.
    pub async fn create(&self, model: notice::ActiveModel) -> AppResult<notice::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Notices queued for a user, oldest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<notice::Model>> {
        Notice::find()
            .filter(notice::Column::UserId.eq(user_id))
            .order_by_asc(notice::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete every notice queued for a user.
    pub async fn delete_by_user(&self, user_id: &str) -> AppResult<()> {
        Notice::delete_many()
            .filter(notice::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
