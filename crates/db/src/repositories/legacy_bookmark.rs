//! Legacy bookmark repository.

use std::sync::Arc;

use crate::entities::{LegacyBookmark, legacy_bookmark};
use faved_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Read-only access to the predecessor system's bookmark table.
#[derive(Clone)]
pub struct LegacyBookmarkRepository {
    db: Arc<DatabaseConnection>,
}

impl LegacyBookmarkRepository {
    /// Create a new legacy bookmark repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Bookmarks owned by a user, oldest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<legacy_bookmark::Model>> {
        LegacyBookmark::find()
            .filter(legacy_bookmark::Column::UserId.eq(user_id))
            .order_by_asc(legacy_bookmark::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
