//! Favorite list repository.

use std::sync::Arc;

use crate::entities::{FavoriteList, favorite_list};
use faved_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Favorite list repository for database operations.
#[derive(Clone)]
pub struct FavoriteListRepository {
    db: Arc<DatabaseConnection>,
}

impl FavoriteListRepository {
    /// Create a new favorite list repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a list by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<favorite_list::Model>> {
        FavoriteList::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a list by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<favorite_list::Model>> {
        FavoriteList::find()
            .filter(favorite_list::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Lists owned by a user, store default ordering.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<favorite_list::Model>> {
        FavoriteList::find()
            .filter(favorite_list::Column::UserId.eq(user_id))
            .order_by_asc(favorite_list::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All lists regardless of owner.
    pub async fn find_all(&self) -> AppResult<Vec<favorite_list::Model>> {
        FavoriteList::find()
            .order_by_asc(favorite_list::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new list.
    pub async fn create(&self, model: favorite_list::ActiveModel) -> AppResult<favorite_list::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a list's name, slug and description.
    pub async fn update(
        &self,
        model: favorite_list::Model,
        name: String,
        slug: String,
        description: Option<String>,
    ) -> AppResult<favorite_list::Model> {
        let mut active: favorite_list::ActiveModel = model.into();
        active.name = Set(name);
        active.slug = Set(slug);
        active.description = Set(description);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a list by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        FavoriteList::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Reassign every list of one user to another.
    pub async fn reassign_owner(&self, user_id: &str, new_owner_id: &str) -> AppResult<()> {
        FavoriteList::update_many()
            .col_expr(
                favorite_list::Column::UserId,
                sea_orm::sea_query::Expr::value(new_owner_id),
            )
            .filter(favorite_list::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
