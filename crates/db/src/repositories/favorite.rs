//! Favorite repository.

use std::sync::Arc;

use crate::entities::{Favorite, favorite};
use faved_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

/// The target kind assumed when a favorite row carries none.
pub const DEFAULT_TARGET_KIND: &str = "post";

/// Filter for favorite queries. All fields combine with AND; favorites
/// whose target_id is empty are always excluded.
#[derive(Debug, Clone, Default)]
pub struct FavoriteFilter {
    /// Restrict to favorites owned by this user.
    pub user_id: Option<String>,
    /// Restrict to favorites referencing this target.
    pub target_id: Option<String>,
    /// Restrict to favorites of this target kind. The default kind
    /// matches rows with no stored kind as well.
    pub target_kind: Option<String>,
    /// Restrict to favorites assigned to this list.
    pub list_id: Option<String>,
}

/// One page of favorite query results.
#[derive(Debug, Clone)]
pub struct FavoritePage {
    /// Favorites on this page, newest first.
    pub items: Vec<favorite::Model>,
    /// Total matching favorites across all pages.
    pub total_items: u64,
    /// Total page count for the requested page size.
    pub total_pages: u64,
    /// The 1-indexed page that was returned.
    pub page: u64,
}

/// Favorite repository for database operations.
#[derive(Clone)]
pub struct FavoriteRepository {
    db: Arc<DatabaseConnection>,
}

impl FavoriteRepository {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn condition(filter: &FavoriteFilter) -> Condition {
        let mut cond = Condition::all().add(favorite::Column::TargetId.ne(""));

        if let Some(user_id) = &filter.user_id {
            cond = cond.add(favorite::Column::UserId.eq(user_id.as_str()));
        }
        if let Some(target_id) = &filter.target_id {
            cond = cond.add(favorite::Column::TargetId.eq(target_id.as_str()));
        }
        if let Some(kind) = &filter.target_kind {
            if kind == DEFAULT_TARGET_KIND {
                // Rows created before multi-kind support store no kind.
                cond = cond.add(
                    Condition::any()
                        .add(favorite::Column::TargetKind.is_null())
                        .add(favorite::Column::TargetKind.eq(kind.as_str())),
                );
            } else {
                cond = cond.add(favorite::Column::TargetKind.eq(kind.as_str()));
            }
        }
        if let Some(list_id) = &filter.list_id {
            cond = cond.add(favorite::Column::ListId.eq(list_id.as_str()));
        }

        cond
    }

    /// Find a favorite by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<favorite::Model>> {
        Favorite::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Run a filtered, paginated query. `page` is 1-indexed (values
    /// below 1 are coerced); `per_page <= 0` returns all matches in a
    /// single page.
    pub async fn search(
        &self,
        filter: &FavoriteFilter,
        page: u64,
        per_page: i64,
    ) -> AppResult<FavoritePage> {
        let page = page.max(1);
        let cond = Self::condition(filter);

        let total_items = Favorite::find()
            .filter(cond.clone())
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if per_page <= 0 {
            let items = Favorite::find()
                .filter(cond)
                .order_by_desc(favorite::Column::Id)
                .all(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            return Ok(FavoritePage {
                items,
                total_items,
                total_pages: u64::from(total_items > 0),
                page: 1,
            });
        }

        let per_page = per_page as u64;
        let total_pages = total_items.div_ceil(per_page);

        let items = Favorite::find()
            .filter(cond)
            .order_by_desc(favorite::Column::Id)
            .offset((page - 1) * per_page)
            .limit(per_page)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(FavoritePage {
            items,
            total_items,
            total_pages,
            page,
        })
    }

    /// Ids-only projection of a filtered query, newest first. Used for
    /// existence checks without materializing full records.
    pub async fn find_ids(
        &self,
        filter: &FavoriteFilter,
        limit: Option<u64>,
    ) -> AppResult<Vec<String>> {
        let mut query = Favorite::find()
            .filter(Self::condition(filter))
            .order_by_desc(favorite::Column::Id)
            .select_only()
            .column(favorite::Column::Id);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count matching favorites.
    pub async fn count(&self, filter: &FavoriteFilter) -> AppResult<u64> {
        Favorite::find()
            .filter(Self::condition(filter))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new favorite.
    pub async fn create(&self, model: favorite::ActiveModel) -> AppResult<favorite::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply an update to an existing favorite.
    pub async fn update(&self, model: favorite::ActiveModel) -> AppResult<favorite::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a favorite by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Favorite::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete all favorites owned by a user.
    pub async fn delete_by_user(&self, user_id: &str) -> AppResult<()> {
        Favorite::delete_many()
            .filter(favorite::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Clear the list assignment of every favorite in a list. Members
    /// keep existing; only the grouping goes away.
    pub async fn unassign_list(&self, list_id: &str) -> AppResult<()> {
        Favorite::update_many()
            .col_expr(favorite::Column::ListId, sea_orm::sea_query::Expr::value(None::<String>))
            .filter(favorite::Column::ListId.eq(list_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Helper for building an update that only touches the note and the
    /// list assignment.
    #[must_use]
    pub fn note_and_list_update(
        model: favorite::Model,
        note: Option<String>,
        list_id: Option<Option<String>>,
    ) -> favorite::ActiveModel {
        let mut active: favorite::ActiveModel = model.into();
        active.note = Set(note);
        if let Some(list_id) = list_id {
            active.list_id = Set(list_id);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_favorite(id: &str, user_id: &str, target_id: &str) -> favorite::Model {
        favorite::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            target_id: target_id.to_string(),
            target_kind: None,
            note: None,
            list_id: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let fav = create_test_favorite("fav1", "user1", "target1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fav.clone()]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let result = repo.find_by_id("fav1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "fav1");
    }

    #[tokio::test]
    async fn test_search_page_math() {
        let fav1 = create_test_favorite("fav30", "user1", "target30");
        let fav2 = create_test_favorite("fav29", "user1", "target29");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(30)),
                }]])
                .append_query_results([[fav1, fav2]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let filter = FavoriteFilter {
            user_id: Some("user1".to_string()),
            ..FavoriteFilter::default()
        };
        let page = repo.search(&filter, 2, 25).await.unwrap();

        assert_eq!(page.total_items, 30);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_search_per_page_zero_returns_all() {
        let fav = create_test_favorite("fav1", "user1", "target1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1)),
                }]])
                .append_query_results([[fav]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let page = repo.search(&FavoriteFilter::default(), 1, 0).await.unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_find_ids() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! { "id" => sea_orm::Value::String(Some(Box::new("fav2".to_string()))) },
                    maplit::btreemap! { "id" => sea_orm::Value::String(Some(Box::new("fav1".to_string()))) },
                ]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let filter = FavoriteFilter {
            target_id: Some("target1".to_string()),
            ..FavoriteFilter::default()
        };
        let ids = repo.find_ids(&filter, None).await.unwrap();

        assert_eq!(ids, vec!["fav2".to_string(), "fav1".to_string()]);
    }

    #[tokio::test]
    async fn test_count_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0)),
                }]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let count = repo.count(&FavoriteFilter::default()).await.unwrap();

        assert_eq!(count, 0);
    }
}
