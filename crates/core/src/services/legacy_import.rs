//! One-time legacy bookmark import.
//!
//! The import runs on a user's first dashboard view: every bookmark the
//! predecessor system stored for them becomes a favorite, carrying its
//! note. The `legacy_imported` flag on the user makes the run
//! once-per-user idempotent, and the data source is injected so the
//! import is not tied to any particular storage.

use std::sync::Arc;

use async_trait::async_trait;
use faved_common::{AppError, AppResult};
use faved_db::repositories::{LegacyBookmarkRepository, UserRepository};

use crate::services::favorite::{FavoriteService, FavoriteUpdateInput};

/// A bookmark row from the predecessor system.
#[derive(Debug, Clone)]
pub struct LegacyBookmark {
    /// Bookmarked target.
    pub target_id: String,
    /// Bookmark note, carried over into the favorite.
    pub note: Option<String>,
}

/// Source of legacy bookmark rows.
#[async_trait]
pub trait LegacyBookmarkSource: Send + Sync {
    /// Bookmarks the predecessor system stored for a user, oldest first.
    async fn bookmarks_for(&self, user_id: &str) -> AppResult<Vec<LegacyBookmark>>;
}

/// Source backed by the `legacy_bookmark` table.
#[derive(Clone)]
pub struct DbLegacyBookmarkSource {
    repo: LegacyBookmarkRepository,
}

impl DbLegacyBookmarkSource {
    /// Create a new table-backed source.
    #[must_use]
    pub const fn new(repo: LegacyBookmarkRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl LegacyBookmarkSource for DbLegacyBookmarkSource {
    async fn bookmarks_for(&self, user_id: &str) -> AppResult<Vec<LegacyBookmark>> {
        let rows = self.repo.find_by_user(user_id).await?;

        Ok(rows
            .into_iter()
            .map(|row| LegacyBookmark {
                target_id: row.target_id,
                note: row.note,
            })
            .collect())
    }
}

/// Source for deployments with no legacy data.
#[derive(Clone, Copy, Default)]
pub struct NoOpLegacyBookmarkSource;

#[async_trait]
impl LegacyBookmarkSource for NoOpLegacyBookmarkSource {
    async fn bookmarks_for(&self, _user_id: &str) -> AppResult<Vec<LegacyBookmark>> {
        Ok(Vec::new())
    }
}

/// Runs the one-time import.
#[derive(Clone)]
pub struct LegacyImportService {
    source: Arc<dyn LegacyBookmarkSource>,
    favorite_service: FavoriteService,
    user_repo: UserRepository,
}

impl LegacyImportService {
    /// Create a new legacy import service.
    #[must_use]
    pub fn new(
        source: Arc<dyn LegacyBookmarkSource>,
        favorite_service: FavoriteService,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            source,
            favorite_service,
            user_repo,
        }
    }

    /// Import a user's legacy bookmarks if not already done. Returns the
    /// number of favorites created.
    pub async fn run_for_user(&self, user_id: &str) -> AppResult<u64> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {user_id}")))?;

        if user.legacy_imported {
            return Ok(0);
        }

        let bookmarks = self.source.bookmarks_for(user_id).await?;
        let mut imported = 0;

        for bookmark in bookmarks {
            let already = self
                .favorite_service
                .is_favorited(user_id, &bookmark.target_id, "post")
                .await?;
            if already.is_some() {
                continue;
            }

            let created = self
                .favorite_service
                .create(user_id, &bookmark.target_id, None)
                .await;

            let favorite = match created {
                Ok(favorite) => favorite,
                // A bookmark of a target that no longer resolves is skipped.
                Err(AppError::NotFound(_) | AppError::Validation(_)) => {
                    tracing::debug!(user_id, target_id = %bookmark.target_id, "Skipped dead legacy bookmark");
                    continue;
                }
                Err(e) => return Err(e),
            };

            if bookmark.note.is_some() {
                self.favorite_service
                    .update(
                        user_id,
                        FavoriteUpdateInput {
                            favorite_id: Some(favorite.id),
                            note: bookmark.note,
                            ..FavoriteUpdateInput::default()
                        },
                    )
                    .await?;
            }

            imported += 1;
        }

        self.user_repo.mark_legacy_imported(user).await?;

        tracing::info!(user_id, imported, "Legacy bookmark import finished");

        Ok(imported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use faved_db::entities::user;
    use faved_db::repositories::{
        FavoriteListRepository, FavoriteRepository, TargetRepository,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_user(id: &str, imported: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: "alice".to_string(),
            username_lower: "alice".to_string(),
            token: None,
            display_name: None,
            favorites_count: None,
            legacy_imported: imported,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>, source: Arc<dyn LegacyBookmarkSource>) -> LegacyImportService {
        let favorite_service = FavoriteService::new(
            FavoriteRepository::new(Arc::clone(&db)),
            FavoriteListRepository::new(Arc::clone(&db)),
            TargetRepository::new(Arc::clone(&db)),
            faved_db::repositories::UserRepository::new(Arc::clone(&db)),
            vec!["post".to_string()],
        );
        LegacyImportService::new(source, favorite_service, UserRepository::new(db))
    }

    struct FixedSource(Vec<LegacyBookmark>);

    #[async_trait]
    impl LegacyBookmarkSource for FixedSource {
        async fn bookmarks_for(&self, _user_id: &str) -> AppResult<Vec<LegacyBookmark>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_already_imported_is_noop() {
        // Only the user lookup is scripted: touching the source or the
        // favorites would error the mock.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("user1", true)]])
                .into_connection(),
        );

        let source = Arc::new(FixedSource(vec![LegacyBookmark {
            target_id: "target1".to_string(),
            note: None,
        }]));

        let imported = service(db, source).run_for_user("user1").await.unwrap();
        assert_eq!(imported, 0);
    }

    #[tokio::test]
    async fn test_empty_source_marks_user_imported() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // user lookup
                .append_query_results([[test_user("user1", false)]])
                // mark_legacy_imported update returning
                .append_query_results([[test_user("user1", true)]])
                .into_connection(),
        );

        let imported = service(db, Arc::new(NoOpLegacyBookmarkSource))
            .run_for_user("user1")
            .await
            .unwrap();

        assert_eq!(imported, 0);
    }

    #[tokio::test]
    async fn test_already_favorited_rows_are_skipped() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // user lookup
                .append_query_results([[test_user("user1", false)]])
                // ids-only existence check: already favorited
                .append_query_results([[maplit::btreemap! {
                    "id" => sea_orm::Value::String(Some(Box::new("fav1".to_string()))),
                }]])
                // mark_legacy_imported update returning
                .append_query_results([[test_user("user1", true)]])
                .into_connection(),
        );

        let source = Arc::new(FixedSource(vec![LegacyBookmark {
            target_id: "target1".to_string(),
            note: Some("old note".to_string()),
        }]));

        let imported = service(db, source).run_for_user("user1").await.unwrap();
        assert_eq!(imported, 0);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let result = service(db, Arc::new(NoOpLegacyBookmarkSource))
            .run_for_user("ghost")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
