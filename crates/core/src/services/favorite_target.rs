//! Favorite target service - read-only projection of favoritable content.

use faved_common::{AppError, AppResult};
use faved_db::{
    entities::target,
    repositories::{FavoriteFilter, FavoriteRepository, TargetRepository},
};

/// Target service exposing title, permalink and the cached favorite count.
#[derive(Clone)]
pub struct FavoriteTargetService {
    target_repo: TargetRepository,
    favorite_repo: FavoriteRepository,
    base_url: String,
}

impl FavoriteTargetService {
    /// Create a new favorite target service.
    #[must_use]
    pub const fn new(
        target_repo: TargetRepository,
        favorite_repo: FavoriteRepository,
        base_url: String,
    ) -> Self {
        Self {
            target_repo,
            favorite_repo,
            base_url,
        }
    }

    /// Resolve a target by id, verifying its kind.
    pub async fn get(&self, target_id: &str, kind: &str) -> AppResult<target::Model> {
        let target = self
            .target_repo
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Target not found: {target_id}")))?;

        if target.kind != kind {
            return Err(AppError::NotFound(format!(
                "Target not found: {target_id} ({kind})"
            )));
        }

        Ok(target)
    }

    /// Permalink for a target. Present only when the target is publicly
    /// viewable.
    #[must_use]
    pub fn permalink(&self, target: &target::Model) -> Option<String> {
        if !target.is_published {
            return None;
        }

        Some(format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            target.kind,
            target.slug
        ))
    }

    /// Favorite count for a target: cached value when present, otherwise
    /// recomputed with an ids-only count and stored.
    pub async fn favorite_count(&self, target: &target::Model) -> AppResult<u64> {
        if let Some(count) = target.favorites_count {
            return Ok(count.max(0) as u64);
        }

        let filter = FavoriteFilter {
            target_id: Some(target.id.clone()),
            target_kind: Some(target.kind.clone()),
            ..FavoriteFilter::default()
        };
        let count = self.favorite_repo.count(&filter).await?;

        self.target_repo
            .set_favorites_count(target.clone(), count as i32)
            .await?;

        Ok(count)
    }

    /// Invalidate the target's count cache.
    pub async fn invalidate_count(&self, target_id: &str) -> AppResult<()> {
        self.target_repo.invalidate_favorites_count(target_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_target(id: &str, published: bool, count: Option<i32>) -> target::Model {
        target::Model {
            id: id.to_string(),
            kind: "post".to_string(),
            title: "A Post".to_string(),
            slug: "a-post".to_string(),
            is_published: published,
            favorites_count: count,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> FavoriteTargetService {
        FavoriteTargetService::new(
            TargetRepository::new(Arc::clone(&db)),
            FavoriteRepository::new(db),
            "https://example.com".to_string(),
        )
    }

    #[tokio::test]
    async fn test_get_kind_mismatch_is_not_found() {
        let target = create_test_target("target1", true, None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[target]])
                .into_connection(),
        );

        let result = service(db).get("target1", "page").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_permalink_only_when_published() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let svc = service(db);

        let published = create_test_target("target1", true, None);
        assert_eq!(
            svc.permalink(&published),
            Some("https://example.com/post/a-post".to_string())
        );

        let draft = create_test_target("target2", false, None);
        assert_eq!(svc.permalink(&draft), None);
    }

    #[tokio::test]
    async fn test_favorite_count_uses_cache() {
        // No queries scripted: a recompute would error the mock.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let svc = service(db);

        let target = create_test_target("target1", true, Some(7));
        let count = svc.favorite_count(&target).await.unwrap();

        assert_eq!(count, 7);
    }

    #[tokio::test]
    async fn test_favorite_count_recomputes_when_stale() {
        let target = create_test_target("target1", true, None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // count query
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3)),
                }]])
                // update returning the refreshed target row
                .append_query_results([[create_test_target("target1", true, Some(3))]])
                .into_connection(),
        );

        let count = service(db).favorite_count(&target).await.unwrap();
        assert_eq!(count, 3);
    }
}
