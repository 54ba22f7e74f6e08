//! User service.

use faved_common::{AppError, AppResult, IdGenerator};
use faved_db::{
    entities::user,
    repositories::{FavoriteFilter, FavoriteRepository, UserRepository},
};
use sea_orm::Set;

use crate::services::favorite_list::FavoriteListService;

/// User service: authentication, registration and the per-user
/// favorites count cache.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    favorite_repo: FavoriteRepository,
    list_service: FavoriteListService,
    id_gen: IdGenerator,
    default_lists: Vec<String>,
}

impl UserService {
    /// Create a new user service. `default_lists` are provisioned for
    /// each newly registered user.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        favorite_repo: FavoriteRepository,
        list_service: FavoriteListService,
        default_lists: Vec<String>,
    ) -> Self {
        Self {
            user_repo,
            favorite_repo,
            list_service,
            id_gen: IdGenerator::new(),
            default_lists,
        }
    }

    /// Authenticate a user by bearer token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Fetch a user by id.
    pub async fn get(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {user_id}")))
    }

    /// Register a new user and provision their default lists.
    pub async fn register(
        &self,
        username: &str,
        display_name: Option<&str>,
    ) -> AppResult<user::Model> {
        if username.is_empty() || !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AppError::Validation(
                "Username must be non-empty and alphanumeric".to_string(),
            ));
        }

        let id = self.id_gen.generate();
        let model = user::ActiveModel {
            id: Set(id.clone()),
            username: Set(username.to_string()),
            username_lower: Set(username.to_lowercase()),
            token: Set(Some(self.id_gen.generate_token())),
            display_name: Set(display_name.map(ToString::to_string)),
            favorites_count: Set(None),
            legacy_imported: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.user_repo.create(model).await?;

        self.list_service
            .provision_defaults(&id, &self.default_lists)
            .await?;

        tracing::info!(user_id = %created.id, username, "User registered");

        Ok(created)
    }

    /// Favorites owned by a user: cached value when present, otherwise
    /// recomputed with an ids-only count and stored.
    pub async fn favorites_count(&self, user: &user::Model) -> AppResult<u64> {
        if let Some(count) = user.favorites_count {
            return Ok(count.max(0) as u64);
        }

        let filter = FavoriteFilter {
            user_id: Some(user.id.clone()),
            ..FavoriteFilter::default()
        };
        let count = self.favorite_repo.count(&filter).await?;

        self.user_repo
            .set_favorites_count(user.clone(), count as i32)
            .await?;

        Ok(count)
    }

    /// Delete a user. Their lists are reassigned or removed first; the
    /// user's favorites and queued notices go with the row.
    pub async fn delete(&self, user_id: &str, reassign_lists_to: Option<&str>) -> AppResult<()> {
        self.get(user_id).await?;

        self.list_service
            .handle_user_deleted(user_id, reassign_lists_to)
            .await?;
        self.favorite_repo.delete_by_user(user_id).await?;
        self.user_repo.delete(user_id).await?;

        tracing::info!(user_id, "User deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use faved_db::repositories::FavoriteListRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: &str, count: Option<i32>) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: "alice".to_string(),
            username_lower: "alice".to_string(),
            token: Some("token-1".to_string()),
            display_name: None,
            favorites_count: count,
            legacy_imported: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> UserService {
        let list_service = FavoriteListService::new(
            FavoriteListRepository::new(Arc::clone(&db)),
            FavoriteRepository::new(Arc::clone(&db)),
        );
        UserService::new(
            UserRepository::new(Arc::clone(&db)),
            FavoriteRepository::new(db),
            list_service,
            vec![],
        )
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let result = service(db).authenticate_by_token("nope").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_username() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db).register("not a name", None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_favorites_count_uses_cache() {
        // No queries scripted: a recompute would error the mock.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let user = test_user("user1", Some(5));
        let count = service(db).favorites_count(&user).await.unwrap();

        assert_eq!(count, 5);
    }

    #[tokio::test]
    async fn test_favorites_count_recomputes_when_stale() {
        let user = test_user("user1", None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // count query
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2)),
                }]])
                // update returning the refreshed user row
                .append_query_results([[test_user("user1", Some(2))]])
                .into_connection(),
        );

        let count = service(db).favorites_count(&user).await.unwrap();
        assert_eq!(count, 2);
    }
}
