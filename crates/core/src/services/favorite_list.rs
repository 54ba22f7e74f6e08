//! Favorite list service.

use faved_common::{AppError, AppResult, IdGenerator};
use faved_db::{
    entities::favorite_list,
    repositories::{FavoriteFilter, FavoriteListRepository, FavoriteRepository},
};
use sea_orm::Set;

use crate::text;

const MAX_NAME_LEN: usize = 128;

/// Favorite list service for managing named collections.
#[derive(Clone)]
pub struct FavoriteListService {
    list_repo: FavoriteListRepository,
    favorite_repo: FavoriteRepository,
    id_gen: IdGenerator,
}

impl FavoriteListService {
    /// Create a new favorite list service.
    #[must_use]
    pub const fn new(list_repo: FavoriteListRepository, favorite_repo: FavoriteRepository) -> Self {
        Self {
            list_repo,
            favorite_repo,
            id_gen: IdGenerator::new(),
        }
    }

    fn validated_name(name: &str) -> AppResult<String> {
        let name = text::strip_tags(name);

        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(AppError::Validation(format!(
                "List name must be between 1 and {MAX_NAME_LEN} characters"
            )));
        }

        Ok(name)
    }

    /// Create a new list for a user.
    pub async fn create(
        &self,
        owner_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<favorite_list::Model> {
        if owner_id.is_empty() {
            return Err(AppError::Validation("Owner is required".to_string()));
        }

        let name = Self::validated_name(name)?;
        let slug = text::list_slug(owner_id, &name);

        if self.list_repo.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A list named \"{name}\" already exists"
            )));
        }

        let model = favorite_list::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner_id.to_string()),
            name: Set(name),
            slug: Set(slug),
            description: Set(description.map(text::sanitize_rich_text)),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.list_repo.create(model).await?;

        tracing::debug!(list_id = %created.id, owner_id, "List created");

        Ok(created)
    }

    /// Resolve a list and verify the caller owns it.
    pub async fn get_owned(&self, owner_id: &str, list_id: &str) -> AppResult<favorite_list::Model> {
        let list = self
            .list_repo
            .find_by_id(list_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("List not found: {list_id}")))?;

        if list.user_id != owner_id {
            return Err(AppError::Forbidden("Not the list owner".to_string()));
        }

        Ok(list)
    }

    /// Rename a list and replace its description. The name stays
    /// required; the slug follows the new name.
    pub async fn update(
        &self,
        owner_id: &str,
        list_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<favorite_list::Model> {
        let list = self.get_owned(owner_id, list_id).await?;

        let name = Self::validated_name(name)?;
        let slug = text::list_slug(owner_id, &name);
        let description = description.map(text::sanitize_rich_text);

        self.list_repo.update(list, name, slug, description).await
    }

    /// Delete a list. Member favorites keep existing but lose their
    /// assignment.
    pub async fn remove(&self, owner_id: &str, list_id: &str) -> AppResult<()> {
        self.get_owned(owner_id, list_id).await?;

        self.favorite_repo.unassign_list(list_id).await?;
        self.list_repo.delete(list_id).await?;

        tracing::debug!(list_id, owner_id, "List removed");

        Ok(())
    }

    /// Lists owned by a user.
    pub async fn list_for_user(&self, owner_id: &str) -> AppResult<Vec<favorite_list::Model>> {
        self.list_repo.find_by_user(owner_id).await
    }

    /// All lists regardless of owner.
    pub async fn list_all(&self) -> AppResult<Vec<favorite_list::Model>> {
        self.list_repo.find_all().await
    }

    /// Number of favorites currently assigned to a list.
    pub async fn member_count(&self, list_id: &str) -> AppResult<u64> {
        let filter = FavoriteFilter {
            list_id: Some(list_id.to_string()),
            ..FavoriteFilter::default()
        };
        self.favorite_repo.count(&filter).await
    }

    /// Create the configured default lists for a new user. Names whose
    /// slug already exists are skipped, so re-running is harmless.
    pub async fn provision_defaults(&self, owner_id: &str, names: &[String]) -> AppResult<()> {
        for name in names {
            let name = text::strip_tags(name);
            if name.is_empty() {
                continue;
            }

            let slug = text::list_slug(owner_id, &name);
            if self.list_repo.find_by_slug(&slug).await?.is_some() {
                continue;
            }

            let model = favorite_list::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(owner_id.to_string()),
                name: Set(name),
                slug: Set(slug),
                description: Set(None),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            };
            self.list_repo.create(model).await?;
        }

        Ok(())
    }

    /// Called when a user is deleted: reassign their lists to another
    /// owner, or remove them (members are un-assigned, not deleted).
    pub async fn handle_user_deleted(
        &self,
        user_id: &str,
        reassign_to: Option<&str>,
    ) -> AppResult<()> {
        if let Some(new_owner) = reassign_to {
            return self.list_repo.reassign_owner(user_id, new_owner).await;
        }

        for list in self.list_repo.find_by_user(user_id).await? {
            self.favorite_repo.unassign_list(&list.id).await?;
            self.list_repo.delete(&list.id).await?;
        }

        Ok(())
    }
}
