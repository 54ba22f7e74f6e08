//! Favorite service - create, update, remove and query favorites.

use faved_common::{AppError, AppResult, IdGenerator};
use faved_db::{
    entities::{favorite, favorite_list},
    repositories::{
        DEFAULT_TARGET_KIND, FavoriteFilter, FavoriteListRepository, FavoritePage,
        FavoriteRepository, TargetRepository, UserRepository,
    },
};
use sea_orm::Set;

use crate::text;

/// What should happen to a favorite's list assignment during an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListSelector {
    /// Leave the current assignment alone.
    #[default]
    Keep,
    /// Clear the assignment.
    Clear,
    /// Assign to an existing list by id.
    Existing(String),
    /// Create a list with this name inline, then assign to it.
    New(String),
}

/// How the list assignment of an update actually resolved.
///
/// Updates are deliberately not atomic across fields: a rejected list
/// assignment does not abort the note update, it is reported here so the
/// caller can tell the user.
#[derive(Debug, Clone)]
pub enum ListAssignment {
    /// Assignment untouched.
    Unchanged,
    /// Assigned to this list (pre-existing or created inline).
    Assigned(favorite_list::Model),
    /// Assignment cleared.
    Cleared,
    /// The requested list was missing, not owned by the caller, or the
    /// inline name was empty. The note update still went through.
    Rejected,
}

/// Input for [`FavoriteService::update`].
#[derive(Debug, Clone, Default)]
pub struct FavoriteUpdateInput {
    /// Favorite to update. When absent, `target_id` must be supplied and
    /// the favorite is created first.
    pub favorite_id: Option<String>,
    /// Target to lazily create a favorite of.
    pub target_id: Option<String>,
    /// Target kind for lazy creation.
    pub target_kind: Option<String>,
    /// Replacement note text (sanitized here). `None` clears the note.
    pub note: Option<String>,
    /// List assignment change.
    pub list: ListSelector,
}

/// Result of [`FavoriteService::update`].
#[derive(Debug, Clone)]
pub struct FavoriteUpdateOutcome {
    /// The favorite after the update.
    pub favorite: favorite::Model,
    /// How the list assignment resolved.
    pub list_assignment: ListAssignment,
}

/// Favorite service for managing bookmarks.
#[derive(Clone)]
pub struct FavoriteService {
    favorite_repo: FavoriteRepository,
    list_repo: FavoriteListRepository,
    target_repo: TargetRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
    kinds: Vec<String>,
}

impl FavoriteService {
    /// Create a new favorite service. `kinds` is the configured set of
    /// supported target kinds.
    #[must_use]
    pub const fn new(
        favorite_repo: FavoriteRepository,
        list_repo: FavoriteListRepository,
        target_repo: TargetRepository,
        user_repo: UserRepository,
        kinds: Vec<String>,
    ) -> Self {
        Self {
            favorite_repo,
            list_repo,
            target_repo,
            user_repo,
            id_gen: IdGenerator::new(),
            kinds,
        }
    }

    /// Unsupported kinds fall back to the default.
    #[must_use]
    pub fn sanitize_kind(&self, kind: Option<&str>) -> String {
        match kind {
            Some(k) if self.kinds.iter().any(|v| v == k) => k.to_string(),
            _ => DEFAULT_TARGET_KIND.to_string(),
        }
    }

    /// The default kind is stored as NULL for backward compatibility.
    fn stored_kind(kind: &str) -> Option<String> {
        if kind == DEFAULT_TARGET_KIND {
            None
        } else {
            Some(kind.to_string())
        }
    }

    /// Existing favorite id for the tuple, via the ids-only projection.
    pub async fn is_favorited(
        &self,
        owner_id: &str,
        target_id: &str,
        kind: &str,
    ) -> AppResult<Option<String>> {
        let filter = FavoriteFilter {
            user_id: Some(owner_id.to_string()),
            target_id: Some(target_id.to_string()),
            target_kind: Some(kind.to_string()),
            ..FavoriteFilter::default()
        };

        let ids = self.favorite_repo.find_ids(&filter, Some(1)).await?;
        Ok(ids.into_iter().next())
    }

    /// Create a favorite. Idempotent: an existing favorite for the same
    /// (owner, target, kind) tuple is returned as-is. On insert, the
    /// target's and the owner's count caches are invalidated.
    pub async fn create(
        &self,
        owner_id: &str,
        target_id: &str,
        kind: Option<&str>,
    ) -> AppResult<favorite::Model> {
        if owner_id.is_empty() {
            return Err(AppError::Validation("Owner is required".to_string()));
        }
        if target_id.is_empty() {
            return Err(AppError::Validation("Target is required".to_string()));
        }

        let kind = self.sanitize_kind(kind);

        let target = self
            .target_repo
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Target not found: {target_id}")))?;

        if target.kind != kind {
            return Err(AppError::Validation(format!(
                "Target {target_id} cannot be favorited as {kind}"
            )));
        }

        if let Some(existing_id) = self.is_favorited(owner_id, target_id, &kind).await? {
            let existing = self
                .favorite_repo
                .find_by_id(&existing_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Favorite not found: {existing_id}")))?;
            return Ok(existing);
        }

        let model = favorite::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner_id.to_string()),
            target_id: Set(target_id.to_string()),
            target_kind: Set(Self::stored_kind(&kind)),
            note: Set(None),
            list_id: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.favorite_repo.create(model).await?;

        self.target_repo.invalidate_favorites_count(target_id).await?;
        self.user_repo.invalidate_favorites_count(owner_id).await?;

        tracing::debug!(favorite_id = %created.id, owner_id, target_id, "Favorite created");

        Ok(created)
    }

    /// Resolve a favorite and verify the caller owns it.
    pub async fn get_owned(&self, owner_id: &str, favorite_id: &str) -> AppResult<favorite::Model> {
        let favorite = self
            .favorite_repo
            .find_by_id(favorite_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Favorite not found: {favorite_id}")))?;

        if favorite.user_id != owner_id {
            return Err(AppError::Forbidden("Not the favorite owner".to_string()));
        }

        Ok(favorite)
    }

    async fn resolve_list(
        &self,
        owner_id: &str,
        selector: ListSelector,
    ) -> AppResult<(Option<Option<String>>, ListAssignment)> {
        match selector {
            ListSelector::Keep => Ok((None, ListAssignment::Unchanged)),
            ListSelector::Clear => Ok((Some(None), ListAssignment::Cleared)),
            ListSelector::Existing(list_id) => {
                let list = self.list_repo.find_by_id(&list_id).await?;
                match list {
                    Some(list) if list.user_id == owner_id => {
                        Ok((Some(Some(list.id.clone())), ListAssignment::Assigned(list)))
                    }
                    _ => Ok((None, ListAssignment::Rejected)),
                }
            }
            ListSelector::New(name) => {
                let name = text::strip_tags(&name);
                if name.is_empty() {
                    return Ok((None, ListAssignment::Rejected));
                }

                let slug = text::list_slug(owner_id, &name);

                // The deterministic slug makes "create" reuse an existing
                // list with the same name instead of erroring.
                if let Some(existing) = self.list_repo.find_by_slug(&slug).await? {
                    if existing.user_id == owner_id {
                        return Ok((Some(Some(existing.id.clone())), ListAssignment::Assigned(existing)));
                    }
                    return Ok((None, ListAssignment::Rejected));
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
                let created = self.list_repo.create(model).await?;

                Ok((Some(Some(created.id.clone())), ListAssignment::Assigned(created)))
            }
        }
    }

    /// Update a favorite's note and list assignment. When the favorite
    /// does not exist yet and a target is supplied, it is created first.
    /// The two fields are applied independently; see [`ListAssignment`].
    pub async fn update(
        &self,
        owner_id: &str,
        input: FavoriteUpdateInput,
    ) -> AppResult<FavoriteUpdateOutcome> {
        let favorite = match (&input.favorite_id, &input.target_id) {
            (Some(favorite_id), _) => self.get_owned(owner_id, favorite_id).await?,
            (None, Some(target_id)) => {
                self.create(owner_id, target_id, input.target_kind.as_deref())
                    .await?
            }
            (None, None) => {
                return Err(AppError::Validation(
                    "A favorite or a target is required".to_string(),
                ));
            }
        };

        let (list_change, list_assignment) = self.resolve_list(owner_id, input.list).await?;

        let note = input
            .note
            .map(|n| text::sanitize_rich_text(&n))
            .filter(|n| !n.is_empty());

        let active = FavoriteRepository::note_and_list_update(favorite, note, list_change);
        let updated = self.favorite_repo.update(active).await?;

        Ok(FavoriteUpdateOutcome {
            favorite: updated,
            list_assignment,
        })
    }

    /// Remove a favorite. Requires ownership; invalidates the target's
    /// and the owner's count caches. Returns the removed record.
    pub async fn remove(&self, owner_id: &str, favorite_id: &str) -> AppResult<favorite::Model> {
        let favorite = self.get_owned(owner_id, favorite_id).await?;

        self.favorite_repo.delete(favorite_id).await?;

        self.target_repo
            .invalidate_favorites_count(&favorite.target_id)
            .await?;
        self.user_repo.invalidate_favorites_count(owner_id).await?;

        tracing::debug!(favorite_id, owner_id, "Favorite removed");

        Ok(favorite)
    }

    /// Filtered, paginated favorite query.
    pub async fn search(
        &self,
        filter: &FavoriteFilter,
        page: u64,
        per_page: i64,
    ) -> AppResult<FavoritePage> {
        self.favorite_repo.search(filter, page, per_page).await
    }
}
