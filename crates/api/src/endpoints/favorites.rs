//! Favorite endpoints.
//!
//! Mutations follow the dispatcher contract: verify the capability
//! token, resolve and authorize, apply, then answer with the
//! `{success, data, notices}` envelope or a redirect. Service errors
//! become queued notices, never HTTP errors.

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    response::Response,
    routing::{get, post},
};
use faved_common::AppResult;
use faved_core::{Capability, FavoriteUpdateInput, ListAssignment, ListSelector, ucfirst};
use faved_db::{
    entities::favorite,
    repositories::{DEFAULT_TARGET_KIND, FavoriteFilter},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{queue_error, queue_success, respond},
};

/// Create favorite request.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(rename = "_nonce")]
    pub nonce: Option<String>,
    /// Target id.
    pub af_data: String,
    /// Target kind.
    pub af_type: Option<String>,
    #[serde(rename = "_redirect")]
    pub redirect: Option<String>,
}

/// Edit favorite request.
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    #[serde(rename = "_nonce")]
    pub nonce: Option<String>,
    /// Favorite id.
    #[serde(rename = "_favorite")]
    pub favorite: String,
    /// Replacement note text.
    pub note: Option<String>,
    /// Numeric list id, empty to clear, or the sentinel "new".
    pub list_id: Option<String>,
    /// Name for an inline-created list when `list_id` is "new".
    pub list_new: Option<String>,
    #[serde(rename = "_redirect")]
    pub redirect: Option<String>,
}

/// Remove favorite request.
#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    #[serde(rename = "_nonce")]
    pub nonce: Option<String>,
    /// Favorite id.
    pub af_favorite_id: String,
    #[serde(rename = "_redirect")]
    pub redirect: Option<String>,
}

/// List favorites request.
#[derive(Debug, Deserialize)]
pub struct ListRequest {
    /// 1-indexed page.
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size; defaults to the configured size.
    pub per_page: Option<i64>,
    /// Only favorites assigned to this list.
    pub list_id: Option<String>,
    /// Only favorites of this target.
    pub target_id: Option<String>,
    /// Only favorites of this target kind.
    pub target_type: Option<String>,
}

const fn default_page() -> u64 {
    1
}

/// One favorite in a listing.
#[derive(Debug, Serialize)]
pub struct FavoriteItem {
    /// Favorite id.
    pub id: String,
    /// Favorited target.
    pub target_id: String,
    /// Target kind.
    pub target_kind: String,
    /// Note text.
    pub note: Option<String>,
    /// Assigned list, if any.
    pub list_id: Option<String>,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Capability token for editing this favorite.
    pub edit_token: String,
    /// Capability token for removing this favorite.
    pub remove_token: String,
}

/// One page of favorites.
#[derive(Debug, Serialize)]
pub struct FavoritePageResponse {
    /// Favorites on this page.
    pub items: Vec<FavoriteItem>,
    /// Total matches across all pages.
    pub total_items: u64,
    /// Total page count.
    pub total_pages: u64,
    /// The 1-indexed page returned.
    pub page: u64,
}

pub(crate) fn favorite_item(state: &AppState, favorite: &favorite::Model) -> FavoriteItem {
    FavoriteItem {
        id: favorite.id.clone(),
        target_id: favorite.target_id.clone(),
        target_kind: favorite
            .target_kind
            .clone()
            .unwrap_or_else(|| DEFAULT_TARGET_KIND.to_string()),
        note: favorite.note.clone(),
        list_id: favorite.list_id.clone(),
        created_at: favorite.created_at.to_rfc3339(),
        edit_token: state
            .capability_service
            .issue(&Capability::FavoriteEdit { favorite_id: &favorite.id }),
        remove_token: state
            .capability_service
            .issue(&Capability::FavoriteRemove { favorite_id: &favorite.id }),
    }
}

fn list_selector(list_id: Option<String>, list_new: Option<String>) -> ListSelector {
    match list_id.as_deref() {
        None => ListSelector::Keep,
        Some("") => ListSelector::Clear,
        Some("new") => ListSelector::New(list_new.unwrap_or_default()),
        Some(id) => ListSelector::Existing(id.to_string()),
    }
}

/// Create a favorite.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(req): Form<CreateRequest>,
) -> Response {
    let labels = state.notice_service.labels().clone();

    let cap = Capability::FavoriteCreate { target_id: &req.af_data };
    if !state
        .capability_service
        .verify(&cap, req.nonce.as_deref().unwrap_or_default())
    {
        if req.nonce.is_some() {
            let message = format!(
                "{} token verification failed.",
                ucfirst(&labels.favorite_singular)
            );
            queue_error(&state, &user.id, &message).await;
        }
        return respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await;
    }

    match state
        .favorite_service
        .create(&user.id, &req.af_data, req.af_type.as_deref())
        .await
    {
        Ok(favorite) => {
            let kind = favorite
                .target_kind
                .clone()
                .unwrap_or_else(|| DEFAULT_TARGET_KIND.to_string());
            let link = super::targets::link_data(&state, Some(&user), &favorite.target_id, &kind)
                .await
                .unwrap_or_else(|_| json!(null));
            let data = json!({
                "favorite_id": favorite.id,
                "target_id": favorite.target_id,
                "link": link,
            });
            respond(&state, &user.id, true, data, req.redirect.as_deref()).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Favorite create failed");
            let message = format!(
                "Failed to create {}. Please try again.",
                labels.favorite_singular
            );
            queue_error(&state, &user.id, &message).await;
            respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await
        }
    }
}

/// Edit a favorite's note and list assignment.
async fn edit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(req): Form<EditRequest>,
) -> Response {
    let labels = state.notice_service.labels().clone();

    let cap = Capability::FavoriteEdit { favorite_id: &req.favorite };
    if !state
        .capability_service
        .verify(&cap, req.nonce.as_deref().unwrap_or_default())
    {
        if req.nonce.is_some() {
            let message = format!(
                "{} token verification failed.",
                ucfirst(&labels.favorite_singular)
            );
            queue_error(&state, &user.id, &message).await;
        }
        return respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await;
    }

    let input = FavoriteUpdateInput {
        favorite_id: Some(req.favorite.clone()),
        note: req.note.clone(),
        list: list_selector(req.list_id.clone(), req.list_new.clone()),
        ..FavoriteUpdateInput::default()
    };

    match state.favorite_service.update(&user.id, input).await {
        Ok(outcome) => {
            // Per-field reporting: a rejected list assignment does not
            // undo the note update, but the user hears about it.
            if matches!(outcome.list_assignment, ListAssignment::Rejected) {
                let message = format!("Failed to assign {}.", labels.list_singular);
                queue_error(&state, &user.id, &message).await;
            }

            let message = format!("{} updated.", ucfirst(&labels.favorite_singular));
            queue_success(&state, &user.id, &message).await;

            let data = json!({
                "favorite_id": outcome.favorite.id,
                "note": outcome.favorite.note,
                "list_id": outcome.favorite.list_id,
            });
            respond(&state, &user.id, true, data, req.redirect.as_deref()).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Favorite edit failed");
            let message = match e {
                faved_common::AppError::NotFound(_) | faved_common::AppError::Forbidden(_) => {
                    format!("{} not found.", ucfirst(&labels.favorite_singular))
                }
                _ => format!("Failed to update {}.", labels.favorite_singular),
            };
            queue_error(&state, &user.id, &message).await;
            respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await
        }
    }
}

/// Remove a favorite.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(req): Form<RemoveRequest>,
) -> Response {
    let labels = state.notice_service.labels().clone();

    let cap = Capability::FavoriteRemove { favorite_id: &req.af_favorite_id };
    if !state
        .capability_service
        .verify(&cap, req.nonce.as_deref().unwrap_or_default())
    {
        if req.nonce.is_some() {
            let message = format!(
                "{} token verification failed.",
                ucfirst(&labels.favorite_singular)
            );
            queue_error(&state, &user.id, &message).await;
        }
        return respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await;
    }

    match state
        .favorite_service
        .remove(&user.id, &req.af_favorite_id)
        .await
    {
        Ok(removed) => {
            let kind = removed
                .target_kind
                .clone()
                .unwrap_or_else(|| DEFAULT_TARGET_KIND.to_string());
            let link = super::targets::link_data(&state, Some(&user), &removed.target_id, &kind)
                .await
                .unwrap_or_else(|_| json!(null));
            let data = json!({
                "favorite_id": removed.id,
                "target_id": removed.target_id,
                "target_type": kind,
                "link": link,
            });
            respond(&state, &user.id, true, data, req.redirect.as_deref()).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Favorite remove failed");
            let message = match e {
                faved_common::AppError::NotFound(_) | faved_common::AppError::Forbidden(_) => {
                    format!("{} not found.", ucfirst(&labels.favorite_singular))
                }
                _ => format!("Failed to remove {}.", labels.favorite_singular),
            };
            queue_error(&state, &user.id, &message).await;
            respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await
        }
    }
}

/// List the caller's favorites.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(req): Query<ListRequest>,
) -> AppResult<Json<FavoritePageResponse>> {
    let filter = FavoriteFilter {
        user_id: Some(user.id.clone()),
        target_id: req.target_id,
        target_kind: req
            .target_type
            .map(|t| state.favorite_service.sanitize_kind(Some(&t))),
        list_id: req.list_id,
    };

    let per_page = req
        .per_page
        .unwrap_or(state.favorites_config.per_page as i64);
    let page = state
        .favorite_service
        .search(&filter, req.page, per_page)
        .await?;

    Ok(Json(FavoritePageResponse {
        items: page
            .items
            .iter()
            .map(|f| favorite_item(&state, f))
            .collect(),
        total_items: page.total_items,
        total_pages: page.total_pages,
        page: page.page,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/create", post(create))
        .route("/edit", post(edit))
        .route("/remove", post(remove))
}
