//! Target endpoints - favorite-link data for content pages.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use faved_common::AppResult;
use faved_core::Capability;
use faved_db::entities::user;
use serde_json::{Value, json};

use crate::{extractors::MaybeAuthUser, middleware::AppState};

/// Everything a content page needs to render a favorite link for a
/// target: the cached count, whether the caller already favorited it,
/// and a create capability token.
pub(crate) async fn link_data(
    state: &AppState,
    user: Option<&user::Model>,
    target_id: &str,
    kind: &str,
) -> AppResult<Value> {
    let target = state.favorite_target_service.get(target_id, kind).await?;
    let count = state.favorite_target_service.favorite_count(&target).await?;

    let favorite_id = match user {
        Some(user) => {
            state
                .favorite_service
                .is_favorited(&user.id, &target.id, &target.kind)
                .await?
        }
        None => None,
    };

    let edit_token = favorite_id
        .as_deref()
        .map(|id| state.capability_service.issue(&Capability::FavoriteEdit { favorite_id: id }));

    Ok(json!({
        "target_id": target.id,
        "target_kind": target.kind,
        "title": target.title,
        "permalink": state.favorite_target_service.permalink(&target),
        "count": count,
        "is_favorited": favorite_id.is_some(),
        "favorite_id": favorite_id,
        "create_token": state
            .capability_service
            .issue(&Capability::FavoriteCreate { target_id: &target.id }),
        "edit_token": edit_token,
    }))
}

/// Favorite-link data for a target.
async fn link(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    let kind = state.favorite_service.sanitize_kind(Some(&kind));
    let data = link_data(&state, user.as_ref(), &id, &kind).await?;

    Ok(Json(data))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{kind}/{id}/link", get(link))
}
