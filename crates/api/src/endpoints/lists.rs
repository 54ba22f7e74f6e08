//! Favorite list endpoints.

use axum::{
    Form, Json, Router,
    extract::State,
    response::Response,
    routing::{get, post},
};
use faved_common::AppResult;
use faved_core::{Capability, ucfirst};
use faved_db::entities::favorite_list;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{queue_error, queue_success, respond},
};

/// Create list request.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(rename = "_nonce")]
    pub nonce: Option<String>,
    /// List name.
    pub list_name: String,
    /// List description.
    pub list_description: Option<String>,
    #[serde(rename = "_redirect")]
    pub redirect: Option<String>,
}

/// Edit list request.
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    #[serde(rename = "_nonce")]
    pub nonce: Option<String>,
    /// List id.
    #[serde(rename = "_list")]
    pub list: String,
    /// Replacement name.
    pub list_name: String,
    /// Replacement description.
    pub list_description: Option<String>,
    #[serde(rename = "_redirect")]
    pub redirect: Option<String>,
}

/// Remove list request.
#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    #[serde(rename = "_nonce")]
    pub nonce: Option<String>,
    /// List id.
    pub af_list_id: String,
    #[serde(rename = "_redirect")]
    pub redirect: Option<String>,
}

/// One list in a listing.
#[derive(Debug, Serialize)]
pub struct ListItem {
    /// List id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description, if any.
    pub description: Option<String>,
    /// Number of favorites currently assigned.
    pub member_count: u64,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Capability token for editing this list.
    pub edit_token: String,
    /// Capability token for removing this list.
    pub remove_token: String,
}

pub(crate) async fn list_item(
    state: &AppState,
    list: &favorite_list::Model,
) -> AppResult<ListItem> {
    let member_count = state.favorite_list_service.member_count(&list.id).await?;

    Ok(ListItem {
        id: list.id.clone(),
        name: list.name.clone(),
        description: list.description.clone(),
        member_count,
        created_at: list.created_at.to_rfc3339(),
        edit_token: state
            .capability_service
            .issue(&Capability::ListEdit { list_id: &list.id }),
        remove_token: state
            .capability_service
            .issue(&Capability::ListRemove { list_id: &list.id }),
    })
}

/// Create a list.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(req): Form<CreateRequest>,
) -> Response {
    let labels = state.notice_service.labels().clone();

    if !state
        .capability_service
        .verify(&Capability::ListCreate, req.nonce.as_deref().unwrap_or_default())
    {
        if req.nonce.is_some() {
            let message = format!("{} token verification failed.", ucfirst(&labels.list_singular));
            queue_error(&state, &user.id, &message).await;
        }
        return respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await;
    }

    match state
        .favorite_list_service
        .create(&user.id, &req.list_name, req.list_description.as_deref())
        .await
    {
        Ok(list) => {
            let message = format!("New {} created.", labels.list_singular);
            queue_success(&state, &user.id, &message).await;

            let data = json!({
                "list_id": list.id,
                "name": list.name,
            });
            respond(&state, &user.id, true, data, req.redirect.as_deref()).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "List create failed");
            let message = format!("Failed to create {}.", labels.list_singular);
            queue_error(&state, &user.id, &message).await;
            respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await
        }
    }
}

/// Edit a list.
async fn edit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(req): Form<EditRequest>,
) -> Response {
    let labels = state.notice_service.labels().clone();

    let cap = Capability::ListEdit { list_id: &req.list };
    if !state
        .capability_service
        .verify(&cap, req.nonce.as_deref().unwrap_or_default())
    {
        if req.nonce.is_some() {
            let message = format!("{} token verification failed.", ucfirst(&labels.list_singular));
            queue_error(&state, &user.id, &message).await;
        }
        return respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await;
    }

    match state
        .favorite_list_service
        .update(&user.id, &req.list, &req.list_name, req.list_description.as_deref())
        .await
    {
        Ok(list) => {
            let message = format!("{} updated.", ucfirst(&labels.list_singular));
            queue_success(&state, &user.id, &message).await;

            let data = json!({
                "list_id": list.id,
                "name": list.name,
            });
            respond(&state, &user.id, true, data, req.redirect.as_deref()).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "List edit failed");
            let message = match e {
                faved_common::AppError::NotFound(_) | faved_common::AppError::Forbidden(_) => {
                    format!("{} not found.", ucfirst(&labels.list_singular))
                }
                _ => format!("Failed to update {}.", labels.list_singular),
            };
            queue_error(&state, &user.id, &message).await;
            respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await
        }
    }
}

/// Remove a list. Member favorites stay, un-assigned.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(req): Form<RemoveRequest>,
) -> Response {
    let labels = state.notice_service.labels().clone();

    let cap = Capability::ListRemove { list_id: &req.af_list_id };
    if !state
        .capability_service
        .verify(&cap, req.nonce.as_deref().unwrap_or_default())
    {
        if req.nonce.is_some() {
            let message = format!("{} token verification failed.", ucfirst(&labels.list_singular));
            queue_error(&state, &user.id, &message).await;
        }
        return respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await;
    }

    match state
        .favorite_list_service
        .remove(&user.id, &req.af_list_id)
        .await
    {
        Ok(()) => {
            let message = format!("{} removed.", ucfirst(&labels.list_singular));
            queue_success(&state, &user.id, &message).await;

            let data = json!({ "list_id": req.af_list_id });
            respond(&state, &user.id, true, data, req.redirect.as_deref()).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "List remove failed");
            let message = match e {
                faved_common::AppError::NotFound(_) | faved_common::AppError::Forbidden(_) => {
                    format!("{} not found.", ucfirst(&labels.list_singular))
                }
                _ => format!(
                    "Failed to remove {}. Please try again.",
                    labels.list_singular
                ),
            };
            queue_error(&state, &user.id, &message).await;
            respond(&state, &user.id, false, json!({}), req.redirect.as_deref()).await
        }
    }
}

/// List the caller's lists.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ListItem>>> {
    let lists = state.favorite_list_service.list_for_user(&user.id).await?;

    let mut items = Vec::with_capacity(lists.len());
    for l in &lists {
        items.push(list_item(&state, l).await?);
    }

    Ok(Json(items))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/create", post(create))
        .route("/edit", post(edit))
        .route("/remove", post(remove))
}
