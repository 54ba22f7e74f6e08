//! Dashboard endpoint.
//!
//! Per-user dashboard data: the favorites view (paginated, optionally
//! filtered to one list) or the lists view. The first favorites view a
//! user loads also runs the one-time legacy bookmark import for them.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use faved_db::repositories::FavoriteFilter;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    endpoints::{favorites::favorite_item, lists::list_item},
    extractors::AuthUser,
    middleware::AppState,
    response::{queue_error, queue_info, render_notices},
};

/// Dashboard query parameters.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// "favorites" or "lists"; defaults to the configured view.
    pub view: Option<String>,
    /// 1-indexed page for the favorites view.
    #[serde(default = "default_page")]
    pub page: u64,
    /// Show only favorites assigned to this list.
    pub list_id: Option<String>,
}

const fn default_page() -> u64 {
    1
}

async fn drained_notices(state: &AppState, user_id: &str) -> String {
    match state.notice_service.drain(user_id).await {
        Ok(notices) => render_notices(&notices),
        Err(e) => {
            tracing::warn!(error = %e, user_id, "Failed to drain notices");
            String::new()
        }
    }
}

/// Dashboard data for the authenticated user.
async fn dashboard(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Json<Value> {
    let view = query
        .view
        .unwrap_or_else(|| state.favorites_config.default_view.clone());

    match view.as_str() {
        "favorites" => {
            // One-time legacy import on first view. A failed import must
            // not take the dashboard down with it.
            match state.legacy_import_service.run_for_user(&user.id).await {
                Ok(0) => {}
                Ok(imported) => {
                    tracing::info!(user_id = %user.id, imported, "Imported legacy bookmarks");
                }
                Err(e) => {
                    tracing::warn!(error = %e, user_id = %user.id, "Legacy import failed");
                    queue_error(&state, &user.id, "Some older bookmarks could not be imported.")
                        .await;
                }
            }

            let mut filter = FavoriteFilter {
                user_id: Some(user.id.clone()),
                ..FavoriteFilter::default()
            };

            // A list filter the caller does not own is ignored.
            if let Some(list_id) = &query.list_id
                && let Ok(list) = state.favorite_list_service.get_owned(&user.id, list_id).await
            {
                filter.list_id = Some(list.id.clone());
                let labels = state.notice_service.labels();
                let message = format!(
                    "You are currently browsing {} in {}.",
                    labels.favorite_plural, list.name
                );
                queue_info(&state, &user.id, &message).await;
            }

            let per_page = state.favorites_config.per_page as i64;
            let page = match state
                .favorite_service
                .search(&filter, query.page, per_page)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(error = %e, "Dashboard favorites query failed");
                    return Json(json!({
                        "view": "favorites",
                        "items": [],
                        "total_items": 0,
                        "total_pages": 0,
                        "page": 1,
                        "notices": drained_notices(&state, &user.id).await,
                    }));
                }
            };

            let items: Vec<_> = page
                .items
                .iter()
                .map(|f| favorite_item(&state, f))
                .collect();

            Json(json!({
                "view": "favorites",
                "items": items,
                "total_items": page.total_items,
                "total_pages": page.total_pages,
                "page": page.page,
                "notices": drained_notices(&state, &user.id).await,
            }))
        }
        "lists" => {
            let lists = match state.favorite_list_service.list_for_user(&user.id).await {
                Ok(lists) => lists,
                Err(e) => {
                    tracing::error!(error = %e, "Dashboard lists query failed");
                    Vec::new()
                }
            };

            let mut items = Vec::with_capacity(lists.len());
            for l in &lists {
                match list_item(&state, l).await {
                    Ok(item) => items.push(item),
                    Err(e) => tracing::warn!(error = %e, list_id = %l.id, "Skipping list"),
                }
            }

            Json(json!({
                "view": "lists",
                "lists": items,
                "notices": drained_notices(&state, &user.id).await,
            }))
        }
        _ => Json(json!({
            "view": "not-found",
            "notices": drained_notices(&state, &user.id).await,
        })),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}
