//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use faved_common::config::FavoritesConfig;
use faved_core::{
    CapabilityService, FavoriteListService, FavoriteService, FavoriteTargetService,
    LegacyImportService, NoticeService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub favorite_service: FavoriteService,
    pub favorite_list_service: FavoriteListService,
    pub favorite_target_service: FavoriteTargetService,
    pub notice_service: NoticeService,
    pub capability_service: CapabilityService,
    pub legacy_import_service: LegacyImportService,
    pub favorites_config: FavoritesConfig,
}

/// Authentication middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Try to extract token from header
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        // Authenticate user by token
        if let Ok(user) = state.user_service.authenticate_by_token(token).await {
            req.extensions_mut().insert(user);
        }
    }

    next.run(req).await
}
