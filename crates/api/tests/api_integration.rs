//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use chrono::Utc;
use faved_api::{middleware::AppState, router as api_router};
use faved_common::config::{FavoritesConfig, LabelsConfig};
use faved_core::{
    Capability, CapabilityService, FavoriteListService, FavoriteService, FavoriteTargetService,
    LegacyImportService, NoOpLegacyBookmarkSource, NoticeService, UserService,
};
use faved_db::entities::{favorite, notice, target, user};
use faved_db::repositories::{
    FavoriteListRepository, FavoriteRepository, NoticeRepository, TargetRepository, UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "integration-secret";

fn test_user(id: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: "alice".to_string(),
        username_lower: "alice".to_string(),
        token: Some("alice-token".to_string()),
        display_name: None,
        favorites_count: Some(1),
        legacy_imported: true,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_target(id: &str, count: Option<i32>) -> target::Model {
    target::Model {
        id: id.to_string(),
        kind: "post".to_string(),
        title: "A Post".to_string(),
        slug: "a-post".to_string(),
        is_published: true,
        favorites_count: count,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_favorite(id: &str, user_id: &str, target_id: &str) -> favorite::Model {
    favorite::Model {
        id: id.to_string(),
        user_id: user_id.to_string(),
        target_id: target_id.to_string(),
        target_kind: None,
        note: None,
        list_id: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_notice(id: &str, user_id: &str, message: &str) -> notice::Model {
    notice::Model {
        id: id.to_string(),
        user_id: user_id.to_string(),
        kind: notice::NoticeKind::Error,
        message: message.to_string(),
        created_at: Utc::now().into(),
    }
}

/// Create test app state backed by the given mock connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let target_repo = TargetRepository::new(Arc::clone(&db));
    let favorite_repo = FavoriteRepository::new(Arc::clone(&db));
    let list_repo = FavoriteListRepository::new(Arc::clone(&db));
    let notice_repo = NoticeRepository::new(Arc::clone(&db));

    let favorite_service = FavoriteService::new(
        favorite_repo.clone(),
        list_repo.clone(),
        target_repo.clone(),
        user_repo.clone(),
        vec!["post".to_string()],
    );
    let favorite_list_service = FavoriteListService::new(list_repo, favorite_repo.clone());
    let favorite_target_service = FavoriteTargetService::new(
        target_repo,
        favorite_repo.clone(),
        "https://example.com".to_string(),
    );
    let notice_service = NoticeService::new(notice_repo, LabelsConfig::default());
    let user_service = UserService::new(
        user_repo.clone(),
        favorite_repo,
        favorite_list_service.clone(),
        vec![],
    );
    let legacy_import_service = LegacyImportService::new(
        Arc::new(NoOpLegacyBookmarkSource),
        favorite_service.clone(),
        user_repo,
    );

    AppState {
        user_service,
        favorite_service,
        favorite_list_service,
        favorite_target_service,
        notice_service,
        capability_service: CapabilityService::new(SECRET.to_string()),
        legacy_import_service,
        favorites_config: FavoritesConfig::default(),
    }
}

fn test_app(state: AppState) -> Router {
    api_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            faved_api::middleware::auth_middleware,
        ))
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_requires_authentication() {
    let state = create_test_state(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let app = test_app(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/favorites/create")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("af_data=target1"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_with_bad_token_fails_without_mutating() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // auth lookup
        .append_query_results([[test_user("user1")]])
        // queued error notice insert
        .append_query_results([[test_notice(
            "n1",
            "user1",
            "Favorite token verification failed.",
        )]])
        // envelope drains the notice
        .append_query_results([[test_notice(
            "n1",
            "user1",
            "Favorite token verification failed.",
        )]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let app = test_app(create_test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/favorites/create")
                .header(header::AUTHORIZATION, "Bearer alice-token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("af_data=target1&_nonce=deadbeef"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(
        json["notices"]
            .as_str()
            .unwrap()
            .contains("token verification failed")
    );
}

#[tokio::test]
async fn test_create_happy_path() {
    let token = CapabilityService::new(SECRET.to_string())
        .issue(&Capability::FavoriteCreate { target_id: "target1" });

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // auth lookup
        .append_query_results([[test_user("user1")]])
        // service: target lookup
        .append_query_results([[test_target("target1", Some(1))]])
        // service: ids-only existence check, nothing yet
        .append_query_results([Vec::<std::collections::BTreeMap<&str, sea_orm::Value>>::new()])
        // service: insert returning
        .append_query_results([[test_favorite("fav1", "user1", "target1")]])
        // service: target cache invalidation (find + update)
        .append_query_results([[test_target("target1", Some(1))]])
        .append_query_results([[test_target("target1", None)]])
        // service: user cache invalidation (find + update)
        .append_query_results([[test_user("user1")]])
        .append_query_results([[test_user("user1")]])
        // link data: target lookup (count cached on the row)
        .append_query_results([[test_target("target1", Some(2))]])
        // link data: is_favorited ids-only check
        .append_query_results([[maplit::btreemap! {
            "id" => sea_orm::Value::String(Some(Box::new("fav1".to_string()))),
        }]])
        // envelope: notice drain finds nothing
        .append_query_results([Vec::<notice::Model>::new()])
        .into_connection();

    let app = test_app(create_test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/favorites/create")
                .header(header::AUTHORIZATION, "Bearer alice-token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!("af_data=target1&_nonce={token}")))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["favorite_id"], "fav1");
    assert_eq!(json["data"]["link"]["count"], 2);
    assert_eq!(json["data"]["link"]["is_favorited"], true);
}

#[tokio::test]
async fn test_list_favorites_empty() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // auth lookup
        .append_query_results([[test_user("user1")]])
        // count
        .append_query_results([[maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(0)),
        }]])
        // page items
        .append_query_results([Vec::<favorite::Model>::new()])
        .into_connection();

    let app = test_app(create_test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/favorites?page=1")
                .header(header::AUTHORIZATION, "Bearer alice-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_items"], 0);
    assert_eq!(json["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_target_link_data_unauthenticated() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // target lookup; count cached on the row
        .append_query_results([[test_target("target1", Some(5))]])
        .into_connection();

    let app = test_app(create_test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/targets/post/target1/link")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 5);
    assert_eq!(json["is_favorited"], false);
    assert_eq!(json["permalink"], "https://example.com/post/a-post");
    assert!(json["create_token"].as_str().unwrap().len() == 64);
}

#[tokio::test]
async fn test_remove_redirect_mode() {
    let token = CapabilityService::new(SECRET.to_string())
        .issue(&Capability::FavoriteRemove { favorite_id: "fav1" });

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // auth lookup
        .append_query_results([[test_user("user1")]])
        // ownership lookup
        .append_query_results([[test_favorite("fav1", "user1", "target1")]])
        // target cache invalidation (find + update)
        .append_query_results([[test_target("target1", Some(3))]])
        .append_query_results([[test_target("target1", None)]])
        // user cache invalidation (find + update)
        .append_query_results([[test_user("user1")]])
        .append_query_results([[test_user("user1")]])
        // link data: target lookup
        .append_query_results([[test_target("target1", Some(2))]])
        // link data: is_favorited check (now empty)
        .append_query_results([Vec::<std::collections::BTreeMap<&str, sea_orm::Value>>::new()])
        // delete exec
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let app = test_app(create_test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/favorites/remove")
                .header(header::AUTHORIZATION, "Bearer alice-token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "af_favorite_id=fav1&_nonce={token}&_redirect=https://example.com/dashboard"
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    // Redirect mode: notices stay queued for the next page load.
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://example.com/dashboard"
    );
}
