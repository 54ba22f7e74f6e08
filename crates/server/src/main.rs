//! Faved server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use faved_api::{middleware::AppState, router as api_router};
use faved_common::Config;
use faved_core::{
    CapabilityService, DbLegacyBookmarkSource, FavoriteListService, FavoriteService,
    FavoriteTargetService, LegacyBookmarkSource, LegacyImportService, NoOpLegacyBookmarkSource,
    NoticeService, UserService,
};
use faved_db::repositories::{
    FavoriteListRepository, FavoriteRepository, LegacyBookmarkRepository, NoticeRepository,
    TargetRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faved=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting faved server...");

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    // Connect to database
    let db = faved_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    faved_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let target_repo = TargetRepository::new(Arc::clone(&db));
    let favorite_repo = FavoriteRepository::new(Arc::clone(&db));
    let list_repo = FavoriteListRepository::new(Arc::clone(&db));
    let notice_repo = NoticeRepository::new(Arc::clone(&db));
    let legacy_repo = LegacyBookmarkRepository::new(Arc::clone(&db));

    // Initialize services
    let favorite_service = FavoriteService::new(
        favorite_repo.clone(),
        list_repo.clone(),
        target_repo.clone(),
        user_repo.clone(),
        config.favorites.kinds.clone(),
    );
    let favorite_list_service = FavoriteListService::new(list_repo, favorite_repo.clone());
    let favorite_target_service = FavoriteTargetService::new(
        target_repo,
        favorite_repo.clone(),
        config.server.url.clone(),
    );
    let notice_service = NoticeService::new(notice_repo, config.labels.clone());
    let user_service = UserService::new(
        user_repo.clone(),
        favorite_repo,
        favorite_list_service.clone(),
        config.defaults.lists.clone(),
    );
    let capability_service = CapabilityService::new(config.security.capability_secret.clone());

    let legacy_source: Arc<dyn LegacyBookmarkSource> = if config.legacy.import_enabled {
        Arc::new(DbLegacyBookmarkSource::new(legacy_repo))
    } else {
        Arc::new(NoOpLegacyBookmarkSource)
    };
    let legacy_import_service =
        LegacyImportService::new(legacy_source, favorite_service.clone(), user_repo);

    // Create app state
    let state = AppState {
        user_service,
        favorite_service,
        favorite_list_service,
        favorite_target_service,
        notice_service,
        capability_service,
        legacy_import_service,
        favorites_config: config.favorites.clone(),
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            faved_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
