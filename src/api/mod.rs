mod auth;
pub mod error;
mod movies;
mod settings;
mod uploads;
mod validation;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::AppState;

/// Maximum accepted multipart upload size (1 GiB)
const UPLOAD_BODY_LIMIT: usize = 1024 * 1024 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/admin/login", post(auth::admin_login))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Catalog, settings and search; admin mutations are gated per-handler
    // by the AdminUser extractor
    let catalog_routes = Router::new()
        .route("/movies", get(movies::list_movies))
        .route("/movies/:id", get(movies::get_movie))
        .route("/admin/movies", post(movies::create_movie))
        .route("/admin/movies/:id", put(movies::update_movie))
        .route("/admin/movies/:id", delete(movies::delete_movie))
        .route("/settings", get(settings::get_settings))
        .route("/admin/settings", put(settings::update_settings))
        .route("/search", get(movies::search_movies));

    // Uploads carry a larger body limit than the JSON routes
    let upload_routes = Router::new()
        .route(
            "/admin/movies/:id/upload-video",
            post(uploads::upload_video),
        )
        .route(
            "/admin/movies/:id/upload-cover",
            post(uploads::upload_cover),
        )
        .route(
            "/admin/movies/:id/upload-background",
            post(uploads::upload_background),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    let api_routes = auth_routes.merge(catalog_routes).merge(upload_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .nest_service("/files", ServeDir::new(&state.upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
