//! Router assembly.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{contact, gallery, health, locale, seo, session};
use crate::AppState;

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(gallery::list_categories))
        .route("/gallery", get(gallery::list_gallery))
        .route("/gallery/{*public_id}", delete(gallery::delete_item))
        .route(
            "/upload",
            post(gallery::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/contact", post(contact::submit))
        .route("/me", get(session::me))
}

/// Complete application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/robots.txt", get(seo::robots))
        .route("/sitemap.xml", get(seo::sitemap))
        .route("/manifest.webmanifest", get(seo::manifest))
        .route("/{lang}/translations", get(locale::translations))
        .nest("/api", api_routes())
        .fallback(locale::localize)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
