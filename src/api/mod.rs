pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
    uploads::{MAX_FILE_SIZE, UPLOADS_URL_PREFIX},
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let uploads = ServeDir::new(&settings.uploads.dir);
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        .route("/api", get(handlers::root::api_info))

        // Editor API
        .nest("/api", api_routes(app_state.clone()))

        // Public routes (for page rendering and search engines)
        .nest("/public", public_routes())

        // Uploaded images
        .nest_service(&format!("/{}", UPLOADS_URL_PREFIX), uploads)

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/announcements",
            get(handlers::announcements::list).post(handlers::announcements::create),
        )
        .route("/announcements/options", get(handlers::announcements::options))
        .route("/announcements/fields", get(handlers::announcements::fields))
        .route(
            "/announcements/:id",
            get(handlers::announcements::get)
                .put(handlers::announcements::update)
                .delete(handlers::announcements::delete),
        )
        .route("/links", post(handlers::links::create))
        .route("/links/:id", get(handlers::links::get).delete(handlers::links::delete))
        .route(
            "/images",
            post(handlers::images::upload).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 64 * 1024)),
        )
        .route("/images/:id", get(handlers::images::get))
        .route("/pages", get(handlers::pages::list).post(handlers::pages::create))
        .route("/elements", post(handlers::elements::create))
        .route(
            "/elements/:id",
            get(handlers::elements::get).delete(handlers::elements::delete),
        )
        .route("/permissions", get(handlers::announcements::permissions))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_editor,
        ))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/announcements", get(handlers::public::list_active))
        .route("/announcements/:id", get(handlers::public::render_announcement))
        .route("/announcements/:id/schema.json", get(handlers::public::schema_json))
        .route("/pages/:page_id/announcements", get(handlers::public::render_page_announcements))
        .route("/elements/:id", get(handlers::public::render_element))
}
