//! Biblioteca Digital
//!
//! A single-tab library catalog server: a session store standing in for the
//! browser's local storage, an auth controller, a route guard and a view
//! router, driven through a REST JSON API.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Tab
        .route("/session", get(api::screens::get_session))
        .route("/screen", get(api::screens::get_screen))
        .route("/history", get(api::screens::get_history))
        .route("/navigate", post(api::screens::navigate))
        .route("/back", post(api::screens::back))
        .route("/forward", post(api::screens::forward))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/mode", post(api::auth::switch_mode))
        .route("/auth/errors/:field", delete(api::auth::clear_field_error))
        // Catalog
        .route("/books", get(api::books::list_books))
        .route("/books/:id", get(api::books::get_book))
        // Curator console
        .route("/curator/dashboard", get(api::curator::get_dashboard))
        .route("/curator/books", get(api::curator::list_books))
        .route("/curator/books", post(api::curator::create_book))
        .route("/curator/books/:id", put(api::curator::update_book))
        .route("/curator/books/:id", delete(api::curator::delete_book))
        .route("/curator/loans", get(api::curator::list_loans))
        .route("/curator/loans/:id/return", post(api::curator::return_loan))
        .route("/curator/loans/:id/renew", post(api::curator::renew_loan))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
