//! Tab navigation endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{session::Session, view::Screen},
    AppState,
};

/// Navigation request
#[derive(Deserialize, ToSchema)]
pub struct NavigateRequest {
    /// Location to open, with an optional query string
    pub path: String,
}

/// Current session
#[utoipa::path(
    get,
    path = "/session",
    tag = "tab",
    responses(
        (status = 200, description = "Session of the tab", body = Session)
    )
)]
pub async fn get_session(State(state): State<AppState>) -> Json<Session> {
    Json(state.services.auth.session())
}

/// Render the current history entry
#[utoipa::path(
    get,
    path = "/screen",
    tag = "tab",
    responses(
        (status = 200, description = "Current screen", body = Screen)
    )
)]
pub async fn get_screen(State(state): State<AppState>) -> Json<Screen> {
    Json(state.services.screens.current())
}

/// Open a location, as following a link would
#[utoipa::path(
    post,
    path = "/navigate",
    tag = "tab",
    request_body = NavigateRequest,
    responses(
        (status = 200, description = "Screen after guards and redirects", body = Screen),
        (status = 400, description = "Location is not an absolute path")
    )
)]
pub async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> AppResult<Json<Screen>> {
    if !request.path.starts_with('/') {
        return Err(AppError::BadRequest(format!(
            "Location must start with '/': {}",
            request.path
        )));
    }

    Ok(Json(state.services.screens.navigate(&request.path)))
}

/// Go back one history entry
#[utoipa::path(
    post,
    path = "/back",
    tag = "tab",
    responses(
        (status = 200, description = "Screen of the previous entry", body = Screen)
    )
)]
pub async fn back(State(state): State<AppState>) -> Json<Screen> {
    Json(state.services.screens.back())
}

/// Go forward one history entry
#[utoipa::path(
    post,
    path = "/forward",
    tag = "tab",
    responses(
        (status = 200, description = "Screen of the next entry", body = Screen)
    )
)]
pub async fn forward(State(state): State<AppState>) -> Json<Screen> {
    Json(state.services.screens.forward())
}

/// History locations, oldest first
#[utoipa::path(
    get,
    path = "/history",
    tag = "tab",
    responses(
        (status = 200, description = "History of the tab", body = Vec<String>)
    )
)]
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.services.screens.history())
}
