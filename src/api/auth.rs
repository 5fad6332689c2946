//! Login, registration and logout endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        form::{AuthMode, CredentialsForm},
        view::Screen,
    },
    services::screens::{Submission, SESSION_NOT_SAVED},
    AppState,
};

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login/register toggle
#[derive(Deserialize, ToSchema)]
pub struct ModeRequest {
    pub mode: AuthMode,
}

/// Map a form submission to a status and the screen to show.
///
/// A credential mismatch is a 401, a session that could not be saved a 500,
/// other rejected forms a 422. All carry the login screen with its errors.
fn submission_response(submission: Submission) -> (StatusCode, Json<Screen>) {
    match submission {
        Submission::Accepted(screen) => (StatusCode::OK, Json(screen)),
        Submission::Rejected { screen, errors } => {
            let status = match errors.get("general") {
                Some(SESSION_NOT_SAVED) => StatusCode::INTERNAL_SERVER_ERROR,
                Some(_) => StatusCode::UNAUTHORIZED,
                None => StatusCode::UNPROCESSABLE_ENTITY,
            };
            (status, Json(screen))
        }
    }
}

/// Submit the login form
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; screen of the destination", body = Screen),
        (status = 401, description = "Invalid email or password", body = Screen),
        (status = 422, description = "Invalid form fields", body = Screen),
        (status = 500, description = "Session could not be saved", body = Screen)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> (StatusCode, Json<Screen>) {
    let form = CredentialsForm::login(&request.email, &request.password);
    submission_response(state.services.screens.submit_login(form).await)
}

/// Submit the registration form
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = CredentialsForm,
    responses(
        (status = 200, description = "Account created and logged in", body = Screen),
        (status = 422, description = "Invalid form fields", body = Screen),
        (status = 500, description = "Session could not be saved", body = Screen)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<CredentialsForm>,
) -> (StatusCode, Json<Screen>) {
    submission_response(state.services.screens.submit_register(form).await)
}

/// End the session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out; current location rendered again", body = Screen),
        (status = 500, description = "Session could not be cleared", body = ErrorResponse)
    )
)]
pub async fn logout(State(state): State<AppState>) -> AppResult<Json<Screen>> {
    Ok(Json(state.services.screens.logout()?))
}

/// Switch the form between login and register
#[utoipa::path(
    post,
    path = "/auth/mode",
    tag = "auth",
    request_body = ModeRequest,
    responses(
        (status = 200, description = "Form reset in the requested mode", body = Screen)
    )
)]
pub async fn switch_mode(
    State(state): State<AppState>,
    Json(request): Json<ModeRequest>,
) -> Json<Screen> {
    Json(state.services.screens.switch_mode(request.mode))
}

/// Clear the error of a field being edited
#[utoipa::path(
    delete,
    path = "/auth/errors/{field}",
    tag = "auth",
    params(
        ("field" = String, Path, description = "Form field name")
    ),
    responses(
        (status = 200, description = "Form without the field error", body = Screen)
    )
)]
pub async fn clear_field_error(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> Json<Screen> {
    Json(state.services.screens.clear_field_error(&field))
}
