//! API handlers for the Biblioteca endpoints

pub mod auth;
pub mod books;
pub mod curator;
pub mod health;
pub mod openapi;
pub mod screens;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{
    error::AppError,
    models::user::{Role, User},
    services::guard::{self, GuardDecision, RouteRequirement},
    AppState,
};

/// Extractor for a logged-in user
pub struct SessionUser(pub User);

/// Extractor for a logged-in curator
pub struct CuratorUser(pub User);

/// Run the route guard for a resource endpoint.
///
/// Guard decisions become status codes here: anonymous is 401, a role
/// mismatch 403, and a session still loading 503.
fn guarded(
    parts: &Parts,
    state: &AppState,
    requirement: RouteRequirement,
) -> Result<User, AppError> {
    let auth_state = state.services.auth.state();

    match guard::evaluate(requirement, &auth_state, parts.uri.path()) {
        GuardDecision::Render => auth_state
            .user()
            .cloned()
            .ok_or_else(|| AppError::Authentication("Login required".to_string())),
        GuardDecision::Waiting => Err(AppError::Unavailable(
            "Session is still loading".to_string(),
        )),
        GuardDecision::RedirectToLogin { .. } => {
            Err(AppError::Authentication("Login required".to_string()))
        }
        GuardDecision::AccessDenied => Err(AppError::Authorization(
            "Curator access required".to_string(),
        )),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        guarded(parts, state, RouteRequirement::RequiresSession).map(SessionUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CuratorUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        guarded(parts, state, RouteRequirement::RequiresRole(Role::Admin)).map(CuratorUser)
    }
}
