//! Route access policy

use crate::models::{session::AuthState, user::Role};

/// Access policy attached to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    Public,
    RequiresSession,
    RequiresRole(Role),
}

/// What the router does with a requested path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Session still hydrating; show a placeholder, never redirect
    Waiting,
    /// Send to the login route, remembering where the visitor wanted to go
    RedirectToLogin { from: String },
    /// Logged in but not allowed; no login prompt
    AccessDenied,
}

/// Decide what `requested_path` shows under `requirement` for `state`
pub fn evaluate(
    requirement: RouteRequirement,
    state: &AuthState,
    requested_path: &str,
) -> GuardDecision {
    let role = match requirement {
        RouteRequirement::Public => return GuardDecision::Render,
        RouteRequirement::RequiresSession => None,
        RouteRequirement::RequiresRole(role) => Some(role),
    };

    match state {
        AuthState::Loading => GuardDecision::Waiting,
        AuthState::Anonymous => GuardDecision::RedirectToLogin {
            from: requested_path.to_string(),
        },
        AuthState::Authenticated(user) => match role {
            Some(required) if user.role != required => {
                tracing::debug!(
                    "User {} with role {} denied {}",
                    user.id,
                    user.role,
                    requested_path
                );
                GuardDecision::AccessDenied
            }
            _ => GuardDecision::Render,
        },
    }
}
