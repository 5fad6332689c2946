//! Session state of the tab

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::User;

/// Current authentication state as seen by views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub user: Option<User>,
    pub is_logged: bool,
    /// True until the persisted session has been read once
    pub loading: bool,
}

impl Session {
    /// Initial state before hydration
    pub fn loading() -> Self {
        Self {
            user: None,
            is_logged: false,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            is_logged: false,
            loading: false,
        }
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            is_logged: true,
            loading: false,
        }
    }

    pub fn state(&self) -> AuthState {
        if self.loading {
            return AuthState::Loading;
        }
        match (&self.user, self.is_logged) {
            (Some(user), true) => AuthState::Authenticated(user.clone()),
            _ => AuthState::Anonymous,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

/// The three states of the auth machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum AuthState {
    Loading,
    Anonymous,
    Authenticated(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    #[test]
    fn test_state_follows_flags() {
        assert_eq!(Session::loading().state(), AuthState::Loading);
        assert_eq!(Session::anonymous().state(), AuthState::Anonymous);

        let user = User {
            id: 2,
            name: "João Silva".to_string(),
            email: "joao@email.com".to_string(),
            role: Role::User,
            avatar: String::new(),
        };
        let session = Session::authenticated(user.clone());
        assert_eq!(session.state(), AuthState::Authenticated(user));
    }

    #[test]
    fn test_flag_without_user_is_anonymous() {
        let session = Session {
            user: None,
            is_logged: true,
            loading: false,
        };
        assert_eq!(session.state(), AuthState::Anonymous);
    }
}
