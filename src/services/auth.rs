//! Session owner: hydration, login and logout
//!
//! The session lives in a `watch` channel. Each mutation and its write to the
//! session store happen inside one channel update, so a subscriber never sees
//! a state whose persistence has not been attempted yet.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    config::PersistFailurePolicy,
    models::{
        session::{AuthState, Session},
        user::User,
    },
    repository::session_store::SessionStore,
};

/// Result of writing a session change to storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Persisted,
    /// Storage rejected the write; the in-memory change stands
    NotPersisted,
    /// Storage rejected the write and the in-memory change was undone
    RolledBack,
}

#[derive(Clone)]
pub struct AuthController {
    store: SessionStore,
    policy: PersistFailurePolicy,
    session: Arc<watch::Sender<Session>>,
}

impl AuthController {
    pub fn new(store: SessionStore, policy: PersistFailurePolicy) -> Self {
        let (session, _) = watch::channel(Session::loading());
        Self {
            store,
            policy,
            session: Arc::new(session),
        }
    }

    /// Hydrate the session from storage.
    ///
    /// Unreadable data is removed from storage and yields an anonymous
    /// session. `loading` is cleared on every path; later calls do nothing.
    pub fn initialize(&self) -> AuthState {
        self.session.send_if_modified(|session| {
            if !session.loading {
                return false;
            }

            *session = match self.store.load() {
                Ok(Some(user)) => {
                    tracing::info!("Restored session for user {} ({})", user.id, user.role);
                    Session::authenticated(user)
                }
                Ok(None) => {
                    tracing::debug!("No persisted session");
                    Session::anonymous()
                }
                Err(e) => {
                    tracing::warn!("Discarding persisted session: {}", e);
                    if let Err(e) = self.store.clear() {
                        tracing::error!("Failed to clear persisted session: {}", e);
                    }
                    Session::anonymous()
                }
            };
            true
        });

        self.state()
    }

    /// Start a session for `user`. Credentials are the caller's concern.
    pub fn login(&self, user: User) -> PersistOutcome {
        let mut outcome = PersistOutcome::Persisted;

        self.session.send_if_modified(|session| {
            let previous = std::mem::replace(session, Session::authenticated(user.clone()));

            match self.store.save(&user) {
                Ok(()) => {
                    tracing::info!("User {} logged in", user.id);
                    true
                }
                Err(e) => {
                    tracing::error!("Failed to persist login of user {}: {}", user.id, e);
                    match self.policy {
                        PersistFailurePolicy::Keep => {
                            outcome = PersistOutcome::NotPersisted;
                            true
                        }
                        PersistFailurePolicy::Rollback => {
                            outcome = PersistOutcome::RolledBack;
                            self.restore_storage(&previous);
                            *session = previous;
                            false
                        }
                    }
                }
            }
        });

        outcome
    }

    /// End the session
    pub fn logout(&self) -> PersistOutcome {
        let mut outcome = PersistOutcome::Persisted;

        self.session.send_if_modified(|session| {
            let previous = std::mem::replace(session, Session::anonymous());

            match self.store.clear() {
                Ok(()) => {
                    if let Some(user) = &previous.user {
                        tracing::info!("User {} logged out", user.id);
                    }
                    true
                }
                Err(e) => {
                    tracing::error!("Failed to clear persisted session on logout: {}", e);
                    match self.policy {
                        PersistFailurePolicy::Keep => {
                            outcome = PersistOutcome::NotPersisted;
                            true
                        }
                        PersistFailurePolicy::Rollback => {
                            outcome = PersistOutcome::RolledBack;
                            self.restore_storage(&previous);
                            *session = previous;
                            false
                        }
                    }
                }
            }
        });

        outcome
    }

    /// Best effort: put storage back in line with a session being restored
    fn restore_storage(&self, previous: &Session) {
        let result = match (&previous.user, previous.is_logged) {
            (Some(user), true) => self.store.save(user),
            _ => self.store.clear(),
        };
        if let Err(e) = result {
            tracing::warn!("Storage left out of sync after rollback: {}", e);
        }
    }

    /// Snapshot of the session
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn state(&self) -> AuthState {
        self.session.borrow().state()
    }

    /// Observe every session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }
}
