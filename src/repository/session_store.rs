//! Persisted session layout on top of the key/value storage

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::user::User,
};

use super::storage::KeyValueStorage;

/// Key holding the JSON-serialized user
pub const USER_KEY: &str = "user";
/// Key holding the literal `"true"` while logged in
pub const IS_LOGGED_KEY: &str = "isLogged";

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read the persisted user.
    ///
    /// Returns `Ok(None)` when nothing usable is stored or `isLogged` is
    /// anything but `"true"`. A stored user that does not decode is an error,
    /// whatever the flag says, so the caller can discard it.
    pub fn load(&self) -> AppResult<Option<User>> {
        let raw_user = self
            .storage
            .get_item(USER_KEY)?
            .filter(|raw| !raw.is_empty());
        let is_logged = self.storage.get_item(IS_LOGGED_KEY)?;

        let Some(raw_user) = raw_user else {
            return Ok(None);
        };

        let user: User = serde_json::from_str(&raw_user)
            .map_err(|e| AppError::Storage(format!("Corrupted persisted user: {}", e)))?;

        if is_logged.as_deref() == Some("true") {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Persist the user and the logged-in flag
    pub fn save(&self, user: &User) -> AppResult<()> {
        let raw = serde_json::to_string(user)?;
        self.storage.set_item(USER_KEY, &raw)?;
        self.storage.set_item(IS_LOGGED_KEY, "true")?;
        Ok(())
    }

    /// Remove both keys, attempting the second even if the first fails
    pub fn clear(&self) -> AppResult<()> {
        let user = self.storage.remove_item(USER_KEY);
        let flag = self.storage.remove_item(IS_LOGGED_KEY);
        user.and(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::user::Role, repository::storage::MemoryStorage};

    fn admin() -> User {
        User {
            id: 1,
            name: "Administrador".to_string(),
            email: "admin@biblioteca.com".to_string(),
            role: Role::Admin,
            avatar: String::new(),
        }
    }

    #[test]
    fn test_save_then_load() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());

        store.save(&admin()).unwrap();
        assert_eq!(storage.get_item(IS_LOGGED_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(store.load().unwrap(), Some(admin()));

        store.clear().unwrap();
        assert!(storage.is_empty());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_flag_must_be_literal_true() {
        for flag in ["false", "TRUE", "1", ""] {
            let storage = Arc::new(MemoryStorage::with_items([
                (USER_KEY, r#"{"id":1,"role":"admin"}"#),
                (IS_LOGGED_KEY, flag),
            ]));
            assert_eq!(SessionStore::new(storage).load().unwrap(), None, "flag {:?}", flag);
        }
    }

    #[test]
    fn test_corrupted_user_is_an_error_while_logged_out() {
        for flag in [Some("false"), None] {
            let mut items = vec![(USER_KEY, "{not json")];
            items.extend(flag.map(|f| (IS_LOGGED_KEY, f)));
            let storage = Arc::new(MemoryStorage::with_items(items));
            assert!(
                matches!(SessionStore::new(storage).load(), Err(AppError::Storage(_))),
                "flag {:?}",
                flag
            );
        }
    }

    #[test]
    fn test_corrupted_user_is_an_error() {
        let storage = Arc::new(MemoryStorage::with_items([
            (USER_KEY, "{not json"),
            (IS_LOGGED_KEY, "true"),
        ]));
        assert!(matches!(
            SessionStore::new(storage).load(),
            Err(AppError::Storage(_))
        ));
    }
}
