//! Repository layer: session storage and the in-memory collections

pub mod accounts;
pub mod books;
pub mod loans;
pub mod session_store;
pub mod storage;

use std::sync::Arc;

use storage::KeyValueStorage;

/// Main repository struct holding every store of the tab
#[derive(Clone)]
pub struct Repository {
    pub session: session_store::SessionStore,
    pub accounts: accounts::AccountsRepository,
    pub catalog: books::CatalogRepository,
    pub curator_books: books::CuratorBooksRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a repository over the given session storage, with seeded collections
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            session: session_store::SessionStore::new(storage),
            accounts: accounts::AccountsRepository::seeded(),
            catalog: books::CatalogRepository::seeded(),
            curator_books: books::CuratorBooksRepository::seeded(),
            loans: loans::LoansRepository::seeded(),
        }
    }
}
