//! Data models for Biblioteca

pub mod book;
pub mod form;
pub mod loan;
pub mod session;
pub mod user;
pub mod view;

// Re-export commonly used types
pub use book::{Book, BookForm, CatalogQuery, CuratorBook, CuratorBooksQuery, SortBy, ViewMode};
pub use form::{AuthMode, CredentialsForm, FieldErrors};
pub use loan::{DisplayStatus, Loan, LoanRow, LoanStatus};
pub use session::{AuthState, Session};
pub use user::{Account, Role, User};
pub use view::{NavBar, Screen, View};
