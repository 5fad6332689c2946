//! Curator console: book and loan management

use chrono::{Datelike, NaiveDate};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookForm, CuratorBook, CuratorBooksQuery, CURATOR_GENRES},
        form::FieldErrors,
        loan::{Loan, LoanRow},
        user::User,
        view::{CuratorTab, CuratorView, Dashboard, DashboardStats},
    },
    repository::Repository,
};

/// Loans shown under recent activity
const RECENT_ACTIVITY_LEN: usize = 5;

#[derive(Clone)]
pub struct CuratorService {
    repository: Repository,
    period_days: u32,
}

impl CuratorService {
    pub fn new(repository: Repository, period_days: u32) -> Self {
        Self {
            repository,
            period_days,
        }
    }

    /// Check a book form; the year may not be in the future
    pub fn validate_book(&self, form: &BookForm, today: NaiveDate) -> FieldErrors {
        let mut errors = match form.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        // Schema-level errors are reported against the copies field
        if let Some(message) = errors.remove("__all__") {
            errors.add("available_copies", message);
        }

        if form.title.trim().is_empty() {
            errors.add("title", "Title is required");
        }
        if form.author.trim().is_empty() {
            errors.add("author", "Author is required");
        }
        if let Some(year) = form.year {
            if year > today.year() {
                errors.add("year", "Invalid year");
            }
        }

        errors
    }

    pub fn list_books(&self, query: &CuratorBooksQuery) -> Vec<CuratorBook> {
        let books = self.repository.curator_books.list();
        let term = match query.search.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => return books,
        };
        let lowered = term.to_lowercase();

        // Title and author ignore case, ISBN matches as typed
        books
            .into_iter()
            .filter(|book| {
                book.title.to_lowercase().contains(&lowered)
                    || book.author.to_lowercase().contains(&lowered)
                    || book.isbn.contains(term)
            })
            .collect()
    }

    pub fn get_book(&self, id: i32) -> AppResult<CuratorBook> {
        self.repository.curator_books.get_by_id(id)
    }

    pub fn create_book(&self, form: BookForm, today: NaiveDate) -> AppResult<CuratorBook> {
        let errors = self.validate_book(&form, today);
        if !errors.is_empty() {
            return Err(AppError::InvalidForm(errors));
        }

        let book = self.repository.curator_books.create(form, today);
        tracing::info!("Curator added book {} ({})", book.id, book.title);
        Ok(book)
    }

    pub fn update_book(&self, id: i32, form: BookForm, today: NaiveDate) -> AppResult<CuratorBook> {
        // Unknown ids win over form errors
        self.repository.curator_books.get_by_id(id)?;

        let errors = self.validate_book(&form, today);
        if !errors.is_empty() {
            return Err(AppError::InvalidForm(errors));
        }

        let book = self.repository.curator_books.update(id, form, today)?;
        tracing::info!("Curator updated book {}", id);
        Ok(book)
    }

    pub fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.curator_books.delete(id)?;
        tracing::info!("Curator deleted book {}", id);
        Ok(())
    }

    pub fn list_loans(&self, today: NaiveDate) -> Vec<LoanRow> {
        self.repository
            .loans
            .list()
            .into_iter()
            .map(|loan| LoanRow::new(loan, today))
            .collect()
    }

    /// Close an active loan and put its copy back on the shelf
    pub fn return_loan(&self, id: i32, today: NaiveDate) -> AppResult<LoanRow> {
        let loan = self.repository.loans.return_loan(id, today)?;
        if !self.repository.curator_books.restore_copy(loan.book_id, today) {
            tracing::warn!(
                "Returned loan {} references missing book {}",
                loan.id,
                loan.book_id
            );
        }
        tracing::info!("Loan {} returned", loan.id);
        Ok(LoanRow::new(loan, today))
    }

    pub fn renew_loan(&self, id: i32, today: NaiveDate) -> AppResult<LoanRow> {
        let loan = self.repository.loans.renew_loan(id, self.period_days)?;
        tracing::info!(
            "Loan {} renewed until {} ({}/{})",
            loan.id,
            loan.due_date,
            loan.renewals,
            loan.max_renewals
        );
        Ok(LoanRow::new(loan, today))
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let books = self.repository.curator_books.list();
        let loans = self.repository.loans.list();

        let stats = DashboardStats {
            total_books: books.len(),
            total_copies: books.iter().map(|b| b.total_copies).sum(),
            available_books: books.iter().filter(|b| b.available).count(),
            active_loans: loans.iter().filter(|l| l.is_active()).count(),
            overdue_loans: loans.iter().filter(|l| l.is_overdue(today)).count(),
        };

        Dashboard {
            stats,
            recent_activity: loans
                .into_iter()
                .take(RECENT_ACTIVITY_LEN)
                .map(|loan: Loan| LoanRow::new(loan, today))
                .collect(),
        }
    }

    /// Console page for `tab`
    pub fn curator_view(&self, tab: CuratorTab, curator: &User, today: NaiveDate) -> CuratorView {
        let mut view = CuratorView {
            curator_name: curator.display_name().to_string(),
            tab,
            dashboard: None,
            books: None,
            loans: None,
            genres: CURATOR_GENRES.iter().map(|g| g.to_string()).collect(),
        };

        match tab {
            CuratorTab::Dashboard => view.dashboard = Some(self.dashboard(today)),
            CuratorTab::Books => view.books = Some(self.list_books(&CuratorBooksQuery::default())),
            CuratorTab::Loans => view.loans = Some(self.list_loans(today)),
        }

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{loan::DisplayStatus, user::Role},
        repository::storage::MemoryStorage,
    };
    use std::sync::Arc;

    fn service() -> CuratorService {
        CuratorService::new(Repository::new(Arc::new(MemoryStorage::new())), 30)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 12, 15)
    }

    fn form() -> BookForm {
        BookForm {
            title: "A Hora da Estrela".to_string(),
            author: "Clarice Lispector".to_string(),
            genre: "Romance".to_string(),
            year: Some(1977),
            isbn: "978-85-325-0812-0".to_string(),
            total_copies: 2,
            available_copies: 2,
            ..Default::default()
        }
    }

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
    fn test_search_books() {
        let svc = service();
        let by_author = svc.list_books(&CuratorBooksQuery {
            search: Some("orwell".to_string()),
        });
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].title, "1984");

        let by_isbn = svc.list_books(&CuratorBooksQuery {
            search: Some("0278".to_string()),
        });
        assert_eq!(by_isbn.len(), 1);
        assert_eq!(by_isbn[0].title, "O Cortiço");

        assert_eq!(svc.list_books(&CuratorBooksQuery::default()).len(), 3);
    }

    #[test]
    fn test_isbn_search_is_case_sensitive() {
        let svc = service();
        let created = svc
            .create_book(
                BookForm {
                    isbn: "85-7164-811-X".to_string(),
                    ..form()
                },
                today(),
            )
            .unwrap();
        let search = |term: &str| {
            svc.list_books(&CuratorBooksQuery {
                search: Some(term.to_string()),
            })
        };

        assert!(search(" 811-X ").iter().any(|b| b.id == created.id));
        assert!(!search("811-x").iter().any(|b| b.id == created.id));
    }

    #[test]
    fn test_create_book() {
        let svc = service();
        let book = svc.create_book(form(), today()).unwrap();
        assert_eq!(book.id, 4);
        assert!(book.available);
        assert_eq!(book.added_date, today());
        assert_eq!(svc.list_books(&CuratorBooksQuery::default()).len(), 4);
    }

    #[test]
    fn test_book_form_errors() {
        let svc = service();
        let mut f = form();
        f.title = "   ".to_string();
        f.year = Some(2025);
        f.available_copies = 5;

        let Err(AppError::InvalidForm(errors)) = svc.create_book(f, today()) else {
            panic!("form must be rejected");
        };
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.get("year"), Some("Invalid year"));
        assert_eq!(
            errors.get("available_copies"),
            Some("Available copies cannot exceed total copies")
        );
        assert!(errors.get("__all__").is_none());
    }

    #[test]
    fn test_year_is_optional() {
        let svc = service();
        let mut f = form();
        f.year = None;
        assert!(svc.validate_book(&f, today()).is_empty());
    }

    #[test]
    fn test_update_and_delete_book() {
        let svc = service();
        let mut f = BookForm::from_book(&svc.get_book(3).unwrap());
        f.available_copies = 1;
        let updated = svc.update_book(3, f, today()).unwrap();
        assert!(updated.available);
        assert_eq!(updated.last_updated, today());

        assert!(matches!(
            svc.update_book(42, form(), today()),
            Err(AppError::NotFound(_))
        ));

        svc.delete_book(3).unwrap();
        assert!(matches!(svc.delete_book(3), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_dashboard_stats() {
        let svc = service();
        let dashboard = svc.dashboard(today());
        assert_eq!(dashboard.stats.total_books, 3);
        assert_eq!(dashboard.stats.total_copies, 7);
        assert_eq!(dashboard.stats.available_books, 2);
        assert_eq!(dashboard.stats.active_loans, 1);
        assert_eq!(dashboard.stats.overdue_loans, 1);
        assert_eq!(dashboard.recent_activity.len(), 2);

        let before_due = svc.dashboard(date(2024, 12, 1));
        assert_eq!(before_due.stats.overdue_loans, 0);
    }

    #[test]
    fn test_return_restores_copy() {
        let svc = service();
        let row = svc.return_loan(1, today()).unwrap();
        assert_eq!(row.display_status, DisplayStatus::Returned);
        assert!(!row.can_return);
        assert!(!row.can_renew);

        let book = svc.get_book(3).unwrap();
        assert_eq!(book.available_copies, 1);
        assert!(book.available);

        assert!(matches!(
            svc.return_loan(1, today()),
            Err(AppError::BusinessRule(_))
        ));
    }

    #[test]
    fn test_renew_extends_due_date() {
        let svc = service();
        let row = svc.renew_loan(1, today()).unwrap();
        assert_eq!(row.loan.due_date, date(2025, 1, 7));
        assert_eq!(row.loan.renewals, 1);
        assert_eq!(row.display_status, DisplayStatus::Active);

        assert!(matches!(
            svc.renew_loan(2, today()),
            Err(AppError::BusinessRule(_))
        ));
    }

    #[test]
    fn test_curator_view_fills_selected_tab() {
        let svc = service();
        let view = svc.curator_view(CuratorTab::Loans, &admin(), today());
        assert_eq!(view.curator_name, "Administrador");
        assert!(view.loans.is_some());
        assert!(view.books.is_none());
        assert!(view.dashboard.is_none());
        assert_eq!(view.genres.len(), 8);

        let view = svc.curator_view(CuratorTab::default(), &admin(), today());
        assert!(view.dashboard.is_some());
    }
}
