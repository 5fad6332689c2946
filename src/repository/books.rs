//! Book collections of the catalog and of the curator console
//!
//! The two views own separate collections; nothing the curator edits shows
//! up in the public catalog.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookForm, CuratorBook},
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Read-only books of the public catalog
#[derive(Clone)]
pub struct CatalogRepository {
    books: Arc<Vec<Book>>,
}

impl CatalogRepository {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books: Arc::new(books),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_catalog())
    }

    pub fn list(&self) -> &[Book] {
        &self.books
    }

    pub fn get_by_id(&self, id: i32) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }
}

/// Books managed by the curator
#[derive(Clone)]
pub struct CuratorBooksRepository {
    books: Arc<RwLock<Vec<CuratorBook>>>,
}

impl CuratorBooksRepository {
    pub fn new(books: Vec<CuratorBook>) -> Self {
        Self {
            books: Arc::new(RwLock::new(books)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_curator_books())
    }

    pub fn list(&self) -> Vec<CuratorBook> {
        self.books.read().clone()
    }

    pub fn get_by_id(&self, id: i32) -> AppResult<CuratorBook> {
        self.books
            .read()
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Add a book with the next id
    pub fn create(&self, form: BookForm, today: NaiveDate) -> CuratorBook {
        let mut books = self.books.write();
        let id = books.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let book = CuratorBook {
            id,
            available: form.available_copies > 0,
            title: form.title,
            author: form.author,
            genre: form.genre,
            year: form.year,
            isbn: form.isbn,
            cover: form.cover,
            description: form.description,
            total_copies: form.total_copies,
            available_copies: form.available_copies,
            added_date: today,
            last_updated: today,
        };
        books.push(book.clone());
        book
    }

    /// Replace the editable fields of a book
    pub fn update(&self, id: i32, form: BookForm, today: NaiveDate) -> AppResult<CuratorBook> {
        let mut books = self.books.write();
        let book = books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        book.title = form.title;
        book.author = form.author;
        book.genre = form.genre;
        book.year = form.year;
        book.isbn = form.isbn;
        book.description = form.description;
        book.cover = form.cover;
        book.total_copies = form.total_copies;
        book.available_copies = form.available_copies;
        book.available = book.available_copies > 0;
        book.last_updated = today;

        Ok(book.clone())
    }

    pub fn delete(&self, id: i32) -> AppResult<()> {
        let mut books = self.books.write();
        let before = books.len();
        books.retain(|b| b.id != id);
        if books.len() == before {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Put one copy back on the shelf, capped at the total.
    /// Returns false when the book no longer exists.
    pub fn restore_copy(&self, id: i32, today: NaiveDate) -> bool {
        let mut books = self.books.write();
        match books.iter_mut().find(|b| b.id == id) {
            Some(book) => {
                if book.available_copies < book.total_copies {
                    book.available_copies += 1;
                }
                book.available = book.available_copies > 0;
                book.last_updated = today;
                true
            }
            None => false,
        }
    }
}

fn seed_catalog() -> Vec<Book> {
    vec![
        Book {
            id: 1,
            title: "Dom Casmurro".to_string(),
            author: "Machado de Assis".to_string(),
            genre: "Romance".to_string(),
            year: 1899,
            isbn: "978-85-359-0277-5".to_string(),
            available: true,
            cover: "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c?w=300&h=400&fit=crop".to_string(),
            description: "Uma das obras mais conhecidas da literatura brasileira, narrando a história de Bentinho e sua obsessão por Capitu.".to_string(),
            rating: 4.5,
            total_copies: 3,
            available_copies: 2,
            next_return: None,
        },
        Book {
            id: 2,
            title: "O Cortiço".to_string(),
            author: "Aluísio Azevedo".to_string(),
            genre: "Naturalismo".to_string(),
            year: 1890,
            isbn: "978-85-359-0278-2".to_string(),
            available: true,
            cover: "https://images.unsplash.com/photo-1481627834876-b7833e8f5570?w=300&h=400&fit=crop".to_string(),
            description: "Romance naturalista que retrata a vida em um cortiço carioca do século XIX.".to_string(),
            rating: 4.2,
            total_copies: 2,
            available_copies: 1,
            next_return: None,
        },
        Book {
            id: 3,
            title: "Memórias Póstumas de Brás Cubas".to_string(),
            author: "Machado de Assis".to_string(),
            genre: "Romance".to_string(),
            year: 1881,
            isbn: "978-85-359-0279-9".to_string(),
            available: false,
            cover: "https://images.unsplash.com/photo-1495640388908-05fa85288e61?w=300&h=400&fit=crop".to_string(),
            description: "Narrado por um defunto autor, este romance revolucionou a literatura brasileira.".to_string(),
            rating: 4.7,
            total_copies: 2,
            available_copies: 0,
            next_return: Some(date(2024, 12, 20)),
        },
        Book {
            id: 4,
            title: "O Primo Basílio".to_string(),
            author: "Eça de Queirós".to_string(),
            genre: "Realismo".to_string(),
            year: 1878,
            isbn: "978-85-359-0280-5".to_string(),
            available: true,
            cover: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=300&h=400&fit=crop".to_string(),
            description: "Romance que critica a burguesia lisboeta do século XIX.".to_string(),
            rating: 4.1,
            total_copies: 1,
            available_copies: 1,
            next_return: None,
        },
        Book {
            id: 5,
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
            genre: "Ficção Científica".to_string(),
            year: 1949,
            isbn: "978-85-359-0281-2".to_string(),
            available: true,
            cover: "https://images.unsplash.com/photo-1543002588-bfa74002ed7e?w=300&h=400&fit=crop".to_string(),
            description: "Distopia sobre um futuro totalitário onde o governo controla todos os aspectos da vida.".to_string(),
            rating: 4.8,
            total_copies: 4,
            available_copies: 3,
            next_return: None,
        },
        Book {
            id: 6,
            title: "Cem Anos de Solidão".to_string(),
            author: "Gabriel García Márquez".to_string(),
            genre: "Realismo Mágico".to_string(),
            year: 1967,
            isbn: "978-85-359-0282-9".to_string(),
            available: true,
            cover: "https://images.unsplash.com/photo-1532012197267-da84d127e765?w=300&h=400&fit=crop".to_string(),
            description: "A saga épica da família Buendía na fictícia cidade de Macondo.".to_string(),
            rating: 4.6,
            total_copies: 2,
            available_copies: 2,
            next_return: None,
        },
    ]
}

fn seed_curator_books() -> Vec<CuratorBook> {
    vec![
        CuratorBook {
            id: 1,
            title: "Dom Casmurro".to_string(),
            author: "Machado de Assis".to_string(),
            genre: "Romance".to_string(),
            year: Some(1899),
            isbn: "978-85-359-0277-5".to_string(),
            available: true,
            cover: "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c?w=300&h=400&fit=crop".to_string(),
            description: "Uma das obras mais conhecidas da literatura brasileira.".to_string(),
            total_copies: 3,
            available_copies: 2,
            added_date: date(2024, 1, 15),
            last_updated: date(2024, 11, 20),
        },
        CuratorBook {
            id: 2,
            title: "O Cortiço".to_string(),
            author: "Aluísio Azevedo".to_string(),
            genre: "Naturalismo".to_string(),
            year: Some(1890),
            isbn: "978-85-359-0278-2".to_string(),
            available: true,
            cover: "https://images.unsplash.com/photo-1481627834876-b7833e8f5570?w=300&h=400&fit=crop".to_string(),
            description: "Romance naturalista que retrata a vida em um cortiço carioca.".to_string(),
            total_copies: 2,
            available_copies: 1,
            added_date: date(2024, 2, 10),
            last_updated: date(2024, 11, 18),
        },
        CuratorBook {
            id: 3,
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
            genre: "Ficção Científica".to_string(),
            year: Some(1949),
            isbn: "978-85-359-0279-9".to_string(),
            available: false,
            cover: "https://images.unsplash.com/photo-1495640388908-05fa85288e61?w=300&h=400&fit=crop".to_string(),
            description: "Distopia sobre um futuro totalitário.".to_string(),
            total_copies: 2,
            available_copies: 0,
            added_date: date(2024, 3, 5),
            last_updated: date(2024, 11, 22),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        date(2025, 3, 1)
    }

    fn form(title: &str, available: u32) -> BookForm {
        BookForm {
            title: title.to_string(),
            author: "Clarice Lispector".to_string(),
            genre: "Romance".to_string(),
            year: Some(1977),
            total_copies: 2,
            available_copies: available,
            ..Default::default()
        }
    }

    #[test]
    fn test_catalog_seed() {
        let catalog = CatalogRepository::seeded();
        assert_eq!(catalog.list().len(), 6);
        assert_eq!(catalog.get_by_id(5).unwrap().title, "1984");
        assert!(catalog.get_by_id(7).is_none());
    }

    #[test]
    fn test_create_uses_next_id_and_today() {
        let repo = CuratorBooksRepository::seeded();
        let book = repo.create(form("A Hora da Estrela", 0), today());
        assert_eq!(book.id, 4);
        assert!(!book.available);
        assert_eq!(book.added_date, today());

        let empty = CuratorBooksRepository::new(Vec::new());
        assert_eq!(empty.create(form("A Hora da Estrela", 1), today()).id, 1);
    }

    #[test]
    fn test_update_recomputes_availability() {
        let repo = CuratorBooksRepository::seeded();
        let updated = repo.update(3, form("1984", 1), today()).unwrap();
        assert!(updated.available);
        assert_eq!(updated.last_updated, today());
        assert_eq!(updated.added_date, date(2024, 3, 5));

        assert!(matches!(
            repo.update(99, form("x", 1), today()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete() {
        let repo = CuratorBooksRepository::seeded();
        repo.delete(2).unwrap();
        assert_eq!(repo.list().len(), 2);
        assert!(repo.delete(2).is_err());
    }

    #[test]
    fn test_restore_copy_is_capped() {
        let repo = CuratorBooksRepository::seeded();
        assert!(repo.restore_copy(3, today()));
        assert!(repo.restore_copy(3, today()));
        assert!(repo.restore_copy(3, today()));
        let book = repo.get_by_id(3).unwrap();
        assert_eq!(book.available_copies, 2);
        assert!(book.available);
        assert!(!repo.restore_copy(42, today()));
    }
}
