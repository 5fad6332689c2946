//! Public catalog: search, filter, sort and book detail

use std::cmp::Ordering;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::{
    models::{
        book::{Book, CatalogQuery, SortBy, ViewMode, ALL_GENRES, CATALOG_GENRES},
        view::{BookCard, BookDetailView, CatalogStats, CatalogView, View},
    },
    repository::Repository,
};

use super::navigation::BOOK_PATH_PREFIX;

const GRID_EXCERPT_LEN: usize = 100;
const LIST_EXCERPT_LEN: usize = 150;

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Books matching the query, in the requested order
    pub fn search(&self, query: &CatalogQuery) -> Vec<Book> {
        let search = query.search.as_deref().unwrap_or_default().to_lowercase();
        let genre = query
            .genre
            .as_deref()
            .filter(|g| !g.is_empty() && *g != ALL_GENRES);

        let mut books: Vec<Book> = self
            .repository
            .catalog
            .list()
            .iter()
            .filter(|book| {
                book.title.to_lowercase().contains(&search)
                    || book.author.to_lowercase().contains(&search)
            })
            .filter(|book| genre.map_or(true, |g| book.genre == g))
            .cloned()
            .collect();

        let sort = query.sort.unwrap_or_default();
        books.sort_by(|a, b| compare(sort, a, b));
        books
    }

    pub fn get_book(&self, id: i32) -> Option<Book> {
        self.repository.catalog.get_by_id(id).cloned()
    }

    pub fn stats(&self) -> CatalogStats {
        let books = self.repository.catalog.list();
        CatalogStats {
            total_titles: books.len(),
            available_titles: books.iter().filter(|b| b.available).count(),
            total_copies: books.iter().map(|b| b.total_copies).sum(),
        }
    }

    pub fn genres(&self) -> Vec<String> {
        std::iter::once(ALL_GENRES)
            .chain(CATALOG_GENRES.iter().copied())
            .map(str::to_string)
            .collect()
    }

    /// Catalog page for the query
    pub fn catalog_view(&self, query: &CatalogQuery, is_logged: bool) -> CatalogView {
        let books = self.search(query);
        let view_mode = query.view.unwrap_or_default();
        CatalogView {
            search: query.search.clone().unwrap_or_default(),
            genre: query
                .genre
                .clone()
                .filter(|g| !g.is_empty())
                .unwrap_or_else(|| ALL_GENRES.to_string()),
            sort: query.sort.unwrap_or_default(),
            view_mode,
            genres: self.genres(),
            stats: self.stats(),
            result_label: result_label(books.len()),
            books: books.iter().map(|book| book_card(book, view_mode)).collect(),
            login_prompt: !is_logged,
        }
    }

    /// Detail page for a raw id segment; unknown or non-numeric ids render a not-found view
    pub fn detail_view(&self, raw_id: &str) -> View {
        match raw_id.parse::<i32>().ok().and_then(|id| self.get_book(id)) {
            Some(book) => View::BookDetail(BookDetailView {
                can_borrow: book.available_copies > 0,
                book,
            }),
            None => View::BookNotFound {
                id: raw_id.to_string(),
            },
        }
    }
}

fn compare(sort: SortBy, a: &Book, b: &Book) -> Ordering {
    match sort {
        SortBy::Title => locale_compare(&a.title, &b.title),
        SortBy::Author => locale_compare(&a.author, &b.author),
        SortBy::Year => b.year.cmp(&a.year),
        SortBy::Rating => b.rating.total_cmp(&a.rating),
    }
}

/// Accent- and case-insensitive ordering, ties broken on the raw text
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn result_label(count: usize) -> String {
    if count == 1 {
        "1 book found".to_string()
    } else {
        format!("{} books found", count)
    }
}

/// Card of the catalog listing; list rows show a longer excerpt
pub fn book_card(book: &Book, view_mode: ViewMode) -> BookCard {
    let len = match view_mode {
        ViewMode::Grid => GRID_EXCERPT_LEN,
        ViewMode::List => LIST_EXCERPT_LEN,
    };
    let excerpt: String = book.description.chars().take(len).collect();
    BookCard {
        id: book.id,
        title: book.title.clone(),
        author: book.author.clone(),
        genre: book.genre.clone(),
        year: book.year,
        cover: book.cover.clone(),
        rating: book.rating,
        stars: "★".repeat(book.rating.floor().max(0.0) as usize),
        excerpt: format!("{}...", excerpt),
        available: book.available,
        available_copies: book.available_copies,
        total_copies: book.total_copies,
        next_return: book.next_return,
        link: format!("{}{}", BOOK_PATH_PREFIX, book.id),
    }
}
