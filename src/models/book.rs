//! Book models for the public catalog and the curator console

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Genres offered by the catalog filter, after the "All" entry
pub const CATALOG_GENRES: &[&str] = &[
    "Romance",
    "Naturalismo",
    "Realismo",
    "Ficção Científica",
    "Realismo Mágico",
];

/// Genres accepted by the curator book form
pub const CURATOR_GENRES: &[&str] = &[
    "Romance",
    "Naturalismo",
    "Realismo",
    "Ficção Científica",
    "Realismo Mágico",
    "Fantasia",
    "Terror",
    "Biografia",
];

/// Catalog filter value matching every genre
pub const ALL_GENRES: &str = "All";

/// Book as listed in the public catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    pub isbn: String,
    pub available: bool,
    pub cover: String,
    pub description: String,
    pub rating: f32,
    pub total_copies: u32,
    pub available_copies: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_return: Option<NaiveDate>,
}

/// Sort order of the catalog listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Title A-Z
    #[default]
    Title,
    /// Author A-Z
    Author,
    /// Newest first
    Year,
    /// Best rated first
    Rating,
}

/// Catalog layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Catalog search query
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Case-insensitive match on title or author
    pub search: Option<String>,
    /// Exact genre, or "All"
    pub genre: Option<String>,
    pub sort: Option<SortBy>,
    pub view: Option<ViewMode>,
}

/// Curator book search
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CuratorBooksQuery {
    /// Case-insensitive match on title or author, or a substring of the isbn
    pub search: Option<String>,
}

/// Book as managed by the curator console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CuratorBook {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: Option<i32>,
    pub isbn: String,
    pub available: bool,
    pub cover: String,
    pub description: String,
    pub total_copies: u32,
    pub available_copies: u32,
    pub added_date: NaiveDate,
    pub last_updated: NaiveDate,
}

/// Add/edit book form
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate, ToSchema)]
#[validate(schema(function = "validate_copies", skip_on_field_errors = false))]
pub struct BookForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(custom(function = "validate_genre"))]
    pub genre: String,
    #[validate(range(min = 0, max = 2100, message = "Invalid year"))]
    pub year: Option<i32>,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover: String,
    #[validate(range(min = 1, message = "At least one copy is required"))]
    pub total_copies: u32,
    pub available_copies: u32,
}

fn validate_genre(genre: &str) -> Result<(), ValidationError> {
    if genre.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Genre is required".into());
        return Err(err);
    }
    if !CURATOR_GENRES.contains(&genre) {
        let mut err = ValidationError::new("genre");
        err.message = Some("Unknown genre".into());
        return Err(err);
    }
    Ok(())
}

fn validate_copies(form: &BookForm) -> Result<(), ValidationError> {
    if form.available_copies > form.total_copies {
        let mut err = ValidationError::new("copies");
        err.message = Some("Available copies cannot exceed total copies".into());
        return Err(err);
    }
    Ok(())
}

impl BookForm {
    /// Form prefilled from an existing book, as opened by the edit action
    pub fn from_book(book: &CuratorBook) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            year: book.year,
            isbn: book.isbn.clone(),
            description: book.description.clone(),
            cover: book.cover.clone(),
            total_copies: book.total_copies,
            available_copies: book.available_copies,
        }
    }
}
