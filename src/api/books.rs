//! Public catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, CatalogQuery},
        view::CatalogView,
    },
    AppState,
};

use super::SessionUser;

/// Search the catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Matching books with catalog stats", body = CatalogView)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<CatalogView> {
    let is_logged = state.services.auth.state().is_authenticated();
    Json(state.services.catalog.catalog_view(&query, is_logged))
}

/// Get a catalog book
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 401, description = "Login required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    SessionUser(_user): SessionUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    state
        .services
        .catalog
        .get_book(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
}
