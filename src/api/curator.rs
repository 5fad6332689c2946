//! Curator console endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{BookForm, CuratorBook, CuratorBooksQuery},
        loan::LoanRow,
        view::Dashboard,
    },
    services::today,
    AppState,
};

use super::CuratorUser;

/// Dashboard stats and recent activity
#[utoipa::path(
    get,
    path = "/curator/dashboard",
    tag = "curator",
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 401, description = "Login required"),
        (status = 403, description = "Curator access required")
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    CuratorUser(_curator): CuratorUser,
) -> Json<Dashboard> {
    Json(state.services.curator.dashboard(today()))
}

/// List the curator's books
#[utoipa::path(
    get,
    path = "/curator/books",
    tag = "curator",
    params(CuratorBooksQuery),
    responses(
        (status = 200, description = "Books", body = Vec<CuratorBook>),
        (status = 401, description = "Login required"),
        (status = 403, description = "Curator access required")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    CuratorUser(_curator): CuratorUser,
    Query(query): Query<CuratorBooksQuery>,
) -> Json<Vec<CuratorBook>> {
    Json(state.services.curator.list_books(&query))
}

/// Add a book
#[utoipa::path(
    post,
    path = "/curator/books",
    tag = "curator",
    request_body = BookForm,
    responses(
        (status = 201, description = "Book created", body = CuratorBook),
        (status = 403, description = "Curator access required"),
        (status = 422, description = "Invalid form fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    CuratorUser(_curator): CuratorUser,
    Json(form): Json<BookForm>,
) -> AppResult<(StatusCode, Json<CuratorBook>)> {
    let book = state.services.curator.create_book(form, today())?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Edit a book
#[utoipa::path(
    put,
    path = "/curator/books/{id}",
    tag = "curator",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = BookForm,
    responses(
        (status = 200, description = "Book updated", body = CuratorBook),
        (status = 403, description = "Curator access required"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Invalid form fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    CuratorUser(_curator): CuratorUser,
    Path(id): Path<i32>,
    Json(form): Json<BookForm>,
) -> AppResult<Json<CuratorBook>> {
    let book = state.services.curator.update_book(id, form, today())?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/curator/books/{id}",
    tag = "curator",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Curator access required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    CuratorUser(_curator): CuratorUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.curator.delete_book(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// List loans with their display status
#[utoipa::path(
    get,
    path = "/curator/loans",
    tag = "curator",
    responses(
        (status = 200, description = "Loans", body = Vec<LoanRow>),
        (status = 403, description = "Curator access required")
    )
)]
pub async fn list_loans(
    State(state): State<AppState>,
    CuratorUser(_curator): CuratorUser,
) -> Json<Vec<LoanRow>> {
    Json(state.services.curator.list_loans(today()))
}

/// Mark a loan returned
#[utoipa::path(
    post,
    path = "/curator/loans/{id}/return",
    tag = "curator",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan returned", body = LoanRow),
        (status = 404, description = "Loan not found"),
        (status = 422, description = "Loan already returned")
    )
)]
pub async fn return_loan(
    State(state): State<AppState>,
    CuratorUser(_curator): CuratorUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanRow>> {
    let row = state.services.curator.return_loan(id, today())?;
    Ok(Json(row))
}

/// Renew a loan for another loan period
#[utoipa::path(
    post,
    path = "/curator/loans/{id}/renew",
    tag = "curator",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan renewed", body = LoanRow),
        (status = 404, description = "Loan not found"),
        (status = 422, description = "Loan returned or renewal limit reached")
    )
)]
pub async fn renew_loan(
    State(state): State<AppState>,
    CuratorUser(_curator): CuratorUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanRow>> {
    let row = state.services.curator.renew_loan(id, today())?;
    Ok(Json(row))
}
