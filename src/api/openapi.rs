//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, curator, health, screens};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca Digital API",
        version = "1.0.0",
        description = "Single-tab library catalog with session-gated views",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Tab
        screens::get_session,
        screens::get_screen,
        screens::navigate,
        screens::back,
        screens::forward,
        screens::get_history,
        // Auth
        auth::login,
        auth::register,
        auth::logout,
        auth::switch_mode,
        auth::clear_field_error,
        // Books
        books::list_books,
        books::get_book,
        // Curator
        curator::get_dashboard,
        curator::list_books,
        curator::create_book,
        curator::update_book,
        curator::delete_book,
        curator::list_loans,
        curator::return_loan,
        curator::renew_loan,
    ),
    components(
        schemas(
            // Tab
            screens::NavigateRequest,
            crate::models::session::Session,
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::view::Screen,
            crate::models::view::NavBar,
            crate::models::view::NavLink,
            crate::models::view::View,
            crate::models::view::CatalogView,
            crate::models::view::CatalogStats,
            crate::models::view::BookCard,
            crate::models::view::BookDetailView,
            crate::models::view::CuratorView,
            crate::models::view::CuratorTab,
            crate::models::view::LoginView,
            // Auth
            auth::LoginRequest,
            auth::ModeRequest,
            crate::models::form::AuthMode,
            crate::models::form::CredentialsForm,
            // Books
            crate::models::book::Book,
            crate::models::book::SortBy,
            crate::models::book::ViewMode,
            crate::models::book::CatalogQuery,
            // Curator
            crate::models::book::CuratorBook,
            crate::models::book::CuratorBooksQuery,
            crate::models::book::BookForm,
            crate::models::loan::Loan,
            crate::models::loan::LoanStatus,
            crate::models::loan::DisplayStatus,
            crate::models::loan::LoanRow,
            crate::models::view::Dashboard,
            crate::models::view::DashboardStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "tab", description = "Navigation of the tab"),
        (name = "auth", description = "Login, registration and logout"),
        (name = "books", description = "Public catalog"),
        (name = "curator", description = "Curator console")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
