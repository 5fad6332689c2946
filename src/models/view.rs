//! View models rendered for the tab

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    book::{Book, CuratorBook, SortBy, ViewMode},
    form::{AuthMode, FieldErrors},
    loan::LoanRow,
};

/// Everything the tab shows after a navigation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Screen {
    /// Current location after any redirect
    pub location: String,
    pub navbar: NavBar,
    pub view: View,
}

/// Navigation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NavLink {
    pub label: String,
    pub path: String,
}

impl NavLink {
    pub fn new(label: &str, path: &str) -> Self {
        Self {
            label: label.to_string(),
            path: path.to_string(),
        }
    }
}

/// Top navigation bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NavBar {
    pub links: Vec<NavLink>,
    pub greeting: Option<String>,
    pub show_logout: bool,
}

impl NavBar {
    pub fn has_link(&self, path: &str) -> bool {
        self.links.iter().any(|l| l.path == path)
    }
}

/// Rendered view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Placeholder while the session hydrates
    Loading { message: String },
    Catalog(CatalogView),
    BookDetail(BookDetailView),
    BookNotFound { id: String },
    Curator(CuratorView),
    Login(LoginView),
    AccessDenied {
        title: String,
        message: String,
        back_to: String,
    },
    NotFound {
        title: String,
        message: String,
        back_to: String,
    },
}

impl View {
    /// Snake-case name of the variant, as serialized in the `view` tag
    pub fn name(&self) -> &'static str {
        match self {
            View::Loading { .. } => "loading",
            View::Catalog(_) => "catalog",
            View::BookDetail(_) => "book_detail",
            View::BookNotFound { .. } => "book_not_found",
            View::Curator(_) => "curator",
            View::Login(_) => "login",
            View::AccessDenied { .. } => "access_denied",
            View::NotFound { .. } => "not_found",
        }
    }
}

/// Headline numbers of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogStats {
    pub total_titles: usize,
    pub available_titles: usize,
    pub total_copies: u32,
}

/// Book card of the catalog listing
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookCard {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    pub cover: String,
    pub rating: f32,
    /// One star per whole rating point
    pub stars: String,
    pub excerpt: String,
    pub available: bool,
    pub available_copies: u32,
    pub total_copies: u32,
    pub next_return: Option<NaiveDate>,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogView {
    pub search: String,
    pub genre: String,
    pub sort: SortBy,
    pub view_mode: ViewMode,
    pub genres: Vec<String>,
    pub stats: CatalogStats,
    pub result_label: String,
    pub books: Vec<BookCard>,
    /// Shown to anonymous visitors
    pub login_prompt: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetailView {
    pub book: Book,
    pub can_borrow: bool,
}

/// Curator console tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CuratorTab {
    #[default]
    Dashboard,
    Books,
    Loans,
}

impl std::str::FromStr for CuratorTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(CuratorTab::Dashboard),
            "books" => Ok(CuratorTab::Books),
            "loans" => Ok(CuratorTab::Loans),
            _ => Err(format!("Invalid tab: {}", s)),
        }
    }
}

/// Dashboard numbers of the curator console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_books: usize,
    pub total_copies: u32,
    pub available_books: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_activity: Vec<LoanRow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CuratorView {
    pub curator_name: String,
    pub tab: CuratorTab,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<Dashboard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<CuratorBook>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loans: Option<Vec<LoanRow>>,
    pub genres: Vec<String>,
}

/// Login/register form as displayed; passwords are never echoed
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginView {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
    /// Where a successful login will land
    pub redirect_to: String,
}
