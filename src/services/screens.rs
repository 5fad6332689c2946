//! View router of the tab
//!
//! Owns the history and the login form state. Every render evaluates the
//! route guard against the current session; redirects rewrite the current
//! history entry instead of pushing a new one.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    accounts::{AccountsService, FormOutcome},
    auth::{AuthController, PersistOutcome},
    catalog::CatalogService,
    curator::CuratorService,
    guard::{self, GuardDecision},
    navigation::{query_param, History, Route, CURATOR_PATH, HOME_PATH, LOGIN_PATH},
};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{CatalogQuery, SortBy, ViewMode},
        form::{AuthMode, CredentialsForm, FieldErrors},
        session::AuthState,
        view::{CuratorTab, LoginView, NavBar, NavLink, Screen, View},
    },
};

pub const BRAND_LABEL: &str = "📚 Biblioteca Digital";

/// Form error when a login could not be written to storage
pub const SESSION_NOT_SAVED: &str = "Could not save session";

/// Result of submitting the login/register form
#[derive(Debug, Clone)]
pub enum Submission {
    /// Logged in; the screen shows the destination
    Accepted(Screen),
    /// The form is shown again with its errors
    Rejected { screen: Screen, errors: FieldErrors },
}

/// Login form as the visitor left it; passwords are not kept
#[derive(Debug, Clone, Default)]
struct LoginForm {
    mode: AuthMode,
    name: String,
    email: String,
    errors: FieldErrors,
}

#[derive(Debug, Default)]
struct Tab {
    history: History,
    form: LoginForm,
}

#[derive(Clone)]
pub struct ScreenService {
    auth: AuthController,
    accounts: AccountsService,
    catalog: CatalogService,
    curator: CuratorService,
    tab: Arc<Mutex<Tab>>,
}

impl ScreenService {
    pub fn new(
        auth: AuthController,
        accounts: AccountsService,
        catalog: CatalogService,
        curator: CuratorService,
    ) -> Self {
        Self {
            auth,
            accounts,
            catalog,
            curator,
            tab: Arc::new(Mutex::new(Tab::default())),
        }
    }

    /// Render the current history entry
    pub fn current(&self) -> Screen {
        let mut tab = self.tab.lock();
        self.render(&mut tab)
    }

    /// Follow a link: push `location` and render it
    pub fn navigate(&self, location: &str) -> Screen {
        let mut tab = self.tab.lock();
        tab.history.push(location);
        tab.form = LoginForm::default();
        self.render(&mut tab)
    }

    pub fn back(&self) -> Screen {
        let mut tab = self.tab.lock();
        if tab.history.back() {
            tab.form = LoginForm::default();
        }
        self.render(&mut tab)
    }

    pub fn forward(&self) -> Screen {
        let mut tab = self.tab.lock();
        if tab.history.forward() {
            tab.form = LoginForm::default();
        }
        self.render(&mut tab)
    }

    /// Locations of the history, oldest first
    pub fn history(&self) -> Vec<String> {
        let tab = self.tab.lock();
        tab.history.locations().into_iter().map(str::to_string).collect()
    }

    /// Toggle the login/register form; clears its fields and errors
    pub fn switch_mode(&self, mode: AuthMode) -> Screen {
        let mut tab = self.tab.lock();
        tab.form = LoginForm {
            mode,
            ..Default::default()
        };
        self.render(&mut tab)
    }

    /// Drop the error of a field the visitor started editing
    pub fn clear_field_error(&self, field: &str) -> Screen {
        let mut tab = self.tab.lock();
        tab.form.errors.remove(field);
        self.render(&mut tab)
    }

    pub async fn submit_login(&self, form: CredentialsForm) -> Submission {
        let outcome = self.accounts.login(&form).await;
        self.finish_submission(AuthMode::Login, &form, outcome)
    }

    pub async fn submit_register(&self, form: CredentialsForm) -> Submission {
        let outcome = self.accounts.register(&form, super::today()).await;
        self.finish_submission(AuthMode::Register, &form, outcome)
    }

    /// End the session and render the current location again.
    ///
    /// Fails when storage rejected the change and the session was kept.
    pub fn logout(&self) -> AppResult<Screen> {
        match self.auth.logout() {
            PersistOutcome::Persisted => {}
            PersistOutcome::NotPersisted => {
                tracing::warn!("Logout was not written to the session store")
            }
            PersistOutcome::RolledBack => {
                return Err(AppError::Storage(
                    "Logout rolled back after a storage failure".to_string(),
                ))
            }
        }
        let mut tab = self.tab.lock();
        Ok(self.render(&mut tab))
    }

    fn finish_submission(
        &self,
        mode: AuthMode,
        form: &CredentialsForm,
        outcome: FormOutcome,
    ) -> Submission {
        match outcome {
            FormOutcome::Accepted(user) => {
                if self.auth.login(user) == PersistOutcome::RolledBack {
                    tracing::warn!("Login rolled back after a storage failure");
                    let mut errors = FieldErrors::new();
                    errors.add("general", SESSION_NOT_SAVED);
                    return self.reject(mode, form, errors);
                }

                let mut tab = self.tab.lock();
                tab.form = LoginForm::default();
                let target = tab
                    .history
                    .take_origin()
                    .unwrap_or_else(|| HOME_PATH.to_string());

                if Route::resolve(&tab.history.current().location) == Route::Login {
                    tab.history.replace(&target, None);
                } else {
                    tab.history.push(&target);
                }

                Submission::Accepted(self.render(&mut tab))
            }
            FormOutcome::Rejected(errors) => self.reject(mode, form, errors),
        }
    }

    /// Show the form again as submitted, passwords excepted
    fn reject(&self, mode: AuthMode, form: &CredentialsForm, errors: FieldErrors) -> Submission {
        let mut tab = self.tab.lock();
        tab.form = LoginForm {
            mode,
            name: form.name.clone(),
            email: form.email.clone(),
            errors: errors.clone(),
        };
        Submission::Rejected {
            screen: self.render(&mut tab),
            errors,
        }
    }

    fn render(&self, tab: &mut Tab) -> Screen {
        let state = self.auth.state();

        let view = loop {
            let location = tab.history.current().location.clone();
            let route = Route::resolve(&location);

            if route == Route::Login && state.is_authenticated() {
                tracing::debug!("Already logged in, leaving {}", location);
                tab.history.replace(HOME_PATH, None);
                continue;
            }

            match guard::evaluate(route.requirement(), &state, &location) {
                GuardDecision::Render => break self.route_view(&route, &location, &state, tab),
                GuardDecision::Waiting => {
                    break View::Loading {
                        message: "Loading...".to_string(),
                    }
                }
                GuardDecision::RedirectToLogin { from } => {
                    tracing::debug!("Redirecting {} to login", from);
                    tab.history.replace(LOGIN_PATH, Some(from));
                    tab.form = LoginForm::default();
                }
                GuardDecision::AccessDenied => {
                    break View::AccessDenied {
                        title: "Access denied".to_string(),
                        message: "You do not have permission to access this page.".to_string(),
                        back_to: HOME_PATH.to_string(),
                    }
                }
            }
        };

        Screen {
            location: tab.history.current().location.clone(),
            navbar: navbar(&state),
            view,
        }
    }

    fn route_view(&self, route: &Route, location: &str, state: &AuthState, tab: &Tab) -> View {
        match route {
            Route::Catalog => View::Catalog(
                self.catalog
                    .catalog_view(&catalog_query(location), state.is_authenticated()),
            ),
            Route::BookDetail(id) => self.catalog.detail_view(id),
            Route::Curator => match state.user() {
                Some(user) => {
                    let tab = query_param(location, "tab")
                        .and_then(|t| t.parse::<CuratorTab>().ok())
                        .unwrap_or_default();
                    View::Curator(self.curator.curator_view(tab, user, super::today()))
                }
                None => View::Loading {
                    message: "Loading...".to_string(),
                },
            },
            Route::Login => View::Login(LoginView {
                mode: tab.form.mode,
                name: tab.form.name.clone(),
                email: tab.form.email.clone(),
                errors: tab.form.errors.clone(),
                redirect_to: tab
                    .history
                    .current()
                    .from
                    .clone()
                    .unwrap_or_else(|| HOME_PATH.to_string()),
            }),
            Route::NotFound => View::NotFound {
                title: "Page not found".to_string(),
                message: "The page you are looking for does not exist.".to_string(),
                back_to: HOME_PATH.to_string(),
            },
        }
    }
}

/// Navigation bar for the session
pub fn navbar(state: &AuthState) -> NavBar {
    let mut links = vec![
        NavLink::new(BRAND_LABEL, HOME_PATH),
        NavLink::new("Catalog", HOME_PATH),
    ];

    match state.user() {
        Some(user) => {
            if user.is_admin() {
                links.push(NavLink::new("Curator", CURATOR_PATH));
            }
            NavBar {
                links,
                greeting: Some(format!("Hello, {}!", user.display_name())),
                show_logout: true,
            }
        }
        None => {
            if !matches!(state, AuthState::Loading) {
                links.push(NavLink::new("Login / Register", LOGIN_PATH));
            }
            NavBar {
                links,
                greeting: None,
                show_logout: false,
            }
        }
    }
}

/// Catalog query carried by a location's query string
fn catalog_query(location: &str) -> CatalogQuery {
    let param = |name: &str| query_param(location, name).map(decode);

    CatalogQuery {
        search: param("search"),
        genre: param("genre"),
        sort: param("sort").and_then(|s| match s.as_str() {
            "title" => Some(SortBy::Title),
            "author" => Some(SortBy::Author),
            "year" => Some(SortBy::Year),
            "rating" => Some(SortBy::Rating),
            _ => None,
        }),
        view: param("view").and_then(|v| match v.as_str() {
            "grid" => Some(ViewMode::Grid),
            "list" => Some(ViewMode::List),
            _ => None,
        }),
    }
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|s| s.into_owned())
        .unwrap_or(raw)
}
