//! Business logic services

pub mod accounts;
pub mod auth;
pub mod catalog;
pub mod curator;
pub mod guard;
pub mod navigation;
pub mod screens;

use chrono::NaiveDate;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthController,
    pub accounts: accounts::AccountsService,
    pub catalog: catalog::CatalogService,
    pub curator: curator::CuratorService,
    pub screens: screens::ScreenService,
}

impl Services {
    /// Create all services with the given repository.
    ///
    /// The session starts out loading; call [`auth::AuthController::initialize`]
    /// before serving.
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let auth = auth::AuthController::new(
            repository.session.clone(),
            config.session.on_persist_failure,
        );
        let accounts = accounts::AccountsService::new(repository.clone(), config.auth.clone());
        let catalog = catalog::CatalogService::new(repository.clone());
        let curator = curator::CuratorService::new(repository, config.loans.period_days);
        let screens = screens::ScreenService::new(
            auth.clone(),
            accounts.clone(),
            catalog.clone(),
            curator.clone(),
        );

        Self {
            auth,
            accounts,
            catalog,
            curator,
            screens,
        }
    }
}

/// Local calendar date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
