//! Credential checks for the login/register form

use std::time::Duration;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    config::AuthConfig,
    models::{
        form::{AuthMode, CredentialsForm, FieldErrors},
        user::User,
    },
    repository::Repository,
};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;

/// Message shown when no account matches
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const EMAIL_TAKEN: &str = "Email already registered";

/// Outcome of a form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Accepted(User),
    /// Field errors, or a `general` entry for a credential mismatch
    Rejected(FieldErrors),
}

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
    config: AuthConfig,
}

impl AccountsService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Check the form fields for `mode`
    pub fn validate(&self, mode: AuthMode, form: &CredentialsForm) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if mode == AuthMode::Register {
            let name = form.name.trim();
            if name.is_empty() {
                errors.add("name", "Name is required");
            } else if name.chars().count() < MIN_NAME_LEN {
                errors.add("name", "Name must be at least 2 characters");
            }
        }

        if form.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !EMAIL_PATTERN.is_match(&form.email) {
            errors.add("email", "Invalid email");
        }

        if form.password.is_empty() {
            errors.add("password", "Password is required");
        } else if form.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password", "Password must be at least 6 characters");
        }

        if mode == AuthMode::Register {
            if form.confirm_password.is_empty() {
                errors.add("confirm_password", "Password confirmation is required");
            } else if form.password != form.confirm_password {
                errors.add("confirm_password", "Passwords do not match");
            }

            if self.repository.accounts.email_exists(&form.email) {
                errors.set("email", EMAIL_TAKEN);
            }
        }

        errors
    }

    /// Validate, wait the configured delay, then match the credentials
    pub async fn login(&self, form: &CredentialsForm) -> FormOutcome {
        let errors = self.validate(AuthMode::Login, form);
        if !errors.is_empty() {
            return FormOutcome::Rejected(errors);
        }

        delay(self.config.login_delay_ms).await;

        match self
            .repository
            .accounts
            .find_by_credentials(&form.email, &form.password)
        {
            Some(account) => FormOutcome::Accepted(account.to_user()),
            None => {
                tracing::info!("Rejected login for {}", form.email);
                let mut errors = FieldErrors::new();
                errors.add("general", INVALID_CREDENTIALS);
                FormOutcome::Rejected(errors)
            }
        }
    }

    /// Validate, wait the configured delay, then create a reader account
    pub async fn register(&self, form: &CredentialsForm, today: NaiveDate) -> FormOutcome {
        let errors = self.validate(AuthMode::Register, form);
        if !errors.is_empty() {
            return FormOutcome::Rejected(errors);
        }

        delay(self.config.register_delay_ms).await;

        let created = self.repository.accounts.create(
            form.name.trim().to_string(),
            form.email.to_lowercase(),
            form.password.clone(),
            today,
            avatar_url(&form.name),
        );

        match created {
            Ok(account) => {
                tracing::info!("Registered account {} for {}", account.id, account.email);
                FormOutcome::Accepted(account.to_user())
            }
            // Another submission took the address during the delay
            Err(e) => {
                tracing::info!("Rejected registration: {}", e);
                let mut errors = FieldErrors::new();
                errors.add("email", EMAIL_TAKEN);
                FormOutcome::Rejected(errors)
            }
        }
    }
}

/// Generated avatar for a new account
pub fn avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=2563eb&color=fff",
        urlencoding::encode(name)
    )
}

async fn delay(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
