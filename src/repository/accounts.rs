//! Accounts known to the login form

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::user::{Account, Role},
};

#[derive(Clone)]
pub struct AccountsRepository {
    accounts: Arc<RwLock<Vec<Account>>>,
}

impl AccountsRepository {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Arc::new(RwLock::new(accounts)),
        }
    }

    /// Repository holding the demo accounts
    pub fn seeded() -> Self {
        Self::new(seed_accounts())
    }

    /// Exact email and password match
    pub fn find_by_credentials(&self, email: &str, password: &str) -> Option<Account> {
        self.accounts
            .read()
            .iter()
            .find(|a| a.email == email && a.password == password)
            .cloned()
    }

    pub fn email_exists(&self, email: &str) -> bool {
        self.accounts.read().iter().any(|a| a.email == email)
    }

    /// Append an account, assigning the next id. Fails if the email is taken.
    pub fn create(
        &self,
        name: String,
        email: String,
        password: String,
        created_at: NaiveDate,
        avatar: String,
    ) -> AppResult<Account> {
        let mut accounts = self.accounts.write();
        if accounts.iter().any(|a| a.email == email) {
            return Err(AppError::Conflict(format!("Email {} already registered", email)));
        }

        let id = accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let account = Account {
            id,
            name,
            email,
            password,
            role: Role::User,
            created_at,
            avatar,
        };
        accounts.push(account.clone());
        Ok(account)
    }
}

fn seed_accounts() -> Vec<Account> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    vec![
        Account {
            id: 1,
            name: "Administrador".to_string(),
            email: "admin@biblioteca.com".to_string(),
            password: "admin123".to_string(),
            role: Role::Admin,
            created_at: date(2024, 1, 1),
            avatar: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face".to_string(),
        },
        Account {
            id: 2,
            name: "João Silva".to_string(),
            email: "joao@email.com".to_string(),
            password: "123456".to_string(),
            role: Role::User,
            created_at: date(2024, 2, 15),
            avatar: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face".to_string(),
        },
        Account {
            id: 3,
            name: "Maria Santos".to_string(),
            email: "maria@email.com".to_string(),
            password: "maria123".to_string(),
            role: Role::User,
            created_at: date(2024, 3, 10),
            avatar: "https://images.unsplash.com/photo-1494790108755-2616b332c123?w=150&h=150&fit=crop&crop=face".to_string(),
        },
    ]
}
