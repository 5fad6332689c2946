//! Loans of the curator console

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use parking_lot::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanStatus},
};

#[derive(Clone)]
pub struct LoansRepository {
    loans: Arc<RwLock<Vec<Loan>>>,
}

impl LoansRepository {
    pub fn new(loans: Vec<Loan>) -> Self {
        Self {
            loans: Arc::new(RwLock::new(loans)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_loans())
    }

    pub fn list(&self) -> Vec<Loan> {
        self.loans.read().clone()
    }

    /// Mark an active loan returned
    pub fn return_loan(&self, id: i32, today: NaiveDate) -> AppResult<Loan> {
        let mut loans = self.loans.write();
        let loan = loans
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        if !loan.is_active() {
            return Err(AppError::BusinessRule("Loan already returned".to_string()));
        }

        loan.status = LoanStatus::Returned;
        loan.return_date = Some(today);
        Ok(loan.clone())
    }

    /// Push the due date of an active loan by `period_days`
    pub fn renew_loan(&self, id: i32, period_days: u32) -> AppResult<Loan> {
        let mut loans = self.loans.write();
        let loan = loans
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        if !loan.is_active() {
            return Err(AppError::BusinessRule(
                "Cannot renew a returned loan".to_string(),
            ));
        }

        if loan.renewals >= loan.max_renewals {
            return Err(AppError::BusinessRule(format!(
                "Maximum renewals reached ({}/{})",
                loan.renewals, loan.max_renewals
            )));
        }

        loan.due_date = loan
            .due_date
            .checked_add_days(Days::new(u64::from(period_days)))
            .ok_or_else(|| AppError::BusinessRule("Due date out of range".to_string()))?;
        loan.renewals += 1;
        Ok(loan.clone())
    }
}

fn seed_loans() -> Vec<Loan> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    vec![
        Loan {
            id: 1,
            book_id: 3,
            book_title: "1984".to_string(),
            user_name: "João Silva".to_string(),
            user_email: "joao@email.com".to_string(),
            loan_date: date(2024, 11, 8),
            due_date: date(2024, 12, 8),
            return_date: None,
            status: LoanStatus::Active,
            renewals: 0,
            max_renewals: 2,
        },
        Loan {
            id: 2,
            book_id: 1,
            book_title: "Dom Casmurro".to_string(),
            user_name: "Maria Santos".to_string(),
            user_email: "maria@email.com".to_string(),
            loan_date: date(2024, 10, 20),
            due_date: date(2024, 11, 20),
            return_date: Some(date(2024, 11, 18)),
            status: LoanStatus::Returned,
            renewals: 1,
            max_renewals: 2,
        },
    ]
}
