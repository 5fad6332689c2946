//! Loan model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stored loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

/// Status shown in the loans table, with overdue derived from the due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Active,
    Overdue,
    Returned,
}

/// Loan record of the curator console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub user_name: String,
    pub user_email: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub renewals: u32,
    pub max_renewals: u32,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    /// Active and past its due date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && self.due_date < today
    }

    pub fn can_renew(&self) -> bool {
        self.is_active() && self.renewals < self.max_renewals
    }

    pub fn display_status(&self, today: NaiveDate) -> DisplayStatus {
        match self.status {
            LoanStatus::Returned => DisplayStatus::Returned,
            LoanStatus::Active if self.is_overdue(today) => DisplayStatus::Overdue,
            LoanStatus::Active => DisplayStatus::Active,
        }
    }
}

/// Loan row as rendered, with the actions the console offers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanRow {
    #[serde(flatten)]
    pub loan: Loan,
    pub display_status: DisplayStatus,
    pub can_return: bool,
    pub can_renew: bool,
}

impl LoanRow {
    pub fn new(loan: Loan, today: NaiveDate) -> Self {
        Self {
            display_status: loan.display_status(today),
            can_return: loan.is_active(),
            can_renew: loan.can_renew(),
            loan,
        }
    }
}
