//! Command structs for ledger write operations.
//!
//! These types group parameters for transfers and transactions, keeping call
//! sites readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::Money;

/// Move `amount` from one of the user's budgets to another.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub user_id: Uuid,
    pub from_budget_id: Uuid,
    pub to_budget_id: Uuid,
    pub amount: Money,
}

impl TransferCmd {
    #[must_use]
    pub fn new(user_id: Uuid, from_budget_id: Uuid, to_budget_id: Uuid, amount: Money) -> Self {
        Self {
            user_id,
            from_budget_id,
            to_budget_id,
            amount,
        }
    }
}

/// Record an outflow from a budget to an external recipient.
#[derive(Clone, Debug)]
pub struct TransactionCmd {
    pub user_id: Uuid,
    pub budget_id: Uuid,
    pub amount: Money,
    pub recipient: String,
    /// Defaults to today (UTC) when unset.
    pub date: Option<NaiveDate>,
}

impl TransactionCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        budget_id: Uuid,
        amount: Money,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            budget_id,
            amount,
            recipient: recipient.into(),
            date: None,
        }
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}
