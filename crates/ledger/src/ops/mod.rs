use sea_orm::DatabaseConnection;

use crate::{Budget, LedgerError, Money, ResultLedger};

mod access;
mod budgets;
mod transactions;
mod transfers;
mod users;

pub use transfers::TransferOutcome;

/// Run a block inside a DB transaction, committing on success.
///
/// An early return (or `?`) from the block drops the transaction, which rolls
/// it back, so a failed or abandoned operation never leaves partial writes.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: $crate::ResultLedger<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Handle to the budget ledger.
///
/// The ledger keeps no in-memory copy of balances: every operation reads and
/// writes through the database inside its own transaction, so a single
/// `Ledger` can be shared (e.g. behind an `Arc`) by concurrent callers.
#[derive(Clone, Debug)]
pub struct Ledger {
    database: DatabaseConnection,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }
}

fn insufficient_funds(budget: &Budget, amount: Money) -> LedgerError {
    LedgerError::InsufficientFunds(format!(
        "{} has {}, needs {amount}",
        Budget::label(budget.id),
        budget.balance
    ))
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `Ledger`
    pub async fn build(self) -> ResultLedger<Ledger> {
        Ok(Ledger {
            database: self.database,
        })
    }
}
