//! Budget ledger: users own budgets, budgets hold transactions, and money
//! moves between a user's own budgets without ever driving a balance below
//! zero.
//!
//! All operations live on [`Ledger`]; see [`LedgerError`] for the failures
//! they report.

pub use budgets::Budget;
pub use commands::{TransactionCmd, TransferCmd};
pub use error::LedgerError;
pub use guard::assert_owned;
pub use money::Money;
pub use ops::{Ledger, LedgerBuilder, TransferOutcome};
pub use transactions::Transaction;
pub use users::User;

mod budgets;
mod commands;
mod error;
mod guard;
mod money;
mod ops;
mod store;
mod transactions;
mod users;
mod util;

type ResultLedger<T> = Result<T, LedgerError>;
