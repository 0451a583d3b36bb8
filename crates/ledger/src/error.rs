//! The module contains the errors the ledger can return.
//!
//! The errors are:
//!
//! - [`NotFound`] when a referenced user, budget or transaction is absent.
//! - [`NotOwned`] when a resource exists but belongs to another user.
//! - [`InvalidInput`] for malformed amounts, empty names and self transfers.
//! - [`InsufficientFunds`] when an operation would drive a balance negative.
//! - [`StoreUnavailable`] when the underlying database failed.
//!
//! Only [`StoreUnavailable`] may be retried with the same input.
//!
//!  [`NotFound`]: LedgerError::NotFound
//!  [`NotOwned`]: LedgerError::NotOwned
//!  [`InvalidInput`]: LedgerError::InvalidInput
//!  [`InsufficientFunds`]: LedgerError::InsufficientFunds
//!  [`StoreUnavailable`]: LedgerError::StoreUnavailable
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} does not belong to the acting user")]
    NotOwned(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] DbErr),
}

impl LedgerError {
    /// Returns `true` when the same call may succeed if attempted again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::NotOwned(a), Self::NotOwned(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::StoreUnavailable(a), Self::StoreUnavailable(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
