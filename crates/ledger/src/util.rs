//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the ledger enforces consistent invariants.

use sea_orm::DbErr;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{LedgerError, Money, ResultLedger};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultLedger<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| LedgerError::StoreUnavailable(DbErr::Type(format!("invalid {label} id"))))
}

/// Trim, collapse inner whitespace and NFC-normalize a required text field.
pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultLedger<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(LedgerError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(collapsed.nfc().collect())
}

/// Amounts moved by an operation must be strictly positive.
pub(crate) fn require_positive_amount(amount: Money) -> ResultLedger<()> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidInput(format!(
            "amount must be > 0, got {amount}"
        )));
    }
    Ok(())
}
