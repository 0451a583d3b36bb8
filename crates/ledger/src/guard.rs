//! Ownership guard.
//!
//! Every operation that targets a specific budget (and transitively its
//! transactions) goes through [`assert_owned`], so there is exactly one rule
//! deciding whether the acting user may touch a resource.

use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

/// Fails with [`LedgerError::NotOwned`] unless `acting_user_id` owns the
/// resource.
///
/// `resource` only labels the error message.
pub fn assert_owned(resource: &str, resource_owner_id: Uuid, acting_user_id: Uuid) -> ResultLedger<()> {
    if resource_owner_id != acting_user_id {
        tracing::debug!(%resource_owner_id, %acting_user_id, "ownership check failed for {resource}");
        return Err(LedgerError::NotOwned(resource.to_string()));
    }
    Ok(())
}
