use sea_orm::DatabaseTransaction;
use uuid::Uuid;

use crate::{Budget, LedgerError, ResultLedger, User, guard::assert_owned, store};

use super::Ledger;

impl Ledger {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultLedger<User> {
        let model = store::users::get_user(db, user_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("user {user_id}")))?;
        User::try_from(model)
    }

    /// Fetch a budget and check it belongs to `user_id`.
    ///
    /// Fails with `NotFound` when the budget is absent and `NotOwned` when it
    /// belongs to someone else.
    pub(super) async fn require_budget_owned(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        budget_id: Uuid,
    ) -> ResultLedger<Budget> {
        let label = Budget::label(budget_id);
        let model = store::budgets::get_budget(db, budget_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(label.clone()))?;
        let budget = Budget::try_from(model)?;
        assert_owned(&label, budget.owner_user_id, user_id)?;
        Ok(budget)
    }
}
