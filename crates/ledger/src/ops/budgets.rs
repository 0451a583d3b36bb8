use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{Budget, LedgerError, Money, ResultLedger, store, util::normalize_required_text};

use super::{Ledger, with_tx};

impl Ledger {
    /// Create a budget owned by `user_id` with an opening balance.
    ///
    /// The opening balance may be zero but never negative.
    #[tracing::instrument(skip(self))]
    pub async fn create_budget(
        &self,
        user_id: Uuid,
        name: &str,
        initial_balance: Money,
    ) -> ResultLedger<Budget> {
        if initial_balance.is_negative() {
            return Err(LedgerError::InvalidInput(format!(
                "initial balance must be >= 0, got {initial_balance}"
            )));
        }
        let name = normalize_required_text(name, "budget name")?;
        let budget = with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let budget = Budget::new(name, initial_balance, user_id);
            store::budgets::create_budget(&db_tx, &budget).await?;
            Ok(budget)
        })?;
        tracing::info!(budget_id = %budget.id, %user_id, balance = %budget.balance, "budget created");
        Ok(budget)
    }

    /// Return a budget after checking it belongs to `user_id`.
    pub async fn lookup_budget_owned(&self, user_id: Uuid, budget_id: Uuid) -> ResultLedger<Budget> {
        with_tx!(self, |db_tx| {
            self.require_budget_owned(&db_tx, user_id, budget_id).await
        })
    }

    /// All budgets owned by `user_id`, ordered by name.
    ///
    /// An unknown user owns nothing, so this is empty rather than an error.
    pub async fn list_budgets_for_user(&self, user_id: Uuid) -> ResultLedger<Vec<Budget>> {
        store::budgets::list_budgets_for_user(&self.database, user_id)
            .await?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }

    #[tracing::instrument(skip(self))]
    pub async fn rename_budget(
        &self,
        user_id: Uuid,
        budget_id: Uuid,
        new_name: &str,
    ) -> ResultLedger<Budget> {
        let name = normalize_required_text(new_name, "budget name")?;
        with_tx!(self, |db_tx| {
            let mut budget = self.require_budget_owned(&db_tx, user_id, budget_id).await?;
            if !store::budgets::rename_budget(&db_tx, budget_id, &name).await? {
                return Err(LedgerError::NotFound(Budget::label(budget_id)));
            }
            budget.name = name;
            Ok(budget)
        })
    }

    /// Delete one budget and its transactions.
    #[tracing::instrument(skip(self))]
    pub async fn delete_budget(&self, user_id: Uuid, budget_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_budget_owned(&db_tx, user_id, budget_id).await?;
            store::budgets::delete_budget(&db_tx, budget_id).await?;
            Ok(())
        })?;
        tracing::info!(%budget_id, "budget deleted");
        Ok(())
    }

    /// Delete every budget owned by `user_id` and their transactions.
    ///
    /// Returns the number of budgets removed.
    #[tracing::instrument(skip(self))]
    pub async fn delete_all_budgets_for_user(&self, user_id: Uuid) -> ResultLedger<u64> {
        let removed = with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            store::budgets::delete_budgets_for_user(&db_tx, user_id).await
        })?;
        tracing::info!(%user_id, removed, "budgets deleted");
        Ok(removed)
    }
}
