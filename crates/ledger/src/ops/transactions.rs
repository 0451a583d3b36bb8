use chrono::Utc;
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    ResultLedger, Transaction, TransactionCmd, store,
    util::{normalize_required_text, require_positive_amount},
};

use super::{Ledger, insufficient_funds, with_tx};

impl Ledger {
    /// Record an outflow from a budget.
    ///
    /// The balance decrement and the transaction row are written in the same
    /// DB transaction.
    #[tracing::instrument(skip(self))]
    pub async fn add_transaction(&self, cmd: TransactionCmd) -> ResultLedger<Transaction> {
        let TransactionCmd {
            user_id,
            budget_id,
            amount,
            recipient,
            date,
        } = cmd;
        require_positive_amount(amount)?;
        let recipient = normalize_required_text(&recipient, "recipient")?;
        let date = date.unwrap_or_else(|| Utc::now().date_naive());

        let tx = with_tx!(self, |db_tx| {
            let budget = self
                .require_budget_owned(&db_tx, user_id, budget_id)
                .await?;
            if budget.balance < amount
                || !store::budgets::adjust_budget_balance(&db_tx, budget.id, -amount).await?
            {
                return Err(insufficient_funds(&budget, amount));
            }
            let tx = Transaction::new(date, amount, recipient, budget.id);
            store::transactions::create_transaction(&db_tx, &tx).await?;
            Ok(tx)
        })?;

        tracing::info!(transaction_id = %tx.id, %budget_id, amount = %tx.amount, "transaction recorded");
        Ok(tx)
    }

    /// All transactions across the user's budgets, newest first.
    pub async fn list_transactions_for_user(&self, user_id: Uuid) -> ResultLedger<Vec<Transaction>> {
        store::transactions::list_transactions_for_user(&self.database, user_id)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    pub async fn list_transactions_for_budget(
        &self,
        user_id: Uuid,
        budget_id: Uuid,
    ) -> ResultLedger<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            self.require_budget_owned(&db_tx, user_id, budget_id)
                .await?;
            store::transactions::list_transactions_for_budget(&db_tx, budget_id)
                .await?
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultLedger<Vec<_>>>()
        })
    }

    /// Remove a budget's transaction history.
    ///
    /// The balance is left as is: transactions record money that already left
    /// the budget. Returns the number of transactions removed.
    #[tracing::instrument(skip(self))]
    pub async fn delete_transactions_for_budget(
        &self,
        user_id: Uuid,
        budget_id: Uuid,
    ) -> ResultLedger<u64> {
        let removed = with_tx!(self, |db_tx| {
            self.require_budget_owned(&db_tx, user_id, budget_id)
                .await?;
            store::transactions::delete_transactions_for_budget(&db_tx, budget_id).await
        })?;
        tracing::info!(%budget_id, removed, "transactions deleted");
        Ok(removed)
    }
}
