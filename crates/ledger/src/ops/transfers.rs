use sea_orm::{DatabaseTransaction, TransactionTrait};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Budget, LedgerError, Money, ResultLedger, TransferCmd, store, util::require_positive_amount,
};

use super::{Ledger, insufficient_funds, with_tx};

/// Balances of both budgets right after a committed transfer, as stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    pub from_balance: Money,
    pub to_balance: Money,
}

impl Ledger {
    /// Move money between two budgets owned by the same user.
    ///
    /// Both balance writes happen in one DB transaction: either the transfer
    /// commits as a whole or neither balance changes. The returned balances
    /// are re-read from the store after both writes.
    #[tracing::instrument(skip(self))]
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultLedger<TransferOutcome> {
        let TransferCmd {
            user_id,
            from_budget_id,
            to_budget_id,
            amount,
        } = cmd;
        require_positive_amount(amount)?;
        if from_budget_id == to_budget_id {
            return Err(LedgerError::InvalidInput(
                "from_budget_id and to_budget_id must differ".to_string(),
            ));
        }

        let outcome = with_tx!(self, |db_tx| {
            let from = self
                .require_budget_owned(&db_tx, user_id, from_budget_id)
                .await?;
            let to = self
                .require_budget_owned(&db_tx, user_id, to_budget_id)
                .await?;
            if from.balance < amount {
                return Err(insufficient_funds(&from, amount));
            }
            if to.balance.checked_add(amount).is_none() {
                return Err(LedgerError::InvalidInput(format!(
                    "{} cannot hold {amount} more",
                    Budget::label(to.id)
                )));
            }

            // Write in id order so two opposite transfers lock rows the same way.
            let mut changes = [(from.id, -amount), (to.id, amount)];
            changes.sort_by_key(|(id, _)| *id);
            for (budget_id, delta) in changes {
                if !store::budgets::adjust_budget_balance(&db_tx, budget_id, delta).await? {
                    // A concurrent writer got there first; re-read to report the
                    // current state.
                    let current = self
                        .require_budget_owned(&db_tx, user_id, budget_id)
                        .await?;
                    return Err(insufficient_funds(&current, amount));
                }
            }

            Ok(TransferOutcome {
                from_balance: self.stored_balance(&db_tx, from.id).await?,
                to_balance: self.stored_balance(&db_tx, to.id).await?,
            })
        })?;

        tracing::info!(
            %user_id,
            %from_budget_id,
            %to_budget_id,
            %amount,
            from_balance = %outcome.from_balance,
            to_balance = %outcome.to_balance,
            "transfer committed"
        );
        Ok(outcome)
    }

    async fn stored_balance(&self, db: &DatabaseTransaction, budget_id: Uuid) -> ResultLedger<Money> {
        let model = store::budgets::get_budget(db, budget_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(Budget::label(budget_id)))?;
        Ok(Money::new(model.balance))
    }
}
