use sea_orm::{
    ConnectionTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, prelude::*,
    sea_query::Query,
};
use uuid::Uuid;

use crate::{ResultLedger, Transaction, budgets, transactions};

pub(crate) async fn create_transaction<C: ConnectionTrait>(
    db: &C,
    tx: &Transaction,
) -> ResultLedger<transactions::Model> {
    transactions::ActiveModel::from(tx)
        .insert(db)
        .await
        .map_err(Into::into)
}

/// All transactions across the budgets owned by `user_id`, newest first.
pub(crate) async fn list_transactions_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> ResultLedger<Vec<transactions::Model>> {
    transactions::Entity::find()
        .join(JoinType::InnerJoin, transactions::Relation::Budgets.def())
        .filter(budgets::Column::UserId.eq(user_id.to_string()))
        .order_by_desc(transactions::Column::Date)
        .order_by_asc(transactions::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

pub(crate) async fn list_transactions_for_budget<C: ConnectionTrait>(
    db: &C,
    budget_id: Uuid,
) -> ResultLedger<Vec<transactions::Model>> {
    transactions::Entity::find()
        .filter(transactions::Column::BudgetId.eq(budget_id.to_string()))
        .order_by_desc(transactions::Column::Date)
        .order_by_asc(transactions::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the number of transactions removed.
pub(crate) async fn delete_transactions_for_budget<C: ConnectionTrait>(
    db: &C,
    budget_id: Uuid,
) -> ResultLedger<u64> {
    let result = transactions::Entity::delete_many()
        .filter(transactions::Column::BudgetId.eq(budget_id.to_string()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Returns the number of transactions removed.
pub(crate) async fn delete_transactions_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> ResultLedger<u64> {
    let owned_budgets = Query::select()
        .column(budgets::Column::Id)
        .from(budgets::Entity)
        .and_where(budgets::Column::UserId.eq(user_id.to_string()))
        .to_owned();
    let result = transactions::Entity::delete_many()
        .filter(transactions::Column::BudgetId.in_subquery(owned_budgets))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
