use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{Budget, Money, ResultLedger, budgets};

use super::transactions;

pub(crate) async fn get_budget<C: ConnectionTrait>(
    db: &C,
    budget_id: Uuid,
) -> ResultLedger<Option<budgets::Model>> {
    budgets::Entity::find_by_id(budget_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

pub(crate) async fn list_budgets_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> ResultLedger<Vec<budgets::Model>> {
    budgets::Entity::find()
        .filter(budgets::Column::UserId.eq(user_id.to_string()))
        .order_by_asc(budgets::Column::Name)
        .order_by_asc(budgets::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

pub(crate) async fn create_budget<C: ConnectionTrait>(
    db: &C,
    budget: &Budget,
) -> ResultLedger<budgets::Model> {
    budgets::ActiveModel::from(budget)
        .insert(db)
        .await
        .map_err(Into::into)
}

/// Applies `delta` to the stored balance in a single guarded statement:
///
/// ```sql
/// UPDATE budgets SET balance = balance + :delta
/// WHERE id = :id AND balance >= -:delta
/// ```
///
/// The database evaluates the guard against the current row under its write
/// lock, so concurrent writers serialize and no stale balance is ever used.
/// Returns `false` when the row is missing or the guard rejected the write.
pub(crate) async fn adjust_budget_balance<C: ConnectionTrait>(
    db: &C,
    budget_id: Uuid,
    delta: Money,
) -> ResultLedger<bool> {
    let result = budgets::Entity::update_many()
        .col_expr(
            budgets::Column::Balance,
            Expr::col(budgets::Column::Balance).add(delta.cents()),
        )
        .filter(budgets::Column::Id.eq(budget_id.to_string()))
        .filter(Expr::col(budgets::Column::Balance).gte(-delta.cents()))
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Returns `false` when no such budget exists.
pub(crate) async fn rename_budget<C: ConnectionTrait>(
    db: &C,
    budget_id: Uuid,
    name: &str,
) -> ResultLedger<bool> {
    let result = budgets::Entity::update_many()
        .set(budgets::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            ..Default::default()
        })
        .filter(budgets::Column::Id.eq(budget_id.to_string()))
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Deletes a budget after its transactions.
pub(crate) async fn delete_budget<C: ConnectionTrait>(
    db: &C,
    budget_id: Uuid,
) -> ResultLedger<bool> {
    transactions::delete_transactions_for_budget(db, budget_id).await?;
    let result = budgets::Entity::delete_by_id(budget_id.to_string())
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Deletes every budget owned by `user_id` after their transactions.
///
/// Returns the number of budgets removed.
pub(crate) async fn delete_budgets_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> ResultLedger<u64> {
    transactions::delete_transactions_for_user(db, user_id).await?;
    let result = budgets::Entity::delete_many()
        .filter(budgets::Column::UserId.eq(user_id.to_string()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
