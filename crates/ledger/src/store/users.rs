use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{ResultLedger, User, users};

use super::{budgets, transactions};

pub(crate) async fn get_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> ResultLedger<Option<users::Model>> {
    users::Entity::find_by_id(user_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

pub(crate) async fn list_users<C: ConnectionTrait>(db: &C) -> ResultLedger<Vec<users::Model>> {
    users::Entity::find()
        .order_by_asc(users::Column::Name)
        .order_by_asc(users::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

pub(crate) async fn create_user<C: ConnectionTrait>(
    db: &C,
    user: &User,
) -> ResultLedger<users::Model> {
    users::ActiveModel::from(user)
        .insert(db)
        .await
        .map_err(Into::into)
}

/// Returns `false` when no such user exists.
pub(crate) async fn rename_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    name: &str,
) -> ResultLedger<bool> {
    let result = users::Entity::update_many()
        .set(users::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            ..Default::default()
        })
        .filter(users::Column::Id.eq(user_id.to_string()))
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Deletes the user after its transactions and budgets.
///
/// Must run inside a transaction for the cascade to be atomic.
pub(crate) async fn delete_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> ResultLedger<bool> {
    transactions::delete_transactions_for_user(db, user_id).await?;
    budgets::delete_budgets_for_user(db, user_id).await?;
    let result = users::Entity::delete_by_id(user_id.to_string())
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}
