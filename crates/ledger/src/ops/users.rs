use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{LedgerError, ResultLedger, User, store, util::normalize_required_text};

use super::{Ledger, with_tx};

impl Ledger {
    /// Register a new user.
    #[tracing::instrument(skip(self))]
    pub async fn create_user(&self, name: &str) -> ResultLedger<User> {
        let name = normalize_required_text(name, "user name")?;
        let user = with_tx!(self, |db_tx| {
            let user = User::new(name);
            store::users::create_user(&db_tx, &user).await?;
            Ok(user)
        })?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> ResultLedger<User> {
        let model = store::users::get_user(&self.database, user_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("user {user_id}")))?;
        User::try_from(model)
    }

    /// All users, ordered by name.
    pub async fn list_users(&self) -> ResultLedger<Vec<User>> {
        store::users::list_users(&self.database)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    #[tracing::instrument(skip(self))]
    pub async fn rename_user(&self, user_id: Uuid, new_name: &str) -> ResultLedger<User> {
        let name = normalize_required_text(new_name, "user name")?;
        with_tx!(self, |db_tx| {
            if !store::users::rename_user(&db_tx, user_id, &name).await? {
                return Err(LedgerError::NotFound(format!("user {user_id}")));
            }
            Ok(User { id: user_id, name })
        })
    }

    /// Delete a user together with every budget it owns and their
    /// transactions, atomically.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, user_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            store::users::delete_user(&db_tx, user_id).await?;
            Ok(())
        })?;
        tracing::info!(%user_id, "user deleted with its budgets");
        Ok(())
    }
}
