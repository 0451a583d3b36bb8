//! The module contains `Budget` struct and its table.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{LedgerError, Money, util::parse_uuid};

/// A budget.
///
/// A budget is a named balance bucket owned by exactly one user. Its balance
/// is never negative and only changes through the ledger's balance-changing
/// operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    pub balance: Money,
    pub owner_user_id: Uuid,
}

impl Budget {
    pub fn new(name: String, balance: Money, owner_user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            balance,
            owner_user_id,
        }
    }

    /// Label used in error messages.
    pub(crate) fn label(id: Uuid) -> String {
        format!("budget {id}")
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub balance: i64,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(value: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            balance: ActiveValue::Set(value.balance.cents()),
            user_id: ActiveValue::Set(value.owner_user_id.to_string()),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "budget")?,
            name: model.name,
            balance: Money::new(model.balance),
            owner_user_id: parse_uuid(&model.user_id, "user")?,
        })
    }
}
