//! Transaction primitives.
//!
//! A `Transaction` records money that left a budget towards an external
//! recipient. Transactions are immutable: they are created together with the
//! balance decrement and only ever removed by a budget-scoped bulk delete or
//! a cascade.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{LedgerError, Money, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: Money,
    pub recipient: String,
    pub budget_id: Uuid,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: Money, recipient: String, budget_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            recipient,
            budget_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub date: Date,
    pub amount: i64,
    pub recipient: String,
    pub budget_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Budgets,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(value: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            date: ActiveValue::Set(value.date),
            amount: ActiveValue::Set(value.amount.cents()),
            recipient: ActiveValue::Set(value.recipient.clone()),
            budget_id: ActiveValue::Set(value.budget_id.to_string()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            date: model.date,
            amount: Money::new(model.amount),
            recipient: model.recipient,
            budget_id: parse_uuid(&model.budget_id, "budget")?,
        })
    }
}
