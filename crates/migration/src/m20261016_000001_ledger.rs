//! Initial schema migration for the budget ledger.
//!
//! - `users`: budget owners
//! - `budgets`: named balance buckets, balance stored in cents
//! - `transactions`: outflows recorded against a budget
//!
//! Deleting a user cascades to its budgets, deleting a budget cascades to its
//! transactions. Balances are guarded by a `CHECK (balance >= 0)` as well.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    Name,
    Balance,
    UserId,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Date,
    Amount,
    Recipient,
    BudgetId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Budgets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Budgets::Name).string().not_null())
                    .col(
                        ColumnDef::new(Budgets::Balance)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Budgets::Balance).gte(0)),
                    )
                    .col(ColumnDef::new(Budgets::UserId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-user_id")
                            .from(Budgets::Table, Budgets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-user_id")
                    .table(Budgets::Table)
                    .col(Budgets::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Recipient).string().not_null())
                    .col(ColumnDef::new(Transactions::BudgetId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-budget_id")
                            .from(Transactions::Table, Transactions::BudgetId)
                            .to(Budgets::Table, Budgets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-budget_id")
                    .table(Transactions::Table)
                    .col(Transactions::BudgetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
