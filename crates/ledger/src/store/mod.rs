//! Ledger store: the persistence queries the ledger is built on.
//!
//! Every function is generic over [`ConnectionTrait`], so it runs either on
//! the pooled connection or inside a `DatabaseTransaction`. Multi-step
//! mutations (cascading deletes, transfers) are composed by the ledger inside
//! a single transaction; nothing here commits on its own.
//!
//! Balances are never overwritten with a value computed from an earlier read.
//! [`budgets::adjust_budget_balance`] lets the database apply the delta and
//! refuses any write that would leave the balance below zero.
//!
//! [`ConnectionTrait`]: sea_orm::ConnectionTrait

pub(crate) mod budgets;
pub(crate) mod transactions;
pub(crate) mod users;
