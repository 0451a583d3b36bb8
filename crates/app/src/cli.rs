use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ledger::{Ledger, LedgerError, Money, TransactionCmd, TransferCmd};
use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "budget-ledger")]
#[command(about = "Manage users, budgets and transactions of the budget ledger")]
pub struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    ///
    /// Takes precedence over the `database` entry of `settings.toml`.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(flatten)]
    Ledger(LedgerCommand),
    /// Apply or inspect schema migrations.
    Migrate(MigrateArgs),
}

/// Commands served by an opened, migrated ledger.
#[derive(Subcommand, Debug)]
pub enum LedgerCommand {
    User(User),
    Budget(Budget),
    /// Move money between two budgets of the same user.
    Transfer(TransferArgs),
    Tx(Tx),
}

#[derive(Args, Debug)]
pub struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create {
        #[arg(long)]
        name: String,
    },
    Rename {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        name: String,
    },
    /// Delete a user together with its budgets and transactions.
    Delete {
        #[arg(long)]
        user: Uuid,
    },
    List,
    Show {
        #[arg(long)]
        user: Uuid,
    },
}

#[derive(Args, Debug)]
pub struct Budget {
    #[command(subcommand)]
    command: BudgetCommand,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    Create {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        name: String,
        /// Opening balance, e.g. `120.50`.
        #[arg(long, default_value = "0")]
        balance: Money,
    },
    Rename {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        budget: Uuid,
        #[arg(long)]
        name: String,
    },
    Delete {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        budget: Uuid,
    },
    /// Delete every budget of a user.
    DeleteAll {
        #[arg(long)]
        user: Uuid,
    },
    List {
        #[arg(long)]
        user: Uuid,
    },
    Show {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        budget: Uuid,
    },
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    #[arg(long)]
    user: Uuid,
    #[arg(long)]
    from: Uuid,
    #[arg(long)]
    to: Uuid,
    #[arg(long)]
    amount: Money,
}

#[derive(Args, Debug)]
pub struct Tx {
    #[command(subcommand)]
    command: TxCommand,
}

#[derive(Subcommand, Debug)]
enum TxCommand {
    /// Record an outflow from a budget.
    Add {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        budget: Uuid,
        #[arg(long)]
        amount: Money,
        #[arg(long)]
        recipient: String,
        /// Defaults to today (UTC).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List transactions of a user, or of one of its budgets.
    List {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        budget: Option<Uuid>,
    },
    /// Delete the transaction history of a budget. Balances are untouched.
    Clear {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        budget: Uuid,
    },
}

#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[arg(value_enum, default_value_t = MigrateAction::Up)]
    pub action: MigrateAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MigrateAction {
    Up,
    Down,
    Fresh,
    Status,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code, `sysexits`-style for store failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Ledger(LedgerError::InvalidInput(_)) => 2,
            CliError::Ledger(LedgerError::NotFound(_)) => 3,
            CliError::Ledger(LedgerError::NotOwned(_)) => 4,
            CliError::Ledger(LedgerError::InsufficientFunds(_)) => 5,
            CliError::Ledger(LedgerError::StoreUnavailable(_)) => 75,
            CliError::Output(_) => 1,
        }
    }
}

pub async fn migrate(db: &DatabaseConnection, action: MigrateAction) -> Result<(), DbErr> {
    match action {
        MigrateAction::Up => Migrator::up(db, None).await,
        MigrateAction::Down => Migrator::down(db, None).await,
        MigrateAction::Fresh => Migrator::fresh(db).await,
        MigrateAction::Status => Migrator::status(db).await,
    }
}

/// Run a ledger command and render its result as pretty JSON.
pub async fn execute(ledger: &Ledger, command: LedgerCommand) -> Result<String, CliError> {
    match command {
        LedgerCommand::User(User { command }) => match command {
            UserCommand::Create { name } => render(&ledger.create_user(&name).await?),
            UserCommand::Rename { user, name } => render(&ledger.rename_user(user, &name).await?),
            UserCommand::Delete { user } => {
                ledger.delete_user(user).await?;
                render(&json!({ "deleted": user }))
            }
            UserCommand::List => render(&ledger.list_users().await?),
            UserCommand::Show { user } => render(&ledger.get_user(user).await?),
        },
        LedgerCommand::Budget(Budget { command }) => match command {
            BudgetCommand::Create {
                user,
                name,
                balance,
            } => render(&ledger.create_budget(user, &name, balance).await?),
            BudgetCommand::Rename { user, budget, name } => {
                render(&ledger.rename_budget(user, budget, &name).await?)
            }
            BudgetCommand::Delete { user, budget } => {
                ledger.delete_budget(user, budget).await?;
                render(&json!({ "deleted": budget }))
            }
            BudgetCommand::DeleteAll { user } => {
                let deleted = ledger.delete_all_budgets_for_user(user).await?;
                render(&json!({ "deleted": deleted }))
            }
            BudgetCommand::List { user } => render(&ledger.list_budgets_for_user(user).await?),
            BudgetCommand::Show { user, budget } => {
                render(&ledger.lookup_budget_owned(user, budget).await?)
            }
        },
        LedgerCommand::Transfer(TransferArgs {
            user,
            from,
            to,
            amount,
        }) => render(
            &ledger
                .transfer(TransferCmd::new(user, from, to, amount))
                .await?,
        ),
        LedgerCommand::Tx(Tx { command }) => match command {
            TxCommand::Add {
                user,
                budget,
                amount,
                recipient,
                date,
            } => {
                let mut cmd = TransactionCmd::new(user, budget, amount, recipient);
                if let Some(date) = date {
                    cmd = cmd.date(date);
                }
                render(&ledger.add_transaction(cmd).await?)
            }
            TxCommand::List { user, budget: None } => {
                render(&ledger.list_transactions_for_user(user).await?)
            }
            TxCommand::List {
                user,
                budget: Some(budget),
            } => render(&ledger.list_transactions_for_budget(user, budget).await?),
            TxCommand::Clear { user, budget } => {
                let deleted = ledger.delete_transactions_for_budget(user, budget).await?;
                render(&json!({ "deleted": deleted }))
            }
        },
    }
}

fn render<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
