use clap::Parser;
use migration::{Migrator, MigratorTrait};

mod cli;
mod settings;

const DEFAULT_DATABASE_URL: &str = "sqlite:./budget_ledger.db?mode=rwc";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = cli::Cli::parse();
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budget_ledger={level},ledger={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let url = cli
        .database_url
        .or_else(|| settings.database.as_ref().map(settings::Database::url))
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
    let db = sea_orm::Database::connect(&url).await?;

    let command = match cli.command {
        cli::Command::Migrate(args) => {
            cli::migrate(&db, args.action).await?;
            tracing::info!(action = ?args.action, "migration finished");
            return Ok(());
        }
        cli::Command::Ledger(command) => command,
    };

    Migrator::up(&db, None).await?;
    let ledger = ledger::Ledger::builder().database(db).build().await?;

    match cli::execute(&ledger, command).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(err) => {
            tracing::debug!("command failed: {err:?}");
            eprintln!("error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}
