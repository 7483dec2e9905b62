use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use club_accounting::{ledger, Context};
use club_db::{schema, Connection};
use club_domain::Operators;

#[derive(Parser, Debug)]
#[clap(name = "club-setup")]
struct Cli {
    #[clap(long, env = "CLUB_DB", default_value = "club.sqlite3")]
    pub db: String,

    #[clap(long, env = "CLUB_OPERATOR_PRIMARY")]
    pub operator_primary: String,

    #[clap(long, env = "CLUB_OPERATOR_SECONDARY")]
    pub operator_secondary: String,

    #[clap(long, env = "CLUB_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the tables and open the club accounts
    Init,
}

/// Initialize the database
async fn db_init(cli: &Cli) -> Result<()> {
    let conn = Connection::open(&cli.db).await?;
    schema::install(&conn).await?;
    tracing::info!(db = %cli.db, "installed schema");

    let ctx = Context::new(Operators::new(&cli.operator_primary, &cli.operator_secondary));
    let accounts = ledger::initialize(&conn, &ctx).await?;
    for account in accounts {
        println!("{:<24}\t{:<20}\t{:>14.2}", account.id, account.name, account.balance);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Init => db_init(&cli).await?,
    }
    Ok(())
}
