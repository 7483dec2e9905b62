use anyhow::Result;

use club_cli::{
    cli::{Cli, Command},
    config::init_tracing,
};
use club_db::Connection;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::init();
    init_tracing(&cli.settings.log_level);

    tracing::debug!(db = %cli.db, command = ?cli.command, "starting");
    let session = cli.settings.session(cli.json);
    let db = Connection::open(&cli.db).await?;
    match cli.command {
        Command::Members(cmd) => cmd.run(&db, &session).await,
        Command::Payments(cmd) => cmd.run(&db, &session).await,
        Command::Expenses(cmd) => cmd.run(&db, &session).await,
        Command::Accounts(cmd) => cmd.run(&db, &session).await,
        Command::Prices(cmd) => cmd.run(&db, &session).await,
    }?;

    Ok(())
}
