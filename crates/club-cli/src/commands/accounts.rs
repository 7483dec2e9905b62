use anyhow::Result;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use club_accounting::{ledger, reports};
use club_db::Connection;
use club_domain::{AccountId, Query, Transfer, TransferFilter};

use crate::{commands::confirm, config::Session, formatting::print};

#[derive(Subcommand, Debug)]
pub enum Accounts {
    /// Show all balances and the total
    #[clap(name = "list")]
    List,
    /// Open the club accounts if missing
    #[clap(name = "init")]
    Init,
    /// Move money between two accounts
    #[clap(name = "transfer")]
    Transfer(TransferMoney),
    /// List transfers, newest first
    #[clap(name = "transfers")]
    Transfers(ListTransfers),
    /// Compare balances with the recorded history
    #[clap(name = "reconcile")]
    Reconcile,
}

impl Accounts {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        match self {
            Accounts::List => {
                let summary = reports::account_summary(db).await?;
                print(&summary, session.json)
            }
            Accounts::Init => {
                let accounts = ledger::initialize(db, &session.ctx).await?;
                print(&accounts, session.json)
            }
            Accounts::Transfer(cmd) => cmd.run(db, session).await,
            Accounts::Transfers(cmd) => cmd.run(db, session).await,
            Accounts::Reconcile => {
                let report = ledger::reconcile(db).await?;
                let unbalanced = report.iter().filter(|r| !r.is_balanced()).count();
                print(&report, session.json)?;
                if !session.json {
                    match unbalanced {
                        0 => println!("All balances match the history."),
                        n => println!("{} accounts do not match the history.", n),
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct TransferMoney {
    /// e.g. cash_primary, transfer_secondary, fixed_term_deposit
    #[clap(short, long)]
    pub from: AccountId,
    #[clap(short, long)]
    pub to: AccountId,
    #[clap(short, long)]
    pub amount: Decimal,
    #[clap(short, long, default_value = "")]
    pub note: String,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl TransferMoney {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let question = format!("Move {:.2} from {} to {}?", self.amount, self.from, self.to);
        if !confirm(&question, self.yes)? {
            return Ok(());
        }
        let transfer =
            ledger::transfer(db, &session.ctx, self.from, self.to, self.amount, &self.note)
                .await?;
        print(&transfer, session.json)
    }
}

#[derive(Args, Debug)]
pub struct ListTransfers {
    /// Only transfers from or to this account
    #[clap(long)]
    pub account: Option<AccountId>,
}

impl ListTransfers {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let filter = TransferFilter {
            account: self.account,
        };
        let transfers: Vec<Transfer> = db.query(&filter).await?;
        if !session.json {
            println!("{} transfers.", transfers.len());
        }
        print(&transfers, session.json)
    }
}
