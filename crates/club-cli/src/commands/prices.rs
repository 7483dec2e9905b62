use anyhow::Result;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use club_accounting::prices;
use club_db::Connection;
use club_domain::PriceConfig;

use crate::{
    commands::confirm,
    config::Session,
    formatting::{print, PrintFormatted},
};

#[derive(Subcommand, Debug)]
pub enum Prices {
    /// Show the price list
    #[clap(name = "show")]
    Show,
    /// Change prices
    #[clap(name = "set")]
    Update(UpdatePrices),
}

impl Prices {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        match self {
            Prices::Show => {
                let prices = prices::load(db, &session.ctx.price_defaults).await?;
                print(&prices, session.json)
            }
            Prices::Update(cmd) => cmd.run(db, session).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct UpdatePrices {
    #[clap(long)]
    pub quarterly: Option<Decimal>,
    #[clap(long)]
    pub monthly: Option<Decimal>,
    #[clap(long)]
    pub overdue_monthly: Option<Decimal>,
    #[clap(long)]
    pub semestral: Option<Decimal>,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl UpdatePrices {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let current = prices::load(db, &session.ctx.price_defaults).await?;
        let update = PriceConfig {
            quarterly: self.quarterly.unwrap_or(current.quarterly),
            monthly: self.monthly.unwrap_or(current.monthly),
            overdue_monthly: self.overdue_monthly.unwrap_or(current.overdue_monthly),
            semestral: self.semestral.unwrap_or(current.semestral),
        };
        prices::validate(&update)?;

        if !session.json {
            println!();
            update.print_formatted();
            println!();
        }
        if !confirm("Store prices?", self.yes)? {
            return Ok(());
        }
        let stored = prices::store(db, update).await?;
        print(&stored, session.json)
    }
}
