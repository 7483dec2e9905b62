use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::{Args, Subcommand};

use club_accounting::{
    payments::{record_payment, PaymentRequest},
    reports::monthly_totals,
    LedgerError,
};
use club_db::Connection;
use club_domain::{
    DuesType, InsuranceType, Member, Payment, PaymentFilter, PaymentMethod, Query, Retrieve,
};

use crate::{
    commands::confirm,
    config::Session,
    formatting::{print, MonthlyTotals},
};

#[derive(Subcommand, Debug)]
pub enum Payments {
    /// List payments, newest first
    #[clap(name = "list")]
    List(ListPayments),
    /// Register a payment of dues and/or insurance
    #[clap(name = "add")]
    Add(AddPayment),
    /// Sum of payments per month
    #[clap(name = "totals")]
    Totals(PaymentTotals),
}

impl Payments {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        match self {
            Payments::List(cmd) => cmd.run(db, session).await,
            Payments::Add(cmd) => cmd.run(db, session).await,
            Payments::Totals(cmd) => cmd.run(db, session).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListPayments {
    /// Only payments of this member
    #[clap(short, long)]
    pub member: Option<u32>,
    #[clap(long)]
    pub after: Option<NaiveDate>,
    #[clap(long)]
    pub before: Option<NaiveDate>,
}

impl ListPayments {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let filter = PaymentFilter {
            member_id: self.member,
            date_after: self.after,
            date_before: self.before,
            ..Default::default()
        };
        let payments: Vec<Payment> = db.query(&filter).await?;
        if !session.json {
            println!("{} payments.", payments.len());
        }
        print(&payments, session.json)
    }
}

#[derive(Args, Debug)]
pub struct AddPayment {
    /// Member id
    #[clap(short, long)]
    pub member: u32,
    /// monthly, overdue_monthly or quarterly
    #[clap(short, long)]
    pub dues: Option<DuesType>,
    /// semestral
    #[clap(short, long)]
    pub insurance: Option<InsuranceType>,
    /// cash or transfer
    #[clap(long, default_value_t = PaymentMethod::Cash)]
    pub method: PaymentMethod,
    /// Payment date, defaults to today
    #[clap(long)]
    pub date: Option<NaiveDate>,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl AddPayment {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let operator = session.operator()?;
        let member: Member = db
            .retrieve(self.member)
            .await
            .map_err(LedgerError::lookup("member", self.member))?;

        let preview = Payment {
            dues_type: self.dues,
            insurance_type: self.insurance,
            ..Default::default()
        };
        let question = format!(
            "Register {} for {} ({}, {})?",
            preview.describe(),
            member.full_name(),
            self.method,
            operator
        );
        if !confirm(&question, self.yes)? {
            return Ok(());
        }

        let request = PaymentRequest {
            member_id: member.id,
            dues: self.dues,
            insurance: self.insurance,
            method: self.method,
            operator: operator.to_string(),
            paid_on: self.date,
        };
        let receipt = record_payment(db, &session.ctx, request).await?;
        print(&receipt, session.json)
    }
}

#[derive(Args, Debug)]
pub struct PaymentTotals {
    /// Defaults to the current year
    #[clap(short, long)]
    pub year: Option<i32>,
}

impl PaymentTotals {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let year = self.year.unwrap_or_else(|| session.ctx.today().year());
        let filter = PaymentFilter {
            date_after: NaiveDate::from_ymd_opt(year, 1, 1),
            date_before: NaiveDate::from_ymd_opt(year, 12, 31),
            ..Default::default()
        };
        let payments: Vec<Payment> = db.query(&filter).await?;
        let totals = MonthlyTotals {
            year,
            totals: monthly_totals(&payments, year),
        };
        print(&totals, session.json)
    }
}
