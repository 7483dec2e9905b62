use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use club_accounting::{
    expenses::{create_expense, delete_expense, update_expense, ExpenseRequest},
    reports::monthly_totals,
    LedgerError,
};
use club_db::Connection;
use club_domain::{Expense, ExpenseCategory, ExpenseFilter, PaymentMethod, Query, Retrieve};

use crate::{
    commands::confirm,
    config::Session,
    formatting::{print, MonthlyTotals, PrintFormatted},
};

#[derive(Subcommand, Debug)]
pub enum Expenses {
    /// List expenses, most recent first
    #[clap(name = "list")]
    List(ListExpenses),
    /// Pay an expense
    #[clap(name = "add")]
    Add(AddExpense),
    /// Change an expense
    #[clap(name = "set")]
    Update(UpdateExpense),
    /// Remove an expense and refund the account
    #[clap(name = "delete")]
    Delete(DeleteExpense),
    /// Sum of expenses per month
    #[clap(name = "totals")]
    Totals(ExpenseTotals),
}

impl Expenses {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        match self {
            Expenses::List(cmd) => cmd.run(db, session).await,
            Expenses::Add(cmd) => cmd.run(db, session).await,
            Expenses::Update(cmd) => cmd.run(db, session).await,
            Expenses::Delete(cmd) => cmd.run(db, session).await,
            Expenses::Totals(cmd) => cmd.run(db, session).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListExpenses {
    /// electricity, water, cleaning, maintenance or lawn_care
    #[clap(short, long)]
    pub category: Option<ExpenseCategory>,
    #[clap(long)]
    pub after: Option<NaiveDate>,
    #[clap(long)]
    pub before: Option<NaiveDate>,
}

impl ListExpenses {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let filter = ExpenseFilter {
            category: self.category,
            date_after: self.after,
            date_before: self.before,
            ..Default::default()
        };
        let expenses: Vec<Expense> = db.query(&filter).await?;
        if !session.json {
            println!("{} expenses.", expenses.len());
        }
        print(&expenses, session.json)
    }
}

#[derive(Args, Debug)]
pub struct AddExpense {
    #[clap(short, long)]
    pub category: ExpenseCategory,
    #[clap(short, long, default_value = "")]
    pub detail: String,
    #[clap(short, long)]
    pub amount: Decimal,
    /// cash or transfer
    #[clap(long, default_value_t = PaymentMethod::Cash)]
    pub method: PaymentMethod,
    /// Defaults to today
    #[clap(long)]
    pub date: Option<NaiveDate>,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl AddExpense {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let operator = session.operator()?;
        let question = format!(
            "Pay {:.2} for {} ({}, {})?",
            self.amount, self.category, self.method, operator
        );
        if !confirm(&question, self.yes)? {
            return Ok(());
        }
        let request = ExpenseRequest {
            category: self.category,
            detail: self.detail,
            method: self.method,
            amount: self.amount,
            spent_on: self.date,
            operator: operator.to_string(),
        };
        let receipt = create_expense(db, &session.ctx, request).await?;
        print(&receipt, session.json)
    }
}

#[derive(Args, Debug)]
pub struct UpdateExpense {
    #[clap(short, long)]
    pub id: u32,
    #[clap(short, long)]
    pub category: Option<ExpenseCategory>,
    #[clap(short, long)]
    pub detail: Option<String>,
    #[clap(short, long)]
    pub amount: Option<Decimal>,
    #[clap(long)]
    pub method: Option<PaymentMethod>,
    #[clap(long)]
    pub date: Option<NaiveDate>,
    /// Operator who paid, if it was someone else
    #[clap(long)]
    pub paid_by: Option<String>,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl UpdateExpense {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let expense: Expense = db
            .retrieve(self.id)
            .await
            .map_err(LedgerError::lookup("expense", self.id))?;

        // The session operator is who runs the command, not who paid
        let operator = self
            .paid_by
            .unwrap_or_else(|| session.ctx.operators.name(expense.operator).to_string());
        let request = ExpenseRequest {
            category: self.category.unwrap_or(expense.category),
            detail: self.detail.unwrap_or_else(|| expense.detail.clone()),
            method: self.method.unwrap_or(expense.method),
            amount: self.amount.unwrap_or(expense.amount),
            spent_on: self.date,
            operator,
        };

        if !session.json {
            println!();
            vec![expense].print_formatted();
            println!();
        }
        let question = format!(
            "Change to {:.2} for {} ({}, {})?",
            request.amount, request.category, request.method, request.operator
        );
        if !confirm(&question, self.yes)? {
            return Ok(());
        }
        let receipt = update_expense(db, &session.ctx, self.id, request).await?;
        print(&receipt, session.json)
    }
}

#[derive(Args, Debug)]
pub struct DeleteExpense {
    #[clap(short, long)]
    pub id: u32,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl DeleteExpense {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let expense: Expense = db
            .retrieve(self.id)
            .await
            .map_err(LedgerError::lookup("expense", self.id))?;
        if !session.json {
            println!();
            vec![expense].print_formatted();
            println!();
        }
        if !confirm("Delete expense and refund the account?", self.yes)? {
            return Ok(());
        }
        let receipt = delete_expense(db, self.id).await?;
        if !session.json {
            println!(
                "Expense deleted, {} holds {:.2}.",
                receipt.account.name, receipt.account.balance
            );
            return Ok(());
        }
        print(&receipt, session.json)
    }
}

#[derive(Args, Debug)]
pub struct ExpenseTotals {
    /// Defaults to the current year
    #[clap(short, long)]
    pub year: Option<i32>,
}

impl ExpenseTotals {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let year = self.year.unwrap_or_else(|| session.ctx.today().year());
        let filter = ExpenseFilter {
            date_after: NaiveDate::from_ymd_opt(year, 1, 1),
            date_before: NaiveDate::from_ymd_opt(year, 12, 31),
            ..Default::default()
        };
        let expenses: Vec<Expense> = db.query(&filter).await?;
        let totals = MonthlyTotals {
            year,
            totals: monthly_totals(&expenses, year),
        };
        print(&totals, session.json)
    }
}
