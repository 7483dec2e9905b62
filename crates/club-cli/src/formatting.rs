use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use club_accounting::{
    expenses::ExpenseReceipt, ledger::Reconciliation, payments::PaymentReceipt,
    reports::AccountSummary,
};
use club_domain::{Account, Expense, Member, Payment, PriceConfig, Transfer};

pub trait PrintFormatted {
    fn print_formatted(&self);
}

/// Print as a table or as JSON
pub fn print<T: PrintFormatted + Serialize>(item: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!();
        item.print_formatted();
        println!();
    }
    Ok(())
}

fn date_or_none(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.to_string(),
        None => "None".to_string(),
    }
}

fn flag(set: bool) -> &'static str {
    if set {
        "*"
    } else {
        ""
    }
}

impl PrintFormatted for Member {
    fn print_formatted(&self) {
        println!("ID:\t\t\t{}", self.id);
        println!("Name:\t\t\t{}", self.full_name());
        println!("Active:\t\t\t{}", self.active);
        println!("Last dues payment:\t{}", date_or_none(self.last_dues_payment));
        println!("Dues due:\t\t{}", date_or_none(self.dues_due));
        println!("Dues debtor:\t\t{}", self.dues_debtor);
        println!(
            "Last insurance payment:\t{}",
            date_or_none(self.last_insurance_payment)
        );
        println!("Insurance due:\t\t{}", date_or_none(self.insurance_due));
        println!("Insurance debtor:\t{}", self.insurance_debtor);
        println!("Registered:\t\t{}", self.created_at);
    }
}

impl PrintFormatted for Vec<Member> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<32}\t{:<10}\t{:<10}\t{}\t{}\t{}",
            "ID", "Name", "Dues due", "Ins. due", "Dues", "Ins.", "Inactive"
        );
        println!("{:-<100}", "-");
        for member in self {
            println!(
                "{:>4}\t{:<32}\t{:<10}\t{:<10}\t{}\t{}\t{}",
                member.id,
                format!("{}, {}", member.surname, member.name),
                date_or_none(member.dues_due),
                date_or_none(member.insurance_due),
                flag(member.dues_debtor),
                flag(member.insurance_debtor),
                flag(!member.active),
            );
        }
    }
}

impl PrintFormatted for Vec<Payment> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<10}\t{:<28}\t{:<36}\t{:>12}\t{:<8}\t{}",
            "ID", "Date", "Member", "Paid for", "Total", "Method", "Operator"
        );
        println!("{:-<130}", "-");
        for payment in self {
            println!(
                "{:>4}\t{:<10}\t{:<28}\t{:<36}\t{:>12.2}\t{:<8}\t{}",
                payment.id,
                payment.paid_on,
                payment.member_name,
                payment.describe(),
                payment.total,
                payment.method,
                payment.operator,
            );
        }
    }
}

impl PrintFormatted for PaymentReceipt {
    fn print_formatted(&self) {
        println!(
            "Payment {} of {} for {}: {:.2}",
            self.payment.id,
            self.member.full_name(),
            self.payment.describe(),
            self.payment.total
        );
        println!("{}:\t{:.2}", self.account.name, self.account.balance);
        println!("Dues due:\t\t{}", date_or_none(self.member.dues_due));
        println!("Insurance due:\t\t{}", date_or_none(self.member.insurance_due));
    }
}

impl PrintFormatted for Vec<Expense> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<10}\t{:<12}\t{:<32}\t{:>12}\t{:<8}\t{}",
            "ID", "Date", "Category", "Detail", "Amount", "Method", "Operator"
        );
        println!("{:-<120}", "-");
        for expense in self {
            println!(
                "{:>4}\t{:<10}\t{:<12}\t{:<32}\t{:>12.2}\t{:<8}\t{}",
                expense.id,
                expense.spent_on,
                expense.category,
                expense.detail,
                expense.amount,
                expense.method,
                expense.operator,
            );
        }
    }
}

impl PrintFormatted for ExpenseReceipt {
    fn print_formatted(&self) {
        vec![self.expense.clone()].print_formatted();
        println!();
        println!("{}:\t{:.2}", self.account.name, self.account.balance);
    }
}

impl PrintFormatted for Vec<Account> {
    fn print_formatted(&self) {
        println!("{:<24}\t{:<20}\t{:<8}\t{:>14}", "ID", "Name", "Owner", "Balance");
        println!("{:-<80}", "-");
        for account in self {
            println!(
                "{:<24}\t{:<20}\t{:<8}\t{:>14.2}",
                account.id, account.name, account.owner, account.balance
            );
        }
    }
}

impl PrintFormatted for AccountSummary {
    fn print_formatted(&self) {
        self.accounts.print_formatted();
        println!("{:-<80}", "-");
        println!("{:<24}\t{:<20}\t{:<8}\t{:>14.2}", "Total", "", "", self.total);
    }
}

impl PrintFormatted for Transfer {
    fn print_formatted(&self) {
        println!("Transfer:\t\t{}", self.id);
        println!("From:\t\t\t{}", self.from_account);
        println!("To:\t\t\t{}", self.to_account);
        println!("Amount:\t\t\t{:.2}", self.amount);
        println!("Note:\t\t\t{}", self.note);
    }
}

impl PrintFormatted for Vec<Transfer> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<19}\t{:<20}\t{:<20}\t{:>12}\t{}",
            "ID", "Date", "From", "To", "Amount", "Note"
        );
        println!("{:-<110}", "-");
        for transfer in self {
            println!(
                "{:>4}\t{:<19}\t{:<20}\t{:<20}\t{:>12.2}\t{}",
                transfer.id,
                transfer.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                transfer.from_account,
                transfer.to_account,
                transfer.amount,
                transfer.note,
            );
        }
    }
}

impl PrintFormatted for Vec<Reconciliation> {
    fn print_formatted(&self) {
        println!(
            "{:<20}\t{:>14}\t{:>14}\t{:>12}",
            "Account", "Recorded", "Expected", "Difference"
        );
        println!("{:-<80}", "-");
        for r in self {
            let mark = if r.is_balanced() { "" } else { "  <-" };
            println!(
                "{:<20}\t{:>14.2}\t{:>14.2}\t{:>12.2}{}",
                r.name,
                r.recorded,
                r.expected,
                r.difference(),
                mark
            );
        }
    }
}

impl PrintFormatted for PriceConfig {
    fn print_formatted(&self) {
        println!("Quarterly:\t\t{:.2}", self.quarterly);
        println!("Monthly:\t\t{:.2}", self.monthly);
        println!("Overdue monthly:\t{:.2}", self.overdue_monthly);
        println!("Semestral:\t\t{:.2}", self.semestral);
    }
}

/// Sums per month of a year
#[derive(Debug, Serialize)]
pub struct MonthlyTotals {
    pub year: i32,
    pub totals: [Decimal; 12],
}

impl PrintFormatted for MonthlyTotals {
    fn print_formatted(&self) {
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        println!("{}", self.year);
        println!("{:-<24}", "-");
        for (month, total) in MONTHS.iter().zip(self.totals) {
            println!("{}\t{:>16.2}", month, total);
        }
        println!("{:-<24}", "-");
        println!("Total\t{:>16.2}", self.totals.iter().sum::<Decimal>());
    }
}
