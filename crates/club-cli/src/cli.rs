use clap::{Parser, Subcommand};

use crate::commands::{Accounts, Expenses, Members, Payments, Prices};
use crate::config::Settings;

#[derive(Parser, Debug)]
#[clap(name = "club", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(long, env = "CLUB_DB", default_value = "club.sqlite3")]
    pub db: String,

    #[clap(flatten)]
    pub settings: Settings,

    /// Print results as JSON
    #[clap(long)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn init() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage members
    #[clap(subcommand, name = "members")]
    Members(Members),
    /// Register and list payments
    #[clap(subcommand, name = "payments")]
    Payments(Payments),
    /// Register and list expenses
    #[clap(subcommand, name = "expenses")]
    Expenses(Expenses),
    /// Balances, transfers and reconciliation
    #[clap(subcommand, name = "accounts")]
    Accounts(Accounts),
    /// Show and change the price list
    #[clap(subcommand, name = "prices")]
    Prices(Prices),
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::Parser;

    use club_domain::{AccountId, DuesType, InsuranceType, Operator, PaymentMethod};

    use super::*;
    use crate::commands::{accounts, expenses, members, payments};

    const BASE: [&str; 5] = [
        "club",
        "--operator-primary",
        "Ana",
        "--operator-secondary",
        "Luis",
    ];

    fn parse(args: &[&str]) -> Cli {
        let args: Vec<&str> = BASE.iter().chain(args).copied().collect();
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_payment() {
        let cli = parse(&[
            "--operator",
            "Ana",
            "payments",
            "add",
            "--member",
            "7",
            "--dues",
            "overdue_monthly",
            "--insurance",
            "semestral",
            "--method",
            "transfer",
            "--date",
            "2024-01-10",
        ]);
        assert_eq!(cli.settings.operator.as_deref(), Some("Ana"));
        match cli.command {
            Command::Payments(Payments::Add(payments::AddPayment {
                member,
                dues,
                insurance,
                method,
                date,
                ..
            })) => {
                assert_eq!(member, 7);
                assert_eq!(dues, Some(DuesType::OverdueMonthly));
                assert_eq!(insurance, Some(InsuranceType::Semestral));
                assert_eq!(method, PaymentMethod::Transfer);
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 10));
            }
            cmd => panic!("unexpected command: {:?}", cmd),
        }
    }

    #[test]
    fn test_parse_transfer() {
        let cli = parse(&[
            "--json",
            "accounts",
            "transfer",
            "--from",
            "transfer_secondary",
            "--to",
            "fixed_term_deposit",
            "--amount",
            "40000.50",
        ]);
        assert!(cli.json);
        match cli.command {
            Command::Accounts(Accounts::Transfer(accounts::TransferMoney {
                from, to, amount, ..
            })) => {
                assert_eq!(from, AccountId::Transfer(Operator::Secondary));
                assert_eq!(to, AccountId::FixedTermDeposit);
                assert_eq!(amount.to_string(), "40000.50");
            }
            cmd => panic!("unexpected command: {:?}", cmd),
        }
    }

    #[test]
    fn test_parse_expense_update_keeps_session_operator_apart() {
        let cli = parse(&[
            "--operator",
            "Luis",
            "expenses",
            "set",
            "--id",
            "3",
            "--amount",
            "120",
        ]);
        assert_eq!(cli.settings.operator.as_deref(), Some("Luis"));
        match cli.command {
            Command::Expenses(Expenses::Update(expenses::UpdateExpense {
                id, paid_by, date, ..
            })) => {
                assert_eq!(id, 3);
                assert_eq!(paid_by, None);
                assert_eq!(date, None);
            }
            cmd => panic!("unexpected command: {:?}", cmd),
        }

        let cli = parse(&["expenses", "set", "--id", "3", "--paid-by", "Ana"]);
        match cli.command {
            Command::Expenses(Expenses::Update(expenses::UpdateExpense { paid_by, .. })) => {
                assert_eq!(paid_by.as_deref(), Some("Ana"));
            }
            cmd => panic!("unexpected command: {:?}", cmd),
        }
    }

    #[test]
    fn test_parse_member_rename() {
        let cli = parse(&["members", "rename", "--id", "12", "--name", "Juan", "--surname", "Perez", "-y"]);
        match cli.command {
            Command::Members(Members::Rename(members::RenameMember {
                id,
                name,
                surname,
                yes,
            })) => {
                assert_eq!(id, 12);
                assert_eq!(name, "Juan");
                assert_eq!(surname, "Perez");
                assert!(yes);
            }
            cmd => panic!("unexpected command: {:?}", cmd),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        let args = BASE.iter().chain(&["payments", "add", "--member", "1", "--dues", "weekly"]);
        assert!(Cli::try_parse_from(args).is_err());

        let args = BASE.iter().chain(&["accounts", "transfer", "--from", "cash", "--to", "cash_primary", "--amount", "1"]);
        assert!(Cli::try_parse_from(args).is_err());
    }
}
