use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use club_domain::{Account, AccountFilter, Expense, Member, MemberFilter, Payment, Query};

use crate::{dues::DuesRecord, Context, LedgerError};

/// Active members owing dues or insurance on the context's date,
/// by surname and name. Debtor flags are recomputed from the due
/// dates, the stored flags may be stale.
pub async fn debtors<DB>(db: &DB, ctx: &Context) -> Result<Vec<Member>, LedgerError>
where
    DB: Query<Member, Filter = MemberFilter> + Sync,
{
    let filter = MemberFilter {
        active: Some(true),
        ..Default::default()
    };
    let today = ctx.today();
    let mut members: Vec<Member> = db
        .query(&filter)
        .await?
        .into_iter()
        .map(|member| member.refresh_status(today))
        .filter(Member::is_debtor)
        .collect();
    members.sort_by(|a, b| (&a.surname, &a.name).cmp(&(&b.surname, &b.name)));
    Ok(members)
}

/// Something that happened on a date and moved an amount
pub trait Dated {
    fn date(&self) -> NaiveDate;
    fn amount(&self) -> Decimal;
}

impl Dated for Payment {
    fn date(&self) -> NaiveDate {
        self.paid_on
    }

    fn amount(&self) -> Decimal {
        self.total
    }
}

impl Dated for Expense {
    fn date(&self) -> NaiveDate {
        self.spent_on
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Sum amounts per month of `year`, January first.
pub fn monthly_totals<T: Dated>(items: &[T], year: i32) -> [Decimal; 12] {
    let mut totals = [Decimal::ZERO; 12];
    for item in items.iter().filter(|i| i.date().year() == year) {
        totals[item.date().month0() as usize] += item.amount();
    }
    totals
}

/// All accounts and the money the club holds in total.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub accounts: Vec<Account>,
    pub total: Decimal,
}

pub async fn account_summary<DB>(db: &DB) -> Result<AccountSummary, LedgerError>
where
    DB: Query<Account, Filter = AccountFilter> + Sync,
{
    let accounts = db.query(&AccountFilter::default()).await?;
    let total = accounts.iter().map(|a| a.balance).sum();
    Ok(AccountSummary { accounts, total })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use club_db::Connection;
    use club_domain::{AccountId, Balances, Insert, Operator, Operators, Retrieve, Update};

    use super::*;
    use crate::{clock::FixedClock, ledger::initialize, Context};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn context(today: NaiveDate) -> Context {
        Context::new(Operators::new("Ana", "Luis")).with_clock(FixedClock::on(today))
    }

    #[tokio::test]
    async fn test_debtors() {
        let db = Connection::open_test().await;
        let now = date(2024, 1, 1).and_hms_opt(9, 0, 0).unwrap();
        // name, surname, active, insurance due
        let names = [
            ("Zoe", "Gomez", true, date(2024, 2, 1)),
            ("Ana", "Gomez", true, date(2024, 2, 1)),
            ("Luis", "Alvarez", true, date(2024, 2, 1)),
            ("Pedro", "Alvarez", false, date(2024, 2, 1)),
            ("Juan", "Perez", true, date(2024, 7, 1)),
        ];
        for (name, surname, active, due) in names {
            let member = db.insert(Member::new(name, surname, now)).await.unwrap();
            db.update(Member {
                active,
                insurance_due: Some(due),
                ..member
            })
            .await
            .unwrap();
        }

        let names: Vec<String> = debtors(&db, &context(date(2024, 3, 1)))
            .await
            .unwrap()
            .iter()
            .map(|m| m.full_name())
            .collect();
        assert_eq!(names, vec!["Luis Alvarez", "Ana Gomez", "Zoe Gomez"]);

        // Due date itself is still covered
        assert!(debtors(&db, &context(date(2024, 2, 1))).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_debtors_follow_the_clock() {
        let db = Connection::open_test().await;
        let now = date(2024, 1, 10).and_hms_opt(9, 0, 0).unwrap();
        let member = db.insert(Member::new("Juan", "Perez", now)).await.unwrap();
        // Paid monthly dues on 2024-01-10, stored as not owing
        db.update(Member {
            last_dues_payment: Some(date(2024, 1, 10)),
            dues_due: Some(date(2024, 2, 10)),
            dues_debtor: false,
            ..member
        })
        .await
        .unwrap();

        assert!(debtors(&db, &context(date(2024, 2, 10))).await.unwrap().is_empty());

        let owing = debtors(&db, &context(date(2024, 3, 1))).await.unwrap();
        assert_eq!(owing.len(), 1);
        assert!(owing[0].dues_debtor);
        assert!(!owing[0].insurance_debtor);

        // A stale flag without a passed due date does not count
        let stored: Member = db.retrieve(owing[0].id).await.unwrap();
        db.update(Member {
            dues_due: Some(date(2024, 12, 31)),
            dues_debtor: true,
            ..stored
        })
        .await
        .unwrap();
        assert!(debtors(&db, &context(date(2024, 3, 1))).await.unwrap().is_empty());
    }

    #[test]
    fn test_monthly_totals() {
        let payments = vec![
            Payment {
                total: dec!(45000),
                paid_on: date(2024, 1, 10),
                ..Default::default()
            },
            Payment {
                total: dec!(60000),
                paid_on: date(2024, 1, 31),
                ..Default::default()
            },
            Payment {
                total: dec!(110000),
                paid_on: date(2024, 12, 1),
                ..Default::default()
            },
            Payment {
                total: dec!(1),
                paid_on: date(2023, 12, 1),
                ..Default::default()
            },
        ];
        let totals = monthly_totals(&payments, 2024);
        assert_eq!(totals[0], dec!(105000));
        assert_eq!(totals[11], dec!(110000));
        assert_eq!(totals.iter().sum::<Decimal>(), dec!(215000));

        let expenses = vec![Expense {
            amount: dec!(312.25),
            spent_on: date(2024, 5, 3),
            ..Default::default()
        }];
        assert_eq!(monthly_totals(&expenses, 2024)[4], dec!(312.25));
        assert!(monthly_totals(&expenses, 2023).iter().all(|t| t.is_zero()));
    }

    #[tokio::test]
    async fn test_account_summary() {
        let db = Connection::open_test().await;
        let ctx = context(date(2024, 1, 1));
        initialize(&db, &ctx).await.unwrap();
        db.credit(AccountId::Cash(Operator::Primary), dec!(100.50))
            .await
            .unwrap();
        db.credit(AccountId::FixedTermDeposit, dec!(900)).await.unwrap();

        let summary = account_summary(&db).await.unwrap();
        assert_eq!(summary.accounts.len(), 5);
        assert_eq!(summary.total, dec!(1000.50));
    }
}
