use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Connection as SqlConnection, FromRow, QueryBuilder, Sqlite};

use club_domain::{Account, AccountFilter, AccountId, Balances, Query, Retrieve};

use crate::{
    money::{from_cents, to_cents},
    results::QueryError,
    Connection,
};

const RETURNING: &str = " RETURNING id, name, owner, balance, updated_at";

#[derive(Debug, FromRow)]
struct AccountRow {
    id: String,
    name: String,
    owner: String,
    balance: i64,
    updated_at: NaiveDateTime,
}

impl TryFrom<AccountRow> for Account {
    type Error = anyhow::Error;

    fn try_from(row: AccountRow) -> Result<Self> {
        Ok(Account {
            id: row.id.parse()?,
            name: row.name,
            owner: row.owner,
            balance: from_cents(row.balance),
            updated_at: row.updated_at,
        })
    }
}

/// balance = balance + cents
fn add_query(id: AccountId, cents: i64) -> QueryBuilder<'static, Sqlite> {
    let mut qry = QueryBuilder::new("UPDATE accounts SET balance = balance + ");
    qry.push_bind(cents)
        .push(", updated_at = ")
        .push_bind(Utc::now().naive_utc())
        .push(" WHERE id = ")
        .push_bind(id.as_str())
        .push(RETURNING);
    qry
}

/// balance = balance - cents, only where the balance covers it
fn subtract_query(id: AccountId, cents: i64) -> QueryBuilder<'static, Sqlite> {
    let mut qry = QueryBuilder::new("UPDATE accounts SET balance = balance - ");
    qry.push_bind(cents)
        .push(", updated_at = ")
        .push_bind(Utc::now().naive_utc())
        .push(" WHERE id = ")
        .push_bind(id.as_str())
        .push(" AND balance >= ")
        .push_bind(cents)
        .push(RETURNING);
    qry
}

fn select_query(id: AccountId) -> QueryBuilder<'static, Sqlite> {
    let mut qry = QueryBuilder::new(
        "SELECT id, name, owner, balance, updated_at FROM accounts WHERE id = ",
    );
    qry.push_bind(id.as_str());
    qry
}

#[async_trait]
impl Query<Account> for Connection {
    type Filter = AccountFilter;

    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Account>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                name,
                owner,
                balance,
                updated_at
            FROM accounts
            WHERE 1
            "#,
        );
        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id.as_str());
        }
        qry.push(" ORDER BY rowid");

        let rows: Vec<AccountRow> = qry.build_query_as().fetch_all(&mut *conn).await?;
        rows.into_iter().map(Account::try_from).collect()
    }
}

#[async_trait]
impl Retrieve<Account> for Connection {
    type Key = AccountId;

    async fn retrieve(&self, id: Self::Key) -> Result<Account> {
        let filter = AccountFilter { id: Some(id) };
        let account = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(account)
    }
}

#[async_trait]
impl Balances for Connection {
    async fn credit(&self, id: AccountId, amount: Decimal) -> Result<Account> {
        let cents = to_cents(amount)?;
        let mut conn = self.lock().await;
        let row: Option<AccountRow> = add_query(id, cents)
            .build_query_as()
            .fetch_optional(&mut *conn)
            .await?;
        let account = row.ok_or(QueryError::NotFound)?;
        account.try_into()
    }

    async fn debit(&self, id: AccountId, amount: Decimal) -> Result<Option<Account>> {
        let cents = to_cents(amount)?;
        let mut conn = self.lock().await;
        let row: Option<AccountRow> = subtract_query(id, cents)
            .build_query_as()
            .fetch_optional(&mut *conn)
            .await?;
        match row {
            Some(row) => Ok(Some(row.try_into()?)),
            None => {
                // Either the account is missing or its balance is too low
                let exists: Option<AccountRow> = select_query(id)
                    .build_query_as()
                    .fetch_optional(&mut *conn)
                    .await?;
                match exists {
                    Some(_) => Ok(None),
                    None => Err(QueryError::NotFound.into()),
                }
            }
        }
    }

    async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<Option<(Account, Account)>> {
        let cents = to_cents(amount)?;
        let mut conn = self.lock().await;
        let mut tx = conn.begin().await?;

        let source: Option<AccountRow> = subtract_query(from, cents)
            .build_query_as()
            .fetch_optional(&mut *tx)
            .await?;
        let source = match source {
            Some(row) => row,
            None => {
                let exists: Option<AccountRow> = select_query(from)
                    .build_query_as()
                    .fetch_optional(&mut *tx)
                    .await?;
                tx.rollback().await?;
                return match exists {
                    Some(_) => Ok(None),
                    None => Err(QueryError::NotFound.into()),
                };
            }
        };

        let target: Option<AccountRow> = add_query(to, cents)
            .build_query_as()
            .fetch_optional(&mut *tx)
            .await?;
        let target = match target {
            Some(row) => row,
            None => {
                tx.rollback().await?;
                return Err(QueryError::NotFound.into());
            }
        };

        tx.commit().await?;
        Ok(Some((source.try_into()?, target.try_into()?)))
    }

    async fn create_if_absent(&self, account: Account) -> Result<bool> {
        let cents = to_cents(account.balance)?;
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            "INSERT INTO accounts (id, name, owner, balance, updated_at) VALUES (",
        );
        qry.separated(", ")
            .push_bind(account.id.as_str())
            .push_bind(&account.name)
            .push_bind(&account.owner)
            .push_bind(cents)
            .push_bind(account.updated_at);
        let result = qry
            .push(") ON CONFLICT (id) DO NOTHING")
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
