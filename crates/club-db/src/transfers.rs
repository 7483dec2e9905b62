use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, QueryBuilder, Sqlite};

use club_domain::{Insert, Query, Transfer, TransferFilter};

use crate::{
    money::{from_cents, to_cents},
    results::{Id, QueryError},
    Connection,
};

#[derive(Debug, FromRow)]
struct TransferRow {
    id: u32,
    from_account: String,
    to_account: String,
    amount: i64,
    note: String,
    created_at: NaiveDateTime,
}

impl TryFrom<TransferRow> for Transfer {
    type Error = anyhow::Error;

    fn try_from(row: TransferRow) -> Result<Self> {
        Ok(Transfer {
            id: row.id,
            from_account: row.from_account.parse()?,
            to_account: row.to_account.parse()?,
            amount: from_cents(row.amount),
            note: row.note,
            created_at: row.created_at,
        })
    }
}

const SELECT: &str = r#"
    SELECT
        id,
        from_account,
        to_account,
        amount,
        note,
        created_at
    FROM transfers
    WHERE 1
"#;

#[async_trait]
impl Query<Transfer> for Connection {
    type Filter = TransferFilter;

    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Transfer>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(SELECT);
        if let Some(account) = filter.account {
            qry.push(" AND (from_account = ")
                .push_bind(account.as_str())
                .push(" OR to_account = ")
                .push_bind(account.as_str())
                .push(")");
        }
        qry.push(" ORDER BY created_at DESC, id DESC");

        let rows: Vec<TransferRow> = qry.build_query_as().fetch_all(&mut *conn).await?;
        rows.into_iter().map(Transfer::try_from).collect()
    }
}

#[async_trait]
impl Insert<Transfer> for Connection {
    async fn insert(&self, transfer: Transfer) -> Result<Transfer> {
        let amount = to_cents(transfer.amount)?;
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            "INSERT INTO transfers (from_account, to_account, amount, note, created_at) VALUES (",
        );
        qry.separated(", ")
            .push_bind(transfer.from_account.as_str())
            .push_bind(transfer.to_account.as_str())
            .push_bind(amount)
            .push_bind(&transfer.note)
            .push_bind(transfer.created_at);
        let insert: Id<u32> = qry
            .push(") RETURNING id ")
            .build_query_as()
            .fetch_one(&mut *conn)
            .await?;

        let row: TransferRow = QueryBuilder::<Sqlite>::new(SELECT)
            .push(" AND id = ")
            .push_bind(insert.id)
            .build_query_as()
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(QueryError::NotFound)?;
        row.try_into()
    }
}
