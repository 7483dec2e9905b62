use anyhow::Result;
use async_trait::async_trait;
use sqlx::{FromRow, QueryBuilder, Sqlite};

use club_domain::{PriceConfig, Retrieve, Update};

use crate::{
    money::{from_cents, to_cents},
    results::QueryError,
    Connection,
};

#[derive(Debug, FromRow)]
struct PricesRow {
    quarterly: i64,
    monthly: i64,
    overdue_monthly: i64,
    semestral: i64,
}

impl From<PricesRow> for PriceConfig {
    fn from(row: PricesRow) -> Self {
        PriceConfig {
            quarterly: from_cents(row.quarterly),
            monthly: from_cents(row.monthly),
            overdue_monthly: from_cents(row.overdue_monthly),
            semestral: from_cents(row.semestral),
        }
    }
}

#[async_trait]
impl Retrieve<PriceConfig> for Connection {
    type Key = ();

    /// Fetch the price list. Fails with `NotFound` if it was
    /// never stored.
    async fn retrieve(&self, _key: Self::Key) -> Result<PriceConfig> {
        let mut conn = self.lock().await;
        let row: Option<PricesRow> = sqlx::query_as(
            "SELECT quarterly, monthly, overdue_monthly, semestral FROM prices WHERE id = 1",
        )
        .fetch_optional(&mut *conn)
        .await?;
        let row = row.ok_or(QueryError::NotFound)?;
        Ok(row.into())
    }
}

#[async_trait]
impl Update<PriceConfig> for Connection {
    /// Store the price list, replacing the previous one.
    async fn update(&self, prices: PriceConfig) -> Result<PriceConfig> {
        let quarterly = to_cents(prices.quarterly)?;
        let monthly = to_cents(prices.monthly)?;
        let overdue_monthly = to_cents(prices.overdue_monthly)?;
        let semestral = to_cents(prices.semestral)?;
        {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                "INSERT INTO prices (id, quarterly, monthly, overdue_monthly, semestral) VALUES (1, ",
            );
            qry.separated(", ")
                .push_bind(quarterly)
                .push_bind(monthly)
                .push_bind(overdue_monthly)
                .push_bind(semestral);
            qry.push(
                r#") ON CONFLICT (id) DO UPDATE SET
                    quarterly = excluded.quarterly,
                    monthly = excluded.monthly,
                    overdue_monthly = excluded.overdue_monthly,
                    semestral = excluded.semestral
                "#,
            )
            .build()
            .execute(&mut *conn)
            .await?;
        }
        self.retrieve(()).await
    }
}
