use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{FromRow, QueryBuilder, Sqlite};

use club_domain::{Delete, Expense, ExpenseFilter, Insert, Query, Retrieve, Update};

use crate::{
    money::{from_cents, to_cents},
    results::{Id, QueryError},
    Connection,
};

#[derive(Debug, FromRow)]
struct ExpenseRow {
    id: u32,
    category: String,
    detail: String,
    method: String,
    amount: i64,
    spent_on: NaiveDate,
    operator: String,
    created_at: NaiveDateTime,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = anyhow::Error;

    fn try_from(row: ExpenseRow) -> Result<Self> {
        Ok(Expense {
            id: row.id,
            category: row.category.parse()?,
            detail: row.detail,
            method: row.method.parse()?,
            amount: from_cents(row.amount),
            spent_on: row.spent_on,
            operator: row.operator.parse()?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl Query<Expense> for Connection {
    type Filter = ExpenseFilter;

    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Expense>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                category,
                detail,
                method,
                amount,
                spent_on,
                operator,
                created_at
            FROM expenses
            WHERE 1
            "#,
        );
        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(category) = filter.category {
            qry.push(" AND category = ").push_bind(category.as_str());
        }
        if let Some(date_after) = filter.date_after {
            qry.push(" AND spent_on >= ").push_bind(date_after);
        }
        if let Some(date_before) = filter.date_before {
            qry.push(" AND spent_on <= ").push_bind(date_before);
        }
        qry.push(" ORDER BY spent_on DESC, id DESC");

        let rows: Vec<ExpenseRow> = qry.build_query_as().fetch_all(&mut *conn).await?;
        rows.into_iter().map(Expense::try_from).collect()
    }
}

#[async_trait]
impl Retrieve<Expense> for Connection {
    type Key = u32;

    async fn retrieve(&self, id: Self::Key) -> Result<Expense> {
        let filter = ExpenseFilter {
            id: Some(id),
            ..Default::default()
        };
        let expense = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(expense)
    }
}

#[async_trait]
impl Insert<Expense> for Connection {
    async fn insert(&self, expense: Expense) -> Result<Expense> {
        let amount = to_cents(expense.amount)?;
        let insert: Id<u32> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO expenses (
                    category,
                    detail,
                    method,
                    amount,
                    spent_on,
                    operator,
                    created_at
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(expense.category.as_str())
                .push_bind(&expense.detail)
                .push_bind(expense.method.as_str())
                .push_bind(amount)
                .push_bind(expense.spent_on)
                .push_bind(expense.operator.as_str())
                .push_bind(expense.created_at);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<Expense> for Connection {
    async fn update(&self, expense: Expense) -> Result<Expense> {
        let amount = to_cents(expense.amount)?;
        {
            let mut conn = self.lock().await;
            let result = QueryBuilder::<Sqlite>::new("UPDATE expenses SET")
                .push(" category = ")
                .push_bind(expense.category.as_str())
                .push(", detail = ")
                .push_bind(&expense.detail)
                .push(", method = ")
                .push_bind(expense.method.as_str())
                .push(", amount = ")
                .push_bind(amount)
                .push(", spent_on = ")
                .push_bind(expense.spent_on)
                .push(", operator = ")
                .push_bind(expense.operator.as_str())
                .push(" WHERE id = ")
                .push_bind(expense.id)
                .build()
                .execute(&mut *conn)
                .await?;
            if result.rows_affected() == 0 {
                return Err(QueryError::NotFound.into());
            }
        }
        self.retrieve(expense.id).await
    }
}

#[async_trait]
impl Delete<Expense> for Connection {
    async fn delete(&self, expense: Expense) -> Result<()> {
        let mut conn = self.lock().await;
        let result = QueryBuilder::<Sqlite>::new("DELETE FROM expenses WHERE id = ")
            .push_bind(expense.id)
            .build()
            .execute(&mut *conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(QueryError::NotFound.into());
        }
        Ok(())
    }
}
