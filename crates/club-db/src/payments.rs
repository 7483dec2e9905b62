use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{FromRow, QueryBuilder, Sqlite};

use club_domain::{Delete, Insert, Payment, PaymentFilter, Query, Retrieve};

use crate::{
    money::{from_cents, to_cents},
    results::{Id, QueryError},
    Connection,
};

#[derive(Debug, FromRow)]
struct PaymentRow {
    id: u32,
    member_id: u32,
    member_name: String,
    dues_type: Option<String>,
    dues_amount: i64,
    insurance_type: Option<String>,
    insurance_amount: i64,
    total: i64,
    method: String,
    operator: String,
    paid_on: NaiveDate,
    created_at: NaiveDateTime,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = anyhow::Error;

    fn try_from(row: PaymentRow) -> Result<Self> {
        Ok(Payment {
            id: row.id,
            member_id: row.member_id,
            member_name: row.member_name,
            dues_type: row.dues_type.as_deref().map(str::parse).transpose()?,
            dues_amount: from_cents(row.dues_amount),
            insurance_type: row.insurance_type.as_deref().map(str::parse).transpose()?,
            insurance_amount: from_cents(row.insurance_amount),
            total: from_cents(row.total),
            method: row.method.parse()?,
            operator: row.operator.parse()?,
            paid_on: row.paid_on,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl Query<Payment> for Connection {
    type Filter = PaymentFilter;

    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Payment>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                member_id,
                member_name,
                dues_type,
                dues_amount,
                insurance_type,
                insurance_amount,
                total,
                method,
                operator,
                paid_on,
                created_at
            FROM payments
            WHERE 1
            "#,
        );
        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(member_id) = filter.member_id {
            qry.push(" AND member_id = ").push_bind(member_id);
        }
        if let Some(date_after) = filter.date_after {
            qry.push(" AND paid_on >= ").push_bind(date_after);
        }
        if let Some(date_before) = filter.date_before {
            qry.push(" AND paid_on <= ").push_bind(date_before);
        }
        // Most recent first
        qry.push(" ORDER BY created_at DESC, id DESC");

        let rows: Vec<PaymentRow> = qry.build_query_as().fetch_all(&mut *conn).await?;
        rows.into_iter().map(Payment::try_from).collect()
    }
}

#[async_trait]
impl Retrieve<Payment> for Connection {
    type Key = u32;

    async fn retrieve(&self, id: Self::Key) -> Result<Payment> {
        let filter = PaymentFilter {
            id: Some(id),
            ..Default::default()
        };
        let payment = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(payment)
    }
}

#[async_trait]
impl Insert<Payment> for Connection {
    async fn insert(&self, payment: Payment) -> Result<Payment> {
        let dues_amount = to_cents(payment.dues_amount)?;
        let insurance_amount = to_cents(payment.insurance_amount)?;
        let total = to_cents(payment.total)?;

        let insert: Id<u32> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO payments (
                    member_id,
                    member_name,
                    dues_type,
                    dues_amount,
                    insurance_type,
                    insurance_amount,
                    total,
                    method,
                    operator,
                    paid_on,
                    created_at
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(payment.member_id)
                .push_bind(&payment.member_name)
                .push_bind(payment.dues_type.map(|t| t.as_str()))
                .push_bind(dues_amount)
                .push_bind(payment.insurance_type.map(|t| t.as_str()))
                .push_bind(insurance_amount)
                .push_bind(total)
                .push_bind(payment.method.as_str())
                .push_bind(payment.operator.as_str())
                .push_bind(payment.paid_on)
                .push_bind(payment.created_at);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Delete<Payment> for Connection {
    /// Delete a payment. Only used to take back a payment
    /// whose registration could not be completed.
    async fn delete(&self, payment: Payment) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM payments WHERE id = ")
            .push_bind(payment.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use club_domain::{DuesType, InsuranceType, Member, Operator, PaymentMethod};
    use rust_decimal_macros::dec;

    use super::*;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_payment_insert() {
        let db = Connection::open_test().await;
        let member = db.insert(Member::new("Juan", "Perez", at(1))).await.unwrap();

        let payment = Payment {
            member_id: member.id,
            member_name: member.full_name(),
            dues_type: Some(DuesType::Monthly),
            dues_amount: dec!(45000),
            insurance_type: Some(InsuranceType::Semestral),
            insurance_amount: dec!(15000),
            total: dec!(60000),
            method: PaymentMethod::Transfer,
            operator: Operator::Secondary,
            paid_on: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            created_at: at(10),
            ..Default::default()
        };
        let stored = db.insert(payment.clone()).await.unwrap();
        assert!(stored.id > 0);
        assert_eq!(
            stored,
            Payment {
                id: stored.id,
                ..payment
            }
        );
    }

    #[tokio::test]
    async fn test_payment_filter_and_order() {
        let db = Connection::open_test().await;
        let m1 = db.insert(Member::new("Juan", "Perez", at(1))).await.unwrap();
        let m2 = db.insert(Member::new("Maria", "Alvarez", at(1))).await.unwrap();

        for (member_id, day) in [(m1.id, 3), (m2.id, 5), (m1.id, 8)] {
            db.insert(Payment {
                member_id,
                dues_type: Some(DuesType::Monthly),
                dues_amount: dec!(100),
                total: dec!(100),
                paid_on: at(day).date(),
                created_at: at(day),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let payments: Vec<Payment> = db.query(&PaymentFilter::default()).await.unwrap();
        let days: Vec<NaiveDate> = payments.iter().map(|p| p.paid_on).collect();
        assert_eq!(days, vec![at(8).date(), at(5).date(), at(3).date()]);

        let payments: Vec<Payment> = db
            .query(&PaymentFilter {
                member_id: Some(m1.id),
                date_after: Some(at(4).date()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].paid_on, at(8).date());
    }

    #[tokio::test]
    async fn test_payment_delete() {
        let db = Connection::open_test().await;
        let member = db.insert(Member::new("Juan", "Perez", at(1))).await.unwrap();
        let payment = db
            .insert(Payment {
                member_id: member.id,
                total: dec!(1),
                ..Default::default()
            })
            .await
            .unwrap();
        let id = payment.id;
        db.delete(payment).await.unwrap();

        let result: Result<Payment> = db.retrieve(id).await;
        assert!(result.is_err());
    }
}
