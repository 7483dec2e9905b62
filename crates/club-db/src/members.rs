use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use club_domain::{Insert, Member, MemberFilter, Query, Retrieve, Update};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<Member> for Connection {
    type Filter = MemberFilter;

    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Member>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                name,
                surname,
                last_dues_payment,
                dues_due,
                dues_debtor,
                last_insurance_payment,
                insurance_due,
                insurance_debtor,
                active,
                created_at
            FROM members
            WHERE 1
            "#,
        );

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(name) = filter.name.clone() {
            qry.push(" AND (name || ' ' || surname) LIKE ")
                .push_bind(format!("%{}%", name));
        }
        if let Some(active) = filter.active {
            qry.push(" AND active = ").push_bind(active);
        }
        if let Some(debtor) = filter.debtor {
            qry.push(" AND (dues_debtor OR insurance_debtor) = ")
                .push_bind(debtor);
        }
        qry.push(" ORDER BY surname, name, id");

        let members: Vec<Member> = qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(members)
    }
}

#[async_trait]
impl Retrieve<Member> for Connection {
    type Key = u32;

    async fn retrieve(&self, member_id: Self::Key) -> Result<Member> {
        let filter = MemberFilter {
            id: Some(member_id),
            ..Default::default()
        };
        let member = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(member)
    }
}

#[async_trait]
impl Insert<Member> for Connection {
    async fn insert(&self, member: Member) -> Result<Member> {
        let insert: Id<u32> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO members (
                    name,
                    surname,
                    last_dues_payment,
                    dues_due,
                    dues_debtor,
                    last_insurance_payment,
                    insurance_due,
                    insurance_debtor,
                    active,
                    created_at
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(&member.name)
                .push_bind(&member.surname)
                .push_bind(member.last_dues_payment)
                .push_bind(member.dues_due)
                .push_bind(member.dues_debtor)
                .push_bind(member.last_insurance_payment)
                .push_bind(member.insurance_due)
                .push_bind(member.insurance_debtor)
                .push_bind(member.active)
                .push_bind(member.created_at);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<Member> for Connection {
    /// Update member
    async fn update(&self, member: Member) -> Result<Member> {
        {
            let mut conn = self.lock().await;
            let result = QueryBuilder::<Sqlite>::new("UPDATE members SET")
                .push(" name = ")
                .push_bind(&member.name)
                .push(", surname = ")
                .push_bind(&member.surname)
                .push(", last_dues_payment = ")
                .push_bind(member.last_dues_payment)
                .push(", dues_due = ")
                .push_bind(member.dues_due)
                .push(", dues_debtor = ")
                .push_bind(member.dues_debtor)
                .push(", last_insurance_payment = ")
                .push_bind(member.last_insurance_payment)
                .push(", insurance_due = ")
                .push_bind(member.insurance_due)
                .push(", insurance_debtor = ")
                .push_bind(member.insurance_debtor)
                .push(", active = ")
                .push_bind(member.active)
                .push(" WHERE id = ")
                .push_bind(member.id)
                .build()
                .execute(&mut *conn)
                .await?;
            if result.rows_affected() == 0 {
                return Err(QueryError::NotFound.into());
            }
        }
        self.retrieve(member.id).await
    }
}
