use sqlx::FromRow;

pub use club_domain::QueryError;

#[derive(Debug, Clone, FromRow)]
pub struct Id<T> {
    pub id: T,
}
