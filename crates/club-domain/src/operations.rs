use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{Account, AccountId};

#[async_trait]
pub trait Query<T> {
    type Filter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<T>>;
}

#[async_trait]
pub trait Insert<T> {
    async fn insert(&self, item: T) -> Result<T>;
}

#[async_trait]
pub trait Update<T> {
    async fn update(&self, item: T) -> Result<T>;
}

#[async_trait]
pub trait Retrieve<T> {
    type Key;
    async fn retrieve(&self, key: Self::Key) -> Result<T>;
}

#[async_trait]
pub trait Delete<T> {
    async fn delete(&self, item: T) -> Result<()>;
}

/// Balance mutations the store applies atomically.
///
/// Implementations must never read a balance and write back a
/// computed value from the application side: concurrent operators
/// would lose updates. All checks happen inside the store.
#[async_trait]
pub trait Balances {
    /// Add `amount` to the balance of an account.
    async fn credit(&self, id: AccountId, amount: Decimal) -> Result<Account>;

    /// Subtract `amount` from the balance of an account, unless the
    /// balance would become negative. In that case nothing is written
    /// and `None` is returned.
    async fn debit(&self, id: AccountId, amount: Decimal) -> Result<Option<Account>>;

    /// Debit `from` and credit `to` as a single unit.
    /// Returns `None` and writes nothing if `from` can not cover the amount.
    async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<Option<(Account, Account)>>;

    /// Store the account unless an account with the same id exists.
    /// Returns true if the account was created.
    async fn create_if_absent(&self, account: Account) -> Result<bool>;
}
