use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;

use club_db::Connection;
use club_domain::{
    Account, AccountId, Balances, Delete, Expense, Insert, Member, Payment, PriceConfig,
    Retrieve, Transfer, Update,
};

/// A store that fails one named operation and passes
/// everything else on to a test database.
pub struct FailingStore {
    pub db: Connection,
    fail_on: &'static str,
}

impl FailingStore {
    pub fn new(db: Connection, fail_on: &'static str) -> Self {
        FailingStore { db, fail_on }
    }

    fn check(&self, op: &'static str) -> Result<()> {
        if op == self.fail_on {
            Err(anyhow!("{} failed", op))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Retrieve<Member> for FailingStore {
    type Key = u32;

    async fn retrieve(&self, id: u32) -> Result<Member> {
        self.check("retrieve member")?;
        self.db.retrieve(id).await
    }
}

#[async_trait]
impl Update<Member> for FailingStore {
    async fn update(&self, member: Member) -> Result<Member> {
        self.check("update member")?;
        self.db.update(member).await
    }
}

#[async_trait]
impl Retrieve<PriceConfig> for FailingStore {
    type Key = ();

    async fn retrieve(&self, key: ()) -> Result<PriceConfig> {
        self.db.retrieve(key).await
    }
}

#[async_trait]
impl Insert<Payment> for FailingStore {
    async fn insert(&self, payment: Payment) -> Result<Payment> {
        self.check("insert payment")?;
        self.db.insert(payment).await
    }
}

#[async_trait]
impl Delete<Payment> for FailingStore {
    async fn delete(&self, payment: Payment) -> Result<()> {
        self.db.delete(payment).await
    }
}

#[async_trait]
impl Retrieve<Expense> for FailingStore {
    type Key = u32;

    async fn retrieve(&self, id: u32) -> Result<Expense> {
        self.db.retrieve(id).await
    }
}

#[async_trait]
impl Insert<Expense> for FailingStore {
    async fn insert(&self, expense: Expense) -> Result<Expense> {
        self.check("insert expense")?;
        self.db.insert(expense).await
    }
}

#[async_trait]
impl Update<Expense> for FailingStore {
    async fn update(&self, expense: Expense) -> Result<Expense> {
        self.check("update expense")?;
        self.db.update(expense).await
    }
}

#[async_trait]
impl Delete<Expense> for FailingStore {
    async fn delete(&self, expense: Expense) -> Result<()> {
        self.check("delete expense")?;
        self.db.delete(expense).await
    }
}

#[async_trait]
impl Retrieve<Account> for FailingStore {
    type Key = AccountId;

    async fn retrieve(&self, id: AccountId) -> Result<Account> {
        self.db.retrieve(id).await
    }
}

#[async_trait]
impl Insert<Transfer> for FailingStore {
    async fn insert(&self, transfer: Transfer) -> Result<Transfer> {
        self.check("insert transfer")?;
        self.db.insert(transfer).await
    }
}

#[async_trait]
impl Balances for FailingStore {
    async fn credit(&self, id: AccountId, amount: Decimal) -> Result<Account> {
        self.check("credit")?;
        self.db.credit(id, amount).await
    }

    async fn debit(&self, id: AccountId, amount: Decimal) -> Result<Option<Account>> {
        self.check("debit")?;
        self.db.debit(id, amount).await
    }

    async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<Option<(Account, Account)>> {
        self.db.transfer(from, to, amount).await
    }

    async fn create_if_absent(&self, account: Account) -> Result<bool> {
        self.db.create_if_absent(account).await
    }
}
