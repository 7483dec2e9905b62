use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use club_domain::{
    Account, AccountId, Balances, Delete, Expense, ExpenseCategory, Insert, PaymentMethod,
    Retrieve, Update,
};

use crate::{
    ledger::{self, validate_amount},
    saga::Saga,
    Context, LedgerError,
};

/// An expense as entered by an operator.
#[derive(Debug, Clone)]
pub struct ExpenseRequest {
    pub category: ExpenseCategory,
    pub detail: String,
    pub method: PaymentMethod,
    pub amount: Decimal,
    /// Defaults to today on create, kept on update
    pub spent_on: Option<NaiveDate>,
    /// Name of the operator paying
    pub operator: String,
}

impl ExpenseRequest {
    /// Check the request and resolve the paying account.
    fn validate(&self, ctx: &Context) -> Result<AccountId, LedgerError> {
        validate_amount(self.amount)?;
        let operator = ctx.operator(&self.operator)?;
        if let Some(spent_on) = self.spent_on {
            if spent_on > ctx.today() {
                return Err(LedgerError::validation(format!(
                    "expense date {} is in the future",
                    spent_on
                )));
            }
        }
        Ok(AccountId::resolve(self.method, operator))
    }

    fn apply(self, ctx: &Context, expense: Expense) -> Result<Expense, LedgerError> {
        let operator = ctx.operator(&self.operator)?;
        Ok(Expense {
            category: self.category,
            detail: self.detail.trim().to_string(),
            method: self.method,
            amount: self.amount,
            spent_on: self.spent_on.unwrap_or(expense.spent_on),
            operator,
            ..expense
        })
    }
}

/// What a recorded expense changed.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseReceipt {
    pub expense: Expense,
    pub account: Account,
}

/// Pay an expense from the operator's account for the payment method.
/// Fails with `InsufficientFunds` if the account can not cover it.
pub async fn create_expense<DB>(
    db: &DB,
    ctx: &Context,
    request: ExpenseRequest,
) -> Result<ExpenseReceipt, LedgerError>
where
    DB: Insert<Expense> + Balances + Retrieve<Account, Key = AccountId> + Sync,
{
    let account_id = request.validate(ctx)?;
    let expense = request.apply(
        ctx,
        Expense {
            created_at: ctx.now(),
            spent_on: ctx.today(),
            ..Default::default()
        },
    )?;
    let amount = expense.amount;

    let mut saga = Saga::new("create expense");
    let account = saga.step(ledger::debit(db, account_id, amount)).await?;
    saga.compensate("refund account", async move {
        db.credit(account_id, amount).await.map(|_| ())
    });
    let expense = saga.step(db.insert(expense)).await?;
    saga.commit();

    tracing::info!(
        expense = expense.id,
        category = %expense.category,
        %amount,
        account = %account_id,
        "recorded expense"
    );
    Ok(ExpenseReceipt { expense, account })
}

/// Edit an expense. The old amount goes back to the old account,
/// then the new amount is taken from the new account. If the new
/// account can not cover it, the original debit is restored.
pub async fn update_expense<DB>(
    db: &DB,
    ctx: &Context,
    id: u32,
    request: ExpenseRequest,
) -> Result<ExpenseReceipt, LedgerError>
where
    DB: Retrieve<Expense, Key = u32>
        + Update<Expense>
        + Balances
        + Retrieve<Account, Key = AccountId>
        + Sync,
{
    let original = Retrieve::<Expense>::retrieve(db, id)
        .await
        .map_err(LedgerError::lookup("expense", id))?;
    let account_id = request.validate(ctx)?;
    let expense = request.apply(ctx, original.clone())?;

    let (old_account, old_amount) = (original.account(), original.amount);
    let new_amount = expense.amount;

    let mut saga = Saga::new("update expense");
    saga.step(ledger::credit(db, old_account, old_amount)).await?;
    saga.compensate("restore original debit", async move {
        match db.debit(old_account, old_amount).await? {
            Some(_) => Ok(()),
            None => Err(anyhow!("{} can no longer cover {}", old_account, old_amount)),
        }
    });
    let account = saga.step(ledger::debit(db, account_id, new_amount)).await?;
    saga.compensate("refund new account", async move {
        db.credit(account_id, new_amount).await.map(|_| ())
    });
    let expense = saga.step(db.update(expense)).await?;
    saga.commit();

    tracing::info!(
        expense = expense.id,
        from = %old_account,
        to = %account_id,
        %old_amount,
        %new_amount,
        "updated expense"
    );
    Ok(ExpenseReceipt { expense, account })
}

/// Remove an expense and return its amount to the account.
pub async fn delete_expense<DB>(db: &DB, id: u32) -> Result<ExpenseReceipt, LedgerError>
where
    DB: Retrieve<Expense, Key = u32> + Delete<Expense> + Balances + Sync,
{
    let expense = Retrieve::<Expense>::retrieve(db, id)
        .await
        .map_err(LedgerError::lookup("expense", id))?;
    let (account_id, amount) = (expense.account(), expense.amount);

    let mut saga = Saga::new("delete expense");
    let account = saga.step(ledger::credit(db, account_id, amount)).await?;
    saga.compensate("restore debit", async move {
        match db.debit(account_id, amount).await? {
            Some(_) => Ok(()),
            None => Err(anyhow!("{} can no longer cover {}", account_id, amount)),
        }
    });
    saga.step(db.delete(expense.clone())).await?;
    saga.commit();

    tracing::info!(expense = id, %amount, account = %account_id, "deleted expense");
    Ok(ExpenseReceipt { expense, account })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use club_db::Connection;
    use club_domain::{ExpenseFilter, Operator, Operators, Query};

    use super::*;
    use crate::{clock::FixedClock, ledger::initialize, testing::FailingStore};

    const CASH_A: AccountId = AccountId::Cash(Operator::Primary);
    const BANK_A: AccountId = AccountId::Transfer(Operator::Primary);
    const BANK_B: AccountId = AccountId::Transfer(Operator::Secondary);

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    async fn setup() -> (Connection, Context) {
        let db = Connection::open_test().await;
        let ctx = Context::new(Operators::new("Ana", "Luis")).with_clock(FixedClock::on(today()));
        initialize(&db, &ctx).await.unwrap();
        (db, ctx)
    }

    fn request(amount: Decimal) -> ExpenseRequest {
        ExpenseRequest {
            category: ExpenseCategory::Electricity,
            detail: " May bill ".to_string(),
            method: PaymentMethod::Cash,
            amount,
            spent_on: None,
            operator: "Ana".to_string(),
        }
    }

    async fn balance<DB: Retrieve<Account, Key = AccountId>>(db: &DB, id: AccountId) -> Decimal {
        db.retrieve(id).await.unwrap().balance
    }

    async fn expenses(db: &Connection) -> Vec<Expense> {
        db.query(&ExpenseFilter::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_expense() {
        let (db, ctx) = setup().await;
        db.credit(CASH_A, dec!(1000)).await.unwrap();

        let receipt = create_expense(&db, &ctx, request(dec!(200))).await.unwrap();
        assert_eq!(receipt.account.balance, dec!(800));
        assert_eq!(receipt.expense.detail, "May bill");
        assert_eq!(receipt.expense.spent_on, today());
        assert_eq!(receipt.expense.operator, Operator::Primary);
        assert_eq!(balance(&db, CASH_A).await, dec!(800));
        assert_eq!(expenses(&db).await, vec![receipt.expense]);
    }

    #[tokio::test]
    async fn test_expense_exceeding_balance() {
        let (db, ctx) = setup().await;
        db.credit(CASH_A, dec!(1000)).await.unwrap();

        let err = create_expense(&db, &ctx, request(dec!(1500))).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "insufficient funds in Cash - Ana: 1000 available, 1500 requested"
        );
        assert_eq!(balance(&db, CASH_A).await, dec!(1000));
        assert!(expenses(&db).await.is_empty());
    }

    #[tokio::test]
    async fn test_create_expense_validation() {
        let (db, ctx) = setup().await;
        db.credit(CASH_A, dec!(1000)).await.unwrap();

        let err = create_expense(&db, &ctx, request(dec!(-1))).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        let mut req = request(dec!(10));
        req.operator = "nobody".to_string();
        let err = create_expense(&db, &ctx, req).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        let mut req = request(dec!(10));
        req.spent_on = NaiveDate::from_ymd_opt(2024, 6, 1);
        let err = create_expense(&db, &ctx, req).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        assert_eq!(balance(&db, CASH_A).await, dec!(1000));
    }

    #[tokio::test]
    async fn test_failed_insert_refunds() {
        let (db, ctx) = setup().await;
        db.credit(CASH_A, dec!(1000)).await.unwrap();
        let store = FailingStore::new(db, "insert expense");

        let err = create_expense(&store, &ctx, request(dec!(200))).await.unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(_)));
        assert_eq!(balance(&store.db, CASH_A).await, dec!(1000));
        assert!(expenses(&store.db).await.is_empty());
    }

    #[tokio::test]
    async fn test_move_expense_to_other_account() {
        let (db, ctx) = setup().await;
        db.credit(BANK_A, dec!(500)).await.unwrap();
        db.credit(BANK_B, dec!(100)).await.unwrap();

        let mut req = request(dec!(200));
        req.method = PaymentMethod::Transfer;
        let created = create_expense(&db, &ctx, req.clone()).await.unwrap();
        assert_eq!(balance(&db, BANK_A).await, dec!(300));

        req.operator = "Luis".to_string();
        req.amount = dec!(50);
        let receipt = update_expense(&db, &ctx, created.expense.id, req)
            .await
            .unwrap();
        assert_eq!(receipt.account.id, BANK_B);
        assert_eq!(receipt.expense.amount, dec!(50));
        assert_eq!(receipt.expense.operator, Operator::Secondary);
        assert_eq!(receipt.expense.created_at, created.expense.created_at);
        assert_eq!(balance(&db, BANK_A).await, dec!(500));
        assert_eq!(balance(&db, BANK_B).await, dec!(50));
    }

    #[tokio::test]
    async fn test_move_expense_between_cash_accounts() {
        let (db, ctx) = setup().await;
        let cash_b = AccountId::Cash(Operator::Secondary);
        db.credit(CASH_A, dec!(1000)).await.unwrap();
        db.credit(cash_b, dec!(500)).await.unwrap();
        let created = create_expense(&db, &ctx, request(dec!(200))).await.unwrap();
        assert_eq!(balance(&db, CASH_A).await, dec!(800));

        let mut req = request(dec!(300));
        req.operator = "Luis".to_string();
        update_expense(&db, &ctx, created.expense.id, req).await.unwrap();
        assert_eq!(balance(&db, CASH_A).await, dec!(1000));
        assert_eq!(balance(&db, cash_b).await, dec!(200));
    }

    #[tokio::test]
    async fn test_update_same_account() {
        let (db, ctx) = setup().await;
        db.credit(CASH_A, dec!(250)).await.unwrap();
        let created = create_expense(&db, &ctx, request(dec!(200))).await.unwrap();

        // Old amount comes back before the new one is taken
        let receipt = update_expense(&db, &ctx, created.expense.id, request(dec!(250)))
            .await
            .unwrap();
        assert_eq!(receipt.account.balance, Decimal::ZERO);
        assert_eq!(balance(&db, CASH_A).await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_update_keeps_expense_date() {
        let (db, ctx) = setup().await;
        db.credit(CASH_A, dec!(1000)).await.unwrap();
        let mut req = request(dec!(200));
        req.spent_on = NaiveDate::from_ymd_opt(2024, 5, 1);
        let created = create_expense(&db, &ctx, req).await.unwrap();
        assert_eq!(created.expense.spent_on, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        let receipt = update_expense(&db, &ctx, created.expense.id, request(dec!(150)))
            .await
            .unwrap();
        assert_eq!(receipt.expense.spent_on, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(expenses(&db).await[0].spent_on, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        let mut req = request(dec!(150));
        req.spent_on = NaiveDate::from_ymd_opt(2024, 4, 30);
        let receipt = update_expense(&db, &ctx, created.expense.id, req).await.unwrap();
        assert_eq!(receipt.expense.spent_on, NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
    }

    #[tokio::test]
    async fn test_update_without_funds_restores_original() {
        let (db, ctx) = setup().await;
        db.credit(CASH_A, dec!(1000)).await.unwrap();
        db.credit(BANK_B, dec!(100)).await.unwrap();
        let created = create_expense(&db, &ctx, request(dec!(200))).await.unwrap();

        let mut req = request(dec!(300));
        req.method = PaymentMethod::Transfer;
        req.operator = "Luis".to_string();
        let err = update_expense(&db, &ctx, created.expense.id, req)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

        assert_eq!(balance(&db, CASH_A).await, dec!(800));
        assert_eq!(balance(&db, BANK_B).await, dec!(100));
        assert_eq!(expenses(&db).await, vec![created.expense]);
    }

    #[tokio::test]
    async fn test_failed_record_update_restores_balances() {
        let (db, ctx) = setup().await;
        db.credit(CASH_A, dec!(1000)).await.unwrap();
        db.credit(BANK_A, dec!(1000)).await.unwrap();
        let created = create_expense(&db, &ctx, request(dec!(200))).await.unwrap();
        let store = FailingStore::new(db, "update expense");

        let mut req = request(dec!(300));
        req.method = PaymentMethod::Transfer;
        let err = update_expense(&store, &ctx, created.expense.id, req)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(_)));

        assert_eq!(balance(&store.db, CASH_A).await, dec!(800));
        assert_eq!(balance(&store.db, BANK_A).await, dec!(1000));
        assert_eq!(expenses(&store.db).await, vec![created.expense]);
    }

    #[tokio::test]
    async fn test_update_missing_expense() {
        let (db, ctx) = setup().await;
        let err = update_expense(&db, &ctx, 99, request(dec!(10))).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { kind: "expense", .. }));
    }

    #[tokio::test]
    async fn test_delete_expense() {
        let (db, ctx) = setup().await;
        db.credit(CASH_A, dec!(1000)).await.unwrap();
        let created = create_expense(&db, &ctx, request(dec!(200))).await.unwrap();

        let receipt = delete_expense(&db, created.expense.id).await.unwrap();
        assert_eq!(receipt.account.balance, dec!(1000));
        assert_eq!(balance(&db, CASH_A).await, dec!(1000));
        assert!(expenses(&db).await.is_empty());

        let err = delete_expense(&db, created.expense.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_debit() {
        let (db, ctx) = setup().await;
        db.credit(CASH_A, dec!(1000)).await.unwrap();
        let created = create_expense(&db, &ctx, request(dec!(200))).await.unwrap();
        let store = FailingStore::new(db, "delete expense");

        let err = delete_expense(&store, created.expense.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(_)));
        assert_eq!(balance(&store.db, CASH_A).await, dec!(800));
        assert_eq!(expenses(&store.db).await, vec![created.expense]);
    }
}
