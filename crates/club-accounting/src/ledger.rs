use std::collections::HashMap;

use anyhow::anyhow;
use rust_decimal::Decimal;
use serde::Serialize;

use club_domain::{
    Account, AccountFilter, AccountId, Balances, Expense, ExpenseFilter, Insert, Payment,
    PaymentFilter, Query, Retrieve, Transfer, TransferFilter,
};

use crate::{saga::Saga, Context, LedgerError};

/// Amounts moved through the ledger must be positive
/// and have at most two decimal places.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    if amount.normalize().scale() > 2 {
        return Err(LedgerError::validation(format!(
            "amount {} has more than two decimal places",
            amount
        )));
    }
    Ok(())
}

/// Describe a rejected debit with the current state of the account.
async fn insufficient_funds<DB>(db: &DB, id: AccountId, requested: Decimal) -> LedgerError
where
    DB: Retrieve<Account, Key = AccountId> + Sync,
{
    match Retrieve::<Account>::retrieve(db, id).await {
        Ok(account) => LedgerError::InsufficientFunds {
            account: account.name,
            available: account.balance,
            requested,
        },
        Err(err) => LedgerError::lookup("account", id)(err),
    }
}

/// Add money to an account. Crediting never fails for lack of funds.
pub async fn credit<DB>(db: &DB, id: AccountId, amount: Decimal) -> Result<Account, LedgerError>
where
    DB: Balances + Sync,
{
    validate_amount(amount)?;
    let account = db
        .credit(id, amount)
        .await
        .map_err(LedgerError::lookup("account", id))?;
    tracing::info!(account = %id, %amount, balance = %account.balance, "credit");
    Ok(account)
}

/// Take money from an account. Fails with `InsufficientFunds`
/// if the balance does not cover the amount.
pub async fn debit<DB>(db: &DB, id: AccountId, amount: Decimal) -> Result<Account, LedgerError>
where
    DB: Balances + Retrieve<Account, Key = AccountId> + Sync,
{
    validate_amount(amount)?;
    let account = db
        .debit(id, amount)
        .await
        .map_err(LedgerError::lookup("account", id))?;
    match account {
        Some(account) => {
            tracing::info!(account = %id, %amount, balance = %account.balance, "debit");
            Ok(account)
        }
        None => Err(insufficient_funds(db, id, amount).await),
    }
}

/// Move money between two accounts and log the transfer.
/// Both balances change together or not at all.
pub async fn transfer<DB>(
    db: &DB,
    ctx: &Context,
    from: AccountId,
    to: AccountId,
    amount: Decimal,
    note: &str,
) -> Result<Transfer, LedgerError>
where
    DB: Balances + Retrieve<Account, Key = AccountId> + Insert<Transfer> + Sync,
{
    if from == to {
        return Err(LedgerError::InvalidTransfer(from.to_string()));
    }
    validate_amount(amount)?;

    let moved = db
        .transfer(from, to, amount)
        .await
        .map_err(LedgerError::lookup("account", format!("{} or {}", from, to)))?;
    if moved.is_none() {
        return Err(insufficient_funds(db, from, amount).await);
    }

    let mut saga = Saga::new("transfer");
    saga.compensate("move money back", async move {
        match db.transfer(to, from, amount).await? {
            Some(_) => Ok(()),
            None => Err(anyhow!("{} can no longer cover {}", to, amount)),
        }
    });
    let transfer = saga
        .step(db.insert(Transfer {
            from_account: from,
            to_account: to,
            amount,
            note: note.trim().to_string(),
            created_at: ctx.now(),
            ..Default::default()
        }))
        .await?;
    saga.commit();

    tracing::info!(%from, %to, %amount, "transfer");
    Ok(transfer)
}

/// Open the five accounts of the club, unless they exist.
/// Safe to call on every start: existing accounts keep their balance.
pub async fn initialize<DB>(db: &DB, ctx: &Context) -> Result<Vec<Account>, LedgerError>
where
    DB: Balances + Query<Account, Filter = AccountFilter> + Sync,
{
    for id in AccountId::ALL {
        let account = Account::open(id, &ctx.operators, ctx.now());
        if db.create_if_absent(account).await? {
            tracing::info!(account = %id, "opened account");
        }
    }
    let accounts: Vec<Account> = db.query(&AccountFilter::default()).await?;
    Ok(accounts)
}

/// Stored and recomputed balance of an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub account: AccountId,
    pub name: String,
    pub recorded: Decimal,
    pub expected: Decimal,
}

impl Reconciliation {
    pub fn difference(&self) -> Decimal {
        self.recorded - self.expected
    }

    pub fn is_balanced(&self) -> bool {
        self.difference().is_zero()
    }
}

/// Replay the history: payments credit, expenses debit,
/// transfers move money between accounts.
pub fn expected_balances(
    payments: &[Payment],
    expenses: &[Expense],
    transfers: &[Transfer],
) -> HashMap<AccountId, Decimal> {
    let mut balances: HashMap<AccountId, Decimal> =
        AccountId::ALL.into_iter().map(|id| (id, Decimal::ZERO)).collect();

    for payment in payments {
        *balances.entry(payment.account()).or_default() += payment.total;
    }
    for expense in expenses {
        *balances.entry(expense.account()).or_default() -= expense.amount;
    }
    for transfer in transfers {
        *balances.entry(transfer.from_account).or_default() -= transfer.amount;
        *balances.entry(transfer.to_account).or_default() += transfer.amount;
    }
    balances
}

/// Check the stored balances against the recorded history.
pub async fn reconcile<DB>(db: &DB) -> Result<Vec<Reconciliation>, LedgerError>
where
    DB: Query<Account, Filter = AccountFilter>
        + Query<Payment, Filter = PaymentFilter>
        + Query<Expense, Filter = ExpenseFilter>
        + Query<Transfer, Filter = TransferFilter>
        + Sync,
{
    let accounts = Query::<Account>::query(db, &AccountFilter::default()).await?;
    let payments = Query::<Payment>::query(db, &PaymentFilter::default()).await?;
    let expenses = Query::<Expense>::query(db, &ExpenseFilter::default()).await?;
    let transfers = Query::<Transfer>::query(db, &TransferFilter::default()).await?;

    let expected = expected_balances(&payments, &expenses, &transfers);
    let report: Vec<Reconciliation> = accounts
        .into_iter()
        .map(|account| Reconciliation {
            expected: expected.get(&account.id).copied().unwrap_or_default(),
            account: account.id,
            name: account.name,
            recorded: account.balance,
        })
        .collect();

    for r in report.iter().filter(|r| !r.is_balanced()) {
        tracing::warn!(
            account = %r.account,
            recorded = %r.recorded,
            expected = %r.expected,
            "balance does not match history"
        );
    }
    Ok(report)
}
