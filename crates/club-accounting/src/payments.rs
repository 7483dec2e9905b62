use anyhow::anyhow;
use chrono::NaiveDate;
use serde::Serialize;

use club_domain::{
    Account, AccountId, Balances, Charge, Delete, DuesType, Insert, InsuranceType, Member,
    Payment, PaymentMethod, PriceConfig, Retrieve, Update,
};

use crate::{
    dues::DuesRecord,
    ledger::{self, validate_amount},
    prices,
    saga::Saga,
    Context, LedgerError,
};

/// A payment as entered by an operator.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub member_id: u32,
    pub dues: Option<DuesType>,
    pub insurance: Option<InsuranceType>,
    pub method: PaymentMethod,
    /// Name of the operator collecting the money
    pub operator: String,
    /// Defaults to today
    pub paid_on: Option<NaiveDate>,
}

/// What a registered payment changed.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub member: Member,
    pub account: Account,
}

/// A charge can only be paid again once it is owed.
pub fn check_eligible(member: &Member, charge: Charge, today: NaiveDate) -> Result<(), LedgerError> {
    if member.can_pay(charge, today) {
        return Ok(());
    }
    match member.due_date(charge) {
        Some(due) => Err(LedgerError::Eligibility {
            member: member.full_name(),
            charge,
            due,
        }),
        None => Ok(()),
    }
}

/// Register a payment of dues and/or insurance.
///
/// The payment is stored, the operator's account for the payment
/// method is credited and the member's due dates move forward.
/// If any of these steps fails the others are undone.
pub async fn record_payment<DB>(
    db: &DB,
    ctx: &Context,
    request: PaymentRequest,
) -> Result<PaymentReceipt, LedgerError>
where
    DB: Retrieve<Member, Key = u32>
        + Update<Member>
        + Retrieve<PriceConfig, Key = ()>
        + Insert<Payment>
        + Delete<Payment>
        + Balances
        + Sync,
{
    if request.dues.is_none() && request.insurance.is_none() {
        return Err(LedgerError::validation(
            "nothing to pay, select dues and/or insurance",
        ));
    }
    let operator = ctx.operator(&request.operator)?;

    let member = Retrieve::<Member>::retrieve(db, request.member_id)
        .await
        .map_err(LedgerError::lookup("member", request.member_id))?;
    if !member.active {
        return Err(LedgerError::validation(format!(
            "{} is not an active member",
            member.full_name()
        )));
    }

    let today = ctx.today();
    if request.dues.is_some() {
        check_eligible(&member, Charge::Dues, today)?;
    }
    if request.insurance.is_some() {
        check_eligible(&member, Charge::Insurance, today)?;
    }

    let prices = prices::load(db, &ctx.price_defaults).await?;
    let dues_amount = request
        .dues
        .map(|dues| prices.dues_amount(dues))
        .unwrap_or_default();
    let insurance_amount = request
        .insurance
        .map(|insurance| prices.insurance_amount(insurance))
        .unwrap_or_default();
    let total = dues_amount + insurance_amount;
    validate_amount(total)?;

    let paid_on = request.paid_on.unwrap_or(today);
    let account_id = AccountId::resolve(request.method, operator);
    tracing::info!(
        member = member.id,
        %total,
        account = %account_id,
        %paid_on,
        "recording payment"
    );

    let mut saga = Saga::new("payment");
    let payment = saga
        .step(db.insert(Payment {
            member_id: member.id,
            member_name: member.full_name(),
            dues_type: request.dues,
            dues_amount,
            insurance_type: request.insurance,
            insurance_amount,
            total,
            method: request.method,
            operator,
            paid_on,
            created_at: ctx.now(),
            ..Default::default()
        }))
        .await?;
    let stored = payment.clone();
    saga.compensate("remove payment", async move { db.delete(stored).await });

    let account = saga.step(ledger::credit(db, account_id, total)).await?;
    saga.compensate("take back credit", async move {
        match db.debit(account_id, total).await? {
            Some(_) => Ok(()),
            None => Err(anyhow!("{} no longer holds {}", account_id, total)),
        }
    });

    let member = member.apply_payment(request.dues, request.insurance, paid_on, today);
    let member = saga.step(db.update(member)).await?;
    saga.commit();

    Ok(PaymentReceipt {
        payment,
        member,
        account,
    })
}
