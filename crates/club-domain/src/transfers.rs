use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AccountId;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransferFilter {
    /// Transfers from or to this account
    pub account: Option<AccountId>,
}

/// A manual movement of money between two accounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: u32,
    pub from_account: AccountId,
    pub to_account: AccountId,
    pub amount: Decimal,
    pub note: String,
    pub created_at: NaiveDateTime,
}
