use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Operator, Operators, ParseError};

/// How money was handed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "transfer" => Ok(PaymentMethod::Transfer),
            _ => Err(ParseError::new("payment method", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Cash,
    Transfer,
    FixedTermDeposit,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            AccountKind::Cash => "cash",
            AccountKind::Transfer => "transfer",
            AccountKind::FixedTermDeposit => "fixed-term deposit",
        };
        f.write_str(kind)
    }
}

/// The five accounts of the club.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AccountId {
    #[default]
    FixedTermDeposit,
    Cash(Operator),
    Transfer(Operator),
}

impl AccountId {
    pub const ALL: [AccountId; 5] = [
        AccountId::Cash(Operator::Primary),
        AccountId::Cash(Operator::Secondary),
        AccountId::Transfer(Operator::Primary),
        AccountId::Transfer(Operator::Secondary),
        AccountId::FixedTermDeposit,
    ];

    /// The account a payment or an expense moves money in.
    /// The fixed-term deposit is only reachable through transfers.
    pub fn resolve(method: PaymentMethod, operator: Operator) -> Self {
        match method {
            PaymentMethod::Cash => AccountId::Cash(operator),
            PaymentMethod::Transfer => AccountId::Transfer(operator),
        }
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            AccountId::Cash(_) => AccountKind::Cash,
            AccountId::Transfer(_) => AccountKind::Transfer,
            AccountId::FixedTermDeposit => AccountKind::FixedTermDeposit,
        }
    }

    pub fn owner(&self) -> Option<Operator> {
        match self {
            AccountId::Cash(op) | AccountId::Transfer(op) => Some(*op),
            AccountId::FixedTermDeposit => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountId::Cash(Operator::Primary) => "cash_primary",
            AccountId::Cash(Operator::Secondary) => "cash_secondary",
            AccountId::Transfer(Operator::Primary) => "transfer_primary",
            AccountId::Transfer(Operator::Secondary) => "transfer_secondary",
            AccountId::FixedTermDeposit => "fixed_term_deposit",
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AccountId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ParseError::new("account", s))
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.as_str().to_string()
    }
}

impl TryFrom<String> for AccountId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AccountFilter {
    pub id: Option<AccountId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub owner: String,
    pub balance: Decimal,
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// A new, empty account with a name derived from its owner.
    pub fn open(id: AccountId, operators: &Operators, now: NaiveDateTime) -> Self {
        let owner = match id.owner() {
            Some(op) => operators.name(op).to_string(),
            None => "Shared".to_string(),
        };
        let name = match id.kind() {
            AccountKind::Cash => format!("Cash - {}", owner),
            AccountKind::Transfer => format!("Transfer - {}", owner),
            AccountKind::FixedTermDeposit => "Fixed-term deposit".to_string(),
        };
        Account {
            id,
            name,
            owner,
            balance: Decimal::ZERO,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> AccountKind {
        self.id.kind()
    }
}
