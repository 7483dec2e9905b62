use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, Operator, ParseError, PaymentMethod};

/// The two things a member pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charge {
    Dues,
    Insurance,
}

impl fmt::Display for Charge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Charge::Dues => f.write_str("dues"),
            Charge::Insurance => f.write_str("insurance"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuesType {
    Monthly,
    /// A monthly payment made after the due date, charged at a higher rate.
    OverdueMonthly,
    Quarterly,
}

impl DuesType {
    /// Number of months a payment covers.
    pub fn months(&self) -> u32 {
        match self {
            DuesType::Monthly | DuesType::OverdueMonthly => 1,
            DuesType::Quarterly => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DuesType::Monthly => "monthly",
            DuesType::OverdueMonthly => "overdue_monthly",
            DuesType::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for DuesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DuesType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(DuesType::Monthly),
            "overdue_monthly" => Ok(DuesType::OverdueMonthly),
            "quarterly" => Ok(DuesType::Quarterly),
            _ => Err(ParseError::new("dues type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceType {
    Semestral,
}

impl InsuranceType {
    pub fn months(&self) -> u32 {
        match self {
            InsuranceType::Semestral => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InsuranceType::Semestral => "semestral",
        }
    }
}

impl fmt::Display for InsuranceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for InsuranceType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semestral" => Ok(InsuranceType::Semestral),
            _ => Err(ParseError::new("insurance type", s)),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PaymentFilter {
    pub id: Option<u32>,
    pub member_id: Option<u32>,
    pub date_after: Option<NaiveDate>,
    pub date_before: Option<NaiveDate>,
}

/// A registered payment. Payments are never edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: u32,
    pub member_id: u32,
    pub member_name: String,
    pub dues_type: Option<DuesType>,
    pub dues_amount: Decimal,
    pub insurance_type: Option<InsuranceType>,
    pub insurance_amount: Decimal,
    pub total: Decimal,
    pub method: PaymentMethod,
    pub operator: Operator,
    pub paid_on: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl Payment {
    /// The account credited with this payment.
    pub fn account(&self) -> AccountId {
        AccountId::resolve(self.method, self.operator)
    }

    /// Get a description of what was paid for.
    pub fn describe(&self) -> String {
        match (self.dues_type, self.insurance_type) {
            (Some(dues), Some(insurance)) => format!("{} dues, {} insurance", dues, insurance),
            (Some(dues), None) => format!("{} dues", dues),
            (None, Some(insurance)) => format!("{} insurance", insurance),
            (None, None) => "nothing".to_string(),
        }
    }
}
