use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, Operator, ParseError, PaymentMethod};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Electricity,
    Water,
    Cleaning,
    #[default]
    Maintenance,
    LawnCare,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Electricity,
        ExpenseCategory::Water,
        ExpenseCategory::Cleaning,
        ExpenseCategory::Maintenance,
        ExpenseCategory::LawnCare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Electricity => "electricity",
            ExpenseCategory::Water => "water",
            ExpenseCategory::Cleaning => "cleaning",
            ExpenseCategory::Maintenance => "maintenance",
            ExpenseCategory::LawnCare => "lawn_care",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseError::new("expense category", s))
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExpenseFilter {
    pub id: Option<u32>,
    pub category: Option<ExpenseCategory>,
    pub date_after: Option<NaiveDate>,
    pub date_before: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: u32,
    pub category: ExpenseCategory,
    pub detail: String,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub spent_on: NaiveDate,
    pub operator: Operator,
    pub created_at: NaiveDateTime,
}

impl Expense {
    /// The account debited with this expense.
    pub fn account(&self) -> AccountId {
        AccountId::resolve(self.method, self.operator)
    }
}
