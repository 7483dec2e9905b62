use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{DuesType, InsuranceType};

/// The price list for dues and insurance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceConfig {
    pub quarterly: Decimal,
    pub monthly: Decimal,
    pub overdue_monthly: Decimal,
    pub semestral: Decimal,
}

impl Default for PriceConfig {
    fn default() -> Self {
        PriceConfig {
            quarterly: Decimal::from(110_000),
            monthly: Decimal::from(45_000),
            overdue_monthly: Decimal::from(50_000),
            semestral: Decimal::from(15_000),
        }
    }
}

impl PriceConfig {
    pub fn dues_amount(&self, dues: DuesType) -> Decimal {
        match dues {
            DuesType::Monthly => self.monthly,
            DuesType::OverdueMonthly => self.overdue_monthly,
            DuesType::Quarterly => self.quarterly,
        }
    }

    pub fn insurance_amount(&self, insurance: InsuranceType) -> Decimal {
        match insurance {
            InsuranceType::Semestral => self.semestral,
        }
    }
}
