use chrono::{Months, NaiveDate};

use club_domain::{DuesType, InsuranceType};

/// A charge that covers a number of calendar months.
pub trait Period {
    fn months(&self) -> u32;
}

impl Period for DuesType {
    fn months(&self) -> u32 {
        DuesType::months(self)
    }
}

impl Period for InsuranceType {
    fn months(&self) -> u32 {
        InsuranceType::months(self)
    }
}

/// The date until which a payment covers the member.
/// Adding months keeps the day of the month, clamped to the
/// last day of the target month (Jan 31 + 1 month = Feb 28/29).
pub fn due_date<P: Period>(paid_on: NaiveDate, period: &P) -> NaiveDate {
    paid_on
        .checked_add_months(Months::new(period.months()))
        .unwrap_or(NaiveDate::MAX)
}

/// A member is a debtor once the due date has passed.
/// Nothing due yet means nothing owed. The due date itself
/// still counts as covered.
pub fn is_debtor(due: Option<NaiveDate>, today: NaiveDate) -> bool {
    match due {
        Some(due) => today > due,
        None => false,
    }
}
