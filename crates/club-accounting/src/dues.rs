use chrono::NaiveDate;

use club_domain::{Charge, DuesType, InsuranceType, Member};

use crate::periods::{due_date, is_debtor};

/// The dues and insurance state of a member.
pub trait DuesRecord {
    /// Record a payment: for every charge that was paid, set the
    /// payment date, the next due date and the debtor flag for `today`.
    /// Charges not paid are left as they are.
    fn apply_payment(
        self,
        dues: Option<DuesType>,
        insurance: Option<InsuranceType>,
        paid_on: NaiveDate,
        today: NaiveDate,
    ) -> Member;

    /// Recompute both debtor flags for `today`.
    fn refresh_status(self, today: NaiveDate) -> Member;

    fn due_date(&self, charge: Charge) -> Option<NaiveDate>;

    /// A charge can be paid if it was never paid before,
    /// or if the member owes it.
    fn can_pay(&self, charge: Charge, today: NaiveDate) -> bool {
        match self.due_date(charge) {
            None => true,
            due => is_debtor(due, today),
        }
    }
}

impl DuesRecord for Member {
    fn apply_payment(
        self,
        dues: Option<DuesType>,
        insurance: Option<InsuranceType>,
        paid_on: NaiveDate,
        today: NaiveDate,
    ) -> Member {
        let mut member = self;
        if let Some(dues) = dues {
            let due = due_date(paid_on, &dues);
            member.last_dues_payment = Some(paid_on);
            member.dues_due = Some(due);
            member.dues_debtor = is_debtor(Some(due), today);
        }
        if let Some(insurance) = insurance {
            let due = due_date(paid_on, &insurance);
            member.last_insurance_payment = Some(paid_on);
            member.insurance_due = Some(due);
            member.insurance_debtor = is_debtor(Some(due), today);
        }
        member
    }

    fn refresh_status(self, today: NaiveDate) -> Member {
        Member {
            dues_debtor: is_debtor(self.dues_due, today),
            insurance_debtor: is_debtor(self.insurance_due, today),
            ..self
        }
    }

    fn due_date(&self, charge: Charge) -> Option<NaiveDate> {
        match charge {
            Charge::Dues => self.dues_due,
            Charge::Insurance => self.insurance_due,
        }
    }
}
