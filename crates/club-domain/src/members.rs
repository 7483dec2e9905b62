use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemberFilter {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub active: Option<bool>,
    pub debtor: Option<bool>,
}

/// A club member and the state of their dues and insurance.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Member {
    pub id: u32,
    pub name: String,
    pub surname: String,

    pub last_dues_payment: Option<NaiveDate>,
    pub dues_due: Option<NaiveDate>,
    pub dues_debtor: bool,

    pub last_insurance_payment: Option<NaiveDate>,
    pub insurance_due: Option<NaiveDate>,
    pub insurance_debtor: bool,

    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl Member {
    /// A newly registered member: active, nothing paid, owing nothing.
    pub fn new(name: &str, surname: &str, now: NaiveDateTime) -> Self {
        Member {
            name: name.trim().to_string(),
            surname: surname.trim().to_string(),
            active: true,
            created_at: now,
            ..Default::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn is_debtor(&self) -> bool {
        self.dues_debtor || self.insurance_debtor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_new() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let member = Member::new(" Juan ", "Perez", now);
        assert_eq!(member.full_name(), "Juan Perez");
        assert!(member.active);
        assert!(!member.is_debtor());
        assert_eq!(member.dues_due, None);
        assert_eq!(member.insurance_due, None);
        assert_eq!(member.created_at, now);
    }
}
