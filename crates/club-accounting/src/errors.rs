use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error as ThisError;

use club_domain::{Charge, QueryError};

/// Why a ledger operation was rejected.
/// Rejected operations leave no changes behind.
#[derive(ThisError, Debug)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error(
        "insufficient funds in {account}: \
        {available} available, {requested} requested"
    )]
    InsufficientFunds {
        account: String,
        available: Decimal,
        requested: Decimal,
    },

    #[error("can not transfer from {0} to itself")]
    InvalidTransfer(String),

    #[error("{member} already paid {charge}, next payment due after {due}")]
    Eligibility {
        member: String,
        charge: Charge,
        due: NaiveDate,
    },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    /// Map a storage error of a lookup, a missing row
    /// becomes `NotFound`.
    pub fn lookup(
        kind: &'static str,
        id: impl fmt::Display,
    ) -> impl FnOnce(anyhow::Error) -> LedgerError {
        let id = id.to_string();
        move |err| {
            if QueryError::is_not_found(&err) {
                LedgerError::NotFound { kind, id }
            } else {
                LedgerError::Persistence(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_maps_not_found() {
        let err = LedgerError::lookup("member", 23)(QueryError::NotFound.into());
        assert!(matches!(err, LedgerError::NotFound { kind: "member", ref id } if id == "23"));
        assert_eq!(err.to_string(), "member 23 not found");

        let err = LedgerError::lookup("member", 23)(anyhow::anyhow!("disk on fire"));
        assert!(matches!(err, LedgerError::Persistence(_)));
    }

    #[test]
    fn test_messages() {
        let err = LedgerError::InsufficientFunds {
            account: "Cash - Ana".to_string(),
            available: Decimal::from(1000),
            requested: Decimal::from(1500),
        };
        assert_eq!(
            err.to_string(),
            "insufficient funds in Cash - Ana: 1000 available, 1500 requested"
        );

        let err = LedgerError::Eligibility {
            member: "Juan Perez".to_string(),
            charge: Charge::Dues,
            due: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Juan Perez already paid dues, next payment due after 2024-02-10"
        );
    }
}
