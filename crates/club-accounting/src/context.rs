use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use club_domain::{Operator, Operators, PriceConfig};

use crate::{
    clock::{Clock, SystemClock},
    LedgerError,
};

/// Everything a workflow needs besides the store:
/// who may operate, the fallback price list and the time.
#[derive(Clone)]
pub struct Context {
    pub operators: Operators,
    pub price_defaults: PriceConfig,
    pub clock: Arc<dyn Clock>,
}

impl Context {
    pub fn new(operators: Operators) -> Self {
        Context {
            operators,
            price_defaults: PriceConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(self, clock: impl Clock + 'static) -> Self {
        Context {
            clock: Arc::new(clock),
            ..self
        }
    }

    pub fn with_price_defaults(self, price_defaults: PriceConfig) -> Self {
        Context {
            price_defaults,
            ..self
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Check the name handed over by the session
    pub fn operator(&self, name: &str) -> Result<Operator, LedgerError> {
        self.operators.resolve(name).ok_or_else(|| {
            LedgerError::validation(format!(
                "unknown operator '{}', expected '{}' or '{}'",
                name, self.operators.primary, self.operators.secondary
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn test_context_operator() {
        let ctx = Context::new(Operators::new("Ana", "Luis"))
            .with_clock(FixedClock::on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert_eq!(ctx.operator("luis").unwrap(), Operator::Secondary);
        let err = ctx.operator("Pedro").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown operator 'Pedro', expected 'Ana' or 'Luis'"
        );
        assert_eq!(ctx.today(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
