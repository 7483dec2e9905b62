use anyhow::{anyhow, bail, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Amounts are stored as integer cents, so the database can do
/// balance arithmetic itself.
pub fn to_cents(amount: Decimal) -> Result<i64> {
    let cents = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| anyhow!("amount {} is out of range", amount))?;
    if !cents.fract().is_zero() {
        bail!("amount {} has more than two decimal places", amount);
    }
    cents
        .to_i64()
        .ok_or_else(|| anyhow!("amount {} is out of range", amount))
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cents() {
        assert_eq!(to_cents(dec!(1500)).unwrap(), 150000);
        assert_eq!(to_cents(dec!(23.42)).unwrap(), 2342);
        assert_eq!(to_cents(dec!(-0.5)).unwrap(), -50);
        assert!(to_cents(dec!(0.125)).is_err());
        assert!(to_cents(Decimal::MAX).is_err());
        assert!(to_cents(dec!(100000000000000000)).is_err());

        assert_eq!(from_cents(150000), dec!(1500));
        assert_eq!(from_cents(2342), dec!(23.42));
        assert_eq!(from_cents(0), Decimal::ZERO);
    }
}
