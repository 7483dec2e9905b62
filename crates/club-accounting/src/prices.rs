use rust_decimal::Decimal;

use club_domain::{PriceConfig, QueryError, Retrieve, Update};

use crate::{ledger::validate_amount, LedgerError};

/// Get the stored price list, or the defaults if
/// prices were never configured.
pub async fn load<DB>(db: &DB, defaults: &PriceConfig) -> Result<PriceConfig, LedgerError>
where
    DB: Retrieve<PriceConfig, Key = ()> + Sync,
{
    match db.retrieve(()).await {
        Ok(prices) => Ok(prices),
        Err(err) if QueryError::is_not_found(&err) => {
            tracing::debug!("no stored prices, using defaults");
            Ok(defaults.clone())
        }
        Err(err) => Err(err.into()),
    }
}

pub fn validate(prices: &PriceConfig) -> Result<(), LedgerError> {
    let amounts: [(&str, Decimal); 4] = [
        ("quarterly", prices.quarterly),
        ("monthly", prices.monthly),
        ("overdue monthly", prices.overdue_monthly),
        ("semestral", prices.semestral),
    ];
    for (name, amount) in amounts {
        validate_amount(amount)
            .map_err(|err| LedgerError::validation(format!("{} price: {}", name, err)))?;
    }
    Ok(())
}

/// Replace the price list.
pub async fn store<DB>(db: &DB, prices: PriceConfig) -> Result<PriceConfig, LedgerError>
where
    DB: Update<PriceConfig> + Sync,
{
    validate(&prices)?;
    let prices = db.update(prices).await?;
    tracing::info!(
        quarterly = %prices.quarterly,
        monthly = %prices.monthly,
        overdue_monthly = %prices.overdue_monthly,
        semestral = %prices.semestral,
        "updated prices"
    );
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use club_db::Connection;

    use super::*;

    #[tokio::test]
    async fn test_load_falls_back_to_defaults() {
        let db = Connection::open_test().await;
        let defaults = PriceConfig {
            monthly: dec!(1),
            ..PriceConfig::default()
        };
        assert_eq!(load(&db, &defaults).await.unwrap(), defaults);

        let stored = store(&db, PriceConfig::default()).await.unwrap();
        assert_eq!(load(&db, &defaults).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_store_rejects_non_positive() {
        let db = Connection::open_test().await;
        let err = store(
            &db,
            PriceConfig {
                semestral: Decimal::ZERO,
                ..PriceConfig::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(err.to_string().starts_with("semestral price:"));
        assert_eq!(
            load(&db, &PriceConfig::default()).await.unwrap(),
            PriceConfig::default()
        );
    }
}
