//! Custom price business logic - per-(client, size) unit price overrides.
//!
//! Prices are decimal strings and are the only pricing source in the
//! system: order totals are computed from the client's current price table
//! at read time, so changing a price retroactively changes what existing
//! orders are worth. That is intended business behavior.

use crate::{
    entities::{ClientPrice, client_price},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Retrieves all price overrides for a client.
pub async fn get_client_prices(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Vec<client_price::Model>> {
    ClientPrice::find()
        .filter(client_price::Column::ClientId.eq(client_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates or overwrites the price for a (client, size) pair.
///
/// The price must parse as a non-negative decimal; it is stored as the
/// given string to avoid floating-point drift in the books.
pub async fn upsert_client_price(
    db: &DatabaseConnection,
    client_id: i64,
    size: &str,
    price: &str,
) -> Result<client_price::Model> {
    if size.trim().is_empty() {
        return Err(Error::validation("Size is required"));
    }
    match price.trim().parse::<f64>() {
        Ok(value) if value >= 0.0 && value.is_finite() => {}
        _ => return Err(Error::validation("Price must be a non-negative decimal")),
    }

    let existing = ClientPrice::find()
        .filter(client_price::Column::ClientId.eq(client_id))
        .filter(client_price::Column::Size.eq(size))
        .one(db)
        .await?;

    if let Some(row) = existing {
        let mut model: client_price::ActiveModel = row.into();
        model.price = Set(price.trim().to_string());
        return model.update(db).await.map_err(Into::into);
    }

    let model = client_price::ActiveModel {
        client_id: Set(client_id),
        size: Set(size.trim().to_string()),
        price: Set(price.trim().to_string()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Resolves the unit price for a size from an already-loaded price table.
/// Missing overrides and unparseable rows resolve to 0.
#[must_use]
pub fn resolve_unit_price(prices: &[client_price::Model], size: &str) -> f64 {
    prices
        .iter()
        .find(|p| p.size == size)
        .and_then(|p| p.price.parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_upsert_creates_then_overwrites() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme", "11222333000144").await?;

        let created = upsert_client_price(&db, client.id, "M", "12.50").await?;
        assert_eq!(created.price, "12.50");

        let overwritten = upsert_client_price(&db, client.id, "M", "15.00").await?;
        assert_eq!(overwritten.id, created.id);
        assert_eq!(overwritten.price, "15.00");

        let all = get_client_prices(&db, client.id).await?;
        assert_eq!(all.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_validates_price() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme", "11222333000144").await?;

        for bad in ["", "abc", "-1.0", "NaN"] {
            let result = upsert_client_price(&db, client.id, "M", bad).await;
            assert!(matches!(
                result.unwrap_err(),
                Error::Validation { message: _ }
            ));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_unit_price() {
        let prices = vec![
            client_price::Model {
                id: 1,
                client_id: 1,
                size: "M".to_string(),
                price: "12.50".to_string(),
            },
            client_price::Model {
                id: 2,
                client_id: 1,
                size: "G".to_string(),
                price: "not-a-number".to_string(),
            },
        ];

        assert_eq!(resolve_unit_price(&prices, "M"), 12.50);
        // Unparseable and missing sizes both resolve to zero
        assert_eq!(resolve_unit_price(&prices, "G"), 0.0);
        assert_eq!(resolve_unit_price(&prices, "P"), 0.0);
    }
}
