//! Product business logic - catalog CRUD with deletion guarded by usage.
//!
//! Products referenced by order items cannot be deleted; the check is done
//! explicitly before the delete, and a storage-level foreign-key violation
//! is remapped to the same error as a backstop.

use crate::{
    entities::{OrderItem, Product, order_item, product},
    errors::{Error, Result, is_foreign_key_violation},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Input for creating or fully replacing a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductInput {
    pub name: String,
    pub color: String,
    pub size: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

fn validate(input: &ProductInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("Product name is required"));
    }
    if input.size.trim().is_empty() {
        return Err(Error::validation("Product size is required"));
    }
    Ok(())
}

/// Retrieves all products, newest first.
pub async fn get_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_desc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves only active products, for the client portal.
pub async fn get_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::Active.eq(true))
        .order_by_desc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by its unique ID.
pub async fn get_product(db: &DatabaseConnection, id: i64) -> Result<Option<product::Model>> {
    Product::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Creates a new product.
pub async fn create_product(
    db: &DatabaseConnection,
    input: ProductInput,
) -> Result<product::Model> {
    validate(&input)?;

    let model = product::ActiveModel {
        name: Set(input.name.trim().to_string()),
        color: Set(input.color.trim().to_string()),
        size: Set(input.size.trim().to_string()),
        active: Set(input.active),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Fully replaces a product's fields.
pub async fn update_product(
    db: &DatabaseConnection,
    id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    validate(&input)?;

    let mut model: product::ActiveModel = Product::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id })?
        .into();

    model.name = Set(input.name.trim().to_string());
    model.color = Set(input.color.trim().to_string());
    model.size = Set(input.size.trim().to_string());
    model.active = Set(input.active);
    model.update(db).await.map_err(Into::into)
}

/// Deletes a product unless order items still reference it.
///
/// References block the delete with [`Error::ProductInUse`], which the HTTP
/// layer surfaces as a descriptive 400 rather than a raw constraint error.
pub async fn delete_product(db: &DatabaseConnection, id: i64) -> Result<()> {
    Product::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id })?;

    let references = OrderItem::find()
        .filter(order_item::Column::ProductId.eq(id))
        .count(db)
        .await?;
    if references > 0 {
        return Err(Error::ProductInUse);
    }

    match Product::delete_by_id(id).exec(db).await {
        Ok(_) => Ok(()),
        Err(err) if is_foreign_key_violation(&err) => Err(Error::ProductInUse),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::order;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_product(
            &db,
            ProductInput {
                name: "  ".to_string(),
                color: "Blue".to_string(),
                size: "M".to_string(),
                active: true,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_product_crud() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_test_product(&db, "M", "Blue").await?;
        assert!(created.active);

        let updated = update_product(
            &db,
            created.id,
            ProductInput {
                name: created.name.clone(),
                color: "Red".to_string(),
                size: "G".to_string(),
                active: false,
            },
        )
        .await?;
        assert_eq!(updated.color, "Red");
        assert!(!updated.active);

        let listed = get_products(&db).await?;
        assert_eq!(listed.len(), 1);

        delete_product(&db, created.id).await?;
        assert!(get_product(&db, created.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_active_products_filter() -> Result<()> {
        let db = setup_test_db().await?;
        let active = create_test_product(&db, "M", "Blue").await?;
        let inactive = create_test_product(&db, "G", "Red").await?;
        update_product(
            &db,
            inactive.id,
            ProductInput {
                name: inactive.name,
                color: inactive.color,
                size: inactive.size,
                active: false,
            },
        )
        .await?;

        let visible = get_active_products(&db).await?;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, active.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_in_use() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme", "11222333000144").await?;
        let trip = create_test_trip(&db, "April run").await?;
        let product = create_test_product(&db, "M", "Blue").await?;

        order::create_order(
            &db,
            order::CreateOrderRequest {
                client_id: client.id,
                trip_id: Some(trip.id),
                source: "admin".to_string(),
                items: vec![order::ItemInput {
                    product_id: product.id,
                    quantity: 1,
                }],
            },
        )
        .await?;

        let result = delete_product(&db, product.id).await;
        assert!(matches!(result.unwrap_err(), Error::ProductInUse));

        // Product survived the failed delete
        assert!(get_product(&db, product.id).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_product() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_product(&db, 7).await;
        assert!(matches!(result.unwrap_err(), Error::ProductNotFound { id: 7 }));
        Ok(())
    }
}
