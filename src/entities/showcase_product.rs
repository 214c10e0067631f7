//! Showcase product entity - Marketing-site catalog content.
//!
//! Unrelated to the order-management `product` table; pure CRUD.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Showcase product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "showcase_products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Marketing description
    pub description: Option<String>,
    /// Display category
    pub category: String,
    /// Uploaded image path, if any
    pub image_url: Option<String>,
    /// Only active products appear on the public site
    pub active: bool,
    /// Ascending display order
    pub sort_order: i32,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// Showcase products have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
