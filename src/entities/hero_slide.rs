//! Hero slide entity - Rotating banner content for the marketing site.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Hero slide database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hero_slides")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Slide headline
    pub title: String,
    /// Secondary line under the headline
    pub subtitle: Option<String>,
    /// Call-to-action button label
    pub button_text: Option<String>,
    /// Call-to-action button target
    pub button_link: Option<String>,
    /// Background image path
    pub image_url: Option<String>,
    /// Ascending display order
    pub sort_order: i32,
    /// Only active slides appear on the public site
    pub active: bool,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// Hero slides have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
