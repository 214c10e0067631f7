//! Site setting entity - Key-value configuration for the marketing site.
//! Keys are unique; writes go through upsert semantics.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Site setting database model - stores key-value configuration pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_settings")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Setting key (e.g. `"siteUrl"`); unique
    #[sea_orm(unique)]
    pub key: String,
    /// Setting value stored as string
    pub value: String,
}

/// Site settings have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
