//! Client price entity - Per-client unit price override for a size category.
//!
//! Logically unique on (`client_id`, `size`); `core::price::upsert_client_price`
//! enforces create-or-overwrite semantics. Prices are stored as decimal
//! strings and parsed only when order totals are computed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client price database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_prices")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the price row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Client this override belongs to
    pub client_id: i64,
    /// Product size category the price applies to
    pub size: String,
    /// Unit price as a decimal string
    pub price: String,
}

/// Defines relationships between ClientPrice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each price belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
