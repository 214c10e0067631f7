//! Trip entity - A named delivery batch that groups orders.
//!
//! Trips are never deleted; they are toggled between `"open"` and `"closed"`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Trip database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the trip
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable trip name
    pub name: String,
    /// First day of the trip
    pub start_date: Date,
    /// Last day of the trip, if already scheduled
    pub end_date: Option<Date>,
    /// Trip status: `"open"` or `"closed"`
    pub status: String,
}

/// Defines relationships between Trip and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One trip groups many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    /// One trip may be referenced by financial entries
    #[sea_orm(has_many = "super::financial_entry::Entity")]
    FinancialEntries,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::financial_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
