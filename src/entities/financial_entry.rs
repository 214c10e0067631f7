//! Financial entry entity - A receivable or payable bookkeeping row.
//!
//! Recurring bills are expanded into independent rows at creation time
//! (`core::finance::create_entries`); there is no group id tying the
//! installments together afterwards.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Financial entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "financial_entries")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Entry type: `"receivable"` or `"payable"`
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Human-readable description; recurring installments carry an
    /// `" (i/n)"` suffix
    pub description: String,
    /// Amount as a decimal string
    pub amount: String,
    /// Date the entry falls due
    pub due_date: Date,
    /// Date the entry was settled, if it has been
    pub paid_date: Option<Date>,
    /// Entry status: `"open"`, `"paid"` or `"overdue"`
    pub status: String,
    /// Bookkeeping category
    pub category: String,
    /// Free-text observation
    pub observation: Option<String>,
    /// Optional client reference
    pub client_id: Option<i64>,
    /// Optional trip reference
    pub trip_id: Option<i64>,
    /// When the entry was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between FinancialEntry and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An entry may reference one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// An entry may reference one trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
