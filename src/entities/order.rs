//! Order entity - A client's order, optionally assigned to a delivery trip.
//!
//! The lifecycle is carried by an explicit [`OrderStatus`] column kept
//! consistent with `trip_id`: portal submissions start as `pending` with no
//! trip, staff-created orders and approved orders are `assigned`. Unit
//! prices are never stored here; totals are resolved at read time from the
//! client's price table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Client-submitted, waiting for staff review; `trip_id` is null
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Assigned to a trip (staff-created or approved)
    #[sea_orm(string_value = "assigned")]
    Assigned,
}

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Trip the order is assigned to; null while pending
    pub trip_id: Option<i64>,
    /// Client that owns the order
    pub client_id: i64,
    /// Who created the order: `"admin"` (staff) or `"client"` (portal)
    pub source: String,
    /// Lifecycle state, kept consistent with `trip_id`
    pub status: OrderStatus,
    /// Whether the order has been paid
    pub paid: bool,
    /// Free-text payment method
    pub payment_method: Option<String>,
    /// Free-text payment observation
    pub observation: Option<String>,
    /// When the order was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// Each order may belong to one trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
    /// One order has many items
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
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

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
