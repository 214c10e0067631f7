//! Client entity - A business customer of the order-management system.
//!
//! Clients own orders, custom prices, and messages; deleting a client
//! cascades over all of them (see `core::client::delete_client`). The
//! `tax_id` is the portal login credential and must stay unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Registered legal name
    pub legal_name: String,
    /// Trade name shown in the UI and portal
    pub trade_name: String,
    /// Tax id (CNPJ); unique per client after digit normalization
    pub tax_id: String,
    /// State registration number, if any
    pub state_registration: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// Street address
    pub street: String,
    /// Street number
    pub number: String,
    /// District / neighborhood
    pub district: Option<String>,
    /// City
    pub city: String,
    /// State / region code
    pub state: String,
    /// Contact phone numbers, free text
    pub phones: String,
    /// Contact email
    pub email: String,
    /// Name of the person responsible for the account
    pub contact_name: String,
    /// Inactive clients cannot log into the portal
    pub active: bool,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client has many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    /// One client has many custom prices
    #[sea_orm(has_many = "super::client_price::Entity")]
    Prices,
    /// One client has many messages
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::client_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prices.def()
    }
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
