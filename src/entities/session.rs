//! Session entity - A server-side session row keyed by an opaque token.
//!
//! One row per issued login. Staff sessions set `user_id`, portal sessions
//! set `client_id`. Rows are removed on logout and lazily discarded once
//! `expires_at` has passed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Opaque session token (UUID string) handed to the client
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    /// Staff user id, for staff sessions
    pub user_id: Option<String>,
    /// Portal client id, for client sessions
    pub client_id: Option<i64>,
    /// When the session was issued
    pub created_at: DateTimeUtc,
    /// When the session stops being accepted
    pub expires_at: DateTimeUtc,
}

/// Sessions have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
