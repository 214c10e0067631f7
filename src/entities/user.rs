//! User entity - A staff account with role and per-module permissions.
//!
//! `role` is `"admin"` or `"global_admin"`; a global admin bypasses the
//! stored permission set entirely. Permissions are stored as a JSON array
//! of module keys (see `core::user::ALL_MODULES`) serialized to text.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff user database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier (UUID string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Login email; unique when present
    pub email: Option<String>,
    /// Login username; unique when present
    pub username: Option<String>,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// bcrypt hash of the password; never serialized to clients
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Role: `"admin"` or `"global_admin"`
    pub role: String,
    /// JSON array of granted module keys
    pub permissions: String,
    /// When the account was created
    pub created_at: DateTimeUtc,
    /// When the account was last modified
    pub updated_at: DateTimeUtc,
}

/// Users have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parses the stored permission JSON into a list of module keys.
    /// Malformed rows read as an empty set rather than failing the request.
    #[must_use]
    pub fn permission_list(&self) -> Vec<String> {
        serde_json::from_str(&self.permissions).unwrap_or_default()
    }

    /// Whether the user is a global administrator.
    #[must_use]
    pub fn is_global_admin(&self) -> bool {
        self.role == "global_admin"
    }
}
