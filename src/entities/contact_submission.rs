//! Contact submission entity - A message sent through the public contact form.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contact submission database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_submissions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Sender name
    pub name: String,
    /// Sender email, if given
    pub email: Option<String>,
    /// Sender phone, if given
    pub phone: Option<String>,
    /// Message subject
    pub subject: String,
    /// Message body
    pub message: String,
    /// Whether staff has read the submission
    pub read: bool,
    /// When the submission arrived
    pub created_at: DateTimeUtc,
}

/// Contact submissions have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
