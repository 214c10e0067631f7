//! Messaging business logic - the thread between staff and each client.
//!
//! A message carries a direction (`"admin_to_client"` or
//! `"client_to_admin"`) instead of sender ids; there is exactly one staff
//! inbox, so the direction fully identifies both ends.

use crate::{
    entities::{Client, Message, message},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Directions a message can travel.
pub const DIRECTIONS: [&str; 2] = ["admin_to_client", "client_to_admin"];

/// Records a message in a client's thread.
pub async fn create_message(
    db: &DatabaseConnection,
    client_id: i64,
    content: &str,
    direction: &str,
) -> Result<message::Model> {
    if content.trim().is_empty() {
        return Err(Error::validation("Message content is required"));
    }
    if !DIRECTIONS.contains(&direction) {
        return Err(Error::validation(
            "Message direction must be admin_to_client or client_to_admin",
        ));
    }
    Client::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })?;

    let model = message::ActiveModel {
        client_id: Set(client_id),
        content: Set(content.trim().to_string()),
        direction: Set(direction.to_string()),
        read: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Retrieves messages newest first, optionally restricted to one client's
/// thread.
pub async fn get_messages(
    db: &DatabaseConnection,
    client_id: Option<i64>,
) -> Result<Vec<message::Model>> {
    let mut query = Message::find().order_by_desc(message::Column::CreatedAt);
    if let Some(client_id) = client_id {
        query = query.filter(message::Column::ClientId.eq(client_id));
    }
    query.all(db).await.map_err(Into::into)
}

/// Counts unread client-to-staff messages, for the staff inbox badge.
pub async fn unread_count(db: &DatabaseConnection) -> Result<u64> {
    Message::find()
        .filter(message::Column::Direction.eq("client_to_admin"))
        .filter(message::Column::Read.eq(false))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Marks one message as read.
pub async fn mark_read(db: &DatabaseConnection, id: i64) -> Result<message::Model> {
    let mut model: message::ActiveModel = Message::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::MessageNotFound { id })?
        .into();

    model.read = Set(true);
    model.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_thread_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme", "11222333000144").await?;
        let other = create_test_client(&db, "Other", "55666777000188").await?;

        create_message(&db, client.id, "need 50 shirts", "client_to_admin").await?;
        create_message(&db, client.id, "on it", "admin_to_client").await?;
        create_message(&db, other.id, "hello", "client_to_admin").await?;

        let thread = get_messages(&db, Some(client.id)).await?;
        assert_eq!(thread.len(), 2);
        assert!(thread.iter().all(|m| m.client_id == client.id));

        let all = get_messages(&db, None).await?;
        assert_eq!(all.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_unread_counts_inbound_only() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme", "11222333000144").await?;

        let inbound = create_message(&db, client.id, "hi", "client_to_admin").await?;
        create_message(&db, client.id, "reply", "admin_to_client").await?;

        assert_eq!(unread_count(&db).await?, 1);

        let updated = mark_read(&db, inbound.id).await?;
        assert!(updated.read);
        assert_eq!(unread_count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_message_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme", "11222333000144").await?;

        let result = create_message(&db, client.id, "  ", "client_to_admin").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = create_message(&db, client.id, "hi", "sideways").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = create_message(&db, 404, "hi", "client_to_admin").await;
        assert!(matches!(result.unwrap_err(), Error::ClientNotFound { id: 404 }));

        let result = mark_read(&db, 9).await;
        assert!(matches!(result.unwrap_err(), Error::MessageNotFound { id: 9 }));

        Ok(())
    }
}
