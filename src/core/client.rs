//! Client business logic - CRUD, tax-id lookup and cascading deletion.
//!
//! Clients are the owners of orders, custom prices and messages. Deleting a
//! client removes all of those in one transaction (hard delete, no
//! tombstones). Tax ids are compared digit-normalized so formatting
//! differences ("00.000.000/0001-00" vs "00000000000100") never matter.

use crate::{
    entities::{Client, ClientPrice, Message, Order, OrderItem, client, client_price, message, order, order_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

/// Input for creating or fully replacing a client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientInput {
    pub legal_name: String,
    pub trade_name: String,
    pub tax_id: String,
    #[serde(default)]
    pub state_registration: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub district: Option<String>,
    pub city: String,
    pub state: String,
    pub phones: String,
    pub email: String,
    pub contact_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// Strips everything but digits from a tax id.
#[must_use]
pub fn normalize_tax_id(tax_id: &str) -> String {
    tax_id.chars().filter(char::is_ascii_digit).collect()
}

fn validate(input: &ClientInput) -> Result<()> {
    if input.legal_name.trim().is_empty() {
        return Err(Error::validation("Legal name is required"));
    }
    if input.trade_name.trim().is_empty() {
        return Err(Error::validation("Trade name is required"));
    }
    if normalize_tax_id(&input.tax_id).is_empty() {
        return Err(Error::validation("Tax id is required"));
    }
    Ok(())
}

/// Retrieves all clients, newest first.
pub async fn get_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .order_by_desc(client::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a client by its unique ID.
pub async fn get_client(db: &DatabaseConnection, id: i64) -> Result<Option<client::Model>> {
    Client::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Finds a client by tax id, comparing digit-normalized forms.
///
/// Used by the portal login, where clients type their tax id with or
/// without punctuation.
pub async fn get_client_by_tax_id(
    db: &DatabaseConnection,
    tax_id: &str,
) -> Result<Option<client::Model>> {
    let normalized = normalize_tax_id(tax_id);
    let all = Client::find().all(db).await?;
    Ok(all
        .into_iter()
        .find(|c| normalize_tax_id(&c.tax_id) == normalized))
}

/// Creates a new client after validating the input and checking that no
/// other client already uses the same (normalized) tax id.
pub async fn create_client(db: &DatabaseConnection, input: ClientInput) -> Result<client::Model> {
    validate(&input)?;

    if get_client_by_tax_id(db, &input.tax_id).await?.is_some() {
        return Err(Error::validation(
            "A client with this tax id is already registered",
        ));
    }

    let model = client::ActiveModel {
        legal_name: Set(input.legal_name.trim().to_string()),
        trade_name: Set(input.trade_name.trim().to_string()),
        tax_id: Set(input.tax_id.trim().to_string()),
        state_registration: Set(input.state_registration),
        postal_code: Set(input.postal_code),
        street: Set(input.street),
        number: Set(input.number),
        district: Set(input.district),
        city: Set(input.city),
        state: Set(input.state),
        phones: Set(input.phones),
        email: Set(input.email),
        contact_name: Set(input.contact_name),
        active: Set(input.active),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Fully replaces a client's fields.
///
/// The tax-id uniqueness check excludes the client itself so saving an
/// unmodified form is not rejected.
pub async fn update_client(
    db: &DatabaseConnection,
    id: i64,
    input: ClientInput,
) -> Result<client::Model> {
    validate(&input)?;

    let existing = Client::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::ClientNotFound { id })?;

    if let Some(other) = get_client_by_tax_id(db, &input.tax_id).await? {
        if other.id != id {
            return Err(Error::validation(
                "A client with this tax id is already registered",
            ));
        }
    }

    let mut model: client::ActiveModel = existing.into();
    model.legal_name = Set(input.legal_name.trim().to_string());
    model.trade_name = Set(input.trade_name.trim().to_string());
    model.tax_id = Set(input.tax_id.trim().to_string());
    model.state_registration = Set(input.state_registration);
    model.postal_code = Set(input.postal_code);
    model.street = Set(input.street);
    model.number = Set(input.number);
    model.district = Set(input.district);
    model.city = Set(input.city);
    model.state = Set(input.state);
    model.phones = Set(input.phones);
    model.email = Set(input.email);
    model.contact_name = Set(input.contact_name);
    model.active = Set(input.active);
    model.update(db).await.map_err(Into::into)
}

/// Deletes a client and everything it owns in one transaction:
/// order items of the client's orders, the orders themselves, custom
/// prices, messages, and finally the client row. Other clients' data is
/// untouched.
pub async fn delete_client(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    Client::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::ClientNotFound { id })?;

    let orders = Order::find()
        .filter(order::Column::ClientId.eq(id))
        .all(&txn)
        .await?;
    for ord in &orders {
        OrderItem::delete_many()
            .filter(order_item::Column::OrderId.eq(ord.id))
            .exec(&txn)
            .await?;
    }
    Order::delete_many()
        .filter(order::Column::ClientId.eq(id))
        .exec(&txn)
        .await?;
    ClientPrice::delete_many()
        .filter(client_price::Column::ClientId.eq(id))
        .exec(&txn)
        .await?;
    Message::delete_many()
        .filter(message::Column::ClientId.eq(id))
        .exec(&txn)
        .await?;
    Client::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}
