//! Order business logic - creation, assembly, and the approval workflow.
//!
//! Orders store quantities only; money is resolved at read time from the
//! client's current price table, so a price change retroactively changes
//! what every existing order is worth. Approving a pending portal order
//! merges it into the client's existing order on the target trip when one
//! exists, item quantities summed by product.

use crate::{
    core::price::resolve_unit_price,
    entities::{
        Client, Order, OrderItem, OrderStatus, Product, Trip, client, order, order_item, product,
        trip,
    },
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

/// One requested line of an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemInput {
    pub product_id: i64,
    pub quantity: i32,
}

/// Input for creating an order or fully replacing its editable fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateOrderRequest {
    pub client_id: i64,
    #[serde(default)]
    pub trip_id: Option<i64>,
    #[serde(default = "default_source")]
    pub source: String,
    pub items: Vec<ItemInput>,
}

fn default_source() -> String {
    "admin".to_string()
}

/// One order line joined with its product and resolved pricing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetails {
    #[serde(flatten)]
    pub item: order_item::Model,
    pub product: product::Model,
    pub unit_price: f64,
    pub line_total: f64,
}

/// An order joined with its client, trip, items and read-time total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: order::Model,
    pub client: client::Model,
    pub trip: Option<trip::Model>,
    pub items: Vec<OrderItemDetails>,
    pub total: f64,
}

fn validate_items(items: &[ItemInput]) -> Result<()> {
    if items.is_empty() {
        return Err(Error::validation("An order needs at least one item"));
    }
    if items.iter().any(|i| i.quantity <= 0) {
        return Err(Error::validation("Item quantities must be positive"));
    }
    Ok(())
}

async fn check_references<C: ConnectionTrait>(
    conn: &C,
    request: &CreateOrderRequest,
) -> Result<()> {
    Client::find_by_id(request.client_id)
        .one(conn)
        .await?
        .ok_or(Error::ClientNotFound {
            id: request.client_id,
        })?;
    if let Some(trip_id) = request.trip_id {
        Trip::find_by_id(trip_id)
            .one(conn)
            .await?
            .ok_or(Error::TripNotFound { id: trip_id })?;
    }
    for item in &request.items {
        Product::find_by_id(item.product_id)
            .one(conn)
            .await?
            .ok_or(Error::ProductNotFound {
                id: item.product_id,
            })?;
    }
    Ok(())
}

/// Joins one order with its client, trip, items and pricing.
async fn assemble(db: &DatabaseConnection, ord: order::Model) -> Result<OrderDetails> {
    let client = Client::find_by_id(ord.client_id)
        .one(db)
        .await?
        .ok_or(Error::ClientNotFound { id: ord.client_id })?;

    let trip = match ord.trip_id {
        Some(trip_id) => Trip::find_by_id(trip_id).one(db).await?,
        None => None,
    };

    let prices = crate::core::price::get_client_prices(db, ord.client_id).await?;

    let rows = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(ord.id))
        .find_also_related(Product)
        .all(db)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    let mut total = 0.0;
    for (item, maybe_product) in rows {
        let product = maybe_product.ok_or(Error::ProductNotFound {
            id: item.product_id,
        })?;
        let unit_price = resolve_unit_price(&prices, &product.size);
        let line_total = unit_price * f64::from(item.quantity);
        total += line_total;
        items.push(OrderItemDetails {
            item,
            product,
            unit_price,
            line_total,
        });
    }

    Ok(OrderDetails {
        order: ord,
        client,
        trip,
        items,
        total,
    })
}

async fn assemble_all(
    db: &DatabaseConnection,
    orders: Vec<order::Model>,
) -> Result<Vec<OrderDetails>> {
    let mut details = Vec::with_capacity(orders.len());
    for ord in orders {
        details.push(assemble(db, ord).await?);
    }
    Ok(details)
}

/// Retrieves all orders, newest first, optionally restricted to one trip.
pub async fn get_orders(
    db: &DatabaseConnection,
    trip_id: Option<i64>,
) -> Result<Vec<OrderDetails>> {
    let mut query = Order::find().order_by_desc(order::Column::Id);
    if let Some(trip_id) = trip_id {
        query = query.filter(order::Column::TripId.eq(trip_id));
    }
    let orders = query.all(db).await?;
    assemble_all(db, orders).await
}

/// Retrieves one order with full details.
pub async fn get_order(db: &DatabaseConnection, id: i64) -> Result<OrderDetails> {
    let ord = Order::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id })?;
    assemble(db, ord).await
}

/// Retrieves portal-submitted orders still waiting for staff review.
pub async fn pending_client_orders(db: &DatabaseConnection) -> Result<Vec<OrderDetails>> {
    let orders = Order::find()
        .filter(order::Column::Status.eq(OrderStatus::Pending))
        .filter(order::Column::Source.eq("client"))
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    assemble_all(db, orders).await
}

/// Retrieves one client's orders, newest first. Used by the portal.
pub async fn orders_by_client(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Vec<OrderDetails>> {
    let orders = Order::find()
        .filter(order::Column::ClientId.eq(client_id))
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    assemble_all(db, orders).await
}

/// Creates an order with its items in one transaction.
///
/// The status follows the trip assignment: an order created without a trip
/// is `pending`, one created on a trip is `assigned`.
pub async fn create_order(
    db: &DatabaseConnection,
    request: CreateOrderRequest,
) -> Result<OrderDetails> {
    validate_items(&request.items)?;
    if request.source != "admin" && request.source != "client" {
        return Err(Error::validation("Order source must be admin or client"));
    }

    let txn = db.begin().await?;
    check_references(&txn, &request).await?;

    let status = match request.trip_id {
        Some(_) => OrderStatus::Assigned,
        None => OrderStatus::Pending,
    };

    let created = order::ActiveModel {
        trip_id: Set(request.trip_id),
        client_id: Set(request.client_id),
        source: Set(request.source),
        status: Set(status),
        paid: Set(false),
        payment_method: Set(None),
        observation: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for item in &request.items {
        order_item::ActiveModel {
            order_id: Set(created.id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    assemble(db, created).await
}

/// Replaces an order's client, trip and items in one transaction.
///
/// Payment fields are untouched; they are managed by [`set_payment`].
pub async fn update_order(
    db: &DatabaseConnection,
    id: i64,
    request: CreateOrderRequest,
) -> Result<OrderDetails> {
    validate_items(&request.items)?;

    let txn = db.begin().await?;

    let existing = Order::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id })?;
    check_references(&txn, &request).await?;

    let status = match request.trip_id {
        Some(_) => OrderStatus::Assigned,
        None => OrderStatus::Pending,
    };

    let mut model: order::ActiveModel = existing.into();
    model.client_id = Set(request.client_id);
    model.trip_id = Set(request.trip_id);
    model.status = Set(status);
    let updated = model.update(&txn).await?;

    OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(id))
        .exec(&txn)
        .await?;
    for item in &request.items {
        order_item::ActiveModel {
            order_id: Set(id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    assemble(db, updated).await
}

/// Deletes an order and its items.
pub async fn delete_order(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    Order::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id })?;

    OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(id))
        .exec(&txn)
        .await?;
    Order::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Records payment state on an order.
pub async fn set_payment(
    db: &DatabaseConnection,
    id: i64,
    paid: bool,
    payment_method: Option<String>,
    observation: Option<String>,
) -> Result<OrderDetails> {
    let mut model: order::ActiveModel = Order::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id })?
        .into();

    model.paid = Set(paid);
    model.payment_method = Set(payment_method);
    model.observation = Set(observation);
    let updated = model.update(db).await?;
    assemble(db, updated).await
}

/// Approves a pending portal order onto a trip.
///
/// When the client already has an assigned order on that trip, the pending
/// order is merged into it: quantities summed for products both orders
/// carry, new items moved over, and the pending order deleted. Otherwise
/// the pending order itself is assigned. Returns the surviving order.
pub async fn approve_order(
    db: &DatabaseConnection,
    id: i64,
    trip_id: i64,
) -> Result<OrderDetails> {
    let txn = db.begin().await?;

    let pending = Order::find_by_id(id)
        .one(&txn)
        .await?
        .filter(|o| o.status == OrderStatus::Pending)
        .ok_or(Error::OrderNotFound { id })?;

    Trip::find_by_id(trip_id)
        .one(&txn)
        .await?
        .ok_or(Error::TripNotFound { id: trip_id })?;

    let existing = Order::find()
        .filter(order::Column::ClientId.eq(pending.client_id))
        .filter(order::Column::TripId.eq(trip_id))
        .filter(order::Column::Status.eq(OrderStatus::Assigned))
        .filter(order::Column::Id.ne(pending.id))
        .one(&txn)
        .await?;

    let survivor_id = if let Some(target) = existing {
        let pending_items = OrderItem::find()
            .filter(order_item::Column::OrderId.eq(pending.id))
            .all(&txn)
            .await?;

        for item in pending_items {
            let matching = OrderItem::find()
                .filter(order_item::Column::OrderId.eq(target.id))
                .filter(order_item::Column::ProductId.eq(item.product_id))
                .one(&txn)
                .await?;

            if let Some(existing_item) = matching {
                let quantity = existing_item.quantity + item.quantity;
                let mut model: order_item::ActiveModel = existing_item.into();
                model.quantity = Set(quantity);
                model.update(&txn).await?;
            } else {
                order_item::ActiveModel {
                    order_id: Set(target.id),
                    product_id: Set(item.product_id),
                    quantity: Set(item.quantity),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        OrderItem::delete_many()
            .filter(order_item::Column::OrderId.eq(pending.id))
            .exec(&txn)
            .await?;
        Order::delete_by_id(pending.id).exec(&txn).await?;
        target.id
    } else {
        let mut model: order::ActiveModel = pending.into();
        model.trip_id = Set(Some(trip_id));
        model.status = Set(OrderStatus::Assigned);
        model.update(&txn).await?.id
    };

    txn.commit().await?;
    get_order(db, survivor_id).await
}

/// Rejects a pending portal order, deleting it and its items.
///
/// Only pending orders can be rejected; a second rejection of the same
/// order reports it as not found.
pub async fn reject_order(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    Order::find_by_id(id)
        .one(&txn)
        .await?
        .filter(|o| o.status == OrderStatus::Pending)
        .ok_or(Error::OrderNotFound { id })?;

    OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(id))
        .exec(&txn)
        .await?;
    Order::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}
