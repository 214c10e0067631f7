//! Order endpoints: staff CRUD, the approval workflow for portal
//! submissions, payment tracking, the sales report and the portal's own
//! order routes.

use super::{
    ApiError, AppState, ValidJson,
    auth::{ClientAuth, StaffAuth, ensure_module},
};
use crate::{
    core::{
        client,
        order::{self, CreateOrderRequest, ItemInput},
        price,
    },
    entities::client_price,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MODULE: &str = "orders";
const REQUESTS_MODULE: &str = "order_requests";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrdersQuery {
    trip_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ApproveRequest {
    #[serde(default)]
    trip_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PaymentRequest {
    paid: bool,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    observation: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PortalOrderRequest {
    items: Vec<ItemInput>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SalesReport {
    orders: Vec<order::OrderDetails>,
    client_prices: HashMap<i64, Vec<client_price::Model>>,
}

async fn list(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Query(query): Query<OrdersQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(order::get_orders(&state.db, query.trip_id).await?))
}

async fn show(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(order::get_order(&state.db, id).await?))
}

async fn create(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    ValidJson(request): ValidJson<CreateOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    let request = CreateOrderRequest {
        source: "admin".to_string(),
        ..request
    };
    let created = order::create_order(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
    ValidJson(request): ValidJson<CreateOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(order::update_order(&state.db, id, request).await?))
}

async fn destroy(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ensure_module(&account, MODULE)?;
    order::delete_order(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Payment lives under the finance module, not orders.
async fn payment(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
    ValidJson(request): ValidJson<PaymentRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, "finance")?;
    let updated = order::set_payment(
        &state.db,
        id,
        request.paid,
        request.payment_method,
        request.observation,
    )
    .await?;
    Ok(Json(updated))
}

async fn pending(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, REQUESTS_MODULE)?;
    Ok(Json(order::pending_client_orders(&state.db).await?))
}

async fn approve(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
    ValidJson(request): ValidJson<ApproveRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, REQUESTS_MODULE)?;
    let trip_id = request
        .trip_id
        .ok_or_else(|| ApiError::bad_request("Trip is required"))?;
    Ok(Json(order::approve_order(&state.db, id, trip_id).await?))
}

async fn reject(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ensure_module(&account, REQUESTS_MODULE)?;
    order::reject_order(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All order details plus each client's price table, so the report view
/// can recompute totals with the same read-time pricing as the order pages.
async fn sales_report(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, "reports")?;

    let orders = order::get_orders(&state.db, None).await?;
    let mut client_prices = HashMap::new();
    for c in client::get_clients(&state.db).await? {
        let prices = price::get_client_prices(&state.db, c.id).await?;
        client_prices.insert(c.id, prices);
    }
    Ok(Json(SalesReport {
        orders,
        client_prices,
    }))
}

async fn portal_orders(
    State(state): State<AppState>,
    ClientAuth(account): ClientAuth,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    Ok(Json(order::orders_by_client(&state.db, account.id).await?))
}

async fn portal_submit(
    State(state): State<AppState>,
    ClientAuth(account): ClientAuth,
    ValidJson(request): ValidJson<PortalOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let created = order::create_order(
        &state.db,
        CreateOrderRequest {
            client_id: account.id,
            trip_id: None,
            source: "client".to_string(),
            items: request.items,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list).post(create))
        .route("/api/orders/:id", get(show).put(update).delete(destroy))
        .route("/api/orders/:id/payment", put(payment))
        .route("/api/admin/pending-orders", get(pending))
        .route("/api/admin/orders/:id/approve", post(approve))
        .route("/api/admin/orders/:id/reject", post(reject))
        .route("/api/admin/report/sales", get(sales_report))
        .route("/api/client/orders", get(portal_orders).post(portal_submit))
}
