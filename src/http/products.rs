//! Product catalog endpoints: staff CRUD plus the portal's active-only
//! listing.

use super::{
    ApiError, AppState, ValidJson,
    auth::{ClientAuth, StaffAuth, ensure_module},
};
use crate::core::product::{self, ProductInput};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

const MODULE: &str = "products";

async fn list(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(product::get_products(&state.db).await?))
}

async fn show(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    let found = product::get_product(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Product {id} not found")))?;
    Ok(Json(found))
}

async fn create(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    ValidJson(input): ValidJson<ProductInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    let created = product::create_product(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<ProductInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(product::update_product(&state.db, id, input).await?))
}

async fn destroy(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ensure_module(&account, MODULE)?;
    product::delete_product(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn portal_products(
    State(state): State<AppState>,
    ClientAuth(_account): ClientAuth,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    Ok(Json(product::get_active_products(&state.db).await?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route("/api/products/:id", get(show).put(update).delete(destroy))
        .route("/api/client/products", get(portal_products))
}
