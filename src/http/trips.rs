//! Trip endpoints. Trips are never deleted over the API; closing one is a
//! status update.

use super::{
    ApiError, AppState, ValidJson,
    auth::{StaffAuth, ensure_module},
};
use crate::core::trip::{self, TripInput};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

const MODULE: &str = "trips";

async fn list(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(trip::get_trips(&state.db).await?))
}

async fn show(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    let found = trip::get_trip(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Trip {id} not found")))?;
    Ok(Json(found))
}

async fn create(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    ValidJson(input): ValidJson<TripInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    let created = trip::create_trip(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<TripInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(trip::update_trip(&state.db, id, input).await?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/trips", get(list).post(create))
        .route("/api/trips/:id", get(show).put(update))
}
