//! Financial entry endpoints. Creation always answers with the list of
//! rows it produced, one for a plain entry and the whole series for a
//! recurring one.

use super::{
    ApiError, AppState, ValidJson,
    auth::{StaffAuth, ensure_module},
};
use crate::core::finance::{self, EntryFilter, EntryInput};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

const MODULE: &str = "finance";

async fn list(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Query(filter): Query<EntryFilter>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(finance::get_entries(&state.db, filter).await?))
}

async fn show(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(finance::get_entry(&state.db, id).await?))
}

async fn create(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    ValidJson(input): ValidJson<EntryInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    let created = finance::create_entries(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<EntryInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(finance::update_entry(&state.db, id, input).await?))
}

async fn destroy(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ensure_module(&account, MODULE)?;
    finance::delete_entry(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/finance/entries", get(list).post(create))
        .route(
            "/api/finance/entries/:id",
            get(show).put(update).delete(destroy),
        )
}
