//! Messaging endpoints: staff side of the threads plus the portal mirror.
//! The direction is fixed by which side of the API the message comes in on.

use super::{
    ApiError, AppState, ValidJson,
    auth::{ClientAuth, StaffAuth, ensure_module},
};
use crate::core::message;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

const MODULE: &str = "messages";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessagesQuery {
    client_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct StaffMessageInput {
    client_id: i64,
    content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PortalMessageInput {
    content: String,
}

async fn list(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Query(query): Query<MessagesQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(message::get_messages(&state.db, query.client_id).await?))
}

async fn send(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    ValidJson(input): ValidJson<StaffMessageInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    let created =
        message::create_message(&state.db, input.client_id, &input.content, "admin_to_client")
            .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn unread(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    let count = message::unread_count(&state.db).await?;
    Ok(Json(serde_json::json!({ "count": count })))
}

async fn mark_read(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(message::mark_read(&state.db, id).await?))
}

async fn portal_thread(
    State(state): State<AppState>,
    ClientAuth(account): ClientAuth,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    Ok(Json(message::get_messages(&state.db, Some(account.id)).await?))
}

async fn portal_send(
    State(state): State<AppState>,
    ClientAuth(account): ClientAuth,
    ValidJson(input): ValidJson<PortalMessageInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let created =
        message::create_message(&state.db, account.id, &input.content, "client_to_admin").await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/messages", get(list).post(send))
        .route("/api/admin/messages/unread", get(unread))
        .route("/api/admin/messages/:id/read", post(mark_read))
        .route("/api/client/messages", get(portal_thread).post(portal_send))
}
