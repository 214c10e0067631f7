//! Staff account management. Every route here is global-admin only.

use super::{
    ApiError, AppState, ValidJson,
    auth::{StaffAuth, ensure_global_admin},
};
use crate::core::user::{self, CreateUserInput, PermissionsInput};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};

async fn list(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_global_admin(&account)?;
    Ok(Json(user::list_users(&state.db).await?))
}

async fn create(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    ValidJson(input): ValidJson<CreateUserInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_global_admin(&account)?;
    let created = user::create_user(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn permissions(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<PermissionsInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_global_admin(&account)?;
    Ok(Json(user::update_permissions(&state.db, &account, &id, input).await?))
}

async fn destroy(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ensure_global_admin(&account)?;
    user::delete_user(&state.db, &account, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", get(list).post(create))
        .route("/api/admin/users/:id/permissions", put(permissions))
        .route("/api/admin/users/:id", delete(destroy))
}
