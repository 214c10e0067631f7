//! HTTP API: routing, shared state and error-to-status mapping.
//!
//! Handlers stay thin: extract, call into [`crate::core`], serialize. All
//! request bodies come in through [`ValidJson`] so malformed or unknown
//! fields answer with a 400 and a message instead of a bare rejection.

pub mod auth;
pub mod clients;
pub mod finance;
pub mod messages;
pub mod orders;
pub mod products;
pub mod showcase;
pub mod trips;
pub mod uploads;
pub mod users;

use crate::{config::AppConfig, errors::Error};
use axum::{
    Router,
    extract::FromRequest,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
}

/// A JSON error response with an explicit status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Not authenticated")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, axum::Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match &err {
            Error::Validation { .. } | Error::ProductInUse => Self::bad_request(err.to_string()),
            Error::ClientNotFound { .. }
            | Error::ProductNotFound { .. }
            | Error::TripNotFound { .. }
            | Error::OrderNotFound { .. }
            | Error::EntryNotFound { .. }
            | Error::MessageNotFound { .. }
            | Error::UserNotFound { .. }
            | Error::ShowcaseProductNotFound { .. }
            | Error::SlideNotFound { .. }
            | Error::SubmissionNotFound { .. } => Self::not_found(err.to_string()),
            _ => {
                tracing::error!(error = %err, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// JSON extractor whose rejection is an [`ApiError`], so every malformed
/// body answers with the same `{ "message": ... }` shape as domain errors.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ValidJson<T>(pub T);

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let uploads_dir = state.config.upload_dir.clone();

    Router::new()
        .merge(auth::routes())
        .merge(clients::routes())
        .merge(products::routes())
        .merge(trips::routes())
        .merge(orders::routes())
        .merge(finance::routes())
        .merge(messages::routes())
        .merge(showcase::routes())
        .merge(uploads::routes())
        .merge(users::routes())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
