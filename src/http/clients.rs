//! Client registry endpoints: staff CRUD, the per-client price table and
//! the portal's view of its own prices.

use super::{
    ApiError, AppState, ValidJson,
    auth::{ClientAuth, StaffAuth, ensure_module},
};
use crate::core::{client as client_core, client::ClientInput, price};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;

const MODULE: &str = "clients";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PriceInput {
    size: String,
    price: String,
}

async fn list(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(client_core::get_clients(&state.db).await?))
}

async fn show(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    let found = client_core::get_client(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Client {id} not found")))?;
    Ok(Json(found))
}

async fn create(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    ValidJson(input): ValidJson<ClientInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    let created = client_core::create_client(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<ClientInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(client_core::update_client(&state.db, id, input).await?))
}

async fn destroy(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ensure_module(&account, MODULE)?;
    client_core::delete_client(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_prices(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    client_core::get_client(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Client {id} not found")))?;
    Ok(Json(price::get_client_prices(&state.db, id).await?))
}

async fn upsert_price(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<PriceInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    client_core::get_client(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Client {id} not found")))?;
    let saved = price::upsert_client_price(&state.db, id, &input.size, &input.price).await?;
    Ok(Json(saved))
}

async fn own_prices(
    State(state): State<AppState>,
    ClientAuth(account): ClientAuth,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    Ok(Json(price::get_client_prices(&state.db, account.id).await?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/clients", get(list).post(create))
        .route("/api/clients/:id", get(show).put(update).delete(destroy))
        .route("/api/clients/:id/prices", get(list_prices).put(upsert_price))
        .route("/api/client/prices", get(own_prices))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::test_utils::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_module_gating() {
        let (app, db) = test_app().await.unwrap();
        let outsider = create_test_user(&db, "outsider", "admin", &["finance"])
            .await
            .unwrap();
        let outsider_token = staff_token(&db, &outsider.id).await.unwrap();
        let boss = create_test_user(&db, "boss", "global_admin", &[]).await.unwrap();
        let boss_token = staff_token(&db, &boss.id).await.unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/clients")
                    .header("authorization", format!("Bearer {outsider_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Global admin bypasses the permission set
        let response = app
            .oneshot(
                Request::get("/api/clients")
                    .header("authorization", format!("Bearer {boss_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_price_upsert_over_http() {
        let (app, db) = test_app().await.unwrap();
        let staff = create_test_user(&db, "maria", "admin", &["clients"])
            .await
            .unwrap();
        let token = staff_token(&db, &staff.id).await.unwrap();
        let client = create_test_client(&db, "Acme", "11222333000144")
            .await
            .unwrap();

        let uri = format!("/api/clients/{}/prices", client.id);
        for (price, expected) in [("12.50", "12.50"), ("15.00", "15.00")] {
            let response = app
                .clone()
                .oneshot(
                    Request::put(&uri)
                        .header("authorization", format!("Bearer {token}"))
                        .header("content-type", "application/json")
                        .body(Body::from(format!(
                            r#"{{"size":"M","price":"{price}"}}"#
                        )))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["price"], expected);
        }

        let response = app
            .oneshot(
                Request::get(&uri)
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_fields_rejected() {
        let (app, db) = test_app().await.unwrap();
        let staff = create_test_user(&db, "maria", "admin", &["clients"])
            .await
            .unwrap();
        let token = staff_token(&db, &staff.id).await.unwrap();

        let response = app
            .oneshot(
                Request::post("/api/clients")
                    .header("authorization", format!("Bearer {token}"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"bogus":true}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_portal_sees_own_prices_only() {
        let (app, db) = test_app().await.unwrap();
        let mine = create_test_client(&db, "Mine", "11222333000144").await.unwrap();
        let other = create_test_client(&db, "Other", "55666777000188")
            .await
            .unwrap();
        crate::core::price::upsert_client_price(&db, mine.id, "M", "10.00")
            .await
            .unwrap();
        crate::core::price::upsert_client_price(&db, other.id, "M", "99.00")
            .await
            .unwrap();
        let token = client_token(&db, mine.id).await.unwrap();

        let response = app
            .oneshot(
                Request::get("/api/client/prices")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["price"], "10.00");
    }
}
