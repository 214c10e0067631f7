//! Authentication: server-side sessions, request extractors and the
//! login/logout endpoints for staff and the client portal.
//!
//! Sessions are database rows keyed by an opaque UUID token. The token
//! travels either in the `session_token` cookie or as a bearer token.
//! [`StaffAuth`] loads the user row fresh on every request, so permission
//! changes take effect on the target's next request.

use super::{ApiError, AppState, ValidJson};
use crate::{
    core::{client as client_core, user as user_core},
    entities::{Client, Session, User, client, session, user},
    errors::Result,
};
use axum::{
    Json, Router, async_trait,
    extract::{FromRequestParts, State},
    http::{HeaderMap, header, request::Parts},
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
};
use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use serde::Deserialize;

const SESSION_COOKIE: &str = "session_token";

/// Opens a staff session and returns its row.
pub async fn create_staff_session(
    db: &DatabaseConnection,
    user_id: &str,
    ttl_days: i64,
) -> Result<session::Model> {
    let now = Utc::now();
    let model = session::ActiveModel {
        token: Set(uuid::Uuid::new_v4().to_string()),
        user_id: Set(Some(user_id.to_string())),
        client_id: Set(None),
        created_at: Set(now),
        expires_at: Set(now + Duration::days(ttl_days)),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Opens a portal session and returns its row.
pub async fn create_client_session(
    db: &DatabaseConnection,
    client_id: i64,
    ttl_days: i64,
) -> Result<session::Model> {
    let now = Utc::now();
    let model = session::ActiveModel {
        token: Set(uuid::Uuid::new_v4().to_string()),
        user_id: Set(None),
        client_id: Set(Some(client_id)),
        created_at: Set(now),
        expires_at: Set(now + Duration::days(ttl_days)),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Pulls the session token from the bearer header or the session cookie.
fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Ok(text) = value.to_str() {
            if let Some(token) = text.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Resolves a live session for the request, discarding expired rows.
async fn load_session(
    db: &DatabaseConnection,
    headers: &HeaderMap,
) -> std::result::Result<session::Model, ApiError> {
    let token = token_from_headers(headers).ok_or_else(ApiError::unauthorized)?;
    let found = Session::find_by_id(&token)
        .one(db)
        .await
        .map_err(crate::errors::Error::from)?;
    let Some(row) = found else {
        return Err(ApiError::unauthorized());
    };
    if row.expires_at < Utc::now() {
        Session::delete_by_id(&token)
            .exec(db)
            .await
            .map_err(crate::errors::Error::from)?;
        return Err(ApiError::unauthorized());
    }
    Ok(row)
}

/// An authenticated staff user, loaded fresh from the database.
pub struct StaffAuth(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for StaffAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let row = load_session(&state.db, &parts.headers).await?;
        let user_id = row.user_id.ok_or_else(ApiError::unauthorized)?;
        let account = User::find_by_id(&user_id)
            .one(&state.db)
            .await
            .map_err(crate::errors::Error::from)?
            .ok_or_else(ApiError::unauthorized)?;
        Ok(Self(account))
    }
}

/// An authenticated portal client.
pub struct ClientAuth(pub client::Model);

#[async_trait]
impl FromRequestParts<AppState> for ClientAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let row = load_session(&state.db, &parts.headers).await?;
        let client_id = row.client_id.ok_or_else(ApiError::unauthorized)?;
        let account = Client::find_by_id(client_id)
            .one(&state.db)
            .await
            .map_err(crate::errors::Error::from)?
            .ok_or_else(ApiError::unauthorized)?;
        Ok(Self(account))
    }
}

/// Rejects staff without access to the given module.
pub fn ensure_module(account: &user::Model, module: &str) -> std::result::Result<(), ApiError> {
    if user_core::has_module(account, module) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "You do not have access to the {module} module"
        )))
    }
}

/// Rejects everyone but global administrators.
pub fn ensure_global_admin(account: &user::Model) -> std::result::Result<(), ApiError> {
    if account.is_global_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Global administrator access required"))
    }
}

fn session_cookie(token: &str, ttl_days: i64) -> (header::HeaderName, String) {
    (
        header::SET_COOKIE,
        format!(
            "{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={}",
            ttl_days * 24 * 60 * 60
        ),
    )
}

fn clear_cookie() -> (header::HeaderName, String) {
    (
        header::SET_COOKIE,
        format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0"),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ClientLoginRequest {
    cnpj: String,
}

async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let account = user_core::verify_login(&state.db, &request.username, &request.password)
        .await?
        .ok_or_else(|| {
            ApiError::new(
                axum::http::StatusCode::UNAUTHORIZED,
                "Invalid username or password",
            )
        })?;

    let session = create_staff_session(&state.db, &account.id, state.config.session_ttl_days).await?;
    tracing::info!(user = %account.id, "staff login");
    Ok((
        AppendHeaders([session_cookie(&session.token, state.config.session_ttl_days)]),
        Json(serde_json::json!({ "user": account, "token": session.token })),
    ))
}

async fn current_user(StaffAuth(account): StaffAuth) -> Json<user::Model> {
    Json(account)
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> std::result::Result<impl IntoResponse, ApiError> {
    if let Some(token) = token_from_headers(&headers) {
        Session::delete_by_id(&token)
            .exec(&state.db)
            .await
            .map_err(crate::errors::Error::from)?;
    }
    Ok((
        AppendHeaders([clear_cookie()]),
        Json(serde_json::json!({ "message": "Logged out" })),
    ))
}

async fn client_login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<ClientLoginRequest>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let account = client_core::get_client_by_tax_id(&state.db, &request.cnpj)
        .await?
        .ok_or_else(|| ApiError::not_found("No client registered with this tax id"))?;
    if !account.active {
        return Err(ApiError::forbidden("This client account is inactive"));
    }

    let session =
        create_client_session(&state.db, account.id, state.config.session_ttl_days).await?;
    tracing::info!(client = account.id, "portal login");
    Ok((
        AppendHeaders([session_cookie(&session.token, state.config.session_ttl_days)]),
        Json(serde_json::json!({ "client": account, "token": session.token })),
    ))
}

async fn client_me(ClientAuth(account): ClientAuth) -> Json<client::Model> {
    Json(account)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/auth/user", get(current_user))
        .route("/api/logout", get(logout))
        .route("/api/client/login", post(client_login))
        .route("/api/client/me", get(client_me))
        .route("/api/client/logout", post(logout))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_login_and_whoami() {
        let (app, db) = test_app().await.unwrap();
        create_test_user(&db, "maria", "admin", &["orders"]).await.unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/login")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"username":"maria","password":"password1"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let token = body["token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::get("/api/auth/user")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["username"], "maria");
        // Password hashes never leave the server
        assert!(body.get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_bad_credentials_rejected() {
        let (app, db) = test_app().await.unwrap();
        create_test_user(&db, "maria", "admin", &[]).await.unwrap();

        let response = app
            .oneshot(
                Request::post("/api/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"username":"maria","password":"nope"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_session_is_unauthorized() {
        let (app, _db) = test_app().await.unwrap();
        let response = app
            .oneshot(Request::get("/api/auth/user").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let (app, db) = test_app().await.unwrap();
        let account = create_test_user(&db, "maria", "admin", &[]).await.unwrap();
        let token = staff_token(&db, &account.id).await.unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/logout")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get("/api/auth/user")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_client_login_normalizes_tax_id() {
        let (app, db) = test_app().await.unwrap();
        create_test_client(&db, "Acme", "11.222.333/0001-44")
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/client/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"cnpj":"11222333000144"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let token = body["token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::get("/api/client/me")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["tradeName"], "Acme");
    }

    #[tokio::test]
    async fn test_client_login_edge_cases() {
        let (app, db) = test_app().await.unwrap();
        let created = create_test_client(&db, "Sleepy", "11222333000144")
            .await
            .unwrap();
        let mut input = test_client_input("Sleepy", "11222333000144");
        input.active = false;
        crate::core::client::update_client(&db, created.id, input)
            .await
            .unwrap();

        // Inactive client gets a 403, unknown tax id a 404
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/client/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"cnpj":"11222333000144"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(
                Request::post("/api/client/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"cnpj":"99999999999999"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_staff_session_does_not_open_portal() {
        let (app, db) = test_app().await.unwrap();
        let account = create_test_user(&db, "maria", "admin", &[]).await.unwrap();
        let token = staff_token(&db, &account.id).await.unwrap();

        let response = app
            .oneshot(
                Request::get("/api/client/me")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cookie_carries_session() {
        let (app, db) = test_app().await.unwrap();
        let account = create_test_user(&db, "maria", "admin", &[]).await.unwrap();
        let token = staff_token(&db, &account.id).await.unwrap();

        let response = app
            .oneshot(
                Request::get("/api/auth/user")
                    .header("cookie", format!("other=1; session_token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
