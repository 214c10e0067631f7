//! Image upload endpoints for the marketing site content.
//!
//! Two flows are supported: a direct multipart upload, and a two-step
//! request-url flow where the browser asks for an upload URL and then PUTs
//! raw bytes to it. Stored names are prefixed with a UUID so uploads never
//! collide, and incoming names are reduced to their basename so they can
//! never escape the upload directory.

use super::{ApiError, AppState, ValidJson, auth::StaffAuth};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RequestUrlInput {
    name: String,
}

/// Reduces an incoming name to a safe basename.
fn sanitize_filename(name: &str) -> Result<String, ApiError> {
    let base = std::path::Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .filter(|n| !n.is_empty() && n != "." && n != "..")
        .ok_or_else(|| ApiError::bad_request("Invalid file name"))?;
    Ok(base.replace(char::is_whitespace, "_"))
}

fn stored_name(original: &str) -> Result<String, ApiError> {
    Ok(format!("{}-{}", uuid::Uuid::new_v4(), sanitize_filename(original)?))
}

async fn write_upload(
    state: &AppState,
    name: &str,
    bytes: &[u8],
) -> Result<(), ApiError> {
    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(crate::errors::Error::from)?;
    tokio::fs::write(state.config.upload_dir.join(name), bytes)
        .await
        .map_err(crate::errors::Error::from)?;
    Ok(())
}

async fn direct(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        let Some(original) = field.file_name().map(str::to_string) else {
            continue;
        };
        let name = stored_name(&original)?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        write_upload(&state, &name, &bytes).await?;
        tracing::info!(file = %name, size = bytes.len(), "stored upload");
        return Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({ "url": format!("/uploads/{name}") })),
        ));
    }
    Err(ApiError::bad_request("No file field in the request"))
}

async fn request_url(
    StaffAuth(_account): StaffAuth,
    ValidJson(input): ValidJson<RequestUrlInput>,
) -> Result<impl IntoResponse, ApiError> {
    let name = stored_name(&input.name)?;
    Ok(Json(serde_json::json!({
        "uploadURL": format!("/api/uploads/{name}"),
        "objectPath": format!("/objects/{name}"),
    })))
}

async fn put_upload(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
    Path(filename): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let name = sanitize_filename(&filename)?;
    write_upload(&state, &name, &body).await?;
    Ok(Json(serde_json::json!({ "url": format!("/uploads/{name}") })))
}

/// Serves a stored object by name. Kept for content saved under the older
/// `/objects/` URL shape.
async fn get_object(
    State(state): State<AppState>,
    Path(object_path): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let name = sanitize_filename(&object_path)?;
    let bytes = tokio::fs::read(state.config.upload_dir.join(&name))
        .await
        .map_err(|_| ApiError::not_found("Object not found"))?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/uploads/direct", post(direct))
        .route("/api/uploads/request-url", post(request_url))
        .route("/api/uploads/:filename", put(put_upload))
        .route("/objects/:objectPath", get(get_object))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::sanitize_filename;
    use crate::test_utils::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("logo.png").unwrap(), "logo.png");
        assert_eq!(
            sanitize_filename("../../etc/passwd").unwrap(),
            "passwd"
        );
        assert_eq!(sanitize_filename("my logo.png").unwrap(), "my_logo.png");
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("..").is_err());
    }

    #[tokio::test]
    async fn test_two_step_upload_flow() {
        let (app, db) = test_app().await.unwrap();
        let staff = create_test_user(&db, "maria", "admin", &[]).await.unwrap();
        let token = staff_token(&db, &staff.id).await.unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/uploads/request-url")
                    .header("authorization", format!("Bearer {token}"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"banner.jpg"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let upload_url = body["uploadURL"].as_str().unwrap().to_string();
        let object_path = body["objectPath"].as_str().unwrap().to_string();
        assert!(upload_url.ends_with("banner.jpg"));

        let response = app
            .clone()
            .oneshot(
                Request::put(&upload_url)
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::from(&b"jpegdata"[..]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // The stored object is readable back through /objects/
        let response = app
            .oneshot(
                Request::get(&object_path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"jpegdata");
    }

    #[tokio::test]
    async fn test_uploads_are_staff_only() {
        let (app, _db) = test_app().await.unwrap();
        let response = app
            .oneshot(
                Request::post("/api/uploads/request-url")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"banner.jpg"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
