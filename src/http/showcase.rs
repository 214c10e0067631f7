//! Marketing site endpoints: public content reads, the contact form, the
//! crawler files and the staff management routes.
//!
//! Public routes need no session. Staff content routes only need a staff
//! session; the showcase catalog additionally sits under the products
//! module.

use super::{
    ApiError, AppState, ValidJson,
    auth::{StaffAuth, ensure_module},
};
use crate::core::showcase::{self, ContactInput, HeroSlideInput, ShowcaseProductInput};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, put},
};
use std::collections::HashMap;

const MODULE: &str = "products";

// Public site

async fn public_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(showcase::get_active_showcase_products(&state.db).await?))
}

async fn public_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(showcase::get_active_showcase_product(&state.db, id).await?))
}

async fn public_slides(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(showcase::get_active_hero_slides(&state.db).await?))
}

async fn public_settings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(showcase::get_site_settings(&state.db).await?))
}

async fn contact(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ContactInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = showcase::create_contact_submission(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn site_base_url(state: &AppState) -> Result<String, ApiError> {
    let base = showcase::get_site_setting(&state.db, "siteUrl")
        .await?
        .unwrap_or_else(|| "http://localhost:5000".to_string());
    Ok(base.trim_end_matches('/').to_string())
}

async fn sitemap(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let base = site_base_url(&state).await?;
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for path in ["/", "/vitrine", "/contato"] {
        xml.push_str(&format!("  <url><loc>{base}{path}</loc></url>\n"));
    }
    for product in showcase::get_active_showcase_products(&state.db).await? {
        xml.push_str(&format!(
            "  <url><loc>{base}/produto/{}</loc></url>\n",
            product.id
        ));
    }
    xml.push_str("</urlset>\n");
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}

async fn robots(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let base = site_base_url(&state).await?;
    let body = format!("User-agent: *\nAllow: /\nSitemap: {base}/sitemap.xml\n");
    Ok(([(header::CONTENT_TYPE, "text/plain")], body))
}

// Staff: showcase catalog

async fn admin_products(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
) -> Result<impl IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(showcase::get_showcase_products(&state.db).await?))
}

async fn admin_create_product(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    ValidJson(input): ValidJson<ShowcaseProductInput>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    let created = showcase::create_showcase_product(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn admin_update_product(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<ShowcaseProductInput>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_module(&account, MODULE)?;
    Ok(Json(showcase::update_showcase_product(&state.db, id, input).await?))
}

async fn admin_delete_product(
    State(state): State<AppState>,
    StaffAuth(account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ensure_module(&account, MODULE)?;
    showcase::delete_showcase_product(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Staff: hero slides

async fn admin_slides(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(showcase::get_hero_slides(&state.db).await?))
}

async fn admin_create_slide(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
    ValidJson(input): ValidJson<HeroSlideInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = showcase::create_hero_slide(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn admin_update_slide(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
    Path(id): Path<i64>,
    ValidJson(input): ValidJson<HeroSlideInput>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(showcase::update_hero_slide(&state.db, id, input).await?))
}

async fn admin_delete_slide(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    showcase::delete_hero_slide(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Staff: site settings

async fn admin_settings(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(showcase::get_site_settings(&state.db).await?))
}

async fn admin_save_settings(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
    ValidJson(settings): ValidJson<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    for (key, value) in &settings {
        showcase::upsert_site_setting(&state.db, key, value).await?;
    }
    Ok(Json(showcase::get_site_settings(&state.db).await?))
}

// Staff: contact submissions

async fn admin_submissions(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(showcase::get_contact_submissions(&state.db).await?))
}

async fn admin_submissions_unread(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
) -> Result<impl IntoResponse, ApiError> {
    let count = showcase::unread_contact_count(&state.db).await?;
    Ok(Json(serde_json::json!({ "count": count })))
}

async fn admin_submission_read(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(showcase::mark_contact_read(&state.db, id).await?))
}

async fn admin_delete_submission(
    State(state): State<AppState>,
    StaffAuth(_account): StaffAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    showcase::delete_contact_submission(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/vitrine/products", get(public_products))
        .route("/api/vitrine/products/:id", get(public_product))
        .route("/api/vitrine/slides", get(public_slides))
        .route("/api/vitrine/settings", get(public_settings))
        .route("/api/vitrine/contact", axum::routing::post(contact))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .route(
            "/api/admin/showcase",
            get(admin_products).post(admin_create_product),
        )
        .route(
            "/api/admin/showcase/:id",
            put(admin_update_product).delete(admin_delete_product),
        )
        .route(
            "/api/admin/hero-slides",
            get(admin_slides).post(admin_create_slide),
        )
        .route(
            "/api/admin/hero-slides/:id",
            put(admin_update_slide).delete(admin_delete_slide),
        )
        .route(
            "/api/admin/site-settings",
            get(admin_settings).put(admin_save_settings),
        )
        .route("/api/admin/contact-submissions", get(admin_submissions))
        .route(
            "/api/admin/contact-submissions/unread-count",
            get(admin_submissions_unread),
        )
        .route(
            "/api/admin/contact-submissions/:id/read",
            put(admin_submission_read),
        )
        .route(
            "/api/admin/contact-submissions/:id",
            axum::routing::delete(admin_delete_submission),
        )
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

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_public_routes_need_no_session() {
        let (app, _db) = test_app().await.unwrap();

        for uri in [
            "/api/vitrine/products",
            "/api/vitrine/slides",
            "/api/vitrine/settings",
        ] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_public_product_page_is_active_only() {
        let (app, db) = test_app().await.unwrap();
        let hidden = crate::core::showcase::create_showcase_product(
            &db,
            crate::core::showcase::ShowcaseProductInput {
                name: "Hidden".to_string(),
                description: None,
                category: "shirts".to_string(),
                image_url: None,
                active: false,
                sort_order: 0,
            },
        )
        .await
        .unwrap();

        let response = app
            .oneshot(
                Request::get(format!("/api/vitrine/products/{}", hidden.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_contact_form_and_staff_inbox() {
        let (app, db) = test_app().await.unwrap();
        let staff = create_test_user(&db, "maria", "admin", &[]).await.unwrap();
        let token = staff_token(&db, &staff.id).await.unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/vitrine/contact")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"name":"Dana","subject":"Wholesale","message":"Do you ship south?"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/admin/contact-submissions/unread-count")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["count"], 1);

        // The inbox is staff-only
        let response = app
            .oneshot(
                Request::get("/api/admin/contact-submissions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sitemap_and_robots_use_site_url() {
        let (app, db) = test_app().await.unwrap();
        crate::core::showcase::upsert_site_setting(&db, "siteUrl", "https://camisetas.example/")
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(Request::get("/sitemap.xml").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<loc>https://camisetas.example/vitrine</loc>"));

        let response = app
            .oneshot(Request::get("/robots.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_text(response).await;
        assert!(body.contains("Sitemap: https://camisetas.example/sitemap.xml"));
    }

    #[tokio::test]
    async fn test_settings_bulk_upsert() {
        let (app, db) = test_app().await.unwrap();
        let staff = create_test_user(&db, "maria", "admin", &[]).await.unwrap();
        let token = staff_token(&db, &staff.id).await.unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::put("/api/admin/site-settings")
                    .header("authorization", format!("Bearer {token}"))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"siteName":"Orderdesk","whatsapp":"+55 41 99999-0000"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get("/api/vitrine/settings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["siteName"], "Orderdesk");
    }

    #[tokio::test]
    async fn test_showcase_catalog_needs_products_module() {
        let (app, db) = test_app().await.unwrap();
        let outsider = create_test_user(&db, "outsider", "admin", &["finance"])
            .await
            .unwrap();
        let token = staff_token(&db, &outsider.id).await.unwrap();

        let response = app
            .oneshot(
                Request::get("/api/admin/showcase")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
