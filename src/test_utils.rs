//! Shared helpers for tests: an in-memory database with the full schema
//! and factories for the rows most tests need.

#![allow(clippy::unwrap_used)]

use crate::{
    config::AppConfig,
    core::{
        client::{self, ClientInput},
        product::{self, ProductInput},
        trip::{self, TripInput},
        user::{self, CreateUserInput},
    },
    entities,
    errors::Result,
    http::{self, AppState},
};
use axum::Router;
use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

/// Opens a fresh in-memory SQLite database with all tables created.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A filled-in client input with the given trade name and tax id.
pub fn test_client_input(trade_name: &str, tax_id: &str) -> ClientInput {
    ClientInput {
        legal_name: format!("{trade_name} Ltda"),
        trade_name: trade_name.to_string(),
        tax_id: tax_id.to_string(),
        state_registration: None,
        postal_code: Some("80000-000".to_string()),
        street: "Rua das Flores".to_string(),
        number: "100".to_string(),
        district: Some("Centro".to_string()),
        city: "Curitiba".to_string(),
        state: "PR".to_string(),
        phones: "(41) 99999-0000".to_string(),
        email: "contact@example.com".to_string(),
        contact_name: "Contato".to_string(),
        active: true,
    }
}

pub async fn create_test_client(
    db: &DatabaseConnection,
    trade_name: &str,
    tax_id: &str,
) -> Result<entities::ClientModel> {
    client::create_client(db, test_client_input(trade_name, tax_id)).await
}

pub async fn create_test_product(
    db: &DatabaseConnection,
    size: &str,
    color: &str,
) -> Result<entities::ProductModel> {
    product::create_product(
        db,
        ProductInput {
            name: format!("Shirt {color} {size}"),
            color: color.to_string(),
            size: size.to_string(),
            active: true,
        },
    )
    .await
}

pub async fn create_test_trip(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::TripModel> {
    trip::create_trip(
        db,
        TripInput {
            name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            end_date: None,
            status: "open".to_string(),
        },
    )
    .await
}

pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    role: &str,
    modules: &[&str],
) -> Result<entities::UserModel> {
    user::create_user(
        db,
        CreateUserInput {
            username: username.to_string(),
            email: None,
            first_name: None,
            last_name: None,
            password: "password1".to_string(),
            role: role.to_string(),
            permissions: modules.iter().map(ToString::to_string).collect(),
        },
    )
    .await
}

/// A config suitable for tests; uploads land in a temp directory.
pub fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        upload_dir: std::env::temp_dir().join(format!("orderdesk-test-{}", uuid::Uuid::new_v4())),
        session_ttl_days: 7,
    }
}

/// Builds the full application router over a fresh in-memory database.
pub async fn test_app() -> Result<(Router, DatabaseConnection)> {
    let db = setup_test_db().await?;
    let state = AppState {
        db: db.clone(),
        config: test_config(),
    };
    Ok((http::router(state), db))
}

/// Opens a staff session for a user and returns the bearer token.
pub async fn staff_token(db: &DatabaseConnection, user_id: &str) -> Result<String> {
    let session = http::auth::create_staff_session(db, user_id, 7).await?;
    Ok(session.token)
}

/// Opens a portal session for a client and returns the bearer token.
pub async fn client_token(db: &DatabaseConnection, client_id: i64) -> Result<String> {
    let session = http::auth::create_client_session(db, client_id, 7).await?;
    Ok(session.token)
}
