use dotenvy::dotenv;
use orderdesk::{
    config::{AppConfig, database},
    core::user,
    errors::Result,
    http::{self, AppState},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let config = AppConfig::from_env();
    info!(bind_addr = %config.bind_addr, "loaded configuration");

    // 4. Initialize the database and its schema
    let db = database::create_connection().await?;
    database::create_tables(&db).await?;
    info!("database initialized");

    // 5. Seed the default admin account on first boot
    user::ensure_admin_user(&db).await?;

    // 6. Make sure the upload directory exists before serving from it
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // 7. Serve the API
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    let state = AppState { db, config };
    axum::serve(listener, http::router(state)).await?;

    Ok(())
}
