/// Application settings loaded from the environment
pub mod app;

/// Database connection and table creation
pub mod database;

pub use app::AppConfig;
