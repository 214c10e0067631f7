//! Unified error types and result handling for the whole crate.
//!
//! Domain functions return [`Result`] and let storage errors bubble up as
//! [`Error::Database`]; the HTTP layer classifies errors into status codes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input rejected before reaching storage.
    #[error("{message}")]
    Validation { message: String },

    #[error("Client {id} not found")]
    ClientNotFound { id: i64 },

    #[error("Product {id} not found")]
    ProductNotFound { id: i64 },

    #[error("Trip {id} not found")]
    TripNotFound { id: i64 },

    #[error("Order {id} not found")]
    OrderNotFound { id: i64 },

    #[error("Financial entry {id} not found")]
    EntryNotFound { id: i64 },

    #[error("Message {id} not found")]
    MessageNotFound { id: i64 },

    #[error("User {id} not found")]
    UserNotFound { id: String },

    #[error("Showcase product {id} not found")]
    ShowcaseProductNotFound { id: i64 },

    #[error("Hero slide {id} not found")]
    SlideNotFound { id: i64 },

    #[error("Contact submission {id} not found")]
    SubmissionNotFound { id: i64 },

    /// Product deletion blocked because order items still reference it.
    #[error("Product is referenced by existing order items")]
    ProductInUse,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

impl Error {
    /// Shorthand for an [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Returns true when a database error is a foreign-key constraint violation.
///
/// SQLite reports these as "FOREIGN KEY constraint failed"; the Postgres
/// wording is matched as well so the remap survives a backend change.
#[must_use]
pub fn is_foreign_key_violation(err: &sea_orm::DbErr) -> bool {
    let text = err.to_string();
    text.contains("FOREIGN KEY constraint failed") || text.contains("violates foreign key")
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
