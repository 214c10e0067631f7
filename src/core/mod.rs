//! Core business logic, independent of the HTTP layer.
//!
//! Every function takes a `&DatabaseConnection` and returns the crate
//! [`Result`](crate::errors::Result); handlers stay thin and tests can
//! exercise the logic straight against an in-memory database.

pub mod client;
pub mod finance;
pub mod message;
pub mod order;
pub mod price;
pub mod product;
pub mod showcase;
pub mod trip;
pub mod user;
