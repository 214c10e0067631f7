//! Database connection and table creation using SeaORM.
//!
//! Tables are generated straight from the entity definitions with
//! `Schema::create_table_from_entity`, so the SQLite schema always matches
//! the Rust structs without hand-written SQL. Creation is idempotent
//! (`IF NOT EXISTS`) so restarts over an existing database file are safe.

use crate::entities::{
    Client, ClientPrice, ContactSubmission, FinancialEntry, HeroSlide, Message, Order, OrderItem,
    Product, Session, ShowcaseProduct, SiteSetting, Trip, User,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection using the `DATABASE_URL` environment variable,
/// falling back to a local SQLite file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/orderdesk.sqlite?mode=rwc".to_string());

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Referenced tables are created before the tables that point at them so
/// the generated foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    macro_rules! create_table {
        ($entity:expr) => {{
            let mut statement = schema.create_table_from_entity($entity);
            statement.if_not_exists();
            db.execute(builder.build(&statement)).await?;
        }};
    }

    create_table!(Client);
    create_table!(Product);
    create_table!(Trip);
    create_table!(User);
    create_table!(ClientPrice);
    create_table!(Order);
    create_table!(OrderItem);
    create_table!(Message);
    create_table!(FinancialEntry);
    create_table!(ShowcaseProduct);
    create_table!(SiteSetting);
    create_table!(HeroSlide);
    create_table!(ContactSubmission);
    create_table!(Session);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ClientModel, OrderModel, ProductModel, UserModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Querying each table verifies it exists
        let _: Vec<ClientModel> = Client::find().limit(1).all(&db).await?;
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<OrderModel> = Order::find().limit(1).all(&db).await?;
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<ClientModel> = Client::find().limit(1).all(&db).await?;
        Ok(())
    }
}
