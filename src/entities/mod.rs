//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod client;
pub mod client_price;
pub mod contact_submission;
pub mod financial_entry;
pub mod hero_slide;
pub mod message;
pub mod order;
pub mod order_item;
pub mod product;
pub mod session;
pub mod showcase_product;
pub mod site_setting;
pub mod trip;
pub mod user;

// Re-export specific types to avoid conflicts
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use client_price::{Column as ClientPriceColumn, Entity as ClientPrice, Model as ClientPriceModel};
pub use contact_submission::{
    Column as ContactSubmissionColumn, Entity as ContactSubmission, Model as ContactSubmissionModel,
};
pub use financial_entry::{
    Column as FinancialEntryColumn, Entity as FinancialEntry, Model as FinancialEntryModel,
};
pub use hero_slide::{Column as HeroSlideColumn, Entity as HeroSlide, Model as HeroSlideModel};
pub use message::{Column as MessageColumn, Entity as Message, Model as MessageModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel, OrderStatus};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use showcase_product::{
    Column as ShowcaseProductColumn, Entity as ShowcaseProduct, Model as ShowcaseProductModel,
};
pub use site_setting::{Column as SiteSettingColumn, Entity as SiteSetting, Model as SiteSettingModel};
pub use trip::{Column as TripColumn, Entity as Trip, Model as TripModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
