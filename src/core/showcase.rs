//! Marketing site business logic - showcase catalog, hero slides,
//! key-value site settings and contact submissions.
//!
//! Everything here is plain content management; the public site reads the
//! active subsets, staff manage the full sets.

use crate::{
    entities::{
        ContactSubmission, HeroSlide, ShowcaseProduct, SiteSetting, contact_submission,
        hero_slide, showcase_product, site_setting,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use std::collections::HashMap;

/// Input for creating or fully replacing a showcase product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ShowcaseProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Input for creating or fully replacing a hero slide.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeroSlideInput {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub button_link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Input for the public contact form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContactInput {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

const fn default_active() -> bool {
    true
}

// Showcase products

/// Retrieves all showcase products, sort order then newest first.
pub async fn get_showcase_products(
    db: &DatabaseConnection,
) -> Result<Vec<showcase_product::Model>> {
    ShowcaseProduct::find()
        .order_by_asc(showcase_product::Column::SortOrder)
        .order_by_desc(showcase_product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves only active showcase products, for the public site.
pub async fn get_active_showcase_products(
    db: &DatabaseConnection,
) -> Result<Vec<showcase_product::Model>> {
    ShowcaseProduct::find()
        .filter(showcase_product::Column::Active.eq(true))
        .order_by_asc(showcase_product::Column::SortOrder)
        .order_by_desc(showcase_product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one active showcase product, for the public product page.
pub async fn get_active_showcase_product(
    db: &DatabaseConnection,
    id: i64,
) -> Result<showcase_product::Model> {
    ShowcaseProduct::find_by_id(id)
        .one(db)
        .await?
        .filter(|p| p.active)
        .ok_or(Error::ShowcaseProductNotFound { id })
}

/// Creates a showcase product.
pub async fn create_showcase_product(
    db: &DatabaseConnection,
    input: ShowcaseProductInput,
) -> Result<showcase_product::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("Showcase product name is required"));
    }
    showcase_product::ActiveModel {
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        category: Set(input.category),
        image_url: Set(input.image_url),
        active: Set(input.active),
        sort_order: Set(input.sort_order),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Fully replaces a showcase product.
pub async fn update_showcase_product(
    db: &DatabaseConnection,
    id: i64,
    input: ShowcaseProductInput,
) -> Result<showcase_product::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("Showcase product name is required"));
    }
    let mut model: showcase_product::ActiveModel = ShowcaseProduct::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::ShowcaseProductNotFound { id })?
        .into();

    model.name = Set(input.name.trim().to_string());
    model.description = Set(input.description);
    model.category = Set(input.category);
    model.image_url = Set(input.image_url);
    model.active = Set(input.active);
    model.sort_order = Set(input.sort_order);
    model.update(db).await.map_err(Into::into)
}

/// Deletes a showcase product.
pub async fn delete_showcase_product(db: &DatabaseConnection, id: i64) -> Result<()> {
    let result = ShowcaseProduct::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ShowcaseProductNotFound { id });
    }
    Ok(())
}

// Hero slides

/// Retrieves all hero slides in display order.
pub async fn get_hero_slides(db: &DatabaseConnection) -> Result<Vec<hero_slide::Model>> {
    HeroSlide::find()
        .order_by_asc(hero_slide::Column::SortOrder)
        .order_by_desc(hero_slide::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves only active hero slides, for the public site.
pub async fn get_active_hero_slides(db: &DatabaseConnection) -> Result<Vec<hero_slide::Model>> {
    HeroSlide::find()
        .filter(hero_slide::Column::Active.eq(true))
        .order_by_asc(hero_slide::Column::SortOrder)
        .order_by_desc(hero_slide::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a hero slide.
pub async fn create_hero_slide(
    db: &DatabaseConnection,
    input: HeroSlideInput,
) -> Result<hero_slide::Model> {
    if input.title.trim().is_empty() {
        return Err(Error::validation("Slide title is required"));
    }
    hero_slide::ActiveModel {
        title: Set(input.title.trim().to_string()),
        subtitle: Set(input.subtitle),
        button_text: Set(input.button_text),
        button_link: Set(input.button_link),
        image_url: Set(input.image_url),
        sort_order: Set(input.sort_order),
        active: Set(input.active),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Fully replaces a hero slide.
pub async fn update_hero_slide(
    db: &DatabaseConnection,
    id: i64,
    input: HeroSlideInput,
) -> Result<hero_slide::Model> {
    if input.title.trim().is_empty() {
        return Err(Error::validation("Slide title is required"));
    }
    let mut model: hero_slide::ActiveModel = HeroSlide::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::SlideNotFound { id })?
        .into();

    model.title = Set(input.title.trim().to_string());
    model.subtitle = Set(input.subtitle);
    model.button_text = Set(input.button_text);
    model.button_link = Set(input.button_link);
    model.image_url = Set(input.image_url);
    model.sort_order = Set(input.sort_order);
    model.active = Set(input.active);
    model.update(db).await.map_err(Into::into)
}

/// Deletes a hero slide.
pub async fn delete_hero_slide(db: &DatabaseConnection, id: i64) -> Result<()> {
    let result = HeroSlide::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::SlideNotFound { id });
    }
    Ok(())
}

// Site settings

/// Retrieves all site settings as a key-value map.
pub async fn get_site_settings(db: &DatabaseConnection) -> Result<HashMap<String, String>> {
    let rows = SiteSetting::find().all(db).await?;
    Ok(rows.into_iter().map(|s| (s.key, s.value)).collect())
}

/// Retrieves one setting value by key.
pub async fn get_site_setting(db: &DatabaseConnection, key: &str) -> Result<Option<String>> {
    Ok(SiteSetting::find()
        .filter(site_setting::Column::Key.eq(key))
        .one(db)
        .await?
        .map(|s| s.value))
}

/// Creates or overwrites one setting.
pub async fn upsert_site_setting(
    db: &DatabaseConnection,
    key: &str,
    value: &str,
) -> Result<site_setting::Model> {
    if key.trim().is_empty() {
        return Err(Error::validation("Setting key is required"));
    }

    let existing = SiteSetting::find()
        .filter(site_setting::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(row) = existing {
        let mut model: site_setting::ActiveModel = row.into();
        model.value = Set(value.to_string());
        return model.update(db).await.map_err(Into::into);
    }

    site_setting::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

// Contact submissions

/// Records a contact form submission.
pub async fn create_contact_submission(
    db: &DatabaseConnection,
    input: ContactInput,
) -> Result<contact_submission::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("Name is required"));
    }
    if input.message.trim().is_empty() {
        return Err(Error::validation("Message is required"));
    }
    contact_submission::ActiveModel {
        name: Set(input.name.trim().to_string()),
        email: Set(input.email),
        phone: Set(input.phone),
        subject: Set(input.subject),
        message: Set(input.message.trim().to_string()),
        read: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Retrieves all contact submissions, newest first.
pub async fn get_contact_submissions(
    db: &DatabaseConnection,
) -> Result<Vec<contact_submission::Model>> {
    ContactSubmission::find()
        .order_by_desc(contact_submission::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts unread contact submissions, for the staff badge.
pub async fn unread_contact_count(db: &DatabaseConnection) -> Result<u64> {
    ContactSubmission::find()
        .filter(contact_submission::Column::Read.eq(false))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Marks one contact submission as read.
pub async fn mark_contact_read(
    db: &DatabaseConnection,
    id: i64,
) -> Result<contact_submission::Model> {
    let mut model: contact_submission::ActiveModel = ContactSubmission::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::SubmissionNotFound { id })?
        .into();

    model.read = Set(true);
    model.update(db).await.map_err(Into::into)
}

/// Deletes one contact submission.
pub async fn delete_contact_submission(db: &DatabaseConnection, id: i64) -> Result<()> {
    let result = ContactSubmission::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::SubmissionNotFound { id });
    }
    Ok(())
}
