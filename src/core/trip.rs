//! Trip business logic - delivery batches that group orders.
//!
//! Trips are only ever created and updated; closing a trip is a status
//! toggle, not a delete.

use crate::{
    entities::{Trip, trip},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Input for creating or fully replacing a trip.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TripInput {
    pub name: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "open".to_string()
}

fn validate(input: &TripInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("Trip name is required"));
    }
    if input.status != "open" && input.status != "closed" {
        return Err(Error::validation("Trip status must be open or closed"));
    }
    if let Some(end) = input.end_date {
        if end < input.start_date {
            return Err(Error::validation("End date cannot precede start date"));
        }
    }
    Ok(())
}

/// Retrieves all trips, most recent start date first.
pub async fn get_trips(db: &DatabaseConnection) -> Result<Vec<trip::Model>> {
    Trip::find()
        .order_by_desc(trip::Column::StartDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a trip by its unique ID.
pub async fn get_trip(db: &DatabaseConnection, id: i64) -> Result<Option<trip::Model>> {
    Trip::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Creates a new trip.
pub async fn create_trip(db: &DatabaseConnection, input: TripInput) -> Result<trip::Model> {
    validate(&input)?;

    let model = trip::ActiveModel {
        name: Set(input.name.trim().to_string()),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        status: Set(input.status),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Fully replaces a trip's fields; this is also how trips open and close.
pub async fn update_trip(
    db: &DatabaseConnection,
    id: i64,
    input: TripInput,
) -> Result<trip::Model> {
    validate(&input)?;

    let mut model: trip::ActiveModel = Trip::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::TripNotFound { id })?
        .into();

    model.name = Set(input.name.trim().to_string());
    model.start_date = Set(input.start_date);
    model.end_date = Set(input.end_date);
    model.status = Set(input.status);
    model.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_trip_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_test_trip(&db, "April run").await?;
        assert_eq!(created.status, "open");

        let closed = update_trip(
            &db,
            created.id,
            TripInput {
                name: created.name.clone(),
                start_date: created.start_date,
                end_date: Some(created.start_date),
                status: "closed".to_string(),
            },
        )
        .await?;
        assert_eq!(closed.status, "closed");

        Ok(())
    }

    #[tokio::test]
    async fn test_trips_ordered_by_start_date() -> Result<()> {
        let db = setup_test_db().await?;

        create_trip(
            &db,
            TripInput {
                name: "Older".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                end_date: None,
                status: "open".to_string(),
            },
        )
        .await?;
        create_trip(
            &db,
            TripInput {
                name: "Newer".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                end_date: None,
                status: "open".to_string(),
            },
        )
        .await?;

        let trips = get_trips(&db).await?;
        assert_eq!(trips[0].name, "Newer");
        assert_eq!(trips[1].name, "Older");

        Ok(())
    }

    #[tokio::test]
    async fn test_trip_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_trip(
            &db,
            TripInput {
                name: "Bad".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                end_date: Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
                status: "open".to_string(),
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        let result = update_trip(
            &db,
            99,
            TripInput {
                name: "Ghost".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                end_date: None,
                status: "open".to_string(),
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::TripNotFound { id: 99 }));

        Ok(())
    }
}
