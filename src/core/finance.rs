//! Financial entry business logic - receivables, payables and recurring
//! expansion.
//!
//! A recurring request is expanded into independent rows at creation time,
//! all inside one transaction. Calendar periods follow month arithmetic
//! from the first due date, so a bill due on the 31st lands on the last
//! day of shorter months (Jan 31 -> Feb 29 -> Mar 31 in a leap year).

use crate::{
    entities::{Client, FinancialEntry, Trip, financial_entry},
    errors::{Error, Result},
};
use chrono::{Duration, Months, NaiveDate};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

/// How often a recurring entry repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePeriod {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

/// Input for creating entries or fully replacing one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntryInput {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub description: String,
    pub amount: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status: String,
    pub category: String,
    #[serde(default)]
    pub observation: Option<String>,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub trip_id: Option<i64>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub recurrence_period: Option<RecurrencePeriod>,
    #[serde(default)]
    pub recurrence_count: Option<u32>,
}

fn default_status() -> String {
    "open".to_string()
}

/// Optional filters for listing entries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilter {
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// An entry joined with its optional client and trip references.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetails {
    #[serde(flatten)]
    pub entry: financial_entry::Model,
    pub client: Option<crate::entities::ClientModel>,
    pub trip: Option<crate::entities::TripModel>,
}

fn validate(input: &EntryInput) -> Result<()> {
    if input.entry_type != "receivable" && input.entry_type != "payable" {
        return Err(Error::validation(
            "Entry type must be receivable or payable",
        ));
    }
    if input.description.trim().is_empty() {
        return Err(Error::validation("Description is required"));
    }
    match input.amount.trim().parse::<f64>() {
        Ok(value) if value >= 0.0 && value.is_finite() => {}
        _ => return Err(Error::validation("Amount must be a non-negative decimal")),
    }
    if !matches!(input.status.as_str(), "open" | "paid" | "overdue") {
        return Err(Error::validation(
            "Entry status must be open, paid or overdue",
        ));
    }
    if input.recurring {
        if input.recurrence_period.is_none() {
            return Err(Error::validation(
                "A recurring entry needs a recurrence period",
            ));
        }
        match input.recurrence_count {
            Some(count) if (2..=60).contains(&count) => {}
            _ => {
                return Err(Error::validation(
                    "Recurrence count must be between 2 and 60",
                ));
            }
        }
    }
    Ok(())
}

async fn check_references<C: ConnectionTrait>(conn: &C, input: &EntryInput) -> Result<()> {
    if let Some(client_id) = input.client_id {
        Client::find_by_id(client_id)
            .one(conn)
            .await?
            .ok_or(Error::ClientNotFound { id: client_id })?;
    }
    if let Some(trip_id) = input.trip_id {
        Trip::find_by_id(trip_id)
            .one(conn)
            .await?
            .ok_or(Error::TripNotFound { id: trip_id })?;
    }
    Ok(())
}

/// Computes the due date of the `index`-th occurrence (zero-based).
///
/// Calendar periods are always computed from the first due date, never
/// chained, so clamping at a short month does not shift later occurrences.
fn occurrence_due_date(
    first: NaiveDate,
    period: RecurrencePeriod,
    index: u32,
) -> Result<NaiveDate> {
    let date = match period {
        RecurrencePeriod::Weekly => first.checked_add_signed(Duration::weeks(i64::from(index))),
        RecurrencePeriod::Biweekly => {
            first.checked_add_signed(Duration::weeks(2 * i64::from(index)))
        }
        RecurrencePeriod::Monthly => first.checked_add_months(Months::new(index)),
        RecurrencePeriod::Quarterly => first.checked_add_months(Months::new(3 * index)),
        RecurrencePeriod::Yearly => first.checked_add_months(Months::new(12 * index)),
    };
    date.ok_or_else(|| Error::validation("Recurrence runs past the supported date range"))
}

/// Creates one entry, or the full series for a recurring request, in one
/// transaction. Installment descriptions carry an `" (i/n)"` suffix.
pub async fn create_entries(
    db: &DatabaseConnection,
    input: EntryInput,
) -> Result<Vec<financial_entry::Model>> {
    validate(&input)?;

    let txn = db.begin().await?;
    check_references(&txn, &input).await?;

    let occurrences = if input.recurring {
        input.recurrence_count.unwrap_or(2)
    } else {
        1
    };

    let mut created = Vec::with_capacity(occurrences as usize);
    for index in 0..occurrences {
        let (description, due_date) = if input.recurring {
            let period = input.recurrence_period.ok_or_else(|| {
                Error::validation("A recurring entry needs a recurrence period")
            })?;
            (
                format!(
                    "{} ({}/{})",
                    input.description.trim(),
                    index + 1,
                    occurrences
                ),
                occurrence_due_date(input.due_date, period, index)?,
            )
        } else {
            (input.description.trim().to_string(), input.due_date)
        };

        let row = financial_entry::ActiveModel {
            entry_type: Set(input.entry_type.clone()),
            description: Set(description),
            amount: Set(input.amount.trim().to_string()),
            due_date: Set(due_date),
            paid_date: Set(input.paid_date),
            status: Set(input.status.clone()),
            category: Set(input.category.clone()),
            observation: Set(input.observation.clone()),
            client_id: Set(input.client_id),
            trip_id: Set(input.trip_id),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        created.push(row);
    }

    txn.commit().await?;
    Ok(created)
}

async fn assemble(db: &DatabaseConnection, entry: financial_entry::Model) -> Result<EntryDetails> {
    let client = match entry.client_id {
        Some(client_id) => Client::find_by_id(client_id).one(db).await?,
        None => None,
    };
    let trip = match entry.trip_id {
        Some(trip_id) => Trip::find_by_id(trip_id).one(db).await?,
        None => None,
    };
    Ok(EntryDetails {
        entry,
        client,
        trip,
    })
}

/// Retrieves entries ordered by due date, with optional type, status and
/// due-date range filters.
pub async fn get_entries(
    db: &DatabaseConnection,
    filter: EntryFilter,
) -> Result<Vec<EntryDetails>> {
    let mut query = FinancialEntry::find().order_by_asc(financial_entry::Column::DueDate);
    if let Some(entry_type) = &filter.entry_type {
        query = query.filter(financial_entry::Column::EntryType.eq(entry_type));
    }
    if let Some(status) = &filter.status {
        query = query.filter(financial_entry::Column::Status.eq(status));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(financial_entry::Column::DueDate.gte(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(financial_entry::Column::DueDate.lte(end));
    }

    let entries = query.all(db).await?;
    let mut details = Vec::with_capacity(entries.len());
    for entry in entries {
        details.push(assemble(db, entry).await?);
    }
    Ok(details)
}

/// Retrieves one entry with its references.
pub async fn get_entry(db: &DatabaseConnection, id: i64) -> Result<EntryDetails> {
    let entry = FinancialEntry::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::EntryNotFound { id })?;
    assemble(db, entry).await
}

/// Fully replaces an entry's fields. Recurrence fields in the input are
/// ignored here; an existing row is always a single installment.
pub async fn update_entry(
    db: &DatabaseConnection,
    id: i64,
    input: EntryInput,
) -> Result<financial_entry::Model> {
    let single = EntryInput {
        recurring: false,
        recurrence_period: None,
        recurrence_count: None,
        ..input
    };
    validate(&single)?;
    check_references(db, &single).await?;

    let mut model: financial_entry::ActiveModel = FinancialEntry::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::EntryNotFound { id })?
        .into();

    model.entry_type = Set(single.entry_type);
    model.description = Set(single.description.trim().to_string());
    model.amount = Set(single.amount.trim().to_string());
    model.due_date = Set(single.due_date);
    model.paid_date = Set(single.paid_date);
    model.status = Set(single.status);
    model.category = Set(single.category);
    model.observation = Set(single.observation);
    model.client_id = Set(single.client_id);
    model.trip_id = Set(single.trip_id);
    model.update(db).await.map_err(Into::into)
}

/// Deletes one entry.
pub async fn delete_entry(db: &DatabaseConnection, id: i64) -> Result<()> {
    let result = FinancialEntry::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::EntryNotFound { id });
    }
    Ok(())
}
