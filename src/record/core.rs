//! Defines the record model and the database queries for records.

use std::{fmt::Display, ops::RangeInclusive, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Serialize, Serializer};
use time::{Date, OffsetDateTime};

use crate::Error;

/// The store-native identifier of a record.
pub type RecordId = i64;

/// The most records returned by a single listing.
pub const RECORD_LIST_LIMIT: u32 = 500;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl RecordType {
    /// The name used for the type in requests, responses and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Income => "income",
            RecordType::Expense => "expense",
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(RecordType::Income),
            "expense" => Ok(RecordType::Expense),
            other => Err(Error::InvalidRecordType(other.to_owned())),
        }
    }
}

impl ToSql for RecordType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RecordType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A single income or expense entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// The ID assigned by the database, sent to clients as a string.
    #[serde(serialize_with = "serialize_id")]
    pub id: RecordId,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// How much money was earned or spent.
    pub amount: f64,
    /// The label used to group records in the statistics.
    pub category: String,
    /// The day the money moved.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Free text, empty by default.
    pub description: String,
    /// Whether the record repeats.
    pub is_recurring: bool,
    /// How often the record repeats, e.g. "monthly".
    pub recurring_type: Option<String>,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last updated, `None` if it never was.
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Parse a record ID taken from a URL path.
///
/// # Errors
/// Returns [Error::NotFound] if `text` cannot be a record ID, since no record
/// can have that ID.
pub fn parse_record_id(text: &str) -> Result<RecordId, Error> {
    text.parse().map_err(|_| Error::NotFound)
}

fn serialize_id<S: Serializer>(id: &RecordId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
}

/// The validated fields of a record that is yet to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// Whether this is income or an expense.
    pub record_type: RecordType,
    /// How much money was earned or spent.
    pub amount: f64,
    /// The grouping label.
    pub category: String,
    /// The day the money moved.
    pub date: Date,
    /// Free text.
    pub description: String,
    /// Whether the record repeats.
    pub is_recurring: bool,
    /// How often the record repeats.
    pub recurring_type: Option<String>,
}

impl NewRecord {
    /// Start a record with the required fields, the rest take their defaults.
    pub fn build(record_type: RecordType, amount: f64, category: &str, date: Date) -> Self {
        Self {
            record_type,
            amount,
            category: category.to_owned(),
            date,
            description: String::new(),
            is_recurring: false,
            recurring_type: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Mark the record as recurring with the cadence `recurring_type`.
    pub fn recurring(mut self, recurring_type: Option<&str>) -> Self {
        self.is_recurring = true;
        self.recurring_type = recurring_type.map(ToOwned::to_owned);
        self
    }
}

/// The fields to change on an existing record, `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordChanges {
    /// The new type.
    pub record_type: Option<RecordType>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new category.
    pub category: Option<String>,
    /// The new date.
    pub date: Option<Date>,
    /// The new description.
    pub description: Option<String>,
    /// The new recurring flag.
    pub is_recurring: Option<bool>,
    /// The new cadence, `Some(None)` clears it.
    pub recurring_type: Option<Option<String>>,
}

impl RecordChanges {
    /// Whether no field would be changed.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Selects which records to list.
///
/// Every criterion that is set must match, an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Only include records dated within this range (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
    /// Only include records of this type.
    pub record_type: Option<RecordType>,
    /// Only include records with exactly this category.
    pub category: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

pub fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS record (
            id INTEGER PRIMARY KEY,
            type TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            is_recurring INTEGER NOT NULL DEFAULT 0,
            recurring_type TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_record_date ON record(date);",
    )?;

    Ok(())
}

const RECORD_COLUMNS: &str = "id, type, amount, category, date, description, is_recurring, \
    recurring_type, created_at, updated_at";

pub fn map_record_row(row: &Row) -> Result<Record, rusqlite::Error> {
    Ok(Record {
        id: row.get(0)?,
        record_type: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        description: row.get(5)?,
        is_recurring: row.get(6)?,
        recurring_type: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Store a new record stamped with `created_at`.
///
/// # Errors
/// Returns [Error::SqlError] if the insert fails.
pub fn create_record(
    record: NewRecord,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Record, Error> {
    let query = format!(
        "INSERT INTO record (type, amount, category, date, description, is_recurring, \
            recurring_type, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         RETURNING {RECORD_COLUMNS}"
    );

    connection
        .prepare(&query)?
        .query_row(
            (
                record.record_type,
                record.amount,
                record.category,
                record.date,
                record.description,
                record.is_recurring,
                record.recurring_type,
                created_at,
            ),
            map_record_row,
        )
        .map_err(Error::from)
}

#[cfg(test)]
/// Get a single record by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no record with `id`.
pub fn get_record(id: RecordId, connection: &Connection) -> Result<Record, Error> {
    connection
        .prepare(&format!("SELECT {RECORD_COLUMNS} FROM record WHERE id = ?1"))?
        .query_row([id], map_record_row)
        .map_err(Error::from)
}

/// Get up to [RECORD_LIST_LIMIT] records matching `filter`, newest date first.
///
/// Records on the same date are returned in the order they were created.
///
/// # Errors
/// Returns [Error::SqlError] if the query or row mapping fails.
pub fn get_records(filter: &RecordFilter, connection: &Connection) -> Result<Vec<Record>, Error> {
    let (start_date, end_date) = match &filter.date_range {
        Some(range) => (Some(*range.start()), Some(*range.end())),
        None => (None, None),
    };

    let query = format!(
        "SELECT {RECORD_COLUMNS} FROM record \
        WHERE (?1 IS NULL OR date BETWEEN ?1 AND ?2) \
        AND (?3 IS NULL OR type = ?3) \
        AND (?4 IS NULL OR category = ?4) \
        ORDER BY date DESC, id ASC \
        LIMIT {RECORD_LIST_LIMIT}"
    );

    connection
        .prepare(&query)?
        .query_map(
            (start_date, end_date, filter.record_type, filter.category.as_deref()),
            map_record_row,
        )?
        .map(|record_result| record_result.map_err(Error::from))
        .collect()
}

type RowsAffected = usize;

/// Apply `changes` to the record `id` and set its `updated_at` time.
///
/// Only the fields set in `changes` are written, in one statement.
///
/// # Errors
/// Returns [Error::SqlError] if the update fails.
pub fn update_record(
    id: RecordId,
    changes: &RecordChanges,
    updated_at: OffsetDateTime,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    let mut assignments: Vec<&str> = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();

    if let Some(record_type) = &changes.record_type {
        assignments.push("type = ?");
        values.push(record_type);
    }
    if let Some(amount) = &changes.amount {
        assignments.push("amount = ?");
        values.push(amount);
    }
    if let Some(category) = &changes.category {
        assignments.push("category = ?");
        values.push(category);
    }
    if let Some(date) = &changes.date {
        assignments.push("date = ?");
        values.push(date);
    }
    if let Some(description) = &changes.description {
        assignments.push("description = ?");
        values.push(description);
    }
    if let Some(is_recurring) = &changes.is_recurring {
        assignments.push("is_recurring = ?");
        values.push(is_recurring);
    }
    if let Some(recurring_type) = &changes.recurring_type {
        assignments.push("recurring_type = ?");
        values.push(recurring_type);
    }

    assignments.push("updated_at = ?");
    values.push(&updated_at);
    values.push(&id);

    let query = format!(
        "UPDATE record SET {} WHERE id = ?",
        assignments.join(", ")
    );

    connection
        .execute(&query, values.as_slice())
        .map_err(Error::from)
}

/// Delete the record `id`.
///
/// # Errors
/// Returns [Error::SqlError] if the delete fails.
pub fn delete_record(id: RecordId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM record WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

#[cfg(test)]
pub fn count_records(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM record", [], |row| row.get(0))
        .map_err(Error::from)
}




#[cfg(test)]
mod serialize_tests {
    use serde_json::json;
    use time::macros::{date, datetime};

    use super::{Record, RecordType};

    #[test]
    fn serializes_id_as_string_and_date_as_iso() {
        let record = Record {
            id: 42,
            record_type: RecordType::Expense,
            amount: 12.5,
            category: "food".to_owned(),
            date: date!(2024 - 01 - 15),
            description: String::new(),
            is_recurring: false,
            recurring_type: None,
            created_at: datetime!(2024-01-15 08:30 UTC),
            updated_at: None,
        };

        let got = serde_json::to_value(&record).unwrap();

        assert_eq!(
            got,
            json!({
                "id": "42",
                "type": "expense",
                "amount": 12.5,
                "category": "food",
                "date": "2024-01-15",
                "description": "",
                "is_recurring": false,
                "recurring_type": null,
                "created_at": "2024-01-15T08:30:00Z",
                "updated_at": null,
            })
        );
    }
}
